//! Request bodies assembled from forms
//!
//! Only defined fields are appended, so an update sends just what changed.
//! A body with any file becomes `multipart/form-data`; otherwise it is sent as
//! a JSON object with typed values.

use crate::error::{AdminError, AdminResult};
use crate::models::Upload;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::multipart;
use serde_json::{Map, Value};

/// One form field value
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    Bool(bool),
    Int(i64),
    File(Upload),
}

/// Ordered list of form fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    fields: Vec<(String, FormValue)>,
}

/// Conversion of a schema into its wire body
pub trait ToFormData {
    fn to_form_data(&self) -> FormData;
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, name: &str, value: FormValue) -> Self {
        self.fields.push((name.to_string(), value));
        self
    }

    pub fn text(self, name: &str, value: impl Into<String>) -> Self {
        self.push(name, FormValue::Text(value.into()))
    }

    pub fn opt_text(self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.text(name, v),
            None => self,
        }
    }

    pub fn opt_bool(self, name: &str, value: Option<bool>) -> Self {
        match value {
            Some(v) => self.push(name, FormValue::Bool(v)),
            None => self,
        }
    }

    pub fn opt_int(self, name: &str, value: Option<i64>) -> Self {
        match value {
            Some(v) => self.push(name, FormValue::Int(v)),
            None => self,
        }
    }

    pub fn opt_date(self, name: &str, value: Option<&DateTime<Utc>>) -> Self {
        match value {
            Some(v) => self.text(name, v.to_rfc3339_opts(SecondsFormat::Secs, true)),
            None => self,
        }
    }

    pub fn opt_file(self, name: &str, value: Option<&Upload>) -> Self {
        match value {
            Some(v) => self.push(name, FormValue::File(v.clone())),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn has_files(&self) -> bool {
        self.fields
            .iter()
            .any(|(_, v)| matches!(v, FormValue::File(_)))
    }

    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// JSON object of the non-file fields
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (name, value) in &self.fields {
            let json = match value {
                FormValue::Text(t) => Value::String(t.clone()),
                FormValue::Bool(b) => Value::Bool(*b),
                FormValue::Int(i) => Value::from(*i),
                FormValue::File(_) => continue,
            };
            map.insert(name.clone(), json);
        }
        Value::Object(map)
    }

    pub fn into_multipart(self) -> AdminResult<multipart::Form> {
        let mut form = multipart::Form::new();
        for (name, value) in self.fields {
            form = match value {
                FormValue::Text(t) => form.text(name, t),
                FormValue::Bool(b) => form.text(name, b.to_string()),
                FormValue::Int(i) => form.text(name, i.to_string()),
                FormValue::File(file) => {
                    let part = multipart::Part::bytes(file.bytes)
                        .file_name(file.file_name)
                        .mime_str(&file.content_type)
                        .map_err(|e| {
                            AdminError::Unsupported(format!(
                                "Invalid MIME type '{}': {}",
                                file.content_type, e
                            ))
                        })?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_only_defined_fields_are_appended() {
        let form = FormData::new()
            .opt_text("title", Some("Summer sale"))
            .opt_text("subtitle", None)
            .opt_bool("isActive", Some(false))
            .opt_int("rating", None);

        assert_eq!(form.names(), vec!["title", "isActive"]);
        assert_eq!(form.to_json(), json!({ "title": "Summer sale", "isActive": false }));
    }

    #[test]
    fn test_file_presence_switches_to_multipart() {
        let form = FormData::new().text("title", "x");
        assert!(!form.has_files());

        let file = Upload::new("a.png", "image/png", vec![1, 2, 3]);
        let form = form.opt_file("image", Some(&file));
        assert!(form.has_files());
        assert!(form.clone().into_multipart().is_ok());
        // files never leak into the JSON rendition
        assert_eq!(form.to_json(), json!({ "title": "x" }));
    }

    #[test]
    fn test_dates_are_rfc3339() {
        let date = DateTime::parse_from_rfc3339("2030-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        let form = FormData::new().opt_date("expiresAt", Some(&date));
        assert_eq!(
            form.get("expiresAt"),
            Some(&FormValue::Text("2030-01-02T03:04:05Z".to_string()))
        );
    }
}
