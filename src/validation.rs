//! Form validation
//!
//! Custom validators shared by the resource schemas and the conversion of
//! `validator` errors into field-scoped messages for inline display.

use crate::error::{AdminError, AdminResult};
use crate::models::Upload;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use validator::{Validate, ValidationError, ValidationErrors};

/// Upper bound for regular image uploads (5 MiB)
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

/// Upper bound for large images and documents (10 MiB)
pub const MAX_DOCUMENT_SIZE: usize = 10 * 1024 * 1024;

/// MIME types accepted for image fields
pub const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/gif",
    "image/svg+xml",
];

pub const PDF_MIME_TYPE: &str = "application/pdf";

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}){1,2}$").expect("valid hex colour regex"));

pub static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 ()\-]{6,19}$").expect("valid phone regex"));

/// A single failed rule on a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub code: String,
    pub message: String,
}

/// Field name → failed rules, ordered by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    fields: BTreeMap<String, Vec<FieldError>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Record an error against a field.
    pub fn add(&mut self, field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_default().push(FieldError {
            code: code.into(),
            message: message.into(),
        });
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn get(&self, field: &str) -> &[FieldError] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First message for a field, as rendered beneath the input.
    pub fn message(&self, field: &str) -> Option<&str> {
        self.get(field).first().map(|e| e.message.as_str())
    }

    pub fn has_code(&self, field: &str, code: &str) -> bool {
        self.get(field).iter().any(|e| e.code == code)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn first_message(&self) -> Option<String> {
        self.fields
            .values()
            .flat_map(|errs| errs.iter())
            .map(|e| e.message.clone())
            .next()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, errs) in &self.fields {
            for err in errs {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, err.message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            for err in errs.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                out.add(wire_name(field), err.code.to_string(), message);
            }
        }
        out
    }
}

/// camelCase name of a schema field, as sent to the API: `expires_at` → `expiresAt`
fn wire_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Run a schema and convert failures into field-scoped errors.
pub fn validate_form<T: Validate>(form: &T) -> AdminResult<()> {
    form.validate().map_err(AdminError::from)
}

fn rule_error(code: &'static str, message: String) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn check_image(file: &Upload, limit: usize) -> Result<(), ValidationError> {
    if !ALLOWED_IMAGE_TYPES.contains(&file.content_type.as_str()) {
        return Err(rule_error(
            "invalid_image_type",
            "Only JPEG, PNG, WebP, GIF and SVG images are allowed".to_string(),
        ));
    }
    check_size(file, limit)
}

fn check_size(file: &Upload, limit: usize) -> Result<(), ValidationError> {
    if file.size() > limit {
        return Err(rule_error(
            "file_too_large",
            format!("File must be at most {} MB", limit / (1024 * 1024)),
        ));
    }
    Ok(())
}

/// Image up to 5 MiB with an allowed MIME type
pub fn validate_image(file: &Upload) -> Result<(), ValidationError> {
    check_image(file, MAX_IMAGE_SIZE)
}

/// Image up to 10 MiB with an allowed MIME type
pub fn validate_large_image(file: &Upload) -> Result<(), ValidationError> {
    check_image(file, MAX_DOCUMENT_SIZE)
}

/// PDF document up to 10 MiB
pub fn validate_pdf(file: &Upload) -> Result<(), ValidationError> {
    if file.content_type != PDF_MIME_TYPE {
        return Err(rule_error(
            "invalid_document_type",
            "Only PDF documents are allowed".to_string(),
        ));
    }
    check_size(file, MAX_DOCUMENT_SIZE)
}

/// Dates that must lie strictly after the current instant
pub fn validate_future_date(date: &DateTime<Utc>) -> Result<(), ValidationError> {
    if *date <= Utc::now() {
        return Err(rule_error(
            "future_date_required",
            "A future date is required".to_string(),
        ));
    }
    Ok(())
}

/// Star ratings run from 1 to 5
pub fn validate_rating(rating: u8) -> Result<(), ValidationError> {
    if !(1..=5).contains(&rating) {
        return Err(rule_error(
            "invalid_rating",
            "Rating must be between 1 and 5".to_string(),
        ));
    }
    Ok(())
}

/// New password on an edit form; an empty value means "keep the current one".
pub fn validate_password_change(password: &str) -> Result<(), ValidationError> {
    if !password.is_empty() && password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(rule_error(
            "length",
            format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn upload(content_type: &str, size: usize) -> Upload {
        Upload::new("file.bin", content_type, vec![0u8; size])
    }

    #[test]
    fn test_image_at_exact_limit_passes() {
        assert!(validate_image(&upload("image/png", MAX_IMAGE_SIZE)).is_ok());
    }

    #[test]
    fn test_image_one_byte_over_limit_fails() {
        let err = validate_image(&upload("image/png", MAX_IMAGE_SIZE + 1)).unwrap_err();
        assert_eq!(err.code, "file_too_large");
    }

    #[test]
    fn test_large_image_limit() {
        assert!(validate_large_image(&upload("image/jpeg", MAX_DOCUMENT_SIZE)).is_ok());
        assert!(validate_large_image(&upload("image/jpeg", MAX_DOCUMENT_SIZE + 1)).is_err());
    }

    #[test]
    fn test_image_mime_allow_list() {
        let err = validate_image(&upload("application/pdf", 10)).unwrap_err();
        assert_eq!(err.code, "invalid_image_type");
        assert!(validate_image(&upload("image/webp", 10)).is_ok());
    }

    #[test]
    fn test_pdf_only_documents() {
        assert!(validate_pdf(&upload(PDF_MIME_TYPE, MAX_DOCUMENT_SIZE)).is_ok());
        assert!(validate_pdf(&upload(PDF_MIME_TYPE, MAX_DOCUMENT_SIZE + 1)).is_err());
        let err = validate_pdf(&upload("image/png", 10)).unwrap_err();
        assert_eq!(err.code, "invalid_document_type");
    }

    #[test]
    fn test_future_date() {
        assert!(validate_future_date(&(Utc::now() + Duration::days(1))).is_ok());
        let err = validate_future_date(&(Utc::now() - Duration::days(1))).unwrap_err();
        assert_eq!(err.code, "future_date_required");
    }

    #[test]
    fn test_rating_bounds() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn test_password_change_allows_empty() {
        assert!(validate_password_change("").is_ok());
        assert!(validate_password_change("long enough").is_ok());
        let err = validate_password_change("short").unwrap_err();
        assert_eq!(err.code, "length");
    }

    #[test]
    fn test_field_keys_use_wire_names() {
        assert_eq!(wire_name("expires_at"), "expiresAt");
        assert_eq!(wire_name("background_image"), "backgroundImage");
        assert_eq!(wire_name("title"), "title");
    }

    #[test]
    fn test_patterns() {
        assert!(HEX_COLOR_RE.is_match("#fff"));
        assert!(HEX_COLOR_RE.is_match("#A1B2C3"));
        assert!(!HEX_COLOR_RE.is_match("red"));
        assert!(PHONE_RE.is_match("+1 (555) 010-2030"));
        assert!(!PHONE_RE.is_match("call me"));
    }

    #[test]
    fn test_field_errors_display_and_lookup() {
        let mut errors = FieldErrors::new();
        errors.add("title", "required", "Title is required");
        errors.add("image", "required", "Image is required");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.message("title"), Some("Title is required"));
        assert!(errors.has_code("image", "required"));
        assert_eq!(
            errors.to_string(),
            "image: Image is required; title: Title is required"
        );
    }
}
