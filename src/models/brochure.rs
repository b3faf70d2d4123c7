//! Downloadable PDF brochures

use crate::api::{FormData, ToFormData};
use crate::models::Upload;
use crate::page::Column;
use crate::resource::{status_label, truncate, Capabilities, Resource};
use crate::validation::validate_pdf;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brochure {
    pub id: Uuid,
    pub title: String,
    /// Server path of the stored PDF
    pub file: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct CreateBrochure {
    #[validate(
        required(message = "Title is required"),
        length(min = 3, max = 150, message = "Title must be between 3 and 150 characters")
    )]
    pub title: Option<String>,

    #[validate(required(message = "PDF file is required"), custom(function = "validate_pdf"))]
    pub file: Option<Upload>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Validate, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateBrochure {
    #[validate(length(min = 3, max = 150, message = "Title must be between 3 and 150 characters"))]
    pub title: Option<String>,

    #[serde(skip)]
    #[validate(custom(function = "validate_pdf"))]
    pub file: Option<Upload>,

    pub is_active: Option<bool>,
}

impl From<UpdateBrochure> for CreateBrochure {
    fn from(draft: UpdateBrochure) -> Self {
        Self {
            title: draft.title,
            file: draft.file,
            is_active: draft.is_active,
        }
    }
}

impl ToFormData for CreateBrochure {
    fn to_form_data(&self) -> FormData {
        FormData::new()
            .opt_text("title", self.title.as_deref())
            .opt_bool("isActive", self.is_active)
            .opt_file("file", self.file.as_ref())
    }
}

impl ToFormData for UpdateBrochure {
    fn to_form_data(&self) -> FormData {
        FormData::new()
            .opt_text("title", self.title.as_deref())
            .opt_bool("isActive", self.is_active)
            .opt_file("file", self.file.as_ref())
    }
}

pub struct BrochureResource;

impl Resource for BrochureResource {
    const NAME: &'static str = "brochures";
    const LABEL: &'static str = "Brochure";
    const PATH: &'static str = "/brochures";
    const CAPABILITIES: Capabilities = Capabilities::NONE.toggle().delete();
    const FILE_FIELDS: &'static [&'static str] = &["file"];

    type Record = Brochure;
    type Create = CreateBrochure;
    type Update = UpdateBrochure;

    fn id(record: &Brochure) -> Uuid {
        record.id
    }

    fn display_name(record: &Brochure) -> String {
        record.title.clone()
    }

    fn is_active(record: &Brochure) -> Option<bool> {
        Some(record.is_active)
    }

    fn edit_draft(record: &Brochure) -> UpdateBrochure {
        UpdateBrochure {
            title: Some(record.title.clone()),
            file: None,
            is_active: Some(record.is_active),
        }
    }

    fn remote_file(record: &Brochure, field: &str) -> Option<String> {
        (field == "file").then(|| record.file.clone())
    }

    fn set_file(draft: &mut UpdateBrochure, field: &str, file: Option<Upload>) -> bool {
        if field != "file" {
            return false;
        }
        draft.file = file;
        true
    }

    fn columns() -> Vec<Column<Brochure>> {
        vec![
            Column::new("Title", |b: &Brochure| truncate(&b.title, 50)),
            Column::new("File", |b: &Brochure| b.file.clone()),
            Column::new("Status", |b: &Brochure| status_label(b.is_active)),
        ]
    }
}
