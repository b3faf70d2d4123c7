//! Services offered, shown as an ordered grid of cards

use crate::api::{FormData, ToFormData};
use crate::models::Upload;
use crate::page::Column;
use crate::resource::{status_label, truncate, Capabilities, Resource};
use crate::validation::validate_image;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub icon: String,
    #[serde(default)]
    pub order: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct CreateService {
    #[validate(
        required(message = "Title is required"),
        length(min = 3, max = 100, message = "Title must be between 3 and 100 characters")
    )]
    pub title: Option<String>,

    #[validate(
        required(message = "Description is required"),
        length(min = 10, max = 1000, message = "Description must be between 10 and 1000 characters")
    )]
    pub description: Option<String>,

    #[validate(required(message = "Icon is required"), custom(function = "validate_image"))]
    pub icon: Option<Upload>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Validate, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateService {
    #[validate(length(min = 3, max = 100, message = "Title must be between 3 and 100 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 10, max = 1000, message = "Description must be between 10 and 1000 characters"))]
    pub description: Option<String>,

    #[serde(skip)]
    #[validate(custom(function = "validate_image"))]
    pub icon: Option<Upload>,

    pub is_active: Option<bool>,
}

impl From<UpdateService> for CreateService {
    fn from(draft: UpdateService) -> Self {
        Self {
            title: draft.title,
            description: draft.description,
            icon: draft.icon,
            is_active: draft.is_active,
        }
    }
}

impl ToFormData for CreateService {
    fn to_form_data(&self) -> FormData {
        FormData::new()
            .opt_text("title", self.title.as_deref())
            .opt_text("description", self.description.as_deref())
            .opt_bool("isActive", self.is_active)
            .opt_file("icon", self.icon.as_ref())
    }
}

impl ToFormData for UpdateService {
    fn to_form_data(&self) -> FormData {
        FormData::new()
            .opt_text("title", self.title.as_deref())
            .opt_text("description", self.description.as_deref())
            .opt_bool("isActive", self.is_active)
            .opt_file("icon", self.icon.as_ref())
    }
}

pub struct ServiceResource;

impl Resource for ServiceResource {
    const NAME: &'static str = "services";
    const LABEL: &'static str = "Service";
    const PATH: &'static str = "/services";
    const CAPABILITIES: Capabilities = Capabilities::NONE.toggle().delete().reorder();
    const FILE_FIELDS: &'static [&'static str] = &["icon"];

    type Record = Service;
    type Create = CreateService;
    type Update = UpdateService;

    fn id(record: &Service) -> Uuid {
        record.id
    }

    fn display_name(record: &Service) -> String {
        record.title.clone()
    }

    fn is_active(record: &Service) -> Option<bool> {
        Some(record.is_active)
    }

    fn edit_draft(record: &Service) -> UpdateService {
        UpdateService {
            title: Some(record.title.clone()),
            description: Some(record.description.clone()),
            icon: None,
            is_active: Some(record.is_active),
        }
    }

    fn remote_file(record: &Service, field: &str) -> Option<String> {
        (field == "icon").then(|| record.icon.clone())
    }

    fn set_file(draft: &mut UpdateService, field: &str, file: Option<Upload>) -> bool {
        if field != "icon" {
            return false;
        }
        draft.icon = file;
        true
    }

    fn columns() -> Vec<Column<Service>> {
        vec![
            Column::new("#", |s: &Service| s.order.to_string()),
            Column::new("Title", |s: &Service| truncate(&s.title, 40)),
            Column::new("Description", |s: &Service| truncate(&s.description, 50)),
            Column::new("Status", |s: &Service| status_label(s.is_active)),
        ]
    }
}
