//! About page (singleton)

use crate::api::{FormData, ToFormData};
use crate::models::Upload;
use crate::page::Column;
use crate::resource::{truncate, Resource, ResourceKind};
use crate::validation::validate_image;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct About {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub mission: Option<String>,
    pub vision: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct CreateAbout {
    #[validate(
        required(message = "Title is required"),
        length(min = 3, max = 120, message = "Title must be between 3 and 120 characters")
    )]
    pub title: Option<String>,

    #[validate(
        required(message = "Content is required"),
        length(min = 20, message = "Content must be at least 20 characters")
    )]
    pub content: Option<String>,

    #[validate(length(max = 1000, message = "Mission must be at most 1000 characters"))]
    pub mission: Option<String>,

    #[validate(length(max = 1000, message = "Vision must be at most 1000 characters"))]
    pub vision: Option<String>,

    #[validate(custom(function = "validate_image"))]
    pub image: Option<Upload>,
}

#[derive(Debug, Clone, Default, Validate, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateAbout {
    #[validate(length(min = 3, max = 120, message = "Title must be between 3 and 120 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 20, message = "Content must be at least 20 characters"))]
    pub content: Option<String>,

    #[validate(length(max = 1000, message = "Mission must be at most 1000 characters"))]
    pub mission: Option<String>,

    #[validate(length(max = 1000, message = "Vision must be at most 1000 characters"))]
    pub vision: Option<String>,

    #[serde(skip)]
    #[validate(custom(function = "validate_image"))]
    pub image: Option<Upload>,
}

impl From<UpdateAbout> for CreateAbout {
    fn from(draft: UpdateAbout) -> Self {
        Self {
            title: draft.title,
            content: draft.content,
            mission: draft.mission,
            vision: draft.vision,
            image: draft.image,
        }
    }
}

impl ToFormData for CreateAbout {
    fn to_form_data(&self) -> FormData {
        FormData::new()
            .opt_text("title", self.title.as_deref())
            .opt_text("content", self.content.as_deref())
            .opt_text("mission", self.mission.as_deref())
            .opt_text("vision", self.vision.as_deref())
            .opt_file("image", self.image.as_ref())
    }
}

impl ToFormData for UpdateAbout {
    fn to_form_data(&self) -> FormData {
        FormData::new()
            .opt_text("title", self.title.as_deref())
            .opt_text("content", self.content.as_deref())
            .opt_text("mission", self.mission.as_deref())
            .opt_text("vision", self.vision.as_deref())
            .opt_file("image", self.image.as_ref())
    }
}

pub struct AboutResource;

impl Resource for AboutResource {
    const NAME: &'static str = "about";
    const LABEL: &'static str = "About page";
    const PATH: &'static str = "/about";
    const KIND: ResourceKind = ResourceKind::Singleton;
    const FILE_FIELDS: &'static [&'static str] = &["image"];

    type Record = About;
    type Create = CreateAbout;
    type Update = UpdateAbout;

    fn id(record: &About) -> Uuid {
        record.id
    }

    fn display_name(record: &About) -> String {
        record.title.clone()
    }

    fn edit_draft(record: &About) -> UpdateAbout {
        UpdateAbout {
            title: Some(record.title.clone()),
            content: Some(record.content.clone()),
            mission: record.mission.clone(),
            vision: record.vision.clone(),
            image: None,
        }
    }

    fn remote_file(record: &About, field: &str) -> Option<String> {
        match field {
            "image" => record.image.clone(),
            _ => None,
        }
    }

    fn set_file(draft: &mut UpdateAbout, field: &str, file: Option<Upload>) -> bool {
        match field {
            "image" => {
                draft.image = file;
                true
            }
            _ => false,
        }
    }

    fn columns() -> Vec<Column<About>> {
        vec![
            Column::new("Title", |a: &About| truncate(&a.title, 40)),
            Column::new("Content", |a: &About| truncate(&a.content, 60)),
        ]
    }
}
