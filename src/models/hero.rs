//! Hero section (singleton)

use crate::api::{FormData, ToFormData};
use crate::models::Upload;
use crate::page::Column;
use crate::resource::{status_label, truncate, Capabilities, Resource, ResourceKind};
use crate::validation::validate_large_image;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub id: Uuid,
    pub heading: String,
    pub subheading: Option<String>,
    pub cta_label: Option<String>,
    pub cta_link: Option<String>,
    pub background_image: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct CreateHero {
    #[validate(
        required(message = "Heading is required"),
        length(min = 3, max = 120, message = "Heading must be between 3 and 120 characters")
    )]
    pub heading: Option<String>,

    #[validate(length(max = 300, message = "Subheading must be at most 300 characters"))]
    pub subheading: Option<String>,

    #[validate(length(max = 40, message = "Button label must be at most 40 characters"))]
    pub cta_label: Option<String>,

    #[validate(url(message = "Button link must be a valid URL"))]
    pub cta_link: Option<String>,

    #[validate(
        required(message = "Background image is required"),
        custom(function = "validate_large_image")
    )]
    pub background_image: Option<Upload>,
}

#[derive(Debug, Clone, Default, Validate, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateHero {
    #[validate(length(min = 3, max = 120, message = "Heading must be between 3 and 120 characters"))]
    pub heading: Option<String>,

    #[validate(length(max = 300, message = "Subheading must be at most 300 characters"))]
    pub subheading: Option<String>,

    #[validate(length(max = 40, message = "Button label must be at most 40 characters"))]
    pub cta_label: Option<String>,

    #[validate(url(message = "Button link must be a valid URL"))]
    pub cta_link: Option<String>,

    #[serde(skip)]
    #[validate(custom(function = "validate_large_image"))]
    pub background_image: Option<Upload>,
}

impl From<UpdateHero> for CreateHero {
    fn from(draft: UpdateHero) -> Self {
        Self {
            heading: draft.heading,
            subheading: draft.subheading,
            cta_label: draft.cta_label,
            cta_link: draft.cta_link,
            background_image: draft.background_image,
        }
    }
}

impl ToFormData for CreateHero {
    fn to_form_data(&self) -> FormData {
        FormData::new()
            .opt_text("heading", self.heading.as_deref())
            .opt_text("subheading", self.subheading.as_deref())
            .opt_text("ctaLabel", self.cta_label.as_deref())
            .opt_text("ctaLink", self.cta_link.as_deref())
            .opt_file("backgroundImage", self.background_image.as_ref())
    }
}

impl ToFormData for UpdateHero {
    fn to_form_data(&self) -> FormData {
        FormData::new()
            .opt_text("heading", self.heading.as_deref())
            .opt_text("subheading", self.subheading.as_deref())
            .opt_text("ctaLabel", self.cta_label.as_deref())
            .opt_text("ctaLink", self.cta_link.as_deref())
            .opt_file("backgroundImage", self.background_image.as_ref())
    }
}

pub struct HeroResource;

impl Resource for HeroResource {
    const NAME: &'static str = "hero";
    const LABEL: &'static str = "Hero section";
    const PATH: &'static str = "/hero";
    const KIND: ResourceKind = ResourceKind::Singleton;
    const CAPABILITIES: Capabilities = Capabilities::NONE.toggle();
    const FILE_FIELDS: &'static [&'static str] = &["backgroundImage"];

    type Record = Hero;
    type Create = CreateHero;
    type Update = UpdateHero;

    fn id(record: &Hero) -> Uuid {
        record.id
    }

    fn display_name(record: &Hero) -> String {
        record.heading.clone()
    }

    fn is_active(record: &Hero) -> Option<bool> {
        Some(record.is_active)
    }

    fn edit_draft(record: &Hero) -> UpdateHero {
        UpdateHero {
            heading: Some(record.heading.clone()),
            subheading: record.subheading.clone(),
            cta_label: record.cta_label.clone(),
            cta_link: record.cta_link.clone(),
            background_image: None,
        }
    }

    fn remote_file(record: &Hero, field: &str) -> Option<String> {
        (field == "backgroundImage").then(|| record.background_image.clone())
    }

    fn set_file(draft: &mut UpdateHero, field: &str, file: Option<Upload>) -> bool {
        if field != "backgroundImage" {
            return false;
        }
        draft.background_image = file;
        true
    }

    fn columns() -> Vec<Column<Hero>> {
        vec![
            Column::new("Heading", |h: &Hero| truncate(&h.heading, 50)),
            Column::new("Button", |h: &Hero| h.cta_label.clone().unwrap_or_default()),
            Column::new("Status", |h: &Hero| status_label(h.is_active)),
        ]
    }
}
