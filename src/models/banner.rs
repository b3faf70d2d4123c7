//! Banner models and schemas
//!
//! Banners are time-limited promotional images. They are the only resource
//! whose admin list is paginated, and the only one with an expiration date
//! that must lie in the future when set.

use crate::api::{FormData, ToFormData};
use crate::models::Upload;
use crate::page::Column;
use crate::resource::{status_label, truncate, Capabilities, Resource};
use crate::validation::{validate_future_date, validate_image};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Banner record as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    /// Server path of the uploaded image
    pub image: String,
    pub link: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Schema for `POST /banners`
#[derive(Debug, Clone, Default, Validate)]
pub struct CreateBanner {
    #[validate(
        required(message = "Title is required"),
        length(min = 3, max = 100, message = "Title must be between 3 and 100 characters")
    )]
    pub title: Option<String>,

    #[validate(length(max = 200, message = "Subtitle must be at most 200 characters"))]
    pub subtitle: Option<String>,

    #[validate(url(message = "Link must be a valid URL"))]
    pub link: Option<String>,

    #[validate(
        required(message = "Banner image is required"),
        custom(function = "validate_image")
    )]
    pub image: Option<Upload>,

    #[validate(
        required(message = "Expiration date is required"),
        custom(function = "validate_future_date")
    )]
    pub expires_at: Option<DateTime<Utc>>,

    pub is_active: Option<bool>,
}

/// Schema for `PUT /banners/:id`; every field is optional
#[derive(Debug, Clone, Default, Validate, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateBanner {
    #[validate(length(min = 3, max = 100, message = "Title must be between 3 and 100 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 200, message = "Subtitle must be at most 200 characters"))]
    pub subtitle: Option<String>,

    #[validate(url(message = "Link must be a valid URL"))]
    pub link: Option<String>,

    #[serde(skip)]
    #[validate(custom(function = "validate_image"))]
    pub image: Option<Upload>,

    #[validate(custom(function = "validate_future_date"))]
    pub expires_at: Option<DateTime<Utc>>,

    pub is_active: Option<bool>,
}

impl From<UpdateBanner> for CreateBanner {
    fn from(draft: UpdateBanner) -> Self {
        Self {
            title: draft.title,
            subtitle: draft.subtitle,
            link: draft.link,
            image: draft.image,
            expires_at: draft.expires_at,
            is_active: draft.is_active,
        }
    }
}

impl ToFormData for CreateBanner {
    fn to_form_data(&self) -> FormData {
        FormData::new()
            .opt_text("title", self.title.as_deref())
            .opt_text("subtitle", self.subtitle.as_deref())
            .opt_text("link", self.link.as_deref())
            .opt_date("expiresAt", self.expires_at.as_ref())
            .opt_bool("isActive", self.is_active)
            .opt_file("image", self.image.as_ref())
    }
}

impl ToFormData for UpdateBanner {
    fn to_form_data(&self) -> FormData {
        FormData::new()
            .opt_text("title", self.title.as_deref())
            .opt_text("subtitle", self.subtitle.as_deref())
            .opt_text("link", self.link.as_deref())
            .opt_date("expiresAt", self.expires_at.as_ref())
            .opt_bool("isActive", self.is_active)
            .opt_file("image", self.image.as_ref())
    }
}

pub struct BannerResource;

impl Resource for BannerResource {
    const NAME: &'static str = "banners";
    const LABEL: &'static str = "Banner";
    const PATH: &'static str = "/banners";
    const CAPABILITIES: Capabilities = Capabilities::NONE.toggle().delete().paginated();
    const FILE_FIELDS: &'static [&'static str] = &["image"];

    type Record = Banner;
    type Create = CreateBanner;
    type Update = UpdateBanner;

    fn id(record: &Banner) -> Uuid {
        record.id
    }

    fn display_name(record: &Banner) -> String {
        record.title.clone()
    }

    fn is_active(record: &Banner) -> Option<bool> {
        Some(record.is_active)
    }

    fn edit_draft(record: &Banner) -> UpdateBanner {
        UpdateBanner {
            title: Some(record.title.clone()),
            subtitle: record.subtitle.clone(),
            link: record.link.clone(),
            image: None,
            // An expired date stays blank so other fields can still be edited
            expires_at: Some(record.expires_at).filter(|at| *at > Utc::now()),
            is_active: Some(record.is_active),
        }
    }

    fn remote_file(record: &Banner, field: &str) -> Option<String> {
        match field {
            "image" => Some(record.image.clone()),
            _ => None,
        }
    }

    fn set_file(draft: &mut UpdateBanner, field: &str, file: Option<Upload>) -> bool {
        match field {
            "image" => {
                draft.image = file;
                true
            }
            _ => false,
        }
    }

    fn columns() -> Vec<Column<Banner>> {
        vec![
            Column::new("Title", |b: &Banner| truncate(&b.title, 40)),
            Column::new("Expires", |b: &Banner| b.expires_at.format("%Y-%m-%d").to_string()),
            Column::new("Status", |b: &Banner| status_label(b.is_active)),
        ]
    }
}
