//! Customer testimonials

use crate::api::{FormData, ToFormData};
use crate::models::Upload;
use crate::page::Column;
use crate::resource::{status_label, truncate, Capabilities, Resource};
use crate::validation::{validate_image, validate_rating};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: Uuid,
    pub author: String,
    pub position: Option<String>,
    pub quote: String,
    pub rating: u8,
    pub avatar: Option<String>,
    #[serde(default)]
    pub order: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct CreateTestimonial {
    #[validate(
        required(message = "Author is required"),
        length(min = 2, max = 100, message = "Author must be between 2 and 100 characters")
    )]
    pub author: Option<String>,

    #[validate(length(max = 100, message = "Position must be at most 100 characters"))]
    pub position: Option<String>,

    #[validate(
        required(message = "Quote is required"),
        length(min = 10, max = 1000, message = "Quote must be between 10 and 1000 characters")
    )]
    pub quote: Option<String>,

    #[validate(required(message = "Rating is required"), custom(function = "validate_rating"))]
    pub rating: Option<u8>,

    #[validate(custom(function = "validate_image"))]
    pub avatar: Option<Upload>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Validate, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateTestimonial {
    #[validate(length(min = 2, max = 100, message = "Author must be between 2 and 100 characters"))]
    pub author: Option<String>,

    #[validate(length(max = 100, message = "Position must be at most 100 characters"))]
    pub position: Option<String>,

    #[validate(length(min = 10, max = 1000, message = "Quote must be between 10 and 1000 characters"))]
    pub quote: Option<String>,

    #[validate(custom(function = "validate_rating"))]
    pub rating: Option<u8>,

    #[serde(skip)]
    #[validate(custom(function = "validate_image"))]
    pub avatar: Option<Upload>,

    pub is_active: Option<bool>,
}

impl From<UpdateTestimonial> for CreateTestimonial {
    fn from(draft: UpdateTestimonial) -> Self {
        Self {
            author: draft.author,
            position: draft.position,
            quote: draft.quote,
            rating: draft.rating,
            avatar: draft.avatar,
            is_active: draft.is_active,
        }
    }
}

impl ToFormData for CreateTestimonial {
    fn to_form_data(&self) -> FormData {
        FormData::new()
            .opt_text("author", self.author.as_deref())
            .opt_text("position", self.position.as_deref())
            .opt_text("quote", self.quote.as_deref())
            .opt_int("rating", self.rating.map(i64::from))
            .opt_bool("isActive", self.is_active)
            .opt_file("avatar", self.avatar.as_ref())
    }
}

impl ToFormData for UpdateTestimonial {
    fn to_form_data(&self) -> FormData {
        FormData::new()
            .opt_text("author", self.author.as_deref())
            .opt_text("position", self.position.as_deref())
            .opt_text("quote", self.quote.as_deref())
            .opt_int("rating", self.rating.map(i64::from))
            .opt_bool("isActive", self.is_active)
            .opt_file("avatar", self.avatar.as_ref())
    }
}

pub struct TestimonialResource;

impl Resource for TestimonialResource {
    const NAME: &'static str = "testimonials";
    const LABEL: &'static str = "Testimonial";
    const PATH: &'static str = "/testimonials";
    const CAPABILITIES: Capabilities = Capabilities::NONE.toggle().delete().reorder();
    const FILE_FIELDS: &'static [&'static str] = &["avatar"];

    type Record = Testimonial;
    type Create = CreateTestimonial;
    type Update = UpdateTestimonial;

    fn id(record: &Testimonial) -> Uuid {
        record.id
    }

    fn display_name(record: &Testimonial) -> String {
        record.author.clone()
    }

    fn is_active(record: &Testimonial) -> Option<bool> {
        Some(record.is_active)
    }

    fn edit_draft(record: &Testimonial) -> UpdateTestimonial {
        UpdateTestimonial {
            author: Some(record.author.clone()),
            position: record.position.clone(),
            quote: Some(record.quote.clone()),
            rating: Some(record.rating),
            avatar: None,
            is_active: Some(record.is_active),
        }
    }

    fn remote_file(record: &Testimonial, field: &str) -> Option<String> {
        match field {
            "avatar" => record.avatar.clone(),
            _ => None,
        }
    }

    fn set_file(draft: &mut UpdateTestimonial, field: &str, file: Option<Upload>) -> bool {
        match field {
            "avatar" => {
                draft.avatar = file;
                true
            }
            _ => false,
        }
    }

    fn columns() -> Vec<Column<Testimonial>> {
        vec![
            Column::new("#", |t: &Testimonial| t.order.to_string()),
            Column::new("Author", |t: &Testimonial| t.author.clone()),
            Column::new("Quote", |t: &Testimonial| truncate(&t.quote, 50)),
            Column::new("Rating", |t: &Testimonial| "★".repeat(t.rating as usize)),
            Column::new("Status", |t: &Testimonial| status_label(t.is_active)),
        ]
    }
}
