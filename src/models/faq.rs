//! Frequently asked questions

use crate::api::{FormData, ToFormData};
use crate::page::Column;
use crate::resource::{status_label, truncate, Capabilities, Resource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub order: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct CreateFaq {
    #[validate(
        required(message = "Question is required"),
        length(min = 5, max = 300, message = "Question must be between 5 and 300 characters")
    )]
    pub question: Option<String>,

    #[validate(
        required(message = "Answer is required"),
        length(min = 5, max = 2000, message = "Answer must be between 5 and 2000 characters")
    )]
    pub answer: Option<String>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Validate, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateFaq {
    #[validate(length(min = 5, max = 300, message = "Question must be between 5 and 300 characters"))]
    pub question: Option<String>,

    #[validate(length(min = 5, max = 2000, message = "Answer must be between 5 and 2000 characters"))]
    pub answer: Option<String>,

    pub is_active: Option<bool>,
}

impl From<UpdateFaq> for CreateFaq {
    fn from(draft: UpdateFaq) -> Self {
        Self {
            question: draft.question,
            answer: draft.answer,
            is_active: draft.is_active,
        }
    }
}

impl ToFormData for CreateFaq {
    fn to_form_data(&self) -> FormData {
        FormData::new()
            .opt_text("question", self.question.as_deref())
            .opt_text("answer", self.answer.as_deref())
            .opt_bool("isActive", self.is_active)
    }
}

impl ToFormData for UpdateFaq {
    fn to_form_data(&self) -> FormData {
        FormData::new()
            .opt_text("question", self.question.as_deref())
            .opt_text("answer", self.answer.as_deref())
            .opt_bool("isActive", self.is_active)
    }
}

pub struct FaqResource;

impl Resource for FaqResource {
    const NAME: &'static str = "faqs";
    const LABEL: &'static str = "FAQ";
    const PATH: &'static str = "/faqs";
    const CAPABILITIES: Capabilities = Capabilities::NONE.toggle().delete().reorder();

    type Record = Faq;
    type Create = CreateFaq;
    type Update = UpdateFaq;

    fn id(record: &Faq) -> Uuid {
        record.id
    }

    fn display_name(record: &Faq) -> String {
        truncate(&record.question, 40)
    }

    fn is_active(record: &Faq) -> Option<bool> {
        Some(record.is_active)
    }

    fn edit_draft(record: &Faq) -> UpdateFaq {
        UpdateFaq {
            question: Some(record.question.clone()),
            answer: Some(record.answer.clone()),
            is_active: Some(record.is_active),
        }
    }

    fn columns() -> Vec<Column<Faq>> {
        vec![
            Column::new("#", |f: &Faq| f.order.to_string()),
            Column::new("Question", |f: &Faq| truncate(&f.question, 50)),
            Column::new("Status", |f: &Faq| status_label(f.is_active)),
        ]
    }
}
