//! Footer content (singleton, text only)

use crate::api::{FormData, ToFormData};
use crate::page::Column;
use crate::resource::{Resource, ResourceKind};
use crate::validation::PHONE_RE;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Footer {
    pub id: Uuid,
    pub company_name: String,
    pub description: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub copyright: Option<String>,
    pub facebook: Option<String>,
    pub instagram: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct CreateFooter {
    #[validate(
        required(message = "Company name is required"),
        length(min = 2, max = 100, message = "Company name must be between 2 and 100 characters")
    )]
    pub company_name: Option<String>,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    #[validate(email(message = "Email must be a valid address"))]
    pub email: Option<String>,

    #[validate(regex(path = *PHONE_RE, message = "Phone number is invalid"))]
    pub phone: Option<String>,

    #[validate(length(max = 300, message = "Address must be at most 300 characters"))]
    pub address: Option<String>,

    #[validate(length(max = 200, message = "Copyright must be at most 200 characters"))]
    pub copyright: Option<String>,

    #[validate(url(message = "Facebook link must be a valid URL"))]
    pub facebook: Option<String>,

    #[validate(url(message = "Instagram link must be a valid URL"))]
    pub instagram: Option<String>,

    #[validate(url(message = "LinkedIn link must be a valid URL"))]
    pub linkedin: Option<String>,

    #[validate(url(message = "Twitter link must be a valid URL"))]
    pub twitter: Option<String>,
}

#[derive(Debug, Clone, Default, Validate, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateFooter {
    #[validate(length(min = 2, max = 100, message = "Company name must be between 2 and 100 characters"))]
    pub company_name: Option<String>,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    #[validate(email(message = "Email must be a valid address"))]
    pub email: Option<String>,

    #[validate(regex(path = *PHONE_RE, message = "Phone number is invalid"))]
    pub phone: Option<String>,

    #[validate(length(max = 300, message = "Address must be at most 300 characters"))]
    pub address: Option<String>,

    #[validate(length(max = 200, message = "Copyright must be at most 200 characters"))]
    pub copyright: Option<String>,

    #[validate(url(message = "Facebook link must be a valid URL"))]
    pub facebook: Option<String>,

    #[validate(url(message = "Instagram link must be a valid URL"))]
    pub instagram: Option<String>,

    #[validate(url(message = "LinkedIn link must be a valid URL"))]
    pub linkedin: Option<String>,

    #[validate(url(message = "Twitter link must be a valid URL"))]
    pub twitter: Option<String>,
}

impl From<UpdateFooter> for CreateFooter {
    fn from(draft: UpdateFooter) -> Self {
        Self {
            company_name: draft.company_name,
            description: draft.description,
            email: draft.email,
            phone: draft.phone,
            address: draft.address,
            copyright: draft.copyright,
            facebook: draft.facebook,
            instagram: draft.instagram,
            linkedin: draft.linkedin,
            twitter: draft.twitter,
        }
    }
}

macro_rules! footer_form {
    ($form:expr) => {
        FormData::new()
            .opt_text("companyName", $form.company_name.as_deref())
            .opt_text("description", $form.description.as_deref())
            .opt_text("email", $form.email.as_deref())
            .opt_text("phone", $form.phone.as_deref())
            .opt_text("address", $form.address.as_deref())
            .opt_text("copyright", $form.copyright.as_deref())
            .opt_text("facebook", $form.facebook.as_deref())
            .opt_text("instagram", $form.instagram.as_deref())
            .opt_text("linkedin", $form.linkedin.as_deref())
            .opt_text("twitter", $form.twitter.as_deref())
    };
}

impl ToFormData for CreateFooter {
    fn to_form_data(&self) -> FormData {
        footer_form!(self)
    }
}

impl ToFormData for UpdateFooter {
    fn to_form_data(&self) -> FormData {
        footer_form!(self)
    }
}

pub struct FooterResource;

impl Resource for FooterResource {
    const NAME: &'static str = "footer";
    const LABEL: &'static str = "Footer";
    const PATH: &'static str = "/footer";
    const KIND: ResourceKind = ResourceKind::Singleton;

    type Record = Footer;
    type Create = CreateFooter;
    type Update = UpdateFooter;

    fn id(record: &Footer) -> Uuid {
        record.id
    }

    fn display_name(record: &Footer) -> String {
        record.company_name.clone()
    }

    fn edit_draft(record: &Footer) -> UpdateFooter {
        UpdateFooter {
            company_name: Some(record.company_name.clone()),
            description: record.description.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            address: record.address.clone(),
            copyright: record.copyright.clone(),
            facebook: record.facebook.clone(),
            instagram: record.instagram.clone(),
            linkedin: record.linkedin.clone(),
            twitter: record.twitter.clone(),
        }
    }

    fn columns() -> Vec<Column<Footer>> {
        vec![
            Column::new("Company", |f: &Footer| f.company_name.clone()),
            Column::new("Email", |f: &Footer| f.email.clone().unwrap_or_default()),
            Column::new("Phone", |f: &Footer| f.phone.clone().unwrap_or_default()),
        ]
    }
}
