//! Site-wide announcements

use crate::api::{FormData, ToFormData};
use crate::page::Column;
use crate::resource::{status_label, truncate, Capabilities, Resource};
use crate::validation::HEX_COLOR_RE;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: Uuid,
    pub message: String,
    /// Hex background colour, e.g. `#facc15`
    pub color: Option<String>,
    pub link: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct CreateAnnouncement {
    #[validate(
        required(message = "Message is required"),
        length(min = 5, max = 500, message = "Message must be between 5 and 500 characters")
    )]
    pub message: Option<String>,

    #[validate(regex(path = *HEX_COLOR_RE, message = "Color must be a hex value such as #facc15"))]
    pub color: Option<String>,

    #[validate(url(message = "Link must be a valid URL"))]
    pub link: Option<String>,

    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Validate, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateAnnouncement {
    #[validate(length(min = 5, max = 500, message = "Message must be between 5 and 500 characters"))]
    pub message: Option<String>,

    #[validate(regex(path = *HEX_COLOR_RE, message = "Color must be a hex value such as #facc15"))]
    pub color: Option<String>,

    #[validate(url(message = "Link must be a valid URL"))]
    pub link: Option<String>,

    pub is_active: Option<bool>,
}

impl From<UpdateAnnouncement> for CreateAnnouncement {
    fn from(draft: UpdateAnnouncement) -> Self {
        Self {
            message: draft.message,
            color: draft.color,
            link: draft.link,
            is_active: draft.is_active,
        }
    }
}

impl ToFormData for CreateAnnouncement {
    fn to_form_data(&self) -> FormData {
        FormData::new()
            .opt_text("message", self.message.as_deref())
            .opt_text("color", self.color.as_deref())
            .opt_text("link", self.link.as_deref())
            .opt_bool("isActive", self.is_active)
    }
}

impl ToFormData for UpdateAnnouncement {
    fn to_form_data(&self) -> FormData {
        FormData::new()
            .opt_text("message", self.message.as_deref())
            .opt_text("color", self.color.as_deref())
            .opt_text("link", self.link.as_deref())
            .opt_bool("isActive", self.is_active)
    }
}

pub struct AnnouncementResource;

impl Resource for AnnouncementResource {
    const NAME: &'static str = "announcements";
    const LABEL: &'static str = "Announcement";
    const PATH: &'static str = "/announcements";
    const CAPABILITIES: Capabilities = Capabilities::NONE.toggle().delete();

    type Record = Announcement;
    type Create = CreateAnnouncement;
    type Update = UpdateAnnouncement;

    fn id(record: &Announcement) -> Uuid {
        record.id
    }

    fn display_name(record: &Announcement) -> String {
        truncate(&record.message, 40)
    }

    fn is_active(record: &Announcement) -> Option<bool> {
        Some(record.is_active)
    }

    fn edit_draft(record: &Announcement) -> UpdateAnnouncement {
        UpdateAnnouncement {
            message: Some(record.message.clone()),
            color: record.color.clone(),
            link: record.link.clone(),
            is_active: Some(record.is_active),
        }
    }

    fn columns() -> Vec<Column<Announcement>> {
        vec![
            Column::new("Message", |a: &Announcement| truncate(&a.message, 60)),
            Column::new("Color", |a: &Announcement| a.color.clone().unwrap_or_default()),
            Column::new("Status", |a: &Announcement| status_label(a.is_active)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_form;

    #[test]
    fn test_color_must_be_hex() {
        let form = CreateAnnouncement {
            message: Some("Office closed on Friday".into()),
            color: Some("yellow".into()),
            ..Default::default()
        };
        assert!(validate_form(&form).is_err());

        let form = CreateAnnouncement {
            color: Some("#facc15".into()),
            ..form
        };
        assert!(validate_form(&form).is_ok());
    }

    #[test]
    fn test_text_only_payload_is_json() {
        let form = CreateAnnouncement {
            message: Some("Hello world".into()),
            is_active: Some(true),
            ..Default::default()
        };
        let body = form.to_form_data();
        assert!(!body.has_files());
        assert_eq!(
            body.to_json(),
            serde_json::json!({ "message": "Hello world", "isActive": true })
        );
    }
}
