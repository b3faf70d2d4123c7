//! Dashboard user accounts

use crate::api::{FormData, ToFormData};
use crate::auth::Role;
use crate::models::Upload;
use crate::page::Column;
use crate::resource::{status_label, Capabilities, Resource};
use crate::validation::{validate_image, validate_password_change};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// User model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    pub avatar: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct CreateUser {
    #[validate(
        required(message = "Name is required"),
        length(min = 2, max = 100, message = "Name must be between 2 and 100 characters")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "Email is required"),
        email(message = "Email must be a valid address")
    )]
    pub email: Option<String>,

    #[validate(required(message = "Role is required"))]
    pub role: Option<Role>,

    #[validate(
        required(message = "Password is required"),
        length(min = 8, message = "Password must be at least 8 characters")
    )]
    pub password: Option<String>,

    #[validate(custom(function = "validate_image"))]
    pub avatar: Option<Upload>,

    pub is_active: Option<bool>,
}

/// Update schema. Leaving `password` empty keeps the current one.
#[derive(Debug, Clone, Default, Validate, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateUser {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Email must be a valid address"))]
    pub email: Option<String>,

    pub role: Option<Role>,

    #[validate(custom(function = "validate_password_change"))]
    pub password: Option<String>,

    #[serde(skip)]
    #[validate(custom(function = "validate_image"))]
    pub avatar: Option<Upload>,

    pub is_active: Option<bool>,
}

impl From<UpdateUser> for CreateUser {
    fn from(draft: UpdateUser) -> Self {
        Self {
            name: draft.name,
            email: draft.email,
            role: draft.role,
            password: draft.password,
            avatar: draft.avatar,
            is_active: draft.is_active,
        }
    }
}

impl ToFormData for CreateUser {
    fn to_form_data(&self) -> FormData {
        let role = self.role.map(|r| r.to_string());
        FormData::new()
            .opt_text("name", self.name.as_deref())
            .opt_text("email", self.email.as_deref())
            .opt_text("role", role.as_deref())
            .opt_text("password", self.password.as_deref())
            .opt_bool("isActive", self.is_active)
            .opt_file("avatar", self.avatar.as_ref())
    }
}

impl ToFormData for UpdateUser {
    fn to_form_data(&self) -> FormData {
        let role = self.role.map(|r| r.to_string());
        FormData::new()
            .opt_text("name", self.name.as_deref())
            .opt_text("email", self.email.as_deref())
            .opt_text("role", role.as_deref())
            .opt_text("password", self.password.as_deref().filter(|p| !p.is_empty()))
            .opt_bool("isActive", self.is_active)
            .opt_file("avatar", self.avatar.as_ref())
    }
}

pub struct UserResource;

impl Resource for UserResource {
    const NAME: &'static str = "users";
    const LABEL: &'static str = "User";
    const PATH: &'static str = "/users";
    const CAPABILITIES: Capabilities = Capabilities::NONE.toggle().delete();
    const FILE_FIELDS: &'static [&'static str] = &["avatar"];

    type Record = User;
    type Create = CreateUser;
    type Update = UpdateUser;

    fn id(record: &User) -> Uuid {
        record.id
    }

    fn display_name(record: &User) -> String {
        format!("{} <{}>", record.name, record.email)
    }

    fn is_active(record: &User) -> Option<bool> {
        Some(record.is_active)
    }

    fn edit_draft(record: &User) -> UpdateUser {
        UpdateUser {
            name: Some(record.name.clone()),
            email: Some(record.email.clone()),
            role: Some(record.role),
            password: None,
            avatar: None,
            is_active: Some(record.is_active),
        }
    }

    fn remote_file(record: &User, field: &str) -> Option<String> {
        match field {
            "avatar" => record.avatar.clone(),
            _ => None,
        }
    }

    fn set_file(draft: &mut UpdateUser, field: &str, file: Option<Upload>) -> bool {
        match field {
            "avatar" => {
                draft.avatar = file;
                true
            }
            _ => false,
        }
    }

    fn columns() -> Vec<Column<User>> {
        vec![
            Column::new("Name", |u: &User| u.name.clone()),
            Column::new("Email", |u: &User| u.email.clone()),
            Column::new("Role", |u: &User| u.role.to_string()),
            Column::new("Status", |u: &User| status_label(u.is_active)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdminError;
    use crate::validation::validate_form;

    #[test]
    fn test_password_required_only_on_create() {
        let create = CreateUser {
            name: Some("Ada Lovelace".into()),
            email: Some("ada@example.com".into()),
            role: Some(Role::Editor),
            ..Default::default()
        };
        assert!(validate_form(&create).is_err());

        let update = UpdateUser {
            name: Some("Ada Lovelace".into()),
            ..Default::default()
        };
        assert!(validate_form(&update).is_ok());
    }

    #[test]
    fn test_empty_password_on_edit_keeps_the_current_one() {
        let update = UpdateUser {
            name: Some("Ada Lovelace".into()),
            password: Some(String::new()),
            ..Default::default()
        };
        assert!(validate_form(&update).is_ok());
        assert!(update.to_form_data().get("password").is_none());

        let short = UpdateUser {
            password: Some("abc".into()),
            ..Default::default()
        };
        match validate_form(&short) {
            Err(AdminError::Validation(errors)) => {
                assert!(errors.message("password").unwrap().contains("at least 8"));
            }
            other => panic!("expected a password error, got {:?}", other),
        }
    }

    #[test]
    fn test_edit_draft_never_carries_password() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            role: Role::Admin,
            avatar: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let draft = UserResource::edit_draft(&user);
        assert!(draft.password.is_none());
        assert!(draft.to_form_data().get("password").is_none());
        assert!(draft.to_form_data().get("role").is_some());
    }
}
