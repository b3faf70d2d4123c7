//! Authentication module
//!
//! Signs in against the CMS backend, keeps the token pair and reads the
//! claims of the access token to know who is signed in and with which role.

mod jwt;
mod session;

pub use jwt::{decode_claims, Claims, TokenPair, TokenType};
pub use session::{Credentials, SessionManager};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Dashboard user roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Read-only access
    Viewer,
    /// Can edit and manage content
    Editor,
    /// Full access, including user management
    Admin,
}

impl Role {
    pub fn can_edit(&self) -> bool {
        matches!(self, Role::Editor | Role::Admin)
    }

    pub fn can_manage_users(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Viewer
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Viewer => write!(f, "viewer"),
            Role::Editor => write!(f, "editor"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "viewer" => Ok(Role::Viewer),
            "editor" => Ok(Role::Editor),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role '{}'", other)),
        }
    }
}
