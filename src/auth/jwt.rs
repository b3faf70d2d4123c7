//! JWT token handling
//!
//! The dashboard never holds the signing secret, so tokens are only decoded
//! to read their claims. The server stays the authority on validity.

use crate::auth::Role;
use crate::error::AdminError;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Subject (user ID)
    pub sub: Uuid,
    /// User email
    pub email: String,
    /// User role
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Token type (access or refresh)
    #[serde(default = "default_token_type")]
    pub token_type: TokenType,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

fn default_token_type() -> TokenType {
    TokenType::Access
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    pub fn is_expired(&self) -> bool {
        self.exp <= Utc::now().timestamp()
    }
}

/// Token pair returned by `/auth/login` and `/auth/refresh`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_scheme")]
    pub token_type: String,
    /// Access token lifetime in seconds
    #[serde(default)]
    pub expires_in: i64,
}

fn default_scheme() -> String {
    "Bearer".to_string()
}

/// Read the claims of a token without verifying its signature.
pub fn decode_claims(token: &str) -> Result<Claims, AdminError> {
    let header = jsonwebtoken::decode_header(token)
        .map_err(|e| AdminError::Unauthorized(format!("Malformed token: {}", e)))?;

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let token_data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::InvalidToken => {
                AdminError::Unauthorized("Invalid token".to_string())
            }
            _ => AdminError::Unauthorized(format!("Token decoding failed: {}", e)),
        })?;

    Ok(token_data.claims)
}
