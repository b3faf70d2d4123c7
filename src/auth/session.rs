//! Signed-in session
//!
//! Holds the token pair issued by the backend and keeps the bearer token of
//! the shared `RestClient` in sync with it.

use crate::api::RestClient;
use crate::auth::{decode_claims, Claims, TokenPair};
use crate::error::{AdminError, AdminResult};
use crate::models::User;
use crate::query::QueryClient;
use crate::validation::validate_form;
use reqwest::Method;
use serde::Serialize;
use std::sync::{Arc, RwLock};
use tracing::info;
use validator::Validate;

/// Login request body
#[derive(Debug, Clone, Serialize, Validate)]
pub struct Credentials {
    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Clone)]
pub struct SessionManager {
    api: RestClient,
    queries: QueryClient,
    tokens: Arc<RwLock<Option<TokenPair>>>,
}

impl SessionManager {
    pub fn new(api: RestClient, queries: QueryClient) -> Self {
        Self {
            api,
            queries,
            tokens: Arc::new(RwLock::new(None)),
        }
    }

    fn store(&self, pair: Option<TokenPair>) {
        self.api.set_token(pair.as_ref().map(|p| p.access_token.clone()));
        *self.tokens.write().unwrap_or_else(|e| e.into_inner()) = pair;
    }

    /// `POST /auth/login`
    pub async fn login(&self, credentials: &Credentials) -> AdminResult<Claims> {
        validate_form(credentials)?;
        let pair: TokenPair = self
            .api
            .send_json(Method::POST, "/auth/login", credentials)
            .await?;
        let claims = decode_claims(&pair.access_token)?;
        self.store(Some(pair));
        info!(email = %claims.email, role = %claims.role, "Signed in");
        Ok(claims)
    }

    /// `POST /auth/refresh` with the stored refresh token
    pub async fn refresh(&self) -> AdminResult<Claims> {
        let refresh_token = self
            .tokens
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|p| p.refresh_token.clone())
            .ok_or_else(|| AdminError::Unauthorized("Not signed in".to_string()))?;

        let pair: TokenPair = self
            .api
            .send_json(
                Method::POST,
                "/auth/refresh",
                &RefreshRequest {
                    refresh_token: &refresh_token,
                },
            )
            .await?;
        let claims = decode_claims(&pair.access_token)?;
        self.store(Some(pair));
        info!(email = %claims.email, "Session refreshed");
        Ok(claims)
    }

    /// Forget the tokens and every cached query.
    pub async fn logout(&self) {
        self.store(None);
        self.queries.clear().await;
        info!("Signed out");
    }

    /// Claims of the current access token, if any.
    pub fn current(&self) -> Option<Claims> {
        let token = self.api.token()?;
        decode_claims(&token).ok()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current().is_some_and(|c| !c.is_expired())
    }

    /// `GET /auth/me`
    pub async fn me(&self) -> AdminResult<User> {
        self.api.get("/auth/me", &[]).await
    }
}
