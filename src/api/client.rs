//! REST client for the CMS backend

use crate::api::FormData;
use crate::error::{AdminError, AdminResult};
use crate::models::ApiResponse;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, RwLock};
use tracing::debug;
use url::Url;

/// Shared HTTP client. Cloning is cheap and clones share the bearer token.
#[derive(Clone)]
pub struct RestClient {
    base_url: Url,
    client: reqwest::Client,
    token: Arc<RwLock<Option<String>>>,
}

impl RestClient {
    pub fn new(base_url: &str, user_agent: &str) -> AdminResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| AdminError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            base_url: normalize_base(base_url)?,
            client,
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn set_token(&self, token: Option<String>) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = token;
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Resolve a resource path such as `/banners/42` against the base URL.
    pub fn url(&self, path: &str) -> AdminResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| AdminError::Config(format!("Invalid request path '{}': {}", path, e)))
    }

    fn request(&self, method: Method, path: &str) -> AdminResult<RequestBuilder> {
        let url = self.url(path)?;
        debug!(%method, %url, "API request");
        let builder = self.client.request(method, url);
        Ok(match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AdminResult<T> {
        let builder = self.request(Method::GET, path)?.query(query);
        self.execute(builder).await
    }

    pub async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> AdminResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(method, path)?.json(body);
        self.execute(builder).await
    }

    /// Send a form as multipart when it carries files, JSON otherwise.
    pub async fn send_form<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        form: FormData,
    ) -> AdminResult<T> {
        let builder = self.request(method, path)?;
        let builder = if form.has_files() {
            builder.multipart(form.into_multipart()?)
        } else {
            builder.json(&form.to_json())
        };
        self.execute(builder).await
    }

    /// Request whose payload, if any, is ignored.
    pub async fn send_unit(&self, method: Method, path: &str) -> AdminResult<()> {
        let builder = self.request(method, path)?;
        self.execute_unit(builder).await
    }

    pub async fn send_json_unit<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> AdminResult<()> {
        let builder = self.request(method, path)?.json(body);
        self.execute_unit(builder).await
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> AdminResult<T> {
        let body = self.read_body(builder).await?;
        let envelope: ApiResponse<T> = serde_json::from_slice(&body)?;
        envelope.into_data()
    }

    async fn execute_unit(&self, builder: RequestBuilder) -> AdminResult<()> {
        let body = self.read_body(builder).await?;
        if body.is_empty() {
            return Ok(());
        }
        let envelope: ApiResponse<serde_json::Value> = serde_json::from_slice(&body)?;
        envelope.into_unit()
    }

    /// Send the request and return the raw body of a 2xx response.
    async fn read_body(&self, builder: RequestBuilder) -> AdminResult<Vec<u8>> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "API response");

        if !status.is_success() {
            return Err(http_error(status, &body));
        }
        Ok(body.to_vec())
    }
}

fn http_error(status: StatusCode, body: &[u8]) -> AdminError {
    let message = serde_json::from_slice::<ApiResponse<serde_json::Value>>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .unwrap_or_default();
    AdminError::Http {
        status: status.as_u16(),
        message,
    }
}

/// Parse the base URL and make sure relative joins land under it.
fn normalize_base(base_url: &str) -> AdminResult<Url> {
    let mut url = Url::parse(base_url)
        .map_err(|e| AdminError::Config(format!("Invalid API URL '{}': {}", base_url, e)))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_join_under_base() {
        let client = RestClient::new("http://localhost:3000/api", "test").unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:3000/api/");
        assert_eq!(
            client.url("/banners/admin").unwrap().as_str(),
            "http://localhost:3000/api/banners/admin"
        );
    }

    #[test]
    fn test_token_shared_between_clones() {
        let client = RestClient::new("http://localhost:3000/api/", "test").unwrap();
        let clone = client.clone();
        client.set_token(Some("abc".to_string()));
        assert_eq!(clone.token().as_deref(), Some("abc"));
        clone.set_token(None);
        assert!(client.token().is_none());
    }

    #[test]
    fn test_http_error_uses_envelope_message() {
        let err = http_error(
            StatusCode::CONFLICT,
            br#"{"success":false,"message":"Title already exists"}"#,
        );
        assert_eq!(
            err,
            AdminError::Http {
                status: 409,
                message: "Title already exists".to_string()
            }
        );

        let err = http_error(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>");
        assert_eq!(err.user_message(), "The server encountered an error.");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            RestClient::new("not a url", "test"),
            Err(AdminError::Config(_))
        ));
    }
}
