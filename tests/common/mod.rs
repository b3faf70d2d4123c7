//! In-process mock of the CMS backend used by the integration tests.

#![allow(dead_code)]

use axum::{
    extract::{FromRequest, Multipart, Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{Duration as ChronoDuration, Utc};
use cms_admin::auth::{Claims, Role, TokenType};
use cms_admin::config::Settings;
use cms_admin::notify::ToastQueue;
use cms_admin::AdminContext;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "secret123";
const SIGNING_SECRET: &[u8] = b"mock-backend-secret";
const SINGLETONS: &[&str] = &["hero", "about", "footer"];

#[derive(Default)]
struct Store {
    collections: HashMap<String, Vec<Value>>,
    singletons: HashMap<String, Value>,
    access_token: Option<String>,
    refresh_token: Option<String>,
}

#[derive(Clone, Default)]
pub struct MockBackend {
    store: Arc<Mutex<Store>>,
    requests: Arc<AtomicUsize>,
    detail_delay: Arc<Mutex<Duration>>,
}

impl MockBackend {
    fn store(&self) -> std::sync::MutexGuard<'_, Store> {
        self.store.lock().unwrap()
    }

    /// Number of API requests received so far
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Delay applied to single-record reads, singletons included
    pub fn set_detail_delay(&self, delay: Duration) {
        *self.detail_delay.lock().unwrap() = delay;
    }

    async fn detail_pause(&self) {
        let delay = *self.detail_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    /// Insert a record, filling id, flags and timestamps when missing.
    pub fn seed(&self, resource: &str, fields: Value) -> Uuid {
        let mut record = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();
        record.entry("id").or_insert(json!(id));
        record.entry("isActive").or_insert(json!(true));
        record.entry("createdAt").or_insert(json!(now));
        record.entry("updatedAt").or_insert(json!(now));

        let mut store = self.store();
        if SINGLETONS.contains(&resource) {
            store.singletons.insert(resource.to_string(), Value::Object(record));
        } else {
            let items = store.collections.entry(resource.to_string()).or_default();
            record.entry("order").or_insert(json!(items.len()));
            items.push(Value::Object(record));
        }
        id
    }

    pub fn records(&self, resource: &str) -> Vec<Value> {
        self.store()
            .collections
            .get(resource)
            .cloned()
            .unwrap_or_default()
    }

    pub fn singleton(&self, resource: &str) -> Option<Value> {
        self.store().singletons.get(resource).cloned()
    }
}

pub struct TestServer {
    pub base_url: String,
    pub backend: MockBackend,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let backend = MockBackend::default();
        let app = router(backend.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base_url: format!("http://{}/api/", addr),
            backend,
            handle,
        }
    }

    /// Context pointed at this server, reporting toasts into `toasts`.
    pub fn context(&self, toasts: &ToastQueue) -> AdminContext {
        let mut settings = Settings::default();
        settings.api.base_url = self.base_url.clone();
        AdminContext::new(settings, Arc::new(toasts.clone())).unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn router(backend: MockBackend) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh", post(refresh))
        .route("/api/auth/me", get(me))
        .route("/api/{resource}", get(list_public).post(create))
        .route("/api/{resource}/admin", get(list_admin))
        .route("/api/{resource}/reorder", patch(reorder))
        .route(
            "/api/{resource}/{id}",
            get(detail).put(update).delete(remove),
        )
        .route("/api/{resource}/{id}/toggle", patch(toggle))
        .layer(middleware::from_fn_with_state(backend.clone(), count_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(backend)
}

async fn count_requests(State(backend): State<MockBackend>, req: Request, next: Next) -> Response {
    backend.requests.fetch_add(1, Ordering::SeqCst);
    next.run(req).await
}

fn ok(data: Value) -> Response {
    Json(json!({ "success": true, "data": data })).into_response()
}

fn fail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

fn not_found(resource: &str) -> Response {
    fail(StatusCode::NOT_FOUND, &format!("{} not found", resource))
}

/// Typed value of a multipart text field
fn coerce(text: &str) -> Value {
    match text {
        "true" => json!(true),
        "false" => json!(false),
        _ => text
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| json!(text)),
    }
}

async fn read_fields(req: Request) -> Result<Map<String, Value>, Response> {
    let is_multipart = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    if !is_multipart {
        let Json(map) = Json::<Map<String, Value>>::from_request(req, &())
            .await
            .map_err(IntoResponse::into_response)?;
        return Ok(map);
    }

    let mut multipart = Multipart::from_request(req, &())
        .await
        .map_err(IntoResponse::into_response)?;
    let mut map = Map::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(IntoResponse::into_response)?
    {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                field.bytes().await.map_err(IntoResponse::into_response)?;
                map.insert(name, json!(format!("/uploads/{}", file_name)));
            }
            None => {
                let text = field.text().await.map_err(IntoResponse::into_response)?;
                map.insert(name, coerce(&text));
            }
        }
    }
    Ok(map)
}

fn find<'a>(items: &'a mut [Value], id: &str) -> Option<&'a mut Value> {
    items.iter_mut().find(|r| r["id"] == json!(id))
}

async fn list_public(State(backend): State<MockBackend>, Path(resource): Path<String>) -> Response {
    if SINGLETONS.contains(&resource.as_str()) {
        backend.detail_pause().await;
        return match backend.singleton(&resource) {
            Some(record) => ok(record),
            None => not_found(&resource),
        };
    }
    let active: Vec<Value> = backend
        .records(&resource)
        .into_iter()
        .filter(|r| r["isActive"] == json!(true))
        .collect();
    ok(json!(active))
}

#[derive(Deserialize)]
struct PageParams {
    page: Option<usize>,
    limit: Option<usize>,
}

async fn list_admin(
    State(backend): State<MockBackend>,
    Path(resource): Path<String>,
    Query(params): Query<PageParams>,
) -> Response {
    let mut items = backend.records(&resource);
    items.sort_by_key(|r| r["order"].as_u64().unwrap_or_default());

    let (Some(page), Some(limit)) = (params.page, params.limit) else {
        return ok(json!(items));
    };
    let total = items.len();
    let start = (page - 1) * limit;
    let slice: Vec<Value> = items.into_iter().skip(start).take(limit).collect();
    ok(json!({
        "items": slice,
        "pagination": {
            "page": page,
            "limit": limit,
            "total": total,
            "totalPages": total.div_ceil(limit),
        }
    }))
}

async fn detail(
    State(backend): State<MockBackend>,
    Path((resource, id)): Path<(String, String)>,
) -> Response {
    backend.detail_pause().await;

    if let Some(record) = backend.singleton(&resource).filter(|r| r["id"] == json!(id)) {
        return ok(record);
    }
    let mut items = backend.records(&resource);
    match find(&mut items, &id) {
        Some(record) => ok(record.clone()),
        None => not_found(&resource),
    }
}

async fn create(
    State(backend): State<MockBackend>,
    Path(resource): Path<String>,
    req: Request,
) -> Response {
    let fields = match read_fields(req).await {
        Ok(fields) => fields,
        Err(resp) => return resp,
    };
    if fields.get("title") == Some(&json!("duplicate")) {
        return fail(StatusCode::CONFLICT, "Title already exists");
    }

    let id = backend.seed(&resource, Value::Object(fields));
    let record = match backend.singleton(&resource) {
        Some(record) if record["id"] == json!(id) => record,
        _ => {
            let mut items = backend.records(&resource);
            find(&mut items, &id.to_string()).cloned().unwrap_or(Value::Null)
        }
    };
    (StatusCode::CREATED, Json(json!({ "success": true, "data": record }))).into_response()
}

/// Apply `change` to a stored record and return the updated copy.
fn modify(
    backend: &MockBackend,
    resource: &str,
    id: &str,
    change: impl FnOnce(&mut Map<String, Value>),
) -> Option<Value> {
    let mut store = backend.store();
    let record = if SINGLETONS.contains(&resource) {
        store
            .singletons
            .get_mut(resource)
            .filter(|r| r["id"] == json!(id))?
    } else {
        find(store.collections.get_mut(resource)?, id)?
    };
    let map = record.as_object_mut()?;
    change(map);
    map.insert("updatedAt".into(), json!(Utc::now().to_rfc3339()));
    Some(record.clone())
}

async fn update(
    State(backend): State<MockBackend>,
    Path((resource, id)): Path<(String, String)>,
    req: Request,
) -> Response {
    let fields = match read_fields(req).await {
        Ok(fields) => fields,
        Err(resp) => return resp,
    };
    match modify(&backend, &resource, &id, |record| record.extend(fields)) {
        Some(record) => ok(record),
        None => not_found(&resource),
    }
}

async fn toggle(
    State(backend): State<MockBackend>,
    Path((resource, id)): Path<(String, String)>,
) -> Response {
    let flip = |record: &mut Map<String, Value>| {
        let active = record.get("isActive").and_then(Value::as_bool).unwrap_or(false);
        record.insert("isActive".into(), json!(!active));
    };
    match modify(&backend, &resource, &id, flip) {
        Some(record) => ok(record),
        None => not_found(&resource),
    }
}

async fn remove(
    State(backend): State<MockBackend>,
    Path((resource, id)): Path<(String, String)>,
) -> Response {
    let mut store = backend.store();
    let Some(items) = store.collections.get_mut(&resource) else {
        return not_found(&resource);
    };
    let before = items.len();
    items.retain(|r| r["id"] != json!(id));
    if items.len() == before {
        return not_found(&resource);
    }
    Json(json!({ "success": true, "message": "Deleted" })).into_response()
}

#[derive(Deserialize)]
struct ReorderBody {
    items: Vec<ReorderEntry>,
}

#[derive(Deserialize)]
struct ReorderEntry {
    id: String,
    order: u64,
}

async fn reorder(
    State(backend): State<MockBackend>,
    Path(resource): Path<String>,
    Json(body): Json<ReorderBody>,
) -> Response {
    let mut store = backend.store();
    let Some(items) = store.collections.get_mut(&resource) else {
        return not_found(&resource);
    };
    for entry in body.items {
        if let Some(record) = find(items, &entry.id) {
            record["order"] = json!(entry.order);
        }
    }
    Json(json!({ "success": true, "data": null })).into_response()
}

fn sign(token_type: TokenType, lifetime: ChronoDuration) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub: Uuid::nil(),
        email: ADMIN_EMAIL.to_string(),
        role: Role::Admin,
        exp: (now + lifetime).timestamp(),
        iat: now.timestamp(),
        token_type,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SIGNING_SECRET)).unwrap()
}

fn issue_tokens(backend: &MockBackend) -> Response {
    let access = sign(TokenType::Access, ChronoDuration::minutes(15));
    let refresh = sign(TokenType::Refresh, ChronoDuration::days(7));
    let mut store = backend.store();
    store.access_token = Some(access.clone());
    store.refresh_token = Some(refresh.clone());
    ok(json!({
        "accessToken": access,
        "refreshToken": refresh,
        "tokenType": "Bearer",
        "expiresIn": 900,
    }))
}

async fn login(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Response {
    if body["email"] != json!(ADMIN_EMAIL) || body["password"] != json!(ADMIN_PASSWORD) {
        return fail(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    issue_tokens(&backend)
}

async fn refresh(State(backend): State<MockBackend>, Json(body): Json<Value>) -> Response {
    let expected = backend.store().refresh_token.clone();
    match (body["refreshToken"].as_str(), expected) {
        (Some(given), Some(expected)) if given == expected => issue_tokens(&backend),
        _ => fail(StatusCode::UNAUTHORIZED, "Invalid refresh token"),
    }
}

async fn me(State(backend): State<MockBackend>, headers: HeaderMap) -> Response {
    let given = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);
    let expected = backend.store().access_token.clone();
    if given.is_none() || given != expected {
        return fail(StatusCode::UNAUTHORIZED, "Authentication required");
    }
    let now = Utc::now().to_rfc3339();
    ok(json!({
        "id": Uuid::nil(),
        "name": "Admin",
        "email": ADMIN_EMAIL,
        "role": "admin",
        "avatar": null,
        "isActive": true,
        "createdAt": now,
        "updatedAt": now,
    }))
}
