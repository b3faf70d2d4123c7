//! Resource definitions
//!
//! A resource is one content type managed by the dashboard. Implementing
//! [`Resource`] is all a new screen needs: the generic service, queries,
//! mutations, dialog and page are parameterized by it.

use crate::api::ToFormData;
use crate::models::Upload;
use crate::page::Column;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use uuid::Uuid;
use validator::Validate;

/// Whether a resource is a list of records or a single record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Collection,
    Singleton,
}

/// Optional endpoints a resource exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// `PATCH /{resource}/:id/toggle`
    pub toggle: bool,
    /// `DELETE /{resource}/:id`
    pub delete: bool,
    /// `PATCH /{resource}/reorder`
    pub reorder: bool,
    /// Admin list returns `{ items, pagination }`
    pub paginated: bool,
}

impl Capabilities {
    pub const NONE: Capabilities = Capabilities {
        toggle: false,
        delete: false,
        reorder: false,
        paginated: false,
    };

    pub const fn toggle(self) -> Self {
        Self { toggle: true, ..self }
    }

    pub const fn delete(self) -> Self {
        Self { delete: true, ..self }
    }

    pub const fn reorder(self) -> Self {
        Self { reorder: true, ..self }
    }

    pub const fn paginated(self) -> Self {
        Self { paginated: true, ..self }
    }
}

pub trait Resource: Send + Sync + 'static {
    /// Root of every query key for this resource, e.g. `banners`
    const NAME: &'static str;
    /// Singular label used in notifications, e.g. `Banner`
    const LABEL: &'static str;
    /// REST path relative to the API base, e.g. `/banners`
    const PATH: &'static str;
    const KIND: ResourceKind = ResourceKind::Collection;
    const CAPABILITIES: Capabilities = Capabilities::NONE;
    /// Wire names of the fields that carry files
    const FILE_FIELDS: &'static [&'static str] = &[];

    type Record: DeserializeOwned + Clone + Debug + Send + Sync + 'static;
    type Create: Validate + ToFormData + From<Self::Update> + Debug + Send + Sync;
    type Update: Validate
        + ToFormData
        + Serialize
        + DeserializeOwned
        + Default
        + Clone
        + Debug
        + Send
        + Sync
        + 'static;

    fn id(record: &Self::Record) -> Uuid;

    /// Text identifying a record in confirmations
    fn display_name(record: &Self::Record) -> String;

    fn is_active(_record: &Self::Record) -> Option<bool> {
        None
    }

    /// Draft pre-filled from an existing record for the edit dialog
    fn edit_draft(record: &Self::Record) -> Self::Update;

    /// Server URL currently stored in a file field
    fn remote_file(_record: &Self::Record, _field: &str) -> Option<String> {
        None
    }

    /// Attach or clear a file on the draft. Returns false for unknown fields.
    fn set_file(_draft: &mut Self::Update, _field: &str, _file: Option<Upload>) -> bool {
        false
    }

    fn columns() -> Vec<Column<Self::Record>>;
}

/// Shared cell formatting for the `Status` column
pub fn status_label(active: bool) -> String {
    if active { "Active" } else { "Inactive" }.to_string()
}

/// Shorten long text for table cells.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}
