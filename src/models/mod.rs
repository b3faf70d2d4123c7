//! Data models and DTOs (Data Transfer Objects)
//!
//! Contains the response envelope shared by every endpoint, the pagination
//! shapes, and one module per managed resource.

pub mod about;
pub mod announcement;
pub mod banner;
pub mod brochure;
pub mod faq;
pub mod footer;
pub mod hero;
pub mod service;
pub mod testimonial;
pub mod upload;
pub mod user;

// Re-export commonly used types
pub use about::*;
pub use announcement::*;
pub use banner::*;
pub use brochure::*;
pub use faq::*;
pub use footer::*;
pub use hero::*;
pub use service::*;
pub use testimonial::*;
pub use upload::*;
pub use user::*;

use crate::error::{AdminError, AdminResult};
use serde::{Deserialize, Serialize};

/// Generic response envelope: `{ success, message, data }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Unwrap the payload, treating `success: false` as a rejection.
    pub fn into_data(self) -> AdminResult<T> {
        if !self.success {
            return Err(AdminError::Rejected(
                self.message.unwrap_or_else(|| "Request was not successful".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| AdminError::Decode("Response envelope has no data".to_string()))
    }

    /// Check the success flag and ignore any payload.
    pub fn into_unit(self) -> AdminResult<()> {
        if self.success {
            Ok(())
        } else {
            Err(AdminError::Rejected(
                self.message.unwrap_or_else(|| "Request was not successful".to_string()),
            ))
        }
    }
}

/// Pagination metadata returned by admin list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Pagination {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// `{ items, pagination }` list payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// Admin list payload: paginated or a bare array depending on the resource
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListPage<T> {
    Paged(Paginated<T>),
    Plain(Vec<T>),
}

impl<T> ListPage<T> {
    pub fn items(&self) -> &[T] {
        match self {
            ListPage::Paged(page) => &page.items,
            ListPage::Plain(items) => items,
        }
    }

    pub fn pagination(&self) -> Option<Pagination> {
        match self {
            ListPage::Paged(page) => Some(page.pagination),
            ListPage::Plain(_) => None,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            ListPage::Paged(page) => page.items,
            ListPage::Plain(items) => items,
        }
    }
}

/// Page/limit pair sent as query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    pub fn next(self) -> Self {
        Self::new(self.page + 1, self.limit)
    }

    pub fn prev(self) -> Self {
        Self::new(self.page.saturating_sub(1), self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// Body of `PATCH /{resource}/reorder`
#[derive(Debug, Clone, Serialize)]
pub struct ReorderRequest {
    pub items: Vec<ReorderItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReorderItem {
    pub id: uuid::Uuid,
    pub order: u32,
}

impl ReorderRequest {
    /// Assign positions in the given order.
    pub fn from_ids(ids: &[uuid::Uuid]) -> Self {
        Self {
            items: ids
                .iter()
                .enumerate()
                .map(|(i, id)| ReorderItem {
                    id: *id,
                    order: i as u32,
                })
                .collect(),
        }
    }
}
