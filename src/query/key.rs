//! Query keys

use crate::models::PageRequest;
use std::fmt;

/// Ordered key segments; invalidation matches by prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new(root: impl Into<String>) -> Self {
        Self(vec![root.into()])
    }

    /// Append a segment.
    pub fn with(mut self, segment: impl ToString) -> Self {
        self.0.push(segment.to_string());
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn root(&self) -> &str {
        self.0.first().map(String::as_str).unwrap_or_default()
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

/// Key factories shared by every resource
pub mod keys {
    use super::*;
    use crate::resource::Resource;
    use uuid::Uuid;

    /// Root key; invalidating it covers every query of the resource.
    pub fn all<R: Resource>() -> QueryKey {
        QueryKey::new(R::NAME)
    }

    pub fn list<R: Resource>() -> QueryKey {
        all::<R>().with("list")
    }

    pub fn admin<R: Resource>(page: Option<PageRequest>) -> QueryKey {
        let key = all::<R>().with("admin");
        match page {
            Some(p) => key.with(p.page).with(p.limit),
            None => key,
        }
    }

    pub fn detail<R: Resource>(id: Uuid) -> QueryKey {
        all::<R>().with("detail").with(id)
    }

    pub fn current<R: Resource>() -> QueryKey {
        all::<R>().with("current")
    }
}
