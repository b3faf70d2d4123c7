//! Per-resource REST operations

use crate::api::{RestClient, ToFormData};
use crate::error::{unsupported, AdminResult};
use crate::models::{ListPage, PageRequest, ReorderRequest};
use crate::resource::{Resource, ResourceKind};
use reqwest::Method;
use std::marker::PhantomData;
use tracing::debug;
use uuid::Uuid;

/// Thin wrapper mapping one resource onto its endpoints
pub struct ResourceService<R: Resource> {
    api: RestClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self::new(self.api.clone())
    }
}

impl<R: Resource> ResourceService<R> {
    pub fn new(api: RestClient) -> Self {
        Self {
            api,
            _resource: PhantomData,
        }
    }

    pub fn client(&self) -> &RestClient {
        &self.api
    }

    fn item_path(id: Uuid) -> String {
        format!("{}/{}", R::PATH, id)
    }

    /// `GET /{resource}`: public list
    pub async fn list(&self) -> AdminResult<Vec<R::Record>> {
        self.require_collection("list")?;
        self.api.get(R::PATH, &[]).await
    }

    /// `GET /{resource}/admin`: every record, active or not
    pub async fn list_admin(&self, page: Option<PageRequest>) -> AdminResult<ListPage<R::Record>> {
        self.require_collection("list")?;
        let query = match page {
            Some(p) if R::CAPABILITIES.paginated => {
                vec![("page", p.page.to_string()), ("limit", p.limit.to_string())]
            }
            _ => Vec::new(),
        };
        self.api.get(&format!("{}/admin", R::PATH), &query).await
    }

    /// `GET /{resource}/:id`
    pub async fn get(&self, id: Uuid) -> AdminResult<R::Record> {
        self.api.get(&Self::item_path(id), &[]).await
    }

    /// `GET /{resource}` for singletons
    pub async fn current(&self) -> AdminResult<R::Record> {
        if R::KIND != ResourceKind::Singleton {
            return Err(unsupported(format!("{} is not a singleton resource", R::LABEL)));
        }
        self.api.get(R::PATH, &[]).await
    }

    /// `POST /{resource}`
    pub async fn create(&self, form: &R::Create) -> AdminResult<R::Record> {
        let body = form.to_form_data();
        debug!(resource = R::NAME, fields = ?body.names(), "Creating record");
        self.api.send_form(Method::POST, R::PATH, body).await
    }

    /// `PUT /{resource}/:id`, sending only the defined fields
    pub async fn update(&self, id: Uuid, form: &R::Update) -> AdminResult<R::Record> {
        let body = form.to_form_data();
        debug!(resource = R::NAME, %id, fields = ?body.names(), "Updating record");
        self.api.send_form(Method::PUT, &Self::item_path(id), body).await
    }

    /// `DELETE /{resource}/:id`
    pub async fn delete(&self, id: Uuid) -> AdminResult<()> {
        if !R::CAPABILITIES.delete {
            return Err(unsupported(format!("{} records cannot be deleted", R::LABEL)));
        }
        self.api.send_unit(Method::DELETE, &Self::item_path(id)).await
    }

    /// `PATCH /{resource}/:id/toggle`
    pub async fn toggle(&self, id: Uuid) -> AdminResult<R::Record> {
        if !R::CAPABILITIES.toggle {
            return Err(unsupported(format!("{} records cannot be toggled", R::LABEL)));
        }
        let path = format!("{}/toggle", Self::item_path(id));
        self.api
            .send_json(Method::PATCH, &path, &serde_json::json!({}))
            .await
    }

    /// `PATCH /{resource}/reorder`; positions follow the order of `ids`
    pub async fn reorder(&self, ids: &[Uuid]) -> AdminResult<()> {
        if !R::CAPABILITIES.reorder {
            return Err(unsupported(format!("{} records cannot be reordered", R::LABEL)));
        }
        let body = ReorderRequest::from_ids(ids);
        self.api
            .send_json_unit(Method::PATCH, &format!("{}/reorder", R::PATH), &body)
            .await
    }

    fn require_collection(&self, op: &str) -> AdminResult<()> {
        if R::KIND == ResourceKind::Singleton {
            return Err(unsupported(format!(
                "Cannot {} {}: it is a singleton resource",
                op,
                R::LABEL
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdminError;
    use crate::models::{AboutResource, FooterResource, HeroResource};

    // Port 9 is never listening; capability checks must fail before any I/O.
    fn client() -> RestClient {
        RestClient::new("http://127.0.0.1:9/api/", "test").unwrap()
    }

    #[tokio::test]
    async fn test_capability_checks_precede_network() {
        let hero = ResourceService::<HeroResource>::new(client());
        assert!(matches!(hero.delete(Uuid::new_v4()).await, Err(AdminError::Unsupported(_))));
        assert!(matches!(hero.reorder(&[]).await, Err(AdminError::Unsupported(_))));

        let about = ResourceService::<AboutResource>::new(client());
        assert!(matches!(about.toggle(Uuid::new_v4()).await, Err(AdminError::Unsupported(_))));
    }

    #[tokio::test]
    async fn test_singletons_have_no_list() {
        let footer = ResourceService::<FooterResource>::new(client());
        assert!(matches!(footer.list().await, Err(AdminError::Unsupported(_))));
        assert!(matches!(footer.list_admin(None).await, Err(AdminError::Unsupported(_))));
    }
}
