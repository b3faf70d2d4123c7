//! Generic CRUD module
//!
//! Bundles the service, the shared cache and one mutation per write
//! operation for a single resource. Every screen of the dashboard is an
//! instance of this module.

use crate::api::{ResourceService, RestClient};
use crate::error::AdminResult;
use crate::models::{ListPage, PageRequest};
use crate::mutation::Mutation;
use crate::notify::Notifier;
use crate::query::{keys, Query, QueryClient};
use crate::resource::Resource;
use crate::validation::validate_form;
use std::sync::Arc;
use uuid::Uuid;

pub struct CrudModule<R: Resource> {
    service: ResourceService<R>,
    queries: QueryClient,
    notifier: Arc<dyn Notifier>,
    create: Mutation,
    update: Mutation,
    delete: Mutation,
    toggle: Mutation,
    reorder: Mutation,
}

impl<R: Resource> Clone for CrudModule<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            queries: self.queries.clone(),
            notifier: Arc::clone(&self.notifier),
            create: self.create.clone(),
            update: self.update.clone(),
            delete: self.delete.clone(),
            toggle: self.toggle.clone(),
            reorder: self.reorder.clone(),
        }
    }
}

impl<R: Resource> CrudModule<R> {
    pub fn new(api: RestClient, queries: QueryClient, notifier: Arc<dyn Notifier>) -> Self {
        let mutation = |op: &str, message: String| {
            Mutation::new(
                format!("{}.{}", R::NAME, op),
                queries.clone(),
                Arc::clone(&notifier),
                message,
            )
            .invalidates(keys::all::<R>())
        };

        Self {
            create: mutation("create", format!("{} created successfully", R::LABEL)),
            update: mutation("update", format!("{} updated successfully", R::LABEL)),
            delete: mutation("delete", format!("{} deleted successfully", R::LABEL)),
            toggle: mutation("toggle", format!("{} status updated", R::LABEL)),
            reorder: mutation("reorder", format!("{} order updated", R::LABEL)),
            service: ResourceService::new(api),
            queries,
            notifier,
        }
    }

    pub fn service(&self) -> &ResourceService<R> {
        &self.service
    }

    pub fn queries(&self) -> &QueryClient {
        &self.queries
    }

    pub fn notifier(&self) -> Arc<dyn Notifier> {
        Arc::clone(&self.notifier)
    }

    /// New observer bound to this module's cache and notifier.
    pub fn observer<T: Clone + Send + Sync + 'static>(&self) -> Query<T> {
        Query::new(self.queries.clone(), self.notifier())
    }

    pub async fn fetch_list(&self) -> AdminResult<Vec<R::Record>> {
        let service = self.service.clone();
        self.queries
            .fetch_query(keys::list::<R>(), move || async move { service.list().await })
            .await
    }

    pub async fn fetch_admin(&self, page: Option<PageRequest>) -> AdminResult<ListPage<R::Record>> {
        let service = self.service.clone();
        self.queries
            .fetch_query(keys::admin::<R>(page), move || async move {
                service.list_admin(page).await
            })
            .await
    }

    pub async fn fetch_detail(&self, id: Uuid) -> AdminResult<R::Record> {
        let service = self.service.clone();
        self.queries
            .fetch_query(keys::detail::<R>(id), move || async move { service.get(id).await })
            .await
    }

    /// The singleton record; `None` while it has not been created.
    pub async fn fetch_current(&self) -> AdminResult<Option<R::Record>> {
        let service = self.service.clone();
        self.queries
            .fetch_query(keys::current::<R>(), move || current_or_none(service))
            .await
    }

    /// Admin list through an observer, so a newer load cancels an older one.
    pub async fn load_admin(
        &self,
        query: &Query<ListPage<R::Record>>,
        page: Option<PageRequest>,
    ) -> AdminResult<ListPage<R::Record>> {
        let service = self.service.clone();
        query
            .fetch(keys::admin::<R>(page), move || async move {
                service.list_admin(page).await
            })
            .await
    }

    pub async fn load_detail(&self, query: &Query<R::Record>, id: Uuid) -> AdminResult<R::Record> {
        let service = self.service.clone();
        query
            .fetch(keys::detail::<R>(id), move || async move { service.get(id).await })
            .await
    }

    /// Singleton record through an observer, so a dropped or superseded
    /// load resolves to a silent [`AdminError::Cancelled`](crate::AdminError::Cancelled).
    pub async fn load_current(
        &self,
        query: &Query<Option<R::Record>>,
    ) -> AdminResult<Option<R::Record>> {
        let service = self.service.clone();
        query
            .fetch(keys::current::<R>(), move || current_or_none(service))
            .await
    }

    /// Validate, then `POST`. Validation failures never reach the network.
    pub async fn create(&self, form: R::Create) -> AdminResult<R::Record> {
        validate_form(&form)?;
        self.create.run(self.service.create(&form)).await
    }

    pub async fn update(&self, id: Uuid, form: R::Update) -> AdminResult<R::Record> {
        validate_form(&form)?;
        self.update.run(self.service.update(id, &form)).await
    }

    pub async fn delete(&self, id: Uuid) -> AdminResult<()> {
        self.delete.run(self.service.delete(id)).await
    }

    pub async fn toggle(&self, id: Uuid) -> AdminResult<R::Record> {
        self.toggle.run(self.service.toggle(id)).await
    }

    pub async fn reorder(&self, ids: &[Uuid]) -> AdminResult<()> {
        self.reorder.run(self.service.reorder(ids)).await
    }

    /// True while a create or update is in flight.
    pub fn is_saving(&self) -> bool {
        self.create.is_pending() || self.update.is_pending()
    }

    pub fn is_deleting(&self) -> bool {
        self.delete.is_pending()
    }
}

async fn current_or_none<R: Resource>(service: ResourceService<R>) -> AdminResult<Option<R::Record>> {
    match service.current().await {
        Ok(record) => Ok(Some(record)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}
