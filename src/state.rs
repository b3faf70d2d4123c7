//! Application context
//!
//! The HTTP client, query cache and notifier shared by every module. It is
//! created once and handed explicitly to whatever needs it.

use crate::api::RestClient;
use crate::auth::SessionManager;
use crate::config::Settings;
use crate::crud::CrudModule;
use crate::error::AdminResult;
use crate::notify::Notifier;
use crate::page::{ResourcePage, SingletonPage};
use crate::query::QueryClient;
use crate::resource::Resource;
use std::sync::Arc;

#[derive(Clone)]
pub struct AdminContext {
    pub api: RestClient,
    pub queries: QueryClient,
    pub notifier: Arc<dyn Notifier>,
    pub settings: Arc<Settings>,
    session: SessionManager,
}

impl AdminContext {
    pub fn new(settings: Settings, notifier: Arc<dyn Notifier>) -> AdminResult<Self> {
        let api = RestClient::new(&settings.api.base_url, &settings.api.user_agent)?;
        api.set_token(settings.api.token.clone());
        let queries = QueryClient::new(settings.cache.stale_time);
        let session = SessionManager::new(api.clone(), queries.clone());

        Ok(Self {
            api,
            queries,
            notifier,
            settings: Arc::new(settings),
            session,
        })
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn module<R: Resource>(&self) -> CrudModule<R> {
        CrudModule::new(
            self.api.clone(),
            self.queries.clone(),
            Arc::clone(&self.notifier),
        )
    }

    pub fn resource_page<R: Resource>(&self) -> ResourcePage<R> {
        ResourcePage::new(self.module(), self.settings.cache.page_size)
    }

    pub fn singleton_page<R: Resource>(&self) -> SingletonPage<R> {
        SingletonPage::new(self.module())
    }
}
