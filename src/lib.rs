//! CMS Admin - headless content-management dashboard
//!
//! Every screen of the dashboard (banners, hero, about, announcements, footer,
//! services, users, testimonials, FAQs, brochures) follows one pattern, so it
//! is expressed once here and instantiated per [`resource::Resource`]:
//!
//! - **Schema** (`models::*`, `validation`): `CreateX`/`UpdateX` forms with
//!   declarative rules and file checks.
//! - **Service** (`api`): REST calls; forms go out as JSON, or multipart when
//!   they carry files.
//! - **Queries** (`query`): a shared cache keyed by [`query::QueryKey`] with
//!   request coalescing, staleness and prefix invalidation.
//! - **Mutations** (`mutation`, `crud`): guarded writes that invalidate the
//!   resource's keys and raise toasts.
//! - **Dialog and page** (`dialog`, `page`): the create/edit form state machine
//!   and the table screen that drives it.
//!
//! Shared handles live in [`state::AdminContext`] and are passed explicitly.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod crud;
pub mod dialog;
pub mod error;
pub mod models;
pub mod mutation;
pub mod notify;
pub mod page;
pub mod query;
pub mod resource;
pub mod state;
pub mod validation;

pub use crud::CrudModule;
pub use error::{AdminError, AdminResult};
pub use resource::Resource;
pub use state::AdminContext;
