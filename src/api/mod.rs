//! HTTP layer
//!
//! `RestClient` wraps one `reqwest::Client` and speaks the backend's
//! `{ success, message, data }` envelope; `ResourceService` maps each REST
//! operation of a resource onto it.

pub mod client;
pub mod form_data;
pub mod service;

pub use client::RestClient;
pub use form_data::{FormData, FormValue, ToFormData};
pub use service::ResourceService;
