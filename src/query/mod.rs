//! Query cache
//!
//! `QueryClient` holds fetched data by key and is passed explicitly to every
//! component that reads or invalidates it. `Query` is the per-view observer
//! tracking status, data and error of its latest fetch.

pub mod client;
pub mod key;
pub mod observer;

pub use client::{QueryClient, QueryEvent};
pub use key::{keys, QueryKey};
pub use observer::{Query, QueryStatus};
