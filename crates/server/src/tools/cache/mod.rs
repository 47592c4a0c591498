//! Cache inspection tools.
//!
//! Read-only views of the generation store; only the router writes to it.

pub mod get;
pub mod list;

pub use get::{CacheGetParams, get_impl};
pub use list::{CacheListParams, list_impl};
