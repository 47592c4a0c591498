//! SQLite-backed cache storage for request/response pairs.
//!
//! This module provides a persistent, generation-scoped cache using SQLite
//! with async access via tokio-rusqlite. It supports:
//!
//! - Named cache generations, one of which is current per deployment
//! - Request identities derived from method and URL (SHA-256)
//! - Transactional bulk population for install-time pre-caching
//! - Whole-generation deletion with cascading entry removal
//! - Automatic schema migrations and WAL mode for concurrent access

pub mod connection;
pub mod entries;
pub mod generations;
pub mod hash;
pub mod migrations;

pub use crate::Error;

pub use connection::CacheDb;
pub use entries::CacheEntry;
pub use generations::Generation;
pub use hash::compute_request_key;
