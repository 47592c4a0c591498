//! MCP tool implementations.
//!
//! This module contains all tools exposed by the offcache host.

pub mod asset_fetch;
pub mod cache;

#[cfg(test)]
pub(crate) mod testing;
