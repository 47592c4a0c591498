//! Client side of offcache.
//!
//! This crate provides the request/response model, the network fetcher,
//! origin classification, and the network-first [`CacheRouter`].

pub mod fetch;
pub mod origin;
pub mod router;

pub use fetch::{AssetRequest, AssetResponse, FetchConfig, Fetcher, HttpFetcher, resolve};
pub use origin::{OriginClass, OriginClassifier};
pub use router::{ActivationReport, CacheRouter, OFFLINE_BODY, Phase, RouterConfig, Served, Source};

pub use reqwest::{Method, StatusCode, Url, header};
