//! Upstream infrastructure: the HTTP client for the provider API.

pub mod client;

pub use client::HttpUpstreamClient;
