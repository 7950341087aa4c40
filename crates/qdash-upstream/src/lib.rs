//! HTTP clients for the upstream store-list and queue feeds.

pub mod client;
pub mod error;

pub use client::UpstreamClient;
pub use error::UpstreamError;
