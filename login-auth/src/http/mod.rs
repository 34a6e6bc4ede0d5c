//! HTTP client building for outbound provider calls.

mod client;

pub use client::{ClientBuilder, HttpClientConfig};
