//! Client collaborator for Tether.
//!
//! The entity engine talks to the server only through the [`Client`] trait:
//! one request in, the unwrapped JSON result (or an [`ApiError`]) out.
//!
//! # Backends
//!
//! - [`HttpClient`]: reqwest over HTTP+JSON, configured by [`ClientConfig`]
//! - [`MemoryClient`]: an in-process store honouring the same wire conventions
//!
//! [`ApiError`]: tether_types::ApiError

mod client;
mod config;
mod http;
mod memory;
mod request;

pub use client::Client;
pub use config::ClientConfig;
pub use http::HttpClient;
pub use memory::MemoryClient;
pub use request::{ApiRequest, FileUpload, Method, Parameters, RequestBody};
