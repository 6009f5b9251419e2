//! HTTP layer shared by the provider adapters
//!
//! This module handles:
//! - Client construction and connection pooling
//! - JSON request/response exchange with size limits
//! - Mapping HTTP statuses and transport failures onto the provider error taxonomy
//! - Request ID generation for log correlation

pub mod client;
pub mod error;

pub use client::HttpClient;
pub use error::{map_http_error, map_transport_error};
