//! An async HTTP client for Imbo image servers
//!
//! Imbo stores images and per-image metadata behind an HTTP API. Reads are
//! plain GET/HEAD requests; state-changing requests carry an HMAC-SHA256
//! signature and a timestamp in the query string, which the server verifies
//! against the URL exactly as transmitted. This library builds those URLs,
//! signs them, issues the requests and maps responses into typed results.
//!
//! # Features
//! - Signed and unsigned resource URL construction
//! - Image upload, retrieval and deletion with content-derived identifiers
//! - Metadata editing, replacement and deletion
//! - Image listing with pagination and metadata filters
//! - Deterministic host spreading over several server URLs
//! - Async/await API using tokio, with built-in timeout support
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use imbo_client::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), imbo_client::Error> {
//!     let client = Client::new("http://imbo.example.com", "user", "private-key")?;
//!
//!     // Store an image
//!     let added = client.add_image(&std::fs::read("cat.jpg")?).await?;
//!     println!("Stored as {}", added.image_identifier);
//!
//!     // Attach metadata to it
//!     let mut metadata = serde_json::Map::new();
//!     metadata.insert("category".to_string(), "cats".into());
//!     client.replace_metadata(&added.image_identifier, &metadata).await?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2018_idioms)]

pub mod client;
pub mod error;
pub mod query;
mod signing;
pub mod types;
pub mod urls;

pub use client::{Client, ClientConfig};
pub use error::{Error, Result};
pub use query::ImagesQuery;
pub use types::*;
pub use urls::{Credentials, ResourceUrl};
