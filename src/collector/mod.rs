//! JSON document collection
//!
//! Fetches the raw body from the HTTP endpoint and decodes it into
//! `serde_json::Value` documents.
//!
//! # Example
//!
//! ```ignore
//! use check_json::collector::{decode, documents, JsonClient};
//!
//! let client = JsonClient::new(10_000)?;
//! let body = client.fetch(&url).await?;
//! let docs = documents(decode(&body)?);
//! ```

mod client;
mod parser;

pub use client::JsonClient;
pub use parser::{decode, documents};
