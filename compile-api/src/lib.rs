//! # Compile API
//!
//! Async client for a Wandbox-compatible remote compile service. The service
//! exposes three endpoints and this crate wraps each of them:
//!
//! - `GET /api/list.json`: every compiler the service offers
//! - `POST /api/compile.json`: compile and run a snippet
//! - `GET /api/template/{id}`: starter source for a language
//!
//! ## Example
//!
//! ```rust,no_run
//! use compile_api::{ClientConfig, CompileClient, CompileRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CompileClient::new(ClientConfig::from_env())?;
//!
//!     let compilers = client.list_compilers().await?;
//!     println!("{} compilers available", compilers.len());
//!
//!     let request = CompileRequest::new("cpython-3.12.0", "print(1)");
//!     match client.compile(&request).await {
//!         Ok(result) => println!("status {}: {}", result.status, result.program_output),
//!         Err(e) => eprintln!("API replied with: {}", e.summary()),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Catalog and template calls return [`Error`]. Compile calls return a
//! [`CompileError`] instead, which always carries a displayable message and,
//! when the service answered, its HTTP status.

mod client;
mod config;
mod error;
mod types;

pub use client::CompileClient;
pub use config::{ClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
pub use error::{CompileError, Error};
pub use types::*;

/// Result type for compile service operations
pub type Result<T> = std::result::Result<T, Error>;
