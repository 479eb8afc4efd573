//! # Compiler Core
//!
//! Chat-facing logic around a remote compile service: the compiler catalog
//! grouped by language, fuzzy name resolution, code extraction from fenced
//! blocks, and rendering of results as paginated embeds.
//!
//! The remote service is reached through the [`CompileBackend`] trait, which
//! [`compile_api::CompileClient`] implements.

mod backend;
mod catalog;
mod embed;
mod error;
mod format;
mod presenter;
mod service;

#[cfg(test)]
mod tests;

pub use backend::CompileBackend;
pub use catalog::{Catalog, CatalogIndex, LanguageGroup, MatchStrategy, LANGUAGE_MATCH_STRATEGIES};
pub use embed::{Embed, EmbedField, Reply};
pub use error::Error;
pub use format::{build_compile_request, extract_code};
pub use presenter::{
    compile_error_embed, escape_mentions, missing_code_embed, paginate, MAX_FIELD_OUTPUT,
    OUTPUT_TRUNCATED, PAGE_SIZE,
};
pub use service::{CompilerService, PreparedCompile};

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, Error>;
