//! Chat commands on top of [`compiler_core`].
//!
//! Every command returns a [`Reply`]; failures are turned into messages here
//! and never reach the chat layer as errors.

mod config;

pub use config::BotConfig;

use async_trait::async_trait;
use compile_api::CompileClient;
use compiler_core::{compile_error_embed, missing_code_embed, CompilerService, Embed, Reply};
use std::sync::Arc;
use tracing::{info, warn};

const SERVICE_UNAVAILABLE: &str =
    "The compile service could not be reached. It may be down, try again later.";
const NO_LANGUAGE_OR_COMPILER: &str = "No language or compiler found.";

/// The user's go-ahead before code is sent to the compile service
#[async_trait]
pub trait Confirmation: Send + Sync {
    async fn confirm(&self, preview: &Embed) -> bool;
}

/// Answers every confirmation the same way
#[derive(Debug, Clone, Copy)]
pub struct StaticConfirmation(pub bool);

#[async_trait]
impl Confirmation for StaticConfirmation {
    async fn confirm(&self, _preview: &Embed) -> bool {
        self.0
    }
}

#[derive(Clone)]
pub struct Commands {
    service: CompilerService,
}

impl Commands {
    pub fn new(service: CompilerService) -> Self {
        Self { service }
    }

    pub fn from_config(config: &BotConfig) -> Result<Self, Error> {
        let client = CompileClient::new(config.client.clone())?;
        Ok(Self::new(CompilerService::new(Arc::new(client))))
    }

    pub fn service(&self) -> &CompilerService {
        &self.service
    }

    /// `compiler language list`
    pub async fn languages(&self, author: &str) -> Reply {
        match self.service.list_languages(author).await {
            Ok(pages) => Reply::Pages(pages),
            Err(e) => error_reply(author, &e),
        }
    }

    /// `compiler language info <language>`
    pub async fn language_info(&self, author: &str, language: &str) -> Reply {
        match self.service.language_info(author, language).await {
            Ok(pages) => Reply::Pages(pages),
            Err(compiler_core::Error::NotFound(_)) => {
                Reply::Text(format!("No language matched `{}`.", language.trim()))
            }
            Err(e) => error_reply(author, &e),
        }
    }

    /// `compiler template <id>`
    pub async fn template(&self, author: &str, template_id: &str) -> Reply {
        match self.service.template(template_id).await {
            Ok(message) => Reply::Text(message),
            Err(compiler_core::Error::NotFound(_)) => {
                Reply::Text(format!("Template `{}` not found.", template_id))
            }
            Err(e) => error_reply(author, &e),
        }
    }

    /// `compile <compiler-or-language> <message>`
    ///
    /// Returns `None` when the user declines the confirmation.
    pub async fn compile(
        &self,
        author: &str,
        target: &str,
        message: &str,
        confirmation: &dyn Confirmation,
    ) -> Option<Reply> {
        let prepared = match self.service.prepare_compile(author, target, message).await {
            Ok(prepared) => prepared,
            Err(compiler_core::Error::NotFound(_)) => {
                return Some(Reply::Text(NO_LANGUAGE_OR_COMPILER.to_string()))
            }
            Err(e) => return Some(error_reply(author, &e)),
        };

        if !confirmation.confirm(&prepared.preview).await {
            info!("{} declined running code on {}", author, prepared.compiler.name);
            return None;
        }

        match self.service.run_compile(author, &prepared).await {
            Ok(embed) => Some(Reply::Embed(embed)),
            Err(e) => Some(error_reply(author, &e)),
        }
    }
}

fn error_reply(author: &str, error: &compiler_core::Error) -> Reply {
    use compiler_core::Error as CoreError;

    match error {
        CoreError::ServiceUnavailable(reason) => {
            warn!("Compile service unavailable: {}", reason);
            Reply::Text(SERVICE_UNAVAILABLE.to_string())
        }
        CoreError::NotFound(what) => Reply::Text(format!("Nothing matched `{}`.", what)),
        CoreError::MalformedInput(_) => Reply::Embed(missing_code_embed(author)),
        CoreError::Compile(e) => Reply::Embed(compile_error_embed(author, e)),
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Client error: {0}")]
    Client(#[from] compile_api::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
