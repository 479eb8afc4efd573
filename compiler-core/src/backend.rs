use async_trait::async_trait;
use compile_api::{CompileClient, CompileError, CompileRequest, CompileResult, CompilerDescriptor};

use crate::error::Error;

/// The remote operations the core needs from a compile service
#[async_trait]
pub trait CompileBackend: Send + Sync {
    /// Fetch every compiler the service offers
    async fn list_compilers(&self) -> Result<Vec<CompilerDescriptor>, Error>;

    /// Compile and run one snippet
    async fn compile(&self, request: &CompileRequest) -> Result<CompileResult, CompileError>;

    /// Fetch the source of a starter template
    async fn fetch_template(&self, template_id: &str) -> Result<String, Error>;
}

#[async_trait]
impl CompileBackend for CompileClient {
    async fn list_compilers(&self) -> Result<Vec<CompilerDescriptor>, Error> {
        CompileClient::list_compilers(self)
            .await
            .map_err(|e| Error::ServiceUnavailable(e.to_string()))
    }

    async fn compile(&self, request: &CompileRequest) -> Result<CompileResult, CompileError> {
        CompileClient::compile(self, request).await
    }

    async fn fetch_template(&self, template_id: &str) -> Result<String, Error> {
        Ok(CompileClient::fetch_template(self, template_id).await?)
    }
}
