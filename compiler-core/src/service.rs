use compile_api::CompilerDescriptor;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::{
    backend::CompileBackend,
    catalog::{Catalog, CatalogIndex},
    embed::Embed,
    error::Error,
    format::{build_compile_request, extract_code},
    presenter,
};

/// A compile request that passed resolution and extraction and now waits for
/// the user's go-ahead.
#[derive(Debug, Clone)]
pub struct PreparedCompile {
    pub compiler: CompilerDescriptor,
    pub code: String,
    /// What the user is asked to confirm
    pub preview: Embed,
}

#[derive(Clone)]
pub struct CompilerService {
    backend: Arc<dyn CompileBackend>,
    catalog: Arc<CatalogIndex>,
}

impl CompilerService {
    pub fn new(backend: Arc<dyn CompileBackend>) -> Self {
        Self::with_catalog(backend, Arc::new(CatalogIndex::new()))
    }

    pub fn with_catalog(backend: Arc<dyn CompileBackend>, catalog: Arc<CatalogIndex>) -> Self {
        Self { backend, catalog }
    }

    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    pub async fn refresh(&self) -> Result<Arc<Catalog>, Error> {
        self.catalog.refresh(self.backend.as_ref()).await
    }

    /// Pages listing every language and its compiler count. Always refreshes.
    pub async fn list_languages(&self, author: &str) -> Result<Vec<Embed>, Error> {
        let catalog = self.refresh().await?;
        Ok(presenter::language_pages(author, &catalog))
    }

    /// Pages with one language's compilers and templates. Always refreshes.
    pub async fn language_info(&self, author: &str, language: &str) -> Result<Vec<Embed>, Error> {
        let catalog = self.refresh().await?;
        let group = catalog
            .find_language(language)
            .ok_or_else(|| Error::NotFound(language.to_string()))?;

        Ok(presenter::language_info_pages(author, &catalog, group))
    }

    /// Starter source for a template, fenced for display
    pub async fn template(&self, template_id: &str) -> Result<String, Error> {
        self.catalog.ensure_loaded(self.backend.as_ref()).await?;

        let code = self.backend.fetch_template(template_id).await?;
        Ok(presenter::template_message(&code))
    }

    /// Resolve the target and extract the code, without contacting the
    /// compiler yet.
    pub async fn prepare_compile(
        &self,
        author: &str,
        target: &str,
        message: &str,
    ) -> Result<PreparedCompile, Error> {
        let catalog = self.catalog.ensure_loaded(self.backend.as_ref()).await?;
        let compiler = catalog.resolve(target)?.clone();
        let code = extract_code(message)?;

        debug!("Resolved '{}' to compiler {}", target, compiler.name);

        Ok(PreparedCompile {
            preview: presenter::confirmation_embed(author, &code),
            compiler,
            code,
        })
    }

    /// Run a confirmed compile and render the outcome
    pub async fn run_compile(&self, author: &str, prepared: &PreparedCompile) -> Result<Embed, Error> {
        let request = build_compile_request(&prepared.compiler.name, &prepared.code);

        match self.backend.compile(&request).await {
            Ok(result) => {
                info!(
                    "Compilation on {} finished with status {}",
                    prepared.compiler.name, result.status
                );
                Ok(presenter::compile_result_embed(author, &result))
            }
            Err(e) => {
                error!("Compilation on {} failed: {}", prepared.compiler.name, e);
                Err(Error::Compile(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures::{python_and_cpp, StaticBackend};

    #[tokio::test]
    async fn test_language_info_unknown_language() {
        let backend = Arc::new(StaticBackend::new(python_and_cpp()));
        let service = CompilerService::new(backend);

        let result = service.language_info("ada", "cobol").await;
        assert!(matches!(result, Err(Error::NotFound(q)) if q == "cobol"));
    }

    #[tokio::test]
    async fn test_prepare_compile_does_not_compile() {
        let backend = Arc::new(StaticBackend::new(python_and_cpp()));
        let service = CompilerService::new(backend.clone());

        let prepared = service
            .prepare_compile("ada", "python", "```py\nprint(1)\n```")
            .await
            .unwrap();

        assert_eq!(prepared.compiler.name, "cpython-3.12.0");
        assert_eq!(prepared.code, "print(1)");
        assert_eq!(prepared.preview.description.as_deref(), Some("```print(1)```"));
        assert_eq!(backend.compile_calls(), 0);
    }
}
