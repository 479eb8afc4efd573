use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use crate::{
    config::ClientConfig,
    error::{CompileError, Error},
    types::{CompileRequest, CompileResult, CompilerDescriptor, Template},
};

/// Client for the remote compile service API
#[derive(Debug, Clone)]
pub struct CompileClient {
    client: Client,
    config: ClientConfig,
}

impl CompileClient {
    /// Create a new CompileClient with the given configuration
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        if config.api_url.trim().is_empty() {
            return Err(Error::Configuration("api_url must not be empty".into()));
        }
        if config.timeout().is_zero() {
            return Err(Error::Configuration("timeout must be greater than zero".into()));
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(Error::HttpClient)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch the full compiler list
    pub async fn list_compilers(&self) -> Result<Vec<CompilerDescriptor>, Error> {
        let url = self.config.endpoint("list.json");
        debug!("Fetching compiler list from {}", url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Api {
                status_code: response.status().as_u16(),
                message: response.text().await?,
            });
        }

        response
            .json::<Vec<CompilerDescriptor>>()
            .await
            .map_err(Error::HttpClient)
    }

    /// Submit code for compilation and execution.
    ///
    /// Every failure, transport or HTTP, comes back as a [`CompileError`] the
    /// caller can show to the user as is.
    pub async fn compile(&self, request: &CompileRequest) -> Result<CompileResult, CompileError> {
        debug!("Submitting code to compiler {}", request.compiler);

        let response = self
            .client
            .post(self.config.endpoint("compile.json"))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CompileError::new(
                Some(status.as_u16()),
                status.canonical_reason().unwrap_or("Unknown"),
            ));
        }

        Ok(response.json::<CompileResult>().await?)
    }

    /// Fetch the source of one starter template
    pub async fn fetch_template(&self, template_id: &str) -> Result<String, Error> {
        let response = self.client.get(self.template_url(template_id)?).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(template_id.to_string()));
        }

        if !response.status().is_success() {
            return Err(Error::Api {
                status_code: response.status().as_u16(),
                message: response.text().await?,
            });
        }

        let template = response.json::<Template>().await?;
        Ok(template.code)
    }

    /// The id is pushed as a single percent-encoded path segment
    fn template_url(&self, template_id: &str) -> Result<Url, Error> {
        let mut url = Url::parse(&self.config.endpoint("template"))
            .map_err(|e| Error::Configuration(format!("invalid api_url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::Configuration("api_url cannot be a base".into()))?
            .push(template_id);
        Ok(url)
    }
}
