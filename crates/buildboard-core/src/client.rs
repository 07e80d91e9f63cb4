//! Azure DevOps REST client
//!
//! Implements [`DevOpsSource`] over the build and release management REST
//! APIs. Builds live under `dev.azure.com`, deployments under the release
//! management host `vsrm.dev.azure.com`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::{BoardError, Build, BuildDefinitionReference, BuildId, Deployment, Result};
use crate::source::DevOpsSource;

const CONTINUATION_HEADER: &str = "x-ms-continuationtoken";

/// Connection settings for one project.
#[derive(Debug, Clone)]
pub struct DevOpsConfig {
    /// Organization name (`https://dev.azure.com/{organization}`)
    pub organization: String,
    /// Project name or id
    pub project: String,
    /// Personal access token (optional for public projects)
    pub token: Option<String>,
    /// REST `api-version` query parameter
    pub api_version: String,
    /// Base URL of the build API host
    pub build_base_url: String,
    /// Base URL of the release management API host
    pub release_base_url: String,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for DevOpsConfig {
    fn default() -> Self {
        DevOpsConfig {
            organization: String::new(),
            project: String::new(),
            token: None,
            api_version: "7.0".to_string(),
            build_base_url: "https://dev.azure.com".to_string(),
            release_base_url: "https://vsrm.dev.azure.com".to_string(),
            timeout_secs: 30,
        }
    }
}

impl DevOpsConfig {
    /// Create config for a specific organization and project
    pub fn new(organization: &str, project: &str) -> Self {
        DevOpsConfig {
            organization: organization.to_string(),
            project: project.to_string(),
            ..Self::default()
        }
    }

    /// Set authentication token
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    /// Point both API hosts at another server (on-premises or a test double)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.build_base_url = base_url.to_string();
        self.release_base_url = base_url.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Check that the project is addressable.
    pub fn validate(&self) -> Result<()> {
        if self.organization.trim().is_empty() {
            return Err(BoardError::Config(
                "organization is not set (AZURE_DEVOPS_ORG)".to_string(),
            ));
        }
        if self.project.trim().is_empty() {
            return Err(BoardError::Config(
                "project is not set (AZURE_DEVOPS_PROJECT)".to_string(),
            ));
        }
        Ok(())
    }

    /// `{base}/{organization}/{project}/_apis/{path...}` with segments encoded.
    pub fn endpoint(&self, base_url: &str, path: &[&str]) -> Result<Url> {
        let mut url = Url::parse(base_url)
            .map_err(|e| BoardError::Config(format!("invalid base url {}: {}", base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| BoardError::Config(format!("base url cannot be a base: {}", base_url)))?
            .pop_if_empty()
            .push(&self.organization)
            .push(&self.project)
            .push("_apis")
            .extend(path);
        Ok(url)
    }
}

/// `{ "count": n, "value": [...] }` list envelope.
#[derive(Debug, Deserialize)]
struct ListEnvelope<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
}

/// REST client for one project.
pub struct AzureDevOpsClient {
    config: DevOpsConfig,
    http_client: reqwest::Client,
}

impl AzureDevOpsClient {
    /// Create a new client
    pub fn new(config: DevOpsConfig) -> Result<Self> {
        config.validate()?;
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("buildboard/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(AzureDevOpsClient {
            config,
            http_client,
        })
    }

    async fn get(&self, url: Url, query: &[(&str, String)]) -> Result<reqwest::Response> {
        let mut request = self
            .http_client
            .get(url)
            .query(&[("api-version", self.config.api_version.as_str())])
            .query(query);
        if let Some(token) = &self.config.token {
            request = request.basic_auth("", Some(token));
        }

        let response = request.send().await?;
        debug!(status = %response.status(), url = %response.url(), "devops response");
        Ok(response)
    }

    fn ensure_success(response: &reqwest::Response) -> Result<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(BoardError::Status {
                status: response.status().as_u16(),
                url: response.url().to_string(),
            })
        }
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let response = self.get(url, query).await?;
        Self::ensure_success(&response)?;
        let envelope: ListEnvelope<T> = response.json().await?;
        Ok(envelope.value)
    }
}

#[async_trait]
impl DevOpsSource for AzureDevOpsClient {
    async fn list_build_definitions(&self) -> Result<Vec<BuildDefinitionReference>> {
        let url = self
            .config
            .endpoint(&self.config.build_base_url, &["build", "definitions"])?;
        self.get_list(url, &[]).await
    }

    async fn list_builds(&self, top: Option<u32>) -> Result<Vec<Build>> {
        let url = self
            .config
            .endpoint(&self.config.build_base_url, &["build", "builds"])?;
        let query: Vec<(&str, String)> =
            top.map(|t| ("$top", t.to_string())).into_iter().collect();
        self.get_list(url, &query).await
    }

    async fn get_build(&self, id: BuildId) -> Result<Option<Build>> {
        let id = id.to_string();
        let url = self
            .config
            .endpoint(&self.config.build_base_url, &["build", "builds", id.as_str()])?;
        let response = self.get(url, &[]).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::ensure_success(&response)?;
        Ok(Some(response.json().await?))
    }

    async fn list_deployments(&self) -> Result<Vec<Deployment>> {
        let url = self
            .config
            .endpoint(&self.config.release_base_url, &["release", "deployments"])?;

        let mut deployments = Vec::new();
        let mut continuation: Option<String> = None;
        loop {
            let query: Vec<(&str, String)> = continuation
                .take()
                .map(|t| ("continuationToken", t))
                .into_iter()
                .collect();
            let response = self.get(url.clone(), &query).await?;
            Self::ensure_success(&response)?;

            let next = response
                .headers()
                .get(CONTINUATION_HEADER)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(str::to_string);
            let page: ListEnvelope<Deployment> = response.json().await?;
            deployments.extend(page.value);

            match next {
                Some(token) => continuation = Some(token),
                None => break,
            }
        }

        info!(
            project = %self.config.project,
            count = deployments.len(),
            "fetched deployments"
        );
        Ok(deployments)
    }
}
