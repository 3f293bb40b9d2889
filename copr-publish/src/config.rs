//! Publisher configuration
//!
//! Everything the CI host hands to the step: Copr coordinates, credentials,
//! the package reference, and the optional packaging and waiting stages.

use std::path::PathBuf;
use std::time::Duration;

use copr_core::Secret;

use crate::host::UpstreamResult;
use crate::workflow::PublishRequest;

/// Default Copr frontend
pub const DEFAULT_API_URL: &str = "https://copr.fedoraproject.org";

/// Default wait budget in minutes
pub const DEFAULT_TIMEOUT_MINUTES: u64 = 60;

/// Publisher configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Copr project name
    pub project: String,

    /// Owner of the Copr project
    pub owner: String,

    /// Package URL, or a path relative to the job workspace
    pub package: String,

    /// API login
    pub api_login: Secret,

    /// API token
    pub api_token: Secret,

    /// Copr frontend base URL
    pub api_url: String,

    /// Script that builds the source package locally
    pub package_script: Option<String>,

    /// Run `package_script` before submitting
    pub prepare_package: bool,

    /// How long to wait for Copr, in minutes
    pub timeout_minutes: u64,

    /// Wait for the Copr build to finish
    pub wait: bool,

    /// Result of the job this step runs after
    pub upstream_result: UpstreamResult,

    /// Job workspace, used as the working directory of the packaging script
    pub workspace: Option<PathBuf>,
}

impl Config {
    /// Creates a configuration with defaults for everything optional
    pub fn new(
        project: impl Into<String>,
        owner: impl Into<String>,
        package: impl Into<String>,
        api_login: Secret,
        api_token: Secret,
    ) -> Self {
        Self {
            project: project.into(),
            owner: owner.into(),
            package: package.into(),
            api_login,
            api_token,
            api_url: DEFAULT_API_URL.to_string(),
            package_script: None,
            prepare_package: false,
            timeout_minutes: DEFAULT_TIMEOUT_MINUTES,
            wait: false,
            upstream_result: UpstreamResult::Success,
            workspace: None,
        }
    }

    /// Total time to wait for Copr
    pub fn wait_budget(&self) -> Duration {
        Duration::from_secs(self.timeout_minutes.saturating_mul(60))
    }

    /// The workflow input derived from this configuration
    pub fn request(&self) -> PublishRequest {
        PublishRequest {
            owner: self.owner.clone(),
            project: self.project.clone(),
            package: self.package.clone(),
            wait: self.wait.then(|| self.wait_budget()),
            upstream_result: self.upstream_result,
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.project.trim().is_empty() {
            anyhow::bail!("project cannot be empty");
        }

        if self.owner.trim().is_empty() {
            anyhow::bail!("owner cannot be empty");
        }

        if self.package.trim().is_empty() {
            anyhow::bail!("package cannot be empty");
        }

        if self.api_url.is_empty() {
            anyhow::bail!("api_url cannot be empty");
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            anyhow::bail!("api_url must start with http:// or https://");
        }

        if self.prepare_package
            && self
                .package_script
                .as_deref()
                .is_none_or(|script| script.trim().is_empty())
        {
            anyhow::bail!("package_script is required when prepare_package is enabled");
        }

        Ok(())
    }
}

/// Parses the wait budget given in minutes
pub fn parse_timeout(value: &str) -> Result<u64, String> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| "Not a valid number".to_string())
}
