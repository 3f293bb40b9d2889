//! Publishing workflow
//!
//! The step is a fixed sequence of fallible stages:
//!
//! 1. skip everything if the upstream job did not succeed
//! 2. optionally build the source package locally
//! 3. resolve the package reference to an absolute URL
//! 4. submit the build to Copr (exactly once)
//! 5. optionally wait for Copr to finish
//!
//! Any stage failure ends the run; there are no retries.

use std::time::Duration;

use copr_client::{BuildService, ClientError};
use copr_core::domain::build::{BuildHandle, BuildStatus};
use copr_core::dto::build::NewBuild;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::host::{HostEnv, UpstreamResult};
use crate::package::{PackageError, resolve_package_url};
use crate::packaging::PackagingStep;
use crate::scheduler::{StatusPoller, WaitOutcome};

/// Prefix of every line the step reports to the job log
pub const LOG_PREFIX: &str = "Copr plugin: ";

/// What to publish, and whether to wait for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub owner: String,
    pub project: String,
    /// Package URL or workspace-relative path, before variable expansion
    pub package: String,
    /// Wait budget; `None` returns right after submission
    pub wait: Option<Duration>,
    pub upstream_result: UpstreamResult,
}

/// How a successful run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Upstream job failed, nothing was done
    Skipped,
    /// Build submitted, not waited for
    Scheduled(BuildHandle),
    /// Build submitted and finished successfully
    Succeeded(BuildHandle),
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("remote service error: {0}")]
    RemoteService(#[from] ClientError),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("local packaging failed: {0}")]
    LocalStepFailure(String),

    #[error("Time is up and Copr hasn't finished the build yet (last status {last}).")]
    Timeout { last: BuildStatus },

    #[error("build failed: {0}")]
    BuildFailed(BuildStatus),
}

impl From<PackageError> for PublishError {
    fn from(err: PackageError) -> Self {
        PublishError::Configuration(err.to_string())
    }
}

/// Runs the whole step and logs the failure, if any
///
/// # Arguments
/// * `request` - What to publish
/// * `host` - Host environment (variable expansion, job URL)
/// * `packaging` - Local packaging stage; `None` when disabled
/// * `service` - Copr, or a stand-in
pub async fn publish(
    request: &PublishRequest,
    host: &HostEnv,
    packaging: Option<&dyn PackagingStep>,
    service: &dyn BuildService,
) -> Result<Outcome, PublishError> {
    let result = run_stages(request, host, packaging, service).await;

    if let Err(e) = &result {
        error!("{}{}", LOG_PREFIX, e);
    }

    result
}

async fn run_stages(
    request: &PublishRequest,
    host: &HostEnv,
    packaging: Option<&dyn PackagingStep>,
    service: &dyn BuildService,
) -> Result<Outcome, PublishError> {
    info!("{}Running Copr plugin", LOG_PREFIX);

    if !request.upstream_result.is_success() {
        warn!(
            "{}Build was unsuccessful. Nothing to build in Copr.",
            LOG_PREFIX
        );
        return Ok(Outcome::Skipped);
    }

    if let Some(step) = packaging {
        prepare_package(step).await?;
    }

    let reference = host.expand(&request.package);
    let package_url = resolve_package_url(&reference, host.job_url())?;
    info!("{}Package URL is {}", LOG_PREFIX, package_url);

    let handle = service
        .submit(&NewBuild::new(
            &request.owner,
            &request.project,
            &package_url,
        ))
        .await?;

    info!(
        "{}New Copr job has been scheduled (build {})",
        LOG_PREFIX, handle
    );

    let Some(budget) = request.wait else {
        return Ok(Outcome::Scheduled(handle));
    };

    info!(
        "{}Waiting for Copr to finish the build ({} minutes)",
        LOG_PREFIX,
        budget.as_secs() / 60
    );

    match StatusPoller::new(service).wait(&handle, budget).await? {
        WaitOutcome::Finished(status) if status.is_success() => Ok(Outcome::Succeeded(handle)),
        WaitOutcome::Finished(status) => Err(PublishError::BuildFailed(status)),
        WaitOutcome::TimedOut { last } => Err(PublishError::Timeout { last }),
    }
}

async fn prepare_package(step: &dyn PackagingStep) -> Result<(), PublishError> {
    match step.run().await {
        Ok(true) => {
            info!("{}SUCCESS", LOG_PREFIX);
            Ok(())
        }
        Ok(false) => {
            info!("{}FAILURE", LOG_PREFIX);
            Err(PublishError::LocalStepFailure(
                "packaging script reported failure".to_string(),
            ))
        }
        Err(e) => Err(PublishError::LocalStepFailure(format!("{:#}", e))),
    }
}
