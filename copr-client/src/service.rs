//! Build service abstraction
//!
//! The publishing workflow only needs "submit" and "ask for status". Keeping
//! those behind a trait lets the poller and workflow run against scripted
//! fakes in tests.

use async_trait::async_trait;
use copr_core::domain::build::{BuildHandle, BuildStatus};
use copr_core::dto::build::NewBuild;

use crate::CoprClient;
use crate::error::Result;

/// Remote package-build service
#[async_trait]
pub trait BuildService: Send + Sync {
    /// Schedules one build and returns its handle
    async fn submit(&self, req: &NewBuild) -> Result<BuildHandle>;

    /// Queries the current status of a scheduled build
    async fn status(&self, handle: &BuildHandle) -> Result<BuildStatus>;
}

#[async_trait]
impl BuildService for CoprClient {
    async fn submit(&self, req: &NewBuild) -> Result<BuildHandle> {
        self.schedule_build(req).await
    }

    async fn status(&self, handle: &BuildHandle) -> Result<BuildStatus> {
        self.build_status(handle).await
    }
}
