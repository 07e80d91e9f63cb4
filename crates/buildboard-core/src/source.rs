//! Data source abstraction for the board.
//!
//! `DevOpsSource` is the seam between fetching and rendering. The REST
//! implementation lives in [`crate::client`]; an in-memory fake for tests
//! and offline snapshots lives in [`crate::fakes`].

use async_trait::async_trait;

use crate::domain::{Build, BuildDefinitionReference, BuildId, Deployment, Result};

/// Read-only access to build and release data of one project.
#[async_trait]
pub trait DevOpsSource: Send + Sync {
    /// List the project's build pipeline definitions.
    async fn list_build_definitions(&self) -> Result<Vec<BuildDefinitionReference>>;

    /// List builds, newest first. `top` caps the number returned.
    async fn list_builds(&self, top: Option<u32>) -> Result<Vec<Build>>;

    /// Fetch one build. `Ok(None)` when it does not exist.
    async fn get_build(&self, id: BuildId) -> Result<Option<Build>>;

    /// List every deployment of the project.
    async fn list_deployments(&self) -> Result<Vec<Deployment>>;
}
