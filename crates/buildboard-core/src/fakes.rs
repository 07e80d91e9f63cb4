//! In-memory `DevOpsSource`
//!
//! Serves builds and deployments from memory. Used by tests and by the CLI
//! when rendering from an offline snapshot instead of the REST API.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::domain::{BoardError, Build, BuildDefinitionReference, BuildId, Deployment, Result};
use crate::snapshot::BoardSnapshot;
use crate::source::DevOpsSource;

/// In-memory source backed by a [`BoardSnapshot`].
#[derive(Debug, Default)]
pub struct MemoryDevOpsSource {
    snapshot: BoardSnapshot,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl MemoryDevOpsSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builds(mut self, builds: Vec<Build>) -> Self {
        self.snapshot.builds = builds;
        self
    }

    pub fn with_deployments(mut self, deployments: Vec<Deployment>) -> Self {
        self.snapshot.deployments = deployments;
        self
    }

    pub fn with_definitions(mut self, definitions: Vec<BuildDefinitionReference>) -> Self {
        self.snapshot.definitions = definitions;
        self
    }

    /// Make every call fail with an HTTP error carrying `reason`.
    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::default()
        }
    }

    /// Number of source calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(reason) => Err(BoardError::Http(reason.clone())),
            None => Ok(()),
        }
    }
}

impl From<BoardSnapshot> for MemoryDevOpsSource {
    fn from(snapshot: BoardSnapshot) -> Self {
        Self {
            snapshot,
            ..Self::default()
        }
    }
}

#[async_trait]
impl DevOpsSource for MemoryDevOpsSource {
    async fn list_build_definitions(&self) -> Result<Vec<BuildDefinitionReference>> {
        self.check()?;
        Ok(self.snapshot.definitions.clone())
    }

    async fn list_builds(&self, top: Option<u32>) -> Result<Vec<Build>> {
        self.check()?;
        let limit = top.map_or(usize::MAX, |t| t as usize);
        Ok(self.snapshot.builds.iter().take(limit).cloned().collect())
    }

    async fn get_build(&self, id: BuildId) -> Result<Option<Build>> {
        self.check()?;
        Ok(self.snapshot.builds.iter().find(|b| b.id == id).cloned())
    }

    async fn list_deployments(&self) -> Result<Vec<Deployment>> {
        self.check()?;
        Ok(self.snapshot.deployments.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BuildResult, BuildStatus};

    #[tokio::test]
    async fn test_list_builds_respects_top() {
        let source = MemoryDevOpsSource::new().with_builds(vec![
            Build::new(3, BuildStatus::Completed, BuildResult::Succeeded),
            Build::new(2, BuildStatus::Completed, BuildResult::Failed),
            Build::new(1, BuildStatus::Completed, BuildResult::Canceled),
        ]);

        assert_eq!(source.list_builds(None).await.unwrap().len(), 3);
        let top = source.list_builds(Some(2)).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].id, BuildId(3));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_get_build_missing_is_none() {
        let source = MemoryDevOpsSource::new();
        assert!(source.get_build(BuildId(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failing_source_errors_everywhere() {
        let source = MemoryDevOpsSource::failing("connection refused");
        assert!(source.list_build_definitions().await.is_err());
        assert!(source.list_builds(None).await.is_err());
        assert!(source.get_build(BuildId(1)).await.is_err());
        let err = source.list_deployments().await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
        assert_eq!(source.calls(), 4);
    }
}
