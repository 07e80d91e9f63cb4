//! Offline board snapshots.
//!
//! A snapshot is one JSON document holding everything a render cycle needs,
//! in the same wire shape the REST API returns.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{Build, BuildDefinitionReference, Deployment, Result};
use crate::obs::emit_fetch_started;
use crate::source::DevOpsSource;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BoardSnapshot {
    #[serde(default)]
    pub definitions: Vec<BuildDefinitionReference>,
    #[serde(default)]
    pub builds: Vec<Build>,
    #[serde(default)]
    pub deployments: Vec<Deployment>,
}

impl BoardSnapshot {
    /// Read a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the snapshot as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Fetch everything the panels read from `source`, keeping at most
    /// `top` builds.
    pub async fn capture(source: &dyn DevOpsSource, top: Option<u32>) -> Result<Self> {
        emit_fetch_started("snapshot", "definitions, builds, deployments");
        let (definitions, builds, deployments) = futures::try_join!(
            source.list_build_definitions(),
            source.list_builds(top),
            source.list_deployments()
        )?;
        Ok(BoardSnapshot {
            definitions,
            builds,
            deployments,
        })
    }
}
