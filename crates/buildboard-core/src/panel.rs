//! Fetch-then-render panels.
//!
//! Each loader fetches from a [`DevOpsSource`], then runs the pure mapping
//! synchronously. A fetch error never yields an empty panel: it becomes
//! [`PanelState::FailedToLoad`] so the renderer can say so.

use serde::{Deserialize, Serialize};

use crate::domain::{BuildDefinitionReference, BuildId};
use crate::grid::{build_grid_rows, BuildRow};
use crate::obs::{emit_fetch_started, emit_panel_failed, emit_panel_loaded};
use crate::releases::{render_build_releases, AggregateOptions, BuildReleases};
use crate::source::DevOpsSource;
use crate::status::{resolve_build_badge, StatusBadge};

/// Load outcome of a panel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PanelState<T> {
    Loaded { content: T },
    FailedToLoad { reason: String },
}

impl<T> PanelState<T> {
    pub fn content(&self) -> Option<&T> {
        match self {
            PanelState::Loaded { content } => Some(content),
            PanelState::FailedToLoad { .. } => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, PanelState::Loaded { .. })
    }

    fn from_result<E: std::fmt::Display>(panel: &str, result: Result<T, E>) -> Self {
        match result {
            Ok(content) => PanelState::Loaded { content },
            Err(e) => {
                emit_panel_failed(panel, &e);
                PanelState::FailedToLoad {
                    reason: e.to_string(),
                }
            }
        }
    }
}

/// Releases that shipped one build.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReleasePanel {
    pub build_id: BuildId,
    /// Badge of the build itself; `None` when the build was not found.
    pub build_badge: Option<StatusBadge>,
    #[serde(flatten)]
    pub state: PanelState<BuildReleases>,
}

/// Recent builds grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GridPanel {
    #[serde(flatten)]
    pub state: PanelState<Vec<BuildRow>>,
}

/// Fetch a build and the project's deployments, then aggregate.
pub async fn load_release_panel(
    source: &dyn DevOpsSource,
    build_id: BuildId,
    options: &AggregateOptions,
) -> ReleasePanel {
    emit_fetch_started("releases", &format!("build {}", build_id));

    let fetched = futures::try_join!(source.get_build(build_id), source.list_deployments());
    let (build, deployments) = match fetched {
        Ok(pair) => pair,
        Err(e) => {
            return ReleasePanel {
                build_id,
                build_badge: None,
                state: PanelState::from_result("releases", Err(e)),
            };
        }
    };

    let releases = render_build_releases(build.as_ref(), &deployments, options);
    emit_panel_loaded("releases", releases.sections().len());
    ReleasePanel {
        build_id,
        build_badge: build.map(|b| resolve_build_badge(b.result, b.status)),
        state: PanelState::Loaded { content: releases },
    }
}

/// Fetch recent builds and map them to grid rows.
pub async fn load_build_grid(source: &dyn DevOpsSource, top: Option<u32>) -> GridPanel {
    emit_fetch_started("builds", "recent builds");

    let rows = source
        .list_builds(top)
        .await
        .map(|builds| build_grid_rows(&builds));
    if let Ok(rows) = &rows {
        emit_panel_loaded("builds", rows.len());
    }
    GridPanel {
        state: PanelState::from_result("builds", rows),
    }
}

/// Fetch one build as a grid row. `Loaded { content: None }` when absent.
pub async fn load_build_status(
    source: &dyn DevOpsSource,
    build_id: BuildId,
) -> PanelState<Option<BuildRow>> {
    emit_fetch_started("status", &format!("build {}", build_id));

    let row = source
        .get_build(build_id)
        .await
        .map(|build| build.as_ref().map(BuildRow::from_build));
    if let Ok(row) = &row {
        emit_panel_loaded("status", usize::from(row.is_some()));
    }
    PanelState::from_result("status", row)
}

/// Fetch the project's build definitions.
pub async fn load_definitions(
    source: &dyn DevOpsSource,
) -> PanelState<Vec<BuildDefinitionReference>> {
    emit_fetch_started("definitions", "build definitions");

    let definitions = source.list_build_definitions().await;
    if let Ok(definitions) = &definitions {
        emit_panel_loaded("definitions", definitions.len());
    }
    PanelState::from_result("definitions", definitions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::MemoryDevOpsSource;

    #[tokio::test]
    async fn test_failed_fetch_is_explicit_state() {
        let source = MemoryDevOpsSource::failing("503 from server");
        let panel = load_build_grid(&source, Some(10)).await;
        match panel.state {
            PanelState::FailedToLoad { reason } => assert!(reason.contains("503")),
            PanelState::Loaded { .. } => panic!("expected failure state"),
        }
    }

    #[tokio::test]
    async fn test_empty_grid_is_loaded_not_failed() {
        let source = MemoryDevOpsSource::new();
        let panel = load_build_grid(&source, None).await;
        assert!(panel.state.is_loaded());
        assert_eq!(panel.state.content().map(Vec::len), Some(0));
    }

    #[test]
    fn test_panel_state_serialization() {
        let state: PanelState<Vec<u32>> = PanelState::FailedToLoad {
            reason: "timeout".to_string(),
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["state"], "failed_to_load");
        assert_eq!(json["reason"], "timeout");
    }
}
