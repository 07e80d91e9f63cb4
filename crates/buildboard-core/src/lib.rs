//! buildboard core library
//!
//! Status badges for CI builds and release deployments:
//! - `status`: build/deployment enums to label, kind and color
//! - `releases`: which releases shipped a build, latest deployment per environment
//! - `approval`: pending-approval annotation
//! - `grid`: recent builds table
//! - `panel`: fetch-then-render loaders over a `DevOpsSource`

pub mod approval;
pub mod client;
pub mod domain;
pub mod fakes;
pub mod grid;
pub mod obs;
pub mod panel;
pub mod releases;
pub mod reporting;
pub mod snapshot;
pub mod source;
pub mod status;
pub mod telemetry;

pub use domain::{
    Approval, ApprovalStatus, Artifact, ArtifactSourceReference, BoardError, Build,
    BuildDefinitionReference, BuildId, BuildResult, BuildStatus, Deployment, DeploymentStatus,
    ReleaseEnvironmentReference, ReleaseReference, Result,
};

pub use approval::{approval_icon, ApprovalIcon};
pub use client::{AzureDevOpsClient, DevOpsConfig};
pub use fakes::MemoryDevOpsSource;
pub use grid::{build_grid_rows, BuildRow, GridColumn, BUILD_GRID_COLUMNS};
pub use panel::{
    load_build_grid, load_build_status, load_definitions, load_release_panel, GridPanel,
    PanelState, ReleasePanel,
};
pub use releases::{
    render_build_releases, AggregateOptions, BuildReleases, EnvironmentPill, LatestRule,
    ReleaseSection,
};
pub use reporting::{
    render_definitions_text, render_grid_text, render_release_markdown, render_release_text,
    render_status_text, write_report,
};
pub use snapshot::BoardSnapshot;
pub use source::DevOpsSource;
pub use status::{resolve_build_badge, resolve_deployment_badge, Rgb, StatusBadge, StatusKind};
pub use telemetry::{init_tracing, LogFormat};

/// buildboard version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
