//! Domain models for buildboard.
//!
//! Wire-compatible snapshots of the DevOps REST resources the board reads:
//! - `Build`: one execution of a pipeline definition
//! - `Deployment`: one attempt to push a release into an environment
//! - `Approval`: a manual gate before or after a deployment

pub mod build;
pub mod error;
pub mod links;
pub mod release;

use serde::{Deserialize, Deserializer};

pub use build::{
    Build, BuildDefinitionReference, BuildId, BuildResult, BuildStatus, DefinitionReference,
    IdentityRef,
};
pub use error::{BoardError, Result};
pub use links::{Link, Links};
pub use release::{
    Approval, ApprovalStatus, Artifact, ArtifactSourceReference, Deployment, DeploymentStatus,
    ReleaseEnvironmentReference, ReleaseReference,
};

/// Treat an explicit JSON `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
