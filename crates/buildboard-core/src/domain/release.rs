//! Release, deployment and approval resources.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::build::BuildId;
use super::links::Links;
use super::null_as_default;

/// Outcome of a deployment into one environment.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DeploymentStatus {
    NotDeployed,
    InProgress,
    Succeeded,
    PartiallySucceeded,
    Failed,
    All,
    #[default]
    #[serde(other)]
    Undefined,
}

/// State of a manual approval gate.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
    Reassigned,
    Canceled,
    Skipped,
    #[default]
    #[serde(other)]
    Undefined,
}

/// One entry of an artifact's definition reference map.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactSourceReference {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// An artifact linked into a release.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    #[serde(default, deserialize_with = "null_as_default")]
    pub alias: String,

    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub artifact_type: String,

    /// Keyed by reference name (`"version"`, `"definition"`, `"project"`, ...).
    #[serde(default, deserialize_with = "null_as_default")]
    pub definition_reference: HashMap<String, ArtifactSourceReference>,
}

impl Artifact {
    /// An artifact produced by the given build.
    pub fn for_build(build_id: BuildId) -> Self {
        let mut definition_reference = HashMap::new();
        definition_reference.insert(
            "version".to_string(),
            ArtifactSourceReference {
                id: build_id.to_string(),
                name: String::new(),
            },
        );
        Self {
            alias: String::new(),
            artifact_type: "Build".to_string(),
            definition_reference,
        }
    }

    /// Build id carried by the `"version"` reference.
    ///
    /// `None` when the entry is missing or its id is not a build id.
    pub fn version_build_id(&self) -> Option<BuildId> {
        self.definition_reference
            .get("version")
            .and_then(|v| BuildId::parse(&v.id))
    }
}

/// The release a deployment belongs to.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseReference {
    pub id: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub artifacts: Vec<Artifact>,

    #[serde(rename = "_links", default, deserialize_with = "null_as_default")]
    pub links: Links,
}

impl ReleaseReference {
    /// Whether any artifact of this release was produced by `build_id`.
    pub fn ships_build(&self, build_id: BuildId) -> bool {
        self.artifacts
            .iter()
            .any(|a| a.version_build_id() == Some(build_id))
    }
}

/// The environment a deployment or approval targets.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseEnvironmentReference {
    pub id: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,

    #[serde(rename = "_links", default, deserialize_with = "null_as_default")]
    pub links: Links,
}

/// A manual approval attached to a deployment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Approval {
    #[serde(default)]
    pub id: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ApprovalStatus,

    #[serde(default)]
    pub release_environment: Option<ReleaseEnvironmentReference>,
}

impl Approval {
    pub fn new(environment_id: u32, status: ApprovalStatus) -> Self {
        Self {
            id: 0,
            status,
            release_environment: Some(ReleaseEnvironmentReference {
                id: environment_id,
                ..Default::default()
            }),
        }
    }

    /// Whether this approval gates the given environment.
    pub fn targets(&self, environment_id: u32) -> bool {
        self.release_environment
            .as_ref()
            .is_some_and(|e| e.id == environment_id)
    }
}

/// One attempt to push a release into one environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub id: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub release: ReleaseReference,

    #[serde(default, deserialize_with = "null_as_default")]
    pub release_environment: ReleaseEnvironmentReference,

    #[serde(default, deserialize_with = "null_as_default")]
    pub deployment_status: DeploymentStatus,

    #[serde(default, deserialize_with = "null_as_default")]
    pub pre_deploy_approvals: Vec<Approval>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub post_deploy_approvals: Vec<Approval>,

    #[serde(default)]
    pub queued_on: Option<DateTime<Utc>>,

    #[serde(default)]
    pub started_on: Option<DateTime<Utc>>,

    #[serde(default)]
    pub completed_on: Option<DateTime<Utc>>,
}

impl Deployment {
    /// Create a deployment of `release` into `environment`.
    pub fn new(
        id: u32,
        release: ReleaseReference,
        environment: ReleaseEnvironmentReference,
        status: DeploymentStatus,
    ) -> Self {
        Self {
            id,
            release,
            release_environment: environment,
            deployment_status: status,
            pre_deploy_approvals: Vec::new(),
            post_deploy_approvals: Vec::new(),
            queued_on: None,
            started_on: None,
            completed_on: None,
        }
    }

    pub fn with_pre_deploy_approval(mut self, approval: Approval) -> Self {
        self.pre_deploy_approvals.push(approval);
        self
    }

    pub fn with_post_deploy_approval(mut self, approval: Approval) -> Self {
        self.post_deploy_approvals.push(approval);
        self
    }

    pub fn with_queued_on(mut self, queued_on: DateTime<Utc>) -> Self {
        self.queued_on = Some(queued_on);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEPLOYMENT_JSON: &str = r#"{
        "id": 311,
        "release": {
            "id": 88,
            "name": "Release-88",
            "artifacts": [
                {
                    "alias": "_web-ci",
                    "type": "Build",
                    "definitionReference": {
                        "definition": { "id": "7", "name": "web-ci" },
                        "version": { "id": "1234", "name": "20240101.3" }
                    }
                }
            ],
            "_links": { "web": { "href": "https://dev.azure.com/acme/web/_release?releaseId=88" } }
        },
        "releaseEnvironment": {
            "id": 402,
            "name": "Staging",
            "_links": { "web": { "href": "https://dev.azure.com/acme/web/_release?environmentId=402" } }
        },
        "deploymentStatus": "inProgress",
        "preDeployApprovals": [
            { "id": 1, "status": "pending", "releaseEnvironment": { "id": 402, "name": "Staging" } }
        ],
        "postDeployApprovals": [],
        "queuedOn": "2024-01-01T12:00:00Z"
    }"#;

    #[test]
    fn test_deployment_from_rest_json() {
        let dep: Deployment = serde_json::from_str(DEPLOYMENT_JSON).expect("deserialize");
        assert_eq!(dep.id, 311);
        assert_eq!(dep.release.name, "Release-88");
        assert_eq!(dep.release_environment.name, "Staging");
        assert_eq!(dep.deployment_status, DeploymentStatus::InProgress);
        assert_eq!(dep.pre_deploy_approvals.len(), 1);
        assert_eq!(dep.pre_deploy_approvals[0].status, ApprovalStatus::Pending);
        assert!(dep.pre_deploy_approvals[0].targets(402));
        assert!(dep.queued_on.is_some());
        assert!(dep.release.ships_build(BuildId(1234)));
        assert!(!dep.release.ships_build(BuildId(123)));
    }

    #[test]
    fn test_missing_nested_fields_do_not_fault() {
        let raw = r#"{
            "id": 1,
            "release": { "id": 2, "artifacts": null },
            "releaseEnvironment": { "id": 3 }
        }"#;
        let dep: Deployment = serde_json::from_str(raw).expect("deserialize sparse");
        assert_eq!(dep.deployment_status, DeploymentStatus::Undefined);
        assert!(dep.release.artifacts.is_empty());
        assert!(!dep.release.ships_build(BuildId(1)));
        assert!(dep.pre_deploy_approvals.is_empty());
    }

    #[test]
    fn test_deployment_without_release_is_kept_but_ships_nothing() {
        let raw = r#"[
            { "id": 1, "releaseEnvironment": { "id": 3, "name": "Dev" } },
            { "id": 2, "release": null, "releaseEnvironment": null, "deploymentStatus": "failed" }
        ]"#;
        let deps: Vec<Deployment> = serde_json::from_str(raw).expect("deserialize list");
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].release, ReleaseReference::default());
        assert_eq!(deps[1].deployment_status, DeploymentStatus::Failed);
        assert!(deps.iter().all(|d| !d.release.ships_build(BuildId(1))));
    }

    #[test]
    fn test_statuses_serialize_in_wire_case() {
        let json = serde_json::to_string(&[
            DeploymentStatus::PartiallySucceeded,
            DeploymentStatus::Undefined,
        ])
        .unwrap();
        assert_eq!(json, r#"["partiallySucceeded","undefined"]"#);

        let statuses: Vec<ApprovalStatus> =
            serde_json::from_str(r#"["skipped", "pending", "escalated"]"#).unwrap();
        assert_eq!(
            statuses,
            vec![
                ApprovalStatus::Skipped,
                ApprovalStatus::Pending,
                ApprovalStatus::Undefined
            ]
        );
    }

    #[test]
    fn test_artifact_without_usable_version() {
        let raw = r#"{ "definitionReference": { "definition": { "id": "7" } } }"#;
        let artifact: Artifact = serde_json::from_str(raw).unwrap();
        assert_eq!(artifact.version_build_id(), None);

        let raw = r#"{ "definitionReference": { "version": { "id": "main-abc" } } }"#;
        let artifact: Artifact = serde_json::from_str(raw).unwrap();
        assert_eq!(artifact.version_build_id(), None);

        let raw = r#"{ "definitionReference": { "version": { "name": "no id" } } }"#;
        let artifact: Artifact = serde_json::from_str(raw).unwrap();
        assert_eq!(artifact.version_build_id(), None);
    }

    #[test]
    fn test_unknown_statuses_normalize() {
        let status: DeploymentStatus = serde_json::from_str(r#""rolledBack""#).unwrap();
        assert_eq!(status, DeploymentStatus::Undefined);

        let status: ApprovalStatus = serde_json::from_str(r#""escalated""#).unwrap();
        assert_eq!(status, ApprovalStatus::Undefined);
    }

    #[test]
    fn test_artifact_for_build() {
        let artifact = Artifact::for_build(BuildId(42));
        assert_eq!(artifact.version_build_id(), Some(BuildId(42)));
    }
}
