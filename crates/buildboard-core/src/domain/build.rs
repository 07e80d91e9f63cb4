//! Build resources.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::links::Links;
use super::null_as_default;

/// Identifier of a build run.
///
/// Artifact version references carry build ids as strings; parsing them
/// into a `BuildId` keeps correlation a typed comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildId(pub u32);

impl BuildId {
    /// Parse an id as carried in an artifact version reference.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse().ok().map(BuildId)
    }
}

impl std::fmt::Display for BuildId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of a build once it has finished.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum BuildResult {
    Succeeded,
    PartiallySucceeded,
    Failed,
    Canceled,
    #[default]
    #[serde(other)]
    None,
}

/// Lifecycle phase of a build.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum BuildStatus {
    InProgress,
    Completed,
    Cancelling,
    Postponed,
    NotStarted,
    All,
    #[default]
    #[serde(other)]
    None,
}

/// Reference to the pipeline definition a build ran.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionReference {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
}

/// A user reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRef {
    #[serde(default)]
    pub display_name: String,
}

/// A build run as returned by the builds endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    pub id: BuildId,

    #[serde(default)]
    pub build_number: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub status: BuildStatus,

    #[serde(default, deserialize_with = "null_as_default")]
    pub result: BuildResult,

    #[serde(default)]
    pub definition: Option<DefinitionReference>,

    #[serde(default)]
    pub requested_for: Option<IdentityRef>,

    #[serde(default)]
    pub queue_time: Option<DateTime<Utc>>,

    #[serde(default)]
    pub finish_time: Option<DateTime<Utc>>,

    #[serde(rename = "_links", default, deserialize_with = "null_as_default")]
    pub links: Links,
}

impl Build {
    /// Create a build with only an id, status and result set.
    pub fn new(id: u32, status: BuildStatus, result: BuildResult) -> Self {
        Self {
            id: BuildId(id),
            build_number: String::new(),
            status,
            result,
            definition: None,
            requested_for: None,
            queue_time: None,
            finish_time: None,
            links: Links::default(),
        }
    }

    pub fn with_definition(mut self, id: u32, name: &str) -> Self {
        self.definition = Some(DefinitionReference {
            id,
            name: name.to_string(),
        });
        self
    }

    pub fn with_requested_for(mut self, display_name: &str) -> Self {
        self.requested_for = Some(IdentityRef {
            display_name: display_name.to_string(),
        });
        self
    }

    /// Name of the definition, empty when the reference is missing.
    pub fn definition_name(&self) -> &str {
        self.definition
            .as_ref()
            .map(|d| d.name.as_str())
            .unwrap_or_default()
    }

    /// Display name of the requester, empty when the reference is missing.
    pub fn requested_for_name(&self) -> &str {
        self.requested_for
            .as_ref()
            .map(|r| r.display_name.as_str())
            .unwrap_or_default()
    }
}

/// A build pipeline definition as listed by the definitions endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BuildDefinitionReference {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
}
