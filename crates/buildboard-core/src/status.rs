//! Status resolution: build and deployment enums to display badges.
//!
//! Both resolvers are total. Any value without a dedicated arm falls back to
//! the "NA" badge (queued kind, light gray).

use serde::{Deserialize, Serialize};

use crate::domain::{BuildResult, BuildStatus, DeploymentStatus};

/// An RGB background color.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// `#rrggbb` form.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

pub const LIGHT_GREEN: Rgb = Rgb::new(204, 255, 204);
pub const LIGHT_RED: Rgb = Rgb::new(255, 204, 204);
pub const LIGHT_BLUE: Rgb = Rgb::new(204, 229, 255);
pub const LIGHT_ORANGE: Rgb = Rgb::new(255, 229, 204);
pub const LIGHT_GRAY: Rgb = Rgb::new(224, 224, 224);

/// Semantic kind of a status indicator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Success,
    Failed,
    Warning,
    Running,
    Queued,
    Waiting,
    Canceled,
    None,
}

impl StatusKind {
    /// Background color for badges of this kind.
    pub fn color(self) -> Rgb {
        match self {
            StatusKind::Success => LIGHT_GREEN,
            StatusKind::Failed => LIGHT_RED,
            StatusKind::Warning => LIGHT_ORANGE,
            StatusKind::Running => LIGHT_BLUE,
            StatusKind::Queued | StatusKind::Waiting | StatusKind::Canceled | StatusKind::None => {
                LIGHT_GRAY
            }
        }
    }

    /// Single-glyph marker for plain-text output.
    pub fn glyph(self) -> &'static str {
        match self {
            StatusKind::Success => "✔",
            StatusKind::Failed => "✘",
            StatusKind::Warning => "!",
            StatusKind::Running => "▶",
            StatusKind::Queued => "…",
            StatusKind::Waiting => "◷",
            StatusKind::Canceled => "⊘",
            StatusKind::None => "·",
        }
    }
}

/// Display descriptor for one status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusBadge {
    pub label: String,
    pub aria_label: String,
    pub kind: StatusKind,
    pub color: Rgb,
}

impl StatusBadge {
    fn new(label: &str, aria_label: &str, kind: StatusKind) -> Self {
        Self {
            label: label.to_string(),
            aria_label: aria_label.to_string(),
            kind,
            color: kind.color(),
        }
    }

    /// The fallback badge for values with no dedicated mapping.
    pub fn not_available() -> Self {
        Self::new("NA", "None", StatusKind::Queued)
    }
}

/// Resolve the badge for a deployment status.
pub fn resolve_deployment_badge(status: DeploymentStatus) -> StatusBadge {
    match status {
        DeploymentStatus::NotDeployed => {
            StatusBadge::new("Not Deployed", "Canceled", StatusKind::Canceled)
        }
        DeploymentStatus::Succeeded => StatusBadge::new("Success", "Success", StatusKind::Success),
        DeploymentStatus::Failed => StatusBadge::new("Fail", "Fail", StatusKind::Failed),
        DeploymentStatus::PartiallySucceeded => StatusBadge::new(
            "PartiallySucceeded",
            "PartiallySucceeded",
            StatusKind::Warning,
        ),
        DeploymentStatus::InProgress => {
            StatusBadge::new("In Progress", "InProgress", StatusKind::Running)
        }
        DeploymentStatus::Undefined | DeploymentStatus::All => StatusBadge::not_available(),
    }
}

/// Resolve the badge for a build.
///
/// `result` wins whenever it is set; `state` only decides while the result
/// is still `None`.
pub fn resolve_build_badge(result: BuildResult, state: BuildStatus) -> StatusBadge {
    match result {
        BuildResult::Canceled => StatusBadge::new("Canceled", "Canceled", StatusKind::Canceled),
        BuildResult::Succeeded => StatusBadge::new("Success", "Success", StatusKind::Success),
        BuildResult::Failed => StatusBadge::new("Fail", "Fail", StatusKind::Failed),
        BuildResult::PartiallySucceeded => StatusBadge::new(
            "PartiallySucceeded",
            "PartiallySucceeded",
            StatusKind::Warning,
        ),
        BuildResult::None => resolve_build_state(state),
    }
}

fn resolve_build_state(state: BuildStatus) -> StatusBadge {
    match state {
        BuildStatus::Cancelling => {
            StatusBadge::new("Cancelling", "Cancelling", StatusKind::Canceled)
        }
        BuildStatus::Completed => StatusBadge::new("Completed", "Completed", StatusKind::Success),
        BuildStatus::NotStarted => {
            StatusBadge::new("NotStarted", "Not Started", StatusKind::Waiting)
        }
        BuildStatus::InProgress => {
            StatusBadge::new("InProgress", "InProgress", StatusKind::Running)
        }
        BuildStatus::Postponed => StatusBadge::new("Postponed", "Postponed", StatusKind::Queued),
        BuildStatus::None | BuildStatus::All => StatusBadge::not_available(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_DEPLOYMENT_STATUSES: [DeploymentStatus; 7] = [
        DeploymentStatus::Undefined,
        DeploymentStatus::NotDeployed,
        DeploymentStatus::InProgress,
        DeploymentStatus::Succeeded,
        DeploymentStatus::PartiallySucceeded,
        DeploymentStatus::Failed,
        DeploymentStatus::All,
    ];

    const ALL_RESULTS: [BuildResult; 5] = [
        BuildResult::None,
        BuildResult::Succeeded,
        BuildResult::PartiallySucceeded,
        BuildResult::Failed,
        BuildResult::Canceled,
    ];

    const ALL_STATES: [BuildStatus; 7] = [
        BuildStatus::None,
        BuildStatus::InProgress,
        BuildStatus::Completed,
        BuildStatus::Cancelling,
        BuildStatus::Postponed,
        BuildStatus::NotStarted,
        BuildStatus::All,
    ];

    fn row(badge: &StatusBadge) -> (&str, StatusKind, Rgb) {
        (badge.label.as_str(), badge.kind, badge.color)
    }

    #[test]
    fn test_deployment_table() {
        let cases = [
            (
                DeploymentStatus::NotDeployed,
                ("Not Deployed", StatusKind::Canceled, LIGHT_GRAY),
            ),
            (
                DeploymentStatus::Succeeded,
                ("Success", StatusKind::Success, LIGHT_GREEN),
            ),
            (
                DeploymentStatus::Failed,
                ("Fail", StatusKind::Failed, LIGHT_RED),
            ),
            (
                DeploymentStatus::PartiallySucceeded,
                ("PartiallySucceeded", StatusKind::Warning, LIGHT_ORANGE),
            ),
            (
                DeploymentStatus::InProgress,
                ("In Progress", StatusKind::Running, LIGHT_BLUE),
            ),
            (
                DeploymentStatus::Undefined,
                ("NA", StatusKind::Queued, LIGHT_GRAY),
            ),
            (DeploymentStatus::All, ("NA", StatusKind::Queued, LIGHT_GRAY)),
        ];

        for (status, expected) in cases {
            let badge = resolve_deployment_badge(status);
            assert_eq!(row(&badge), expected, "status {:?}", status);
        }
    }

    #[test]
    fn test_absent_deployment_status_is_default_row() {
        let status: DeploymentStatus = serde_json::from_str("null")
            .map(|s: Option<DeploymentStatus>| s.unwrap_or_default())
            .unwrap();
        assert_eq!(resolve_deployment_badge(status), StatusBadge::not_available());
    }

    #[test]
    fn test_every_deployment_status_has_one_badge() {
        for status in ALL_DEPLOYMENT_STATUSES {
            let badge = resolve_deployment_badge(status);
            assert!(!badge.label.is_empty());
            assert_eq!(badge.color, badge.kind.color());
        }
    }

    #[test]
    fn test_result_takes_precedence_over_state() {
        for result in ALL_RESULTS {
            if result == BuildResult::None {
                continue;
            }
            let expected = resolve_build_badge(result, BuildStatus::None);
            for state in ALL_STATES {
                assert_eq!(
                    resolve_build_badge(result, state),
                    expected,
                    "result {:?} state {:?}",
                    result,
                    state
                );
            }
        }
    }

    #[test]
    fn test_build_result_table() {
        let cases = [
            (BuildResult::Canceled, ("Canceled", StatusKind::Canceled)),
            (BuildResult::Succeeded, ("Success", StatusKind::Success)),
            (BuildResult::Failed, ("Fail", StatusKind::Failed)),
            (
                BuildResult::PartiallySucceeded,
                ("PartiallySucceeded", StatusKind::Warning),
            ),
        ];
        for (result, (label, kind)) in cases {
            let badge = resolve_build_badge(result, BuildStatus::InProgress);
            assert_eq!(badge.label, label);
            assert_eq!(badge.kind, kind);
        }
    }

    #[test]
    fn test_state_consulted_when_result_none() {
        let cases = [
            (BuildStatus::Cancelling, ("Cancelling", StatusKind::Canceled)),
            (BuildStatus::Completed, ("Completed", StatusKind::Success)),
            (BuildStatus::NotStarted, ("NotStarted", StatusKind::Waiting)),
            (BuildStatus::InProgress, ("InProgress", StatusKind::Running)),
            (BuildStatus::Postponed, ("Postponed", StatusKind::Queued)),
        ];
        for (state, (label, kind)) in cases {
            let badge = resolve_build_badge(BuildResult::None, state);
            assert_eq!(badge.label, label);
            assert_eq!(badge.kind, kind);
        }
    }

    #[test]
    fn test_unmatched_state_is_default_row() {
        for state in [BuildStatus::None, BuildStatus::All] {
            let badge = resolve_build_badge(BuildResult::None, state);
            assert_eq!(row(&badge), ("NA", StatusKind::Queued, LIGHT_GRAY));
        }
    }

    #[test]
    fn test_not_started_aria_label() {
        let badge = resolve_build_badge(BuildResult::None, BuildStatus::NotStarted);
        assert_eq!(badge.aria_label, "Not Started");
    }

    #[test]
    fn test_rgb_hex() {
        assert_eq!(LIGHT_BLUE.hex(), "#cce5ff");
        assert_eq!(LIGHT_GRAY.hex(), "#e0e0e0");
    }
}
