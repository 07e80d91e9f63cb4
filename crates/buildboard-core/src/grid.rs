//! Recent-builds grid.

use serde::{Deserialize, Serialize};

use crate::domain::{Build, BuildId};
use crate::status::{resolve_build_badge, StatusBadge};

/// A column of the builds grid. `width` is in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridColumn {
    pub title: &'static str,
    pub width: usize,
}

pub const BUILD_GRID_COLUMNS: [GridColumn; 4] = [
    GridColumn {
        title: "Id",
        width: 12,
    },
    GridColumn {
        title: "Build Definition",
        width: 20,
    },
    GridColumn {
        title: "RequestedFor",
        width: 20,
    },
    GridColumn {
        title: "Status",
        width: 20,
    },
];

/// One row of the builds grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildRow {
    pub id: BuildId,
    pub definition_name: String,
    pub requested_for: String,
    pub badge: StatusBadge,
}

impl BuildRow {
    pub fn from_build(build: &Build) -> Self {
        Self {
            id: build.id,
            definition_name: build.definition_name().to_string(),
            requested_for: build.requested_for_name().to_string(),
            badge: resolve_build_badge(build.result, build.status),
        }
    }

    /// Cell values in [`BUILD_GRID_COLUMNS`] order.
    pub fn cells(&self) -> [String; 4] {
        [
            self.id.to_string(),
            self.definition_name.clone(),
            self.requested_for.clone(),
            self.badge.label.clone(),
        ]
    }
}

/// Rows for `builds`, in source order.
pub fn build_grid_rows(builds: &[Build]) -> Vec<BuildRow> {
    builds.iter().map(BuildRow::from_build).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BuildResult, BuildStatus};
    use crate::status::StatusKind;

    #[test]
    fn test_rows_preserve_order_and_fields() {
        let builds = vec![
            Build::new(12, BuildStatus::InProgress, BuildResult::None)
                .with_definition(1, "api-ci")
                .with_requested_for("Ari"),
            Build::new(11, BuildStatus::Completed, BuildResult::Failed)
                .with_definition(2, "web-ci")
                .with_requested_for("Sam"),
        ];

        let rows = build_grid_rows(&builds);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, BuildId(12));
        assert_eq!(rows[0].definition_name, "api-ci");
        assert_eq!(rows[0].badge.kind, StatusKind::Running);
        assert_eq!(rows[1].requested_for, "Sam");
        assert_eq!(rows[1].badge.label, "Fail");
    }

    #[test]
    fn test_cells_match_columns() {
        let row = BuildRow::from_build(&Build::new(
            3,
            BuildStatus::NotStarted,
            BuildResult::None,
        ));
        let cells = row.cells();
        assert_eq!(cells.len(), BUILD_GRID_COLUMNS.len());
        assert_eq!(cells[0], "3");
        assert_eq!(cells[1], "");
        assert_eq!(cells[3], "NotStarted");
    }

    #[test]
    fn test_widest_cells_fit_their_columns() {
        let id_width = u32::MAX.to_string().chars().count();
        assert!(BUILD_GRID_COLUMNS[0].width > id_width);
        let label =
            resolve_build_badge(BuildResult::PartiallySucceeded, BuildStatus::Completed).label;
        assert!(BUILD_GRID_COLUMNS[3].width > label.chars().count());
    }
}
