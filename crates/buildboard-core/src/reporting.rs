//! Text and markdown rendering of loaded panels.

use std::path::Path;

use crate::domain::{BuildDefinitionReference, BuildId, Result};
use crate::grid::{BuildRow, BUILD_GRID_COLUMNS};
use crate::panel::{GridPanel, PanelState, ReleasePanel};
use crate::releases::{BuildReleases, EnvironmentPill};
use crate::status::StatusBadge;

const NOT_DEPLOYED: &str = "Not deployed yet";

fn failed_line(reason: &str) -> String {
    format!("Failed to load: {}\n", reason)
}

fn badge_text(badge: &StatusBadge) -> String {
    format!("{} {}", badge.label, badge.color.hex())
}

fn pill_text(pill: &EnvironmentPill) -> String {
    let mut line = format!(
        "  {} {} [{}]",
        pill.badge.kind.glyph(),
        pill.environment_name,
        badge_text(&pill.badge)
    );
    if let Some(icon) = pill.approval {
        line.push_str(&format!(" ({} approval pending)", icon.name()));
    }
    if let Some(link) = &pill.web_link {
        line.push_str(&format!("  {}", link));
    }
    line.push('\n');
    line
}

/// Render the release panel as plain text.
pub fn render_release_text(panel: &ReleasePanel) -> String {
    let mut out = String::new();
    match &panel.build_badge {
        Some(badge) => out.push_str(&format!(
            "Build {} [{}]\n",
            panel.build_id,
            badge_text(badge)
        )),
        None => out.push_str(&format!("Build {}\n", panel.build_id)),
    }

    match &panel.state {
        PanelState::FailedToLoad { reason } => out.push_str(&failed_line(reason)),
        PanelState::Loaded {
            content: BuildReleases::NotDeployed,
        } => {
            out.push_str(NOT_DEPLOYED);
            out.push('\n');
        }
        PanelState::Loaded {
            content: BuildReleases::Releases(sections),
        } => {
            for section in sections {
                out.push('\n');
                match &section.web_link {
                    Some(link) => {
                        out.push_str(&format!("{}  {}\n", section.release_name, link))
                    }
                    None => out.push_str(&format!("{}\n", section.release_name)),
                }
                for pill in &section.environments {
                    out.push_str(&pill_text(pill));
                }
            }
        }
    }
    out
}

/// Render the release panel as markdown for PR comments or wiki pages.
pub fn render_release_markdown(panel: &ReleasePanel) -> String {
    let mut out = format!("# Build {}\n\n", panel.build_id);
    if let Some(badge) = &panel.build_badge {
        out.push_str(&format!("**Status:** {}\n\n", badge.label));
    }

    match &panel.state {
        PanelState::FailedToLoad { reason } => {
            out.push_str(&format!("> {}", failed_line(reason)));
        }
        PanelState::Loaded {
            content: BuildReleases::NotDeployed,
        } => {
            out.push_str(&format!("_{}_\n", NOT_DEPLOYED));
        }
        PanelState::Loaded {
            content: BuildReleases::Releases(sections),
        } => {
            for section in sections {
                match &section.web_link {
                    Some(link) => {
                        out.push_str(&format!("## [{}]({})\n\n", section.release_name, link))
                    }
                    None => out.push_str(&format!("## {}\n\n", section.release_name)),
                }
                for pill in &section.environments {
                    let name = match &pill.web_link {
                        Some(link) => format!("[{}]({})", pill.environment_name, link),
                        None => pill.environment_name.clone(),
                    };
                    out.push_str(&format!(
                        "- {} **{}** · {}",
                        pill.badge.kind.glyph(),
                        name,
                        pill.badge.label
                    ));
                    if pill.approval.is_some() {
                        out.push_str(" · approval pending");
                    }
                    out.push('\n');
                }
                out.push('\n');
            }
        }
    }
    out
}

fn fit(cell: &str, width: usize) -> String {
    let count = cell.chars().count();
    if count < width {
        format!("{}{}", cell, " ".repeat(width - count))
    } else {
        let kept: String = cell.chars().take(width.saturating_sub(2)).collect();
        format!("{}… ", kept)
    }
}

// Ids and status labels are shown whole; the name columns are clipped.
fn grid_line(cells: &[String]) -> String {
    let mut line = String::new();
    for (index, (cell, column)) in cells.iter().zip(BUILD_GRID_COLUMNS.iter()).enumerate() {
        let clip = index != 0 && index + 1 != BUILD_GRID_COLUMNS.len();
        if clip {
            line.push_str(&fit(cell, column.width));
        } else {
            let pad = column.width.saturating_sub(cell.chars().count()).max(1);
            line.push_str(cell);
            line.push_str(&" ".repeat(pad));
        }
    }
    line.truncate(line.trim_end().len());
    line.push('\n');
    line
}

fn render_rows(rows: &[BuildRow]) -> String {
    let header: Vec<String> = BUILD_GRID_COLUMNS
        .iter()
        .map(|c| c.title.to_string())
        .collect();
    let mut out = grid_line(&header);
    let total: usize = BUILD_GRID_COLUMNS.iter().map(|c| c.width).sum();
    out.push_str(&"-".repeat(total));
    out.push('\n');
    for row in rows {
        out.push_str(&grid_line(&row.cells()));
    }
    out
}

/// Render the recent builds grid as a fixed-width table.
pub fn render_grid_text(panel: &GridPanel) -> String {
    match &panel.state {
        PanelState::FailedToLoad { reason } => failed_line(reason),
        PanelState::Loaded { content } => render_rows(content),
    }
}

/// Render a single build status.
pub fn render_status_text(build_id: BuildId, state: &PanelState<Option<BuildRow>>) -> String {
    match state {
        PanelState::FailedToLoad { reason } => failed_line(reason),
        PanelState::Loaded { content: None } => format!("Build {} not found\n", build_id),
        PanelState::Loaded {
            content: Some(row),
        } => format!(
            "{} Build {} {} [{}] requested for {}\n",
            row.badge.kind.glyph(),
            row.id,
            row.definition_name,
            badge_text(&row.badge),
            row.requested_for
        ),
    }
}

/// Render the build definitions list.
pub fn render_definitions_text(state: &PanelState<Vec<BuildDefinitionReference>>) -> String {
    match state {
        PanelState::FailedToLoad { reason } => failed_line(reason),
        PanelState::Loaded { content } => {
            let mut out = format!("Loaded {} build definition(s)\n", content.len());
            for definition in content {
                out.push_str(&format!("  {:>6}  {}\n", definition.id, definition.name));
            }
            out
        }
    }
}

/// Write rendered output to `path`.
pub fn write_report(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)?;
    Ok(())
}
