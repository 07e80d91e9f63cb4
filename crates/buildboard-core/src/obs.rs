//! Structured observability hooks for panel loads.
//!
//! Every panel load emits `panel.fetch_started` followed by exactly one of
//! `panel.loaded` or `panel.failed`. Filter with `RUST_LOG=buildboard_core=info`.

use tracing::{info, warn};

/// Emit event: a panel began fetching its data.
pub fn emit_fetch_started(panel: &str, subject: &str) {
    info!(event = "panel.fetch_started", panel = %panel, subject = %subject);
}

/// Emit event: a panel rendered `items` entries (sections, rows, definitions).
pub fn emit_panel_loaded(panel: &str, items: usize) {
    info!(event = "panel.loaded", panel = %panel, items = items);
}

/// Emit event: a panel could not load its data (warning level).
pub fn emit_panel_failed(panel: &str, error: &dyn std::fmt::Display) {
    warn!(event = "panel.failed", panel = %panel, error = %error);
}
