//! Presentation shell: the snapshot/action bridge between the session and
//! a host UI.
//!
//! The shell owns no state. A host renders one serializable
//! [`ShellSnapshot`] per tick and feeds user interaction back as
//! [`ShellAction`]s; both sides of the bridge are plain serde types so
//! they cross an IPC boundary (webview, socket) unchanged.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::LigviewError;
use crate::manifest::LigandId;
use crate::options::DisplayStyle;
use crate::session::ViewerSession;

/// User interaction forwarded from the host UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShellAction {
    /// Select a ligand by its list index.
    SelectLigand {
        /// Index into the ligand list.
        index: usize,
    },
    /// Switch the protein display style.
    SetStyle {
        /// Style to apply.
        style: DisplayStyle,
    },
    /// Save the selected ligand's chemical file into `dir`.
    Download {
        /// Target directory for the download.
        dir: PathBuf,
    },
    /// The display surface changed geometry.
    Resize {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },
}

/// One row of the ligand list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LigandRow {
    /// Display name.
    pub name: String,
    /// Whether this row is the active selection.
    pub selected: bool,
}

/// One row of the statistics panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatRow {
    /// Statistic key.
    pub key: String,
    /// Displayable value.
    pub value: String,
}

/// Serializable UI state for one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShellSnapshot {
    /// Ligand list in manifest order.
    pub ligands: Vec<LigandRow>,
    /// Active display style.
    pub style: DisplayStyle,
    /// Selectable style choices, in UI order.
    pub styles: Vec<DisplayStyle>,
    /// Statistics of the displayed ligand; absent when nothing is
    /// selected.
    pub statistics: Option<Vec<StatRow>>,
    /// Whether a fetch is in flight.
    pub is_loading: bool,
    /// User-visible error, if any.
    pub error: Option<String>,
    /// Whether the download action is available.
    pub can_download: bool,
}

/// Build the current UI snapshot from the session.
#[must_use]
pub fn snapshot(session: &ViewerSession) -> ShellSnapshot {
    let state = session.state();
    let ligands = session
        .manifest()
        .map(|manifest| {
            manifest
                .ligands
                .iter()
                .enumerate()
                .map(|(index, ligand)| LigandRow {
                    name: ligand.name.clone(),
                    selected: state.selected == Some(LigandId(index)),
                })
                .collect()
        })
        .unwrap_or_default();
    let statistics = state.selected.map(|_| {
        session
            .statistics()
            .iter()
            .map(|(key, value)| StatRow {
                key: key.clone(),
                value: value.clone(),
            })
            .collect()
    });

    ShellSnapshot {
        ligands,
        style: state.display_style,
        styles: DisplayStyle::ALL.to_vec(),
        statistics,
        is_loading: state.is_loading,
        error: state.error.clone(),
        can_download: session.has_chemical(),
    }
}

/// Apply a host UI action to the session.
///
/// Returns the written path for a download action, `None` otherwise.
///
/// # Errors
///
/// Returns [`LigviewError::UnknownLigand`] for an out-of-range selection,
/// [`LigviewError::DownloadUnavailable`] when no chemical file is loaded,
/// and [`LigviewError::Io`] if the download cannot be written.
pub fn apply_action(
    session: &mut ViewerSession,
    action: ShellAction,
) -> Result<Option<PathBuf>, LigviewError> {
    match action {
        ShellAction::SelectLigand { index } => {
            session.select_ligand(LigandId(index))?;
            Ok(None)
        }
        ShellAction::SetStyle { style } => {
            session.set_display_style(style);
            Ok(None)
        }
        ShellAction::Download { dir } => {
            let payload = session
                .download_payload()
                .ok_or(LigviewError::DownloadUnavailable)?;
            let path = payload.write_to_dir(&dir)?;
            log::info!("saved {}", path.display());
            Ok(Some(path))
        }
        ShellAction::Resize { width, height } => {
            session.resize(width, height);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_round_trip_through_json() {
        let action = ShellAction::SelectLigand { index: 2 };
        let json = serde_json::to_string(&action).unwrap();
        assert_eq!(json, r#"{"type":"select_ligand","index":2}"#);
        let parsed: ShellAction = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, action);
    }

    #[test]
    fn style_action_uses_snake_case_names() {
        let parsed: ShellAction = serde_json::from_str(
            r#"{"type":"set_style","style":"stick"}"#,
        )
        .unwrap();
        assert_eq!(
            parsed,
            ShellAction::SetStyle {
                style: DisplayStyle::Stick
            }
        );
    }
}
