//! Centralized viewer options with TOML preset support.
//!
//! All tweakable settings (display style, surface overlay, viewer surface)
//! are consolidated here. Options serialize to/from TOML for presets, and
//! expose a JSON Schema so a host UI can render the options panel without
//! hand-written forms.

mod display;
mod viewer;

use std::path::Path;

pub use display::{DisplayOptions, DisplayStyle};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use viewer::ViewerOptions;

use crate::error::LigviewError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[display]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Display style and surface overlay settings.
    pub display: DisplayOptions,
    /// Display-surface settings.
    pub viewer: ViewerOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`LigviewError::Io`] if the file cannot be read and
    /// [`LigviewError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, LigviewError> {
        let content = std::fs::read_to_string(path).map_err(LigviewError::Io)?;
        toml::from_str(&content)
            .map_err(|e| LigviewError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`LigviewError::OptionsParse`] on serialization failure and
    /// [`LigviewError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), LigviewError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| LigviewError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(LigviewError::Io)?;
        }
        std::fs::write(path, content).map_err(LigviewError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[display]
style = "stick"
"#;
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.display.style, DisplayStyle::Stick);
        // Everything else should be default
        assert!(!opts.display.show_surface);
        assert_eq!(opts.viewer.background, "white");
    }

    #[test]
    fn style_names_are_snake_case_on_the_wire() {
        let opts: Options =
            toml::from_str("[display]\nstyle = \"cartoon\"").unwrap();
        assert_eq!(opts.display.style, DisplayStyle::Cartoon);
        assert_eq!(
            serde_json::to_value(DisplayStyle::Line).unwrap(),
            serde_json::json!("line")
        );
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();
        assert!(props.contains_key("display"));
        assert!(props.contains_key("viewer"));
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets/default.toml");
        let mut opts = Options::default();
        opts.display.show_surface = true;
        opts.save(&path).unwrap();
        let loaded = Options::load(&path).unwrap();
        assert_eq!(opts, loaded);
    }
}
