use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::render::ViewOptions;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Viewer", inline)]
#[serde(default)]
/// Display-surface settings for the render view.
pub struct ViewerOptions {
    /// Background color name or hex string.
    #[schemars(title = "Background")]
    pub background: String,
    /// Initial surface width in pixels.
    #[schemars(title = "Width")]
    pub width: u32,
    /// Initial surface height in pixels.
    #[schemars(title = "Height")]
    pub height: u32,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            background: "white".to_owned(),
            width: 1280,
            height: 720,
        }
    }
}

impl ViewerOptions {
    /// View-creation parameters for the renderer backend.
    #[must_use]
    pub fn to_view_options(&self) -> ViewOptions {
        ViewOptions {
            background: self.background.clone(),
            width: self.width,
            height: self.height,
        }
    }
}
