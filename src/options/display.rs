use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::render::{StyleSpec, SurfaceKind, SurfaceStyle};

/// Line width for the line display style, in pixels.
const LINE_WIDTH: f32 = 1.0;

/// Stick radius for the stick display style, in Angstroms. Narrower than
/// the ligand presentation so the two never collide.
const PROTEIN_STICK_RADIUS: f32 = 0.15;

/// How the protein backbone is rendered.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Default,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStyle {
    /// Ribbon cartoon colored by a spectrum gradient across the chain.
    #[default]
    Cartoon,
    /// Thin wireframe lines.
    Line,
    /// Cylinder sticks.
    Stick,
}

impl DisplayStyle {
    /// Every selectable style, in UI order.
    pub const ALL: [Self; 3] = [Self::Cartoon, Self::Line, Self::Stick];

    /// The renderer style descriptor for the base structure model.
    ///
    /// Each style maps to a distinct descriptor; none overlap.
    #[must_use]
    pub fn protein_style(self) -> StyleSpec {
        match self {
            Self::Cartoon => StyleSpec::Cartoon { spectrum: true },
            Self::Line => StyleSpec::Line { width: LINE_WIDTH },
            Self::Stick => StyleSpec::Stick {
                radius: PROTEIN_STICK_RADIUS,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Display", inline)]
#[serde(default)]
/// Display style and surface overlay settings.
pub struct DisplayOptions {
    /// Protein display style.
    #[schemars(title = "Display Style")]
    pub style: DisplayStyle,
    /// Whether to overlay a molecular surface on the structure.
    #[schemars(title = "Show Surface")]
    pub show_surface: bool,
    /// Surface overlay opacity (0 transparent, 1 opaque).
    #[schemars(title = "Surface Opacity")]
    pub surface_opacity: f32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            style: DisplayStyle::default(),
            show_surface: false,
            surface_opacity: 0.7,
        }
    }
}

impl DisplayOptions {
    /// Surface overlay parameters, when the surface is enabled.
    #[must_use]
    pub fn surface_overlay(&self) -> Option<(SurfaceKind, SurfaceStyle)> {
        self.show_surface.then(|| {
            (
                SurfaceKind::VanDerWaals,
                SurfaceStyle {
                    opacity: self.surface_opacity,
                },
            )
        })
    }
}
