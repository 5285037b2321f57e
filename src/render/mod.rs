//! Renderer capability interface.
//!
//! All 3D drawing is delegated to an external molecular renderer. This
//! module defines the narrow surface the viewer core drives (model
//! loading, styling, surface overlays, camera fit) plus [`ViewSlot`], the
//! single owner of the live view instance.
//!
//! The core never inspects model content; raw file text flows straight
//! through [`RenderView::add_model`] with a format tag.

pub mod headless;

use crate::error::LigviewError;

/// Format tag attached to raw model content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    /// Protein structure file.
    Pdb,
    /// Chemical (structure-data) file.
    Sdf,
}

impl ModelFormat {
    /// Wire tag understood by the renderer's model loader.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pdb => "pdb",
            Self::Sdf => "sdf",
        }
    }
}

/// Which models a style or camera operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// Every loaded model.
    All,
    /// A single model by index.
    Model(usize),
}

/// Style descriptor consumed by the renderer.
///
/// Each descriptor is distinct; the display styles map onto them with no
/// overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StyleSpec {
    /// Ribbon cartoon.
    Cartoon {
        /// Color by a spectrum gradient across the chain.
        spectrum: bool,
    },
    /// Thin wireframe lines.
    Line {
        /// Line width in pixels.
        width: f32,
    },
    /// Cylinder sticks.
    Stick {
        /// Cylinder radius in Angstroms.
        radius: f32,
    },
    /// Ball-and-stick (the ligand presentation).
    BallAndStick {
        /// Cylinder radius in Angstroms.
        radius: f32,
    },
}

/// Fixed stick radius for the ligand's ball-and-stick presentation.
pub const LIGAND_STICK_RADIUS: f32 = 0.2;

/// Style descriptor for the ligand model, distinct from every base style.
#[must_use]
pub fn ligand_style() -> StyleSpec {
    StyleSpec::BallAndStick {
        radius: LIGAND_STICK_RADIUS,
    }
}

/// Surface overlay kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Van der Waals surface.
    VanDerWaals,
    /// Solvent-accessible surface.
    SolventAccessible,
}

/// Surface overlay parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceStyle {
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
}

/// Parameters for creating a view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewOptions {
    /// Background color name or hex string.
    pub background: String,
    /// Initial surface width in pixels.
    pub width: u32,
    /// Initial surface height in pixels.
    pub height: u32,
}

/// The renderer's view instance behind an object-safe capability trait.
///
/// Exactly one lives per session while a structure is displayed; dropping
/// the box is the renderer's `destroy`.
pub trait RenderView {
    /// Load raw model content, returning the new model's index.
    fn add_model(&mut self, content: &str, format: ModelFormat) -> usize;
    /// Remove one model by index.
    fn remove_model(&mut self, index: usize);
    /// Remove every loaded model.
    fn remove_all_models(&mut self);
    /// Apply a style descriptor to the selected models.
    fn set_style(&mut self, selector: Selector, style: &StyleSpec);
    /// Add a surface overlay over the current models.
    fn add_surface(&mut self, kind: SurfaceKind, style: &SurfaceStyle);
    /// Fit the camera to the selection, or to everything when `None`.
    fn zoom_to(&mut self, selector: Option<Selector>);
    /// Commit pending scene changes to the screen.
    fn render(&mut self);
    /// Resize the display surface.
    fn resize(&mut self, width: u32, height: u32);
}

/// Creates render views bound to a display surface.
pub trait ViewFactory {
    /// Create a new view.
    ///
    /// # Errors
    ///
    /// Returns [`LigviewError::View`] if the backend cannot create a view.
    fn create_view(
        &mut self,
        options: &ViewOptions,
    ) -> Result<Box<dyn RenderView>, LigviewError>;
}

/// Single-writer owner of the live render view.
///
/// All create/destroy rights live here, and at most one view exists at a
/// time. Creating a new view releases the previous one's models and drops
/// it first, so handles never leak across reloads.
#[derive(Default)]
pub struct ViewSlot {
    view: Option<Box<dyn RenderView>>,
}

impl ViewSlot {
    /// Empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self { view: None }
    }

    /// Whether a view is currently live.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.view.is_some()
    }

    /// Create a fresh view through `factory`, destroying any prior view
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`LigviewError::View`] if the factory fails; the slot is
    /// left empty in that case.
    pub fn create(
        &mut self,
        factory: &mut dyn ViewFactory,
        options: &ViewOptions,
    ) -> Result<&mut dyn RenderView, LigviewError> {
        self.dispose();
        let view = factory.create_view(options)?;
        Ok(self.view.insert(view).as_mut())
    }

    /// Mutable access to the live view, if any.
    pub fn get_mut(&mut self) -> Option<&mut (dyn RenderView + 'static)> {
        self.view.as_deref_mut()
    }

    /// Release all loaded models and destroy the view.
    pub fn dispose(&mut self) {
        if let Some(mut view) = self.view.take() {
            view.remove_all_models();
        }
    }
}
