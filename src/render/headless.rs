//! Headless render backend.
//!
//! Implements the capability traits without drawing anything: every call
//! is appended to a shared operation log. The smoke binary uses it to
//! drive the pipeline end to end, and the test suite uses it to assert on
//! the exact sequence of renderer mutations.

use std::sync::{Arc, Mutex, PoisonError};

use super::{
    ModelFormat, RenderView, Selector, StyleSpec, SurfaceKind, SurfaceStyle,
    ViewFactory, ViewOptions,
};
use crate::error::LigviewError;

/// One recorded view operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewOp {
    /// A model was loaded.
    AddModel {
        /// Index assigned to the model.
        index: usize,
        /// Format tag the content was loaded with.
        format: ModelFormat,
    },
    /// A model was removed by index.
    RemoveModel {
        /// Index of the removed model.
        index: usize,
    },
    /// All models were removed.
    RemoveAllModels,
    /// A style was applied.
    SetStyle {
        /// Targeted models.
        selector: Selector,
        /// Applied descriptor.
        style: StyleSpec,
    },
    /// A surface overlay was added.
    AddSurface {
        /// Surface kind.
        kind: SurfaceKind,
        /// Overlay opacity.
        opacity: f32,
    },
    /// The camera was fitted.
    ZoomTo {
        /// Fit target, or everything when `None`.
        selector: Option<Selector>,
    },
    /// A frame was committed.
    Render,
    /// The surface was resized.
    Resize {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },
    /// The view was destroyed.
    Destroyed,
}

/// Shared log of operations across every view a backend created.
#[derive(Debug, Default)]
pub struct ViewLog {
    /// All operations in application order.
    pub ops: Vec<ViewOp>,
    /// Number of views created so far.
    pub views_created: usize,
    /// Number of views destroyed so far.
    pub views_destroyed: usize,
    /// Models currently loaded in the live view: index, format, raw
    /// content.
    pub models: Vec<(usize, ModelFormat, String)>,
}

impl ViewLog {
    /// Formats of the currently loaded models, in index order.
    #[must_use]
    pub fn model_formats(&self) -> Vec<ModelFormat> {
        self.models.iter().map(|(_, format, _)| *format).collect()
    }

    /// Raw content of the model at `index`, if loaded.
    #[must_use]
    pub fn model_content(&self, index: usize) -> Option<&str> {
        self.models
            .iter()
            .find(|(i, _, _)| *i == index)
            .map(|(_, _, content)| content.as_str())
    }
}

/// Backend producing headless views that share one operation log.
#[derive(Default)]
pub struct HeadlessBackend {
    log: Arc<Mutex<ViewLog>>,
}

impl HeadlessBackend {
    /// Backend with a fresh, empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the shared operation log.
    #[must_use]
    pub fn log(&self) -> Arc<Mutex<ViewLog>> {
        Arc::clone(&self.log)
    }
}

impl ViewFactory for HeadlessBackend {
    fn create_view(
        &mut self,
        options: &ViewOptions,
    ) -> Result<Box<dyn RenderView>, LigviewError> {
        log::debug!(
            "headless view created ({}x{}, background {})",
            options.width,
            options.height,
            options.background
        );
        let mut log = lock(&self.log);
        log.views_created += 1;
        log.models.clear();
        drop(log);
        Ok(Box::new(HeadlessView {
            log: Arc::clone(&self.log),
            next_index: 0,
        }))
    }
}

struct HeadlessView {
    log: Arc<Mutex<ViewLog>>,
    next_index: usize,
}

impl RenderView for HeadlessView {
    fn add_model(&mut self, content: &str, format: ModelFormat) -> usize {
        let index = self.next_index;
        self.next_index += 1;
        let mut log = lock(&self.log);
        log.models.push((index, format, content.to_owned()));
        log.ops.push(ViewOp::AddModel { index, format });
        index
    }

    fn remove_model(&mut self, index: usize) {
        let mut log = lock(&self.log);
        log.models.retain(|(i, _, _)| *i != index);
        log.ops.push(ViewOp::RemoveModel { index });
    }

    fn remove_all_models(&mut self) {
        self.next_index = 0;
        let mut log = lock(&self.log);
        log.models.clear();
        log.ops.push(ViewOp::RemoveAllModels);
    }

    fn set_style(&mut self, selector: Selector, style: &StyleSpec) {
        lock(&self.log).ops.push(ViewOp::SetStyle {
            selector,
            style: *style,
        });
    }

    fn add_surface(&mut self, kind: SurfaceKind, style: &SurfaceStyle) {
        lock(&self.log).ops.push(ViewOp::AddSurface {
            kind,
            opacity: style.opacity,
        });
    }

    fn zoom_to(&mut self, selector: Option<Selector>) {
        lock(&self.log).ops.push(ViewOp::ZoomTo { selector });
    }

    fn render(&mut self) {
        lock(&self.log).ops.push(ViewOp::Render);
    }

    fn resize(&mut self, width: u32, height: u32) {
        lock(&self.log).ops.push(ViewOp::Resize { width, height });
    }
}

impl Drop for HeadlessView {
    fn drop(&mut self) {
        let mut log = lock(&self.log);
        log.views_destroyed += 1;
        log.ops.push(ViewOp::Destroyed);
    }
}

fn lock(log: &Arc<Mutex<ViewLog>>) -> std::sync::MutexGuard<'_, ViewLog> {
    log.lock().unwrap_or_else(PoisonError::into_inner)
}
