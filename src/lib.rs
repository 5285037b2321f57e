// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]

//! Viewer core for browsing small-molecule ligands docked against one
//! protein structure.
//!
//! Ligview orchestrates the data pipeline behind a docked-ligand browser:
//! fetch a manifest listing the available ligands, fetch the shared protein
//! structure file, fetch the selected ligand's chemical file, and hand the
//! raw contents to an external molecular renderer. The renderer itself is a
//! collaborator behind the [`render::RenderView`] capability trait; this
//! crate owns no drawing, parsing, or statistics logic.
//!
//! # Key entry points
//!
//! - [`session::ViewerSession`] - the view-state controller driving the
//!   manifest → structure → ligand pipeline
//! - [`shell`] - the snapshot/action bridge a host UI renders and feeds
//! - [`render`] - the renderer capability interface and the headless
//!   backend
//! - [`options::Options`] - runtime configuration (display style, surface
//!   overlay, viewer surface)
//!
//! # Architecture
//!
//! All network I/O runs on a background fetch worker; the owning thread
//! applies completed fetches non-blockingly via
//! [`session::ViewerSession::apply_pending`]. Every request is tagged with
//! the session epoch, so a response that arrives after the user has moved
//! on is discarded and the last selection always wins.

pub mod download;
pub mod error;
pub mod fetch;
pub mod manifest;
pub mod options;
pub mod render;
pub mod session;
pub mod shell;

pub use error::LigviewError;
pub use manifest::{Ligand, LigandId, Manifest};
pub use options::{DisplayStyle, Options};
pub use session::{ViewState, ViewerSession};
