//! Viewer session: the view-state controller and the loader pipeline.
//!
//! [`ViewerSession`] owns every piece of reactive state and every mutation
//! of the render view. User interaction arrives as the two operations
//! [`select_ligand`](ViewerSession::select_ligand) and
//! [`set_display_style`](ViewerSession::set_display_style); both are pure
//! state transitions that enqueue loader work as a downstream effect. The
//! loaders themselves run as an explicit sequential pipeline (manifest,
//! then structure, then ligand) with each stage's completion chaining
//! into the next inside [`apply_pending`](ViewerSession::apply_pending).

mod apply;
mod loader;

use std::sync::Arc;

use self::loader::{FetchRequest, FetchWorker, RequestKind};

use crate::download::DownloadPayload;
use crate::error::LigviewError;
use crate::fetch::Fetcher;
use crate::manifest::{Ligand, LigandId, Manifest, MANIFEST_PATH};
use crate::options::{DisplayStyle, Options};
use crate::render::{ViewFactory, ViewSlot};

/// Reactive viewer state, mutated only by [`ViewerSession`].
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Currently selected ligand; always an id into the loaded manifest.
    pub selected: Option<LigandId>,
    /// Active protein display style.
    pub display_style: DisplayStyle,
    /// Whether a fetch tied to the visible state is in flight.
    pub is_loading: bool,
    /// User-visible error from the most recent failed operation.
    pub error: Option<String>,
    /// Whether the base structure model has been loaded into the view.
    pub structure_loaded: bool,
}

impl ViewState {
    fn new(display_style: DisplayStyle) -> Self {
        Self {
            selected: None,
            display_style,
            is_loading: false,
            error: None,
            structure_loaded: false,
        }
    }
}

/// Orchestrates the manifest → structure → ligand pipeline and owns the
/// single render view.
pub struct ViewerSession {
    worker: FetchWorker,
    factory: Box<dyn ViewFactory>,
    slot: ViewSlot,
    options: Options,
    manifest: Option<Manifest>,
    state: ViewState,
    /// Current request epoch. Outcomes from older epochs are stale and are
    /// dropped, so the last selection wins.
    epoch: u64,
    /// Statistics rows of the ligand currently on screen.
    statistics: Vec<(String, String)>,
    /// Raw chemical text of the ligand currently on screen.
    chemical: Option<String>,
    /// Whether the one-time whole-structure camera fit has happened for a
    /// ligand selection. Later selections fit only the ligand model,
    /// preserving the user's navigated protein context.
    initial_fit_done: bool,
}

impl ViewerSession {
    /// Create a session. Spawns the background fetch worker.
    ///
    /// # Errors
    ///
    /// Returns [`LigviewError::ThreadSpawn`] if the worker thread cannot
    /// be spawned.
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        factory: Box<dyn ViewFactory>,
        options: Options,
    ) -> Result<Self, LigviewError> {
        let worker =
            FetchWorker::spawn(fetcher).map_err(LigviewError::ThreadSpawn)?;
        let state = ViewState::new(options.display.style);
        Ok(Self {
            worker,
            factory,
            slot: ViewSlot::new(),
            options,
            manifest: None,
            state,
            epoch: 0,
            statistics: Vec::new(),
            chemical: None,
            initial_fit_done: false,
        })
    }

    /// Start the load pipeline with the single manifest request. Call once
    /// after construction; the rest of the pipeline chains from its
    /// completion.
    pub fn start(&mut self) {
        self.begin_operation();
        self.worker.submit(FetchRequest {
            epoch: self.epoch,
            kind: RequestKind::Manifest {
                path: MANIFEST_PATH.to_owned(),
            },
        });
    }

    /// Select a ligand.
    ///
    /// Pure state transition: the reload runs as a downstream effect. If
    /// the initial pipeline is still in flight the new selection is picked
    /// up when the pipeline reaches its ligand stage.
    ///
    /// # Errors
    ///
    /// Returns [`LigviewError::UnknownLigand`] if `id` is not in the
    /// loaded manifest.
    pub fn select_ligand(&mut self, id: LigandId) -> Result<(), LigviewError> {
        let known = self
            .manifest
            .as_ref()
            .is_some_and(|m| m.ligand(id).is_some());
        if !known {
            return Err(LigviewError::UnknownLigand(id.0));
        }
        self.state.selected = Some(id);
        self.request_reload();
        Ok(())
    }

    /// Change the protein display style. Selection and statistics are
    /// untouched; the restyle flows through the ligand loader stage.
    pub fn set_display_style(&mut self, style: DisplayStyle) {
        if self.state.display_style == style {
            return;
        }
        self.state.display_style = style;
        self.options.display.style = style;
        self.request_reload();
    }

    /// Forward a display-surface geometry change to the live view.
    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(view) = self.slot.get_mut() {
            view.resize(width, height);
        }
    }

    /// Payload for the download action: the last successfully fetched
    /// chemical text, named after the selected ligand.
    #[must_use]
    pub fn download_payload(&self) -> Option<DownloadPayload> {
        let id = self.state.selected?;
        let name = &self.manifest.as_ref()?.ligand(id)?.name;
        let content = self.chemical.clone()?;
        Some(DownloadPayload::sdf(name, content))
    }

    /// Tear down: release all models, destroy the view, stop the worker.
    pub fn dispose(&mut self) {
        self.slot.dispose();
        self.worker.shutdown();
    }

    /// Current reactive state.
    #[must_use]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// The loaded manifest, once the manifest stage has completed.
    #[must_use]
    pub fn manifest(&self) -> Option<&Manifest> {
        self.manifest.as_ref()
    }

    /// The selected ligand's manifest entry.
    #[must_use]
    pub fn selected_ligand(&self) -> Option<&Ligand> {
        let id = self.state.selected?;
        self.manifest.as_ref()?.ligand(id)
    }

    /// Statistics rows of the ligand currently on screen, in wire order.
    #[must_use]
    pub fn statistics(&self) -> &[(String, String)] {
        &self.statistics
    }

    /// Whether a chemical file is loaded and available for download.
    #[must_use]
    pub fn has_chemical(&self) -> bool {
        self.chemical.is_some()
    }

    /// Active options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Bump the epoch and mark a new logical operation in flight. Any
    /// outcome still in flight for the previous epoch becomes stale.
    fn begin_operation(&mut self) {
        self.epoch += 1;
        self.state.is_loading = true;
        self.state.error = None;
    }

    /// Begin a user-initiated reload of the view (new selection or new
    /// style). No-op until the view exists; the pending initial pipeline
    /// reads the current selection and style when it gets there.
    fn request_reload(&mut self) {
        if !self.slot.is_live() {
            return;
        }
        self.begin_operation();
        self.submit_reload();
    }

    /// Enqueue the reload bundle under the current epoch. Used both for
    /// user-initiated reloads and for chaining out of the structure stage.
    fn submit_reload(&mut self) {
        let Some(manifest) = self.manifest.as_ref() else {
            return;
        };
        let ligand = self.state.selected.and_then(|id| {
            manifest.ligand(id).map(|l| (id, l.sdf_path.clone()))
        });
        let kind = RequestKind::Reload {
            structure_path: manifest.structure_path.clone(),
            ligand,
        };
        self.worker.submit(FetchRequest {
            epoch: self.epoch,
            kind,
        });
    }
}

impl Drop for ViewerSession {
    fn drop(&mut self) {
        self.slot.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::loader::{FetchOutcome, FetchPayload};
    use super::*;
    use crate::render::headless::HeadlessBackend;
    use crate::render::ModelFormat;
    use std::sync::{Arc, Mutex};

    /// In-memory fetcher for deterministic unit tests. The worker thread
    /// still runs, but these tests drive outcome application by hand.
    struct MapFetcher;

    impl Fetcher for MapFetcher {
        fn fetch_text(&self, path: &str) -> Result<String, LigviewError> {
            Ok(format!("content of {path}"))
        }
    }

    const MANIFEST_JSON: &str = r#"{
        "ligands": [
            { "name": "LigA", "sdf_path": "/a.sdf",
              "statistics": { "MW": "300" } },
            { "name": "LigB", "sdf_path": "/b.sdf",
              "statistics": { "MW": "410" } }
        ],
        "pdb_data": "/s.pdb"
    }"#;

    fn session() -> (ViewerSession, Arc<Mutex<crate::render::headless::ViewLog>>)
    {
        let backend = HeadlessBackend::new();
        let log = backend.log();
        let session = ViewerSession::new(
            Arc::new(MapFetcher),
            Box::new(backend),
            Options::default(),
        )
        .unwrap();
        (session, log)
    }

    fn outcome(epoch: u64, payload: FetchPayload) -> FetchOutcome {
        FetchOutcome {
            epoch,
            result: Ok(payload),
        }
    }

    fn manifest_payload() -> FetchPayload {
        FetchPayload::Manifest(Manifest::from_json(MANIFEST_JSON).unwrap())
    }

    /// Drive the deterministic initial pipeline: manifest, structure, and
    /// the chained reload for the auto-selected first ligand.
    fn load_first_ligand(session: &mut ViewerSession) {
        session.start();
        session.accept(outcome(session.epoch, manifest_payload()));
        session.accept(outcome(
            session.epoch,
            FetchPayload::Structure("pdb text".to_owned()),
        ));
        session.accept(outcome(
            session.epoch,
            FetchPayload::Reload {
                structure: "pdb text".to_owned(),
                ligand: Some((LigandId(0), "sdf text A".to_owned())),
            },
        ));
    }

    #[test]
    fn manifest_load_selects_the_first_ligand() {
        let (mut session, _log) = session();
        session.start();
        assert!(session.state().is_loading);

        session.accept(outcome(session.epoch, manifest_payload()));
        assert_eq!(session.state().selected, Some(LigandId(0)));
        // Chained into the structure stage: still one logical operation.
        assert!(session.state().is_loading);
    }

    #[test]
    fn empty_manifest_selects_nothing_and_settles() {
        let (mut session, log) = session();
        session.start();
        session.accept(outcome(
            session.epoch,
            FetchPayload::Manifest(
                Manifest::from_json(
                    r#"{ "ligands": [], "pdb_data": "/s.pdb" }"#,
                )
                .unwrap(),
            ),
        ));
        assert_eq!(session.state().selected, None);

        session.accept(outcome(
            session.epoch,
            FetchPayload::Structure("pdb text".to_owned()),
        ));
        // No selection: the pipeline is terminal after the structure stage.
        assert!(!session.state().is_loading);
        assert!(session.state().structure_loaded);
        assert!(session.statistics().is_empty());
        assert_eq!(
            log.lock().unwrap().model_formats(),
            vec![ModelFormat::Pdb]
        );
    }

    #[test]
    fn full_pipeline_displays_the_first_ligand() {
        let (mut session, log) = session();
        load_first_ligand(&mut session);

        assert!(!session.state().is_loading);
        assert_eq!(session.state().selected, Some(LigandId(0)));
        assert_eq!(
            session.statistics(),
            &[("MW".to_owned(), "300".to_owned())]
        );
        let log = log.lock().unwrap();
        assert_eq!(
            log.model_formats(),
            vec![ModelFormat::Pdb, ModelFormat::Sdf]
        );
        assert_eq!(log.model_content(1), Some("sdf text A"));
    }

    #[test]
    fn stale_outcomes_are_dropped() {
        let (mut session, _log) = session();
        load_first_ligand(&mut session);

        // Selecting B supersedes A: a late A response must not win.
        session.select_ligand(LigandId(1)).unwrap();
        let stale_epoch = session.epoch - 1;
        session.accept(outcome(
            stale_epoch,
            FetchPayload::Reload {
                structure: "pdb text".to_owned(),
                ligand: Some((LigandId(0), "sdf text A".to_owned())),
            },
        ));
        // Still loading B; stats still A's.
        assert!(session.state().is_loading);
        assert_eq!(session.state().selected, Some(LigandId(1)));

        session.accept(outcome(
            session.epoch,
            FetchPayload::Reload {
                structure: "pdb text".to_owned(),
                ligand: Some((LigandId(1), "sdf text B".to_owned())),
            },
        ));
        assert!(!session.state().is_loading);
        assert_eq!(
            session.statistics(),
            &[("MW".to_owned(), "410".to_owned())]
        );
    }

    #[test]
    fn reselection_replaces_the_ligand_model() {
        let (mut session, log) = session();
        load_first_ligand(&mut session);

        session.select_ligand(LigandId(1)).unwrap();
        session.accept(outcome(
            session.epoch,
            FetchPayload::Reload {
                structure: "pdb text".to_owned(),
                ligand: Some((LigandId(1), "sdf text B".to_owned())),
            },
        ));

        let log = log.lock().unwrap();
        // Strict replacement: exactly one structure and one ligand model.
        assert_eq!(
            log.model_formats(),
            vec![ModelFormat::Pdb, ModelFormat::Sdf]
        );
        assert_eq!(log.model_content(1), Some("sdf text B"));
    }

    #[test]
    fn failed_ligand_fetch_preserves_previous_state() {
        let (mut session, log) = session();
        load_first_ligand(&mut session);

        session.select_ligand(LigandId(1)).unwrap();
        session.accept(FetchOutcome {
            epoch: session.epoch,
            result: Err(LigviewError::Status {
                status: 404,
                url: "/b.sdf".to_owned(),
            }),
        });

        assert!(!session.state().is_loading);
        assert!(session.state().error.as_deref().is_some_and(|e| e
            .contains("404")));
        // Previous ligand model and statistics stay on screen.
        assert_eq!(
            session.statistics(),
            &[("MW".to_owned(), "300".to_owned())]
        );
        assert_eq!(
            log.lock().unwrap().model_content(1),
            Some("sdf text A")
        );

        // A later unrelated operation is not blocked.
        session.select_ligand(LigandId(0)).unwrap();
        assert!(session.state().is_loading);
        assert_eq!(session.state().error, None);
    }

    #[test]
    fn style_change_keeps_selection_and_statistics() {
        let (mut session, _log) = session();
        load_first_ligand(&mut session);

        session.set_display_style(DisplayStyle::Stick);
        assert_eq!(session.state().display_style, DisplayStyle::Stick);
        assert_eq!(session.state().selected, Some(LigandId(0)));
        assert_eq!(
            session.statistics(),
            &[("MW".to_owned(), "300".to_owned())]
        );
    }

    #[test]
    fn selecting_an_unknown_ligand_is_rejected() {
        let (mut session, _log) = session();
        load_first_ligand(&mut session);

        let err = session.select_ligand(LigandId(9)).unwrap_err();
        assert!(matches!(err, LigviewError::UnknownLigand(9)));
        assert_eq!(session.state().selected, Some(LigandId(0)));
    }

    #[test]
    fn download_payload_matches_fetched_chemical() {
        let (mut session, _log) = session();
        assert!(session.download_payload().is_none());
        load_first_ligand(&mut session);

        let payload = session.download_payload().unwrap();
        assert_eq!(payload.file_name, "LigA.sdf");
        assert_eq!(payload.content, "sdf text A");
    }

    #[test]
    fn manifest_failure_leaves_the_list_empty() {
        let (mut session, _log) = session();
        session.start();
        session.accept(FetchOutcome {
            epoch: session.epoch,
            result: Err(LigviewError::ManifestParse("bad json".to_owned())),
        });

        assert!(!session.state().is_loading);
        assert!(session.state().error.is_some());
        assert!(session.manifest().is_none());
        assert_eq!(session.state().selected, None);
    }
}
