//! Outcome application: the structure and ligand loader stages.
//!
//! Completed fetches are applied non-blockingly on the owning thread, so
//! every render-view mutation is serialized here. Each stage chains the
//! next request synchronously, which keeps the loading flag up across the
//! whole manifest → structure → ligand pipeline.

use super::loader::{FetchOutcome, FetchPayload, FetchRequest, RequestKind};
use super::ViewerSession;
use crate::manifest::{Ligand, LigandId, Manifest};
use crate::render::{ligand_style, ModelFormat, Selector};

impl ViewerSession {
    /// Drain completed fetches and apply them (non-blocking).
    ///
    /// Call regularly from the owning thread; once per UI tick is enough.
    pub fn apply_pending(&mut self) {
        while let Some(outcome) = self.worker.try_recv() {
            self.accept(outcome);
        }
    }

    /// Apply one outcome, dropping it when stale. An outcome is stale when
    /// the user moved on (new selection or style) while it was in flight;
    /// applying it would overwrite state belonging to a later operation.
    pub(crate) fn accept(&mut self, outcome: FetchOutcome) {
        if outcome.epoch != self.epoch {
            log::debug!(
                "dropping stale fetch outcome (epoch {} != {})",
                outcome.epoch,
                self.epoch
            );
            return;
        }
        match outcome.result {
            Ok(FetchPayload::Manifest(manifest)) => {
                self.apply_manifest(manifest);
            }
            Ok(FetchPayload::Structure(text)) => self.apply_structure(&text),
            Ok(FetchPayload::Reload { structure, ligand }) => {
                self.apply_reload(&structure, ligand);
            }
            Err(e) => {
                log::warn!("fetch failed: {e}");
                self.state.error = Some(e.to_string());
                self.state.is_loading = false;
            }
        }
    }

    /// Manifest stage: store the document, pick the default selection, and
    /// chain into the structure stage under the same epoch.
    fn apply_manifest(&mut self, manifest: Manifest) {
        log::info!(
            "manifest loaded: {} ligands, structure {}",
            manifest.ligands.len(),
            manifest.structure_path
        );
        self.state.selected = manifest.first_ligand();
        let structure_path = manifest.structure_path.clone();
        self.manifest = Some(manifest);
        self.worker.submit(FetchRequest {
            epoch: self.epoch,
            kind: RequestKind::Structure {
                path: structure_path,
            },
        });
    }

    /// Structure stage: create the view (destroying any prior one), load
    /// the base model, style it, fit the camera, then chain into the
    /// ligand stage when a selection exists.
    fn apply_structure(&mut self, text: &str) {
        let view_options = self.options.viewer.to_view_options();
        let protein_style = self.state.display_style.protein_style();
        let surface = self.options.display.surface_overlay();

        let view = match self.slot.create(self.factory.as_mut(), &view_options)
        {
            Ok(view) => view,
            Err(e) => {
                log::warn!("view creation failed: {e}");
                self.state.error = Some(e.to_string());
                self.state.is_loading = false;
                return;
            }
        };
        let _ = view.add_model(text, ModelFormat::Pdb);
        view.set_style(Selector::All, &protein_style);
        if let Some((kind, style)) = surface {
            view.add_surface(kind, &style);
        }
        view.zoom_to(None);
        view.render();

        self.state.structure_loaded = true;
        if self.state.selected.is_some() {
            self.submit_reload();
        } else {
            self.state.is_loading = false;
        }
    }

    /// Ligand stage. Both file contents are already in hand, so the model
    /// swap is atomic from the viewer's perspective: the old ligand is
    /// only removed once its replacement is ready.
    fn apply_reload(
        &mut self,
        structure: &str,
        ligand: Option<(LigandId, String)>,
    ) {
        let protein_style = self.state.display_style.protein_style();
        let surface = self.options.display.surface_overlay();
        let fit_whole = !self.initial_fit_done;
        let statistics = ligand.as_ref().and_then(|(id, _)| {
            self.manifest
                .as_ref()
                .and_then(|m| m.ligand(*id))
                .map(Ligand::statistics_rows)
        });

        let Some(view) = self.slot.get_mut() else {
            // The view vanished under a pending reload (teardown); nothing
            // to apply.
            self.state.is_loading = false;
            return;
        };
        view.remove_all_models();
        let _ = view.add_model(structure, ModelFormat::Pdb);
        view.set_style(Selector::All, &protein_style);
        if let Some((kind, style)) = surface {
            view.add_surface(kind, &style);
        }
        if let Some((_, chemical)) = &ligand {
            let index = view.add_model(chemical, ModelFormat::Sdf);
            view.set_style(Selector::Model(index), &ligand_style());
            if fit_whole {
                view.zoom_to(None);
            } else {
                view.zoom_to(Some(Selector::Model(index)));
            }
        }
        view.render();

        if let Some((id, chemical)) = ligand {
            self.initial_fit_done = true;
            if let Some(rows) = statistics {
                self.statistics = rows;
            }
            self.chemical = Some(chemical);
            log::info!("ligand {} displayed", id.0);
        }
        self.state.is_loading = false;
    }
}
