//! Background fetch worker.
//!
//! All network I/O runs on a dedicated thread so the owning thread never
//! blocks on a request. Every request carries the epoch it was issued
//! under; the worker drains its queue to the newest pending request before
//! fetching, so superseded work it has not started is cancelled outright.
//! Stale completions are filtered by the session at apply time.

use std::sync::{mpsc, Arc};

use crate::error::LigviewError;
use crate::fetch::Fetcher;
use crate::manifest::{LigandId, Manifest};

/// A unit of fetch work, tagged with the issuing epoch.
#[derive(Debug)]
pub(crate) struct FetchRequest {
    /// Session epoch the request belongs to.
    pub epoch: u64,
    /// What to fetch.
    pub kind: RequestKind,
}

/// What a [`FetchRequest`] asks for.
#[derive(Debug)]
pub(crate) enum RequestKind {
    /// The manifest document.
    Manifest {
        /// Manifest resource path.
        path: String,
    },
    /// The protein structure text (initial view construction).
    Structure {
        /// Structure reference from the manifest.
        path: String,
    },
    /// The reload bundle: structure text plus, when a ligand is selected,
    /// its chemical text. Both are fetched before the session touches the
    /// view, which makes model replacement atomic.
    Reload {
        /// Structure reference from the manifest.
        structure_path: String,
        /// Selected ligand id and its chemical-file reference.
        ligand: Option<(LigandId, String)>,
    },
    /// Stop the worker thread.
    Shutdown,
}

/// Completed fetch work.
pub(crate) struct FetchOutcome {
    /// Epoch the originating request was issued under.
    pub epoch: u64,
    /// Fetched payload or the first failure along the way.
    pub result: Result<FetchPayload, LigviewError>,
}

/// Payload of a successful fetch.
pub(crate) enum FetchPayload {
    /// Parsed manifest document.
    Manifest(Manifest),
    /// Raw structure text.
    Structure(String),
    /// Raw structure text plus the selected ligand's chemical text.
    Reload {
        /// Raw structure text.
        structure: String,
        /// Selected ligand id and its raw chemical text.
        ligand: Option<(LigandId, String)>,
    },
}

/// Owns the background fetch thread and its channels.
pub(crate) struct FetchWorker {
    request_tx: mpsc::Sender<FetchRequest>,
    outcome_rx: mpsc::Receiver<FetchOutcome>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl FetchWorker {
    /// Spawn the background fetch thread.
    pub fn spawn(fetcher: Arc<dyn Fetcher>) -> Result<Self, std::io::Error> {
        let (request_tx, request_rx) = mpsc::channel::<FetchRequest>();
        let (outcome_tx, outcome_rx) = mpsc::channel::<FetchOutcome>();

        let thread = std::thread::Builder::new()
            .name("ligview-fetch".into())
            .spawn(move || {
                Self::thread_loop(&request_rx, &outcome_tx, fetcher.as_ref());
            })?;

        Ok(Self {
            request_tx,
            outcome_rx,
            thread: Some(thread),
        })
    }

    /// Submit a request (non-blocking send).
    pub fn submit(&self, request: FetchRequest) {
        let _ = self.request_tx.send(request);
    }

    /// Non-blocking check for a completed fetch.
    pub fn try_recv(&self) -> Option<FetchOutcome> {
        self.outcome_rx.try_recv().ok()
    }

    /// Shut down the background thread and wait for it to finish.
    pub fn shutdown(&mut self) {
        let _ = self.request_tx.send(FetchRequest {
            epoch: 0,
            kind: RequestKind::Shutdown,
        });
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }

    /// Background thread main loop.
    fn thread_loop(
        request_rx: &mpsc::Receiver<FetchRequest>,
        outcome_tx: &mpsc::Sender<FetchOutcome>,
        fetcher: &dyn Fetcher,
    ) {
        while let Ok(request) = request_rx.recv() {
            let FetchRequest { epoch, kind } =
                drain_latest(request, request_rx);

            let result = match kind {
                RequestKind::Shutdown => break,
                RequestKind::Manifest { path } => fetch_manifest(fetcher, &path),
                RequestKind::Structure { path } => {
                    fetcher.fetch_text(&path).map(FetchPayload::Structure)
                }
                RequestKind::Reload {
                    structure_path,
                    ligand,
                } => fetch_reload(fetcher, &structure_path, ligand),
            };

            if outcome_tx.send(FetchOutcome { epoch, result }).is_err() {
                break;
            }
        }
    }
}

impl Drop for FetchWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Collapse the queue to the newest pending request. A queued `Shutdown`
/// wins immediately.
fn drain_latest(
    initial: FetchRequest,
    rx: &mpsc::Receiver<FetchRequest>,
) -> FetchRequest {
    let mut latest = initial;
    if matches!(latest.kind, RequestKind::Shutdown) {
        return latest;
    }
    while let Ok(newer) = rx.try_recv() {
        if matches!(newer.kind, RequestKind::Shutdown) {
            return newer;
        }
        log::debug!("superseding queued fetch (epoch {})", latest.epoch);
        latest = newer;
    }
    latest
}

fn fetch_manifest(
    fetcher: &dyn Fetcher,
    path: &str,
) -> Result<FetchPayload, LigviewError> {
    let text = fetcher.fetch_text(path)?;
    Ok(FetchPayload::Manifest(Manifest::from_json(&text)?))
}

fn fetch_reload(
    fetcher: &dyn Fetcher,
    structure_path: &str,
    ligand: Option<(LigandId, String)>,
) -> Result<FetchPayload, LigviewError> {
    let structure = fetcher.fetch_text(structure_path)?;
    let ligand = match ligand {
        Some((id, sdf_path)) => Some((id, fetcher.fetch_text(&sdf_path)?)),
        None => None,
    };
    Ok(FetchPayload::Reload { structure, ligand })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    struct EchoFetcher;

    impl Fetcher for EchoFetcher {
        fn fetch_text(&self, path: &str) -> Result<String, LigviewError> {
            Ok(format!("content of {path}"))
        }
    }

    fn request(epoch: u64, path: &str) -> FetchRequest {
        FetchRequest {
            epoch,
            kind: RequestKind::Structure {
                path: path.to_owned(),
            },
        }
    }

    #[test]
    fn drain_latest_keeps_the_newest_request() {
        let (tx, rx) = mpsc::channel();
        tx.send(request(2, "/b.pdb")).unwrap();
        tx.send(request(3, "/c.pdb")).unwrap();

        let latest = drain_latest(request(1, "/a.pdb"), &rx);
        assert_eq!(latest.epoch, 3);
    }

    #[test]
    fn drain_latest_lets_shutdown_win() {
        let (tx, rx) = mpsc::channel();
        tx.send(FetchRequest {
            epoch: 0,
            kind: RequestKind::Shutdown,
        })
        .unwrap();
        tx.send(request(9, "/late.pdb")).unwrap();

        let latest = drain_latest(request(1, "/a.pdb"), &rx);
        assert!(matches!(latest.kind, RequestKind::Shutdown));
    }

    #[test]
    fn worker_round_trips_a_structure_fetch() {
        let worker = FetchWorker::spawn(Arc::new(EchoFetcher)).unwrap();
        worker.submit(request(7, "/s.pdb"));

        let outcome = worker
            .outcome_rx
            .recv_timeout(Duration::from_secs(5))
            .unwrap();
        assert_eq!(outcome.epoch, 7);
        match outcome.result.unwrap() {
            FetchPayload::Structure(text) => {
                assert_eq!(text, "content of /s.pdb");
            }
            _ => panic!("expected a structure payload"),
        }
    }

    #[test]
    fn reload_bundles_structure_and_chemical() {
        let worker = FetchWorker::spawn(Arc::new(EchoFetcher)).unwrap();
        worker.submit(FetchRequest {
            epoch: 1,
            kind: RequestKind::Reload {
                structure_path: "/s.pdb".to_owned(),
                ligand: Some((LigandId(0), "/a.sdf".to_owned())),
            },
        });

        let outcome = worker
            .outcome_rx
            .recv_timeout(Duration::from_secs(5))
            .unwrap();
        match outcome.result.unwrap() {
            FetchPayload::Reload { structure, ligand } => {
                assert_eq!(structure, "content of /s.pdb");
                let (id, chemical) = ligand.unwrap();
                assert_eq!(id, LigandId(0));
                assert_eq!(chemical, "content of /a.sdf");
            }
            _ => panic!("expected a reload payload"),
        }
    }

    #[test]
    fn worker_joins_on_drop() {
        let worker = FetchWorker::spawn(Arc::new(EchoFetcher)).unwrap();
        drop(worker);
    }
}
