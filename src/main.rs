//! Headless smoke binary: drives the full viewer pipeline against a data
//! root, walks every ligand, and optionally saves the selected ligand's
//! chemical file.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ligview::fetch::HttpFetcher;
use ligview::options::Options;
use ligview::render::headless::HeadlessBackend;
use ligview::session::ViewerSession;
use ligview::shell::{self, ShellAction};

/// How long to wait for the pipeline to settle before giving up.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Pump the session until the current operation settles. Returns false on
/// timeout.
fn wait_idle(session: &mut ViewerSession) -> bool {
    let deadline = Instant::now() + SETTLE_TIMEOUT;
    loop {
        session.apply_pending();
        if !session.state().is_loading {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
}

fn run(base_url: &str, out_dir: Option<PathBuf>) -> Result<(), String> {
    let fetcher = Arc::new(HttpFetcher::new(base_url));
    let backend = HeadlessBackend::new();
    let mut session = ViewerSession::new(
        fetcher,
        Box::new(backend),
        Options::default(),
    )
    .map_err(|e| e.to_string())?;

    session.start();
    if !wait_idle(&mut session) {
        return Err("timed out waiting for the initial load".to_owned());
    }
    if let Some(error) = &session.state().error {
        return Err(error.clone());
    }

    let snapshot = shell::snapshot(&session);
    log::info!("{} ligands available", snapshot.ligands.len());

    // Walk every ligand to exercise selection, replacement, and stats.
    for index in 0..snapshot.ligands.len() {
        let _ = shell::apply_action(
            &mut session,
            ShellAction::SelectLigand { index },
        )
        .map_err(|e| e.to_string())?;
        if !wait_idle(&mut session) {
            return Err(format!("timed out loading ligand {index}"));
        }
        if let Some(error) = &session.state().error {
            log::warn!("ligand {index}: {error}");
            continue;
        }
        let name = session
            .selected_ligand()
            .map_or("?", |l| l.name.as_str())
            .to_owned();
        log::info!("{name}:");
        for (key, value) in session.statistics() {
            log::info!("  {key}: {value}");
        }
    }

    if let Some(dir) = out_dir {
        let path =
            shell::apply_action(&mut session, ShellAction::Download { dir })
                .map_err(|e| e.to_string())?;
        if let Some(path) = path {
            log::info!("chemical file saved to {}", path.display());
        }
    }

    session.dispose();
    Ok(())
}

fn main() {
    env_logger::init();

    let base_url = match std::env::args().nth(1) {
        Some(arg) => arg,
        None => {
            log::error!("Usage: ligview <BASE_URL> [OUT_DIR]");
            std::process::exit(1);
        }
    };
    let out_dir = std::env::args().nth(2).map(PathBuf::from);

    if let Err(e) = run(&base_url, out_dir) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
