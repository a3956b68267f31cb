// src/views/progress.rs
// =============================================================================
// Live progress while a page loads.
//
// Each panel gets a small task that subscribes to its controller and prints
// one line to stderr once that panel settles. This is the "re-render on
// change" half of the controller contract, in terminal form.
//
// If the page is dropped first, the controller's sender goes away, the
// wait fails, and the task ends quietly.
// =============================================================================

use super::View;
use crate::fetch::{FetchState, FetchStatus};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Spawns one watcher per panel. Join the handles to flush all lines.
pub fn watch_progress(view: &dyn View) -> Vec<JoinHandle<()>> {
    view.panels()
        .into_iter()
        .map(|(name, controller)| tokio::spawn(report_when_settled(name, controller.subscribe())))
        .collect()
}

async fn report_when_settled(name: &'static str, mut rx: watch::Receiver<FetchState>) {
    let line = match rx.wait_for(FetchState::is_settled).await {
        Ok(state) => progress_line(name, &state),
        Err(_) => return,
    };
    eprintln!("{}", line);
}

fn progress_line(name: &str, state: &FetchState) -> String {
    match state.status {
        FetchStatus::Success => format!("   ✅ {}", name),
        FetchStatus::Error => format!(
            "   ❌ {}: {}",
            name,
            state.message.as_deref().unwrap_or_default()
        ),
        FetchStatus::Idle | FetchStatus::Loading => format!("   ⏳ {}", name),
    }
}
