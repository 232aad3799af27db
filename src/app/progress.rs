//! Progress UI (spinner) for download batches.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use playlistdl_core::DownloadOutcome;
use playlistdl_core::download::ProgressCallback;

/// Spinner shown while a batch runs, fed by the engine's progress callback.
pub(crate) struct BatchProgress {
    spinner: Option<ProgressBar>,
    done: Arc<AtomicUsize>,
    total: usize,
}

impl BatchProgress {
    /// Creates the spinner when `use_spinner` is set; otherwise a no-op tracker.
    pub(crate) fn start(use_spinner: bool, total: usize) -> Self {
        let spinner = use_spinner.then(|| {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{spinner} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner.set_message(progress_message(0, total, None));
            spinner
        });
        Self {
            spinner,
            done: Arc::new(AtomicUsize::new(0)),
            total,
        }
    }

    /// Callback for [`playlistdl_core::Session::download`].
    pub(crate) fn callback(&self) -> ProgressCallback {
        let spinner = self.spinner.clone();
        let done = Arc::clone(&self.done);
        let total = self.total;
        let callback: ProgressCallback =
            Arc::new(move |_position: usize, outcome: &DownloadOutcome| {
                let finished = done.fetch_add(1, Ordering::SeqCst) + 1;
                if let Some(spinner) = &spinner {
                    spinner.set_message(progress_message(finished, total, Some(outcome)));
                }
            });
        callback
    }

    pub(crate) fn finish(self) {
        if let Some(spinner) = self.spinner {
            spinner.finish_and_clear();
        }
    }
}

fn progress_message(done: usize, total: usize, last: Option<&DownloadOutcome>) -> String {
    match last {
        Some(outcome) => format!("[{done}/{total}] {outcome}"),
        None => format!("[{done}/{total}] Downloading..."),
    }
}
