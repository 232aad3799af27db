//! One-shot mode: route inputs, optionally resolve and select, then download.

use std::io::{self, IsTerminal, Read};

use anyhow::{Context, Result};
use playlistdl_core::{Selection, Session};
use tracing::{debug, info, warn};

use crate::ProcessExit;
use crate::app::{exit_handler, output, progress::BatchProgress};
use crate::cli::Args;

/// What one-shot mode should do after the queue is built.
#[derive(Debug, Clone, Default)]
pub(crate) struct OneShotOptions {
    pub(crate) resolve: bool,
    pub(crate) select: Option<String>,
    pub(crate) list_only: bool,
    pub(crate) use_spinner: bool,
}

impl OneShotOptions {
    pub(crate) fn from_args(args: &Args, use_spinner: bool) -> Self {
        Self {
            resolve: args.resolve,
            select: args.select.clone(),
            list_only: args.list_only,
            use_spinner,
        }
    }
}

/// Collects inputs from positional arguments, or from piped stdin as one
/// block. Returns an empty list when there is nothing to read.
pub(crate) fn collect_inputs(args: &Args) -> Result<Vec<String>> {
    if !args.inputs.is_empty() {
        return Ok(args.inputs.clone());
    }
    if io::stdin().is_terminal() {
        return Ok(Vec::new());
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read input from stdin")?;
    if buffer.trim().is_empty() {
        debug!("piped stdin was empty");
        return Ok(Vec::new());
    }
    Ok(vec![buffer])
}

/// Runs one pass over `inputs` and returns the process outcome.
pub(crate) async fn run_one_shot(
    session: &mut Session,
    inputs: &[String],
    options: &OneShotOptions,
) -> Result<ProcessExit> {
    let width = output::terminal_width();
    for input in inputs {
        session.ingest(input).await;
    }

    if session.queue().is_empty() {
        warn!("No tracks found in the input");
        return Ok(ProcessExit::Failure);
    }

    if options.resolve {
        let unresolved = session.resolve_unresolved().await;
        output::print_lines(&output::unresolved_lines(&unresolved, width));
    }

    let len = session.queue().len();
    let selection = options
        .select
        .as_deref()
        .map_or_else(|| Selection::all(len), |expr| Selection::parse(expr, len));

    if options.list_only {
        output::print_lines(&output::queue_lines(session.queue(), width));
        return Ok(ProcessExit::Success);
    }

    if selection.is_empty() {
        warn!(len, "Selection matched no queue items");
        return Ok(ProcessExit::Failure);
    }

    let titles: Vec<String> = session
        .queue()
        .snapshot(&selection)
        .into_iter()
        .map(|candidate| candidate.title)
        .collect();
    info!(
        selected = selection.len(),
        dir = %session.settings().download_dir.display(),
        "Starting downloads"
    );

    let stop = session.stop_flag();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; finishing downloads already running");
            stop.request_stop();
        }
    });

    let progress = BatchProgress::start(options.use_spinner, selection.len());
    let result = session.download(&selection, Some(progress.callback())).await;
    progress.finish();
    ctrl_c.abort();

    let report = result.context("Invalid download settings")?;
    output::print_lines(&output::batch_summary_lines(&report, &titles, width));
    Ok(exit_handler::determine_exit_outcome(
        report.stats.success,
        report.stats.failed,
        report.stats.skipped,
    ))
}
