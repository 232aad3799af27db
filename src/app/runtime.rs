//! Process runtime: parse arguments, configure, then run the chosen mode.

use std::io::{self, IsTerminal};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use playlistdl_core::{Session, YtDlp};
use tokio::io::AsyncBufReadExt;
use tracing::{debug, info};

use crate::ProcessExit;
use crate::app::one_shot::{self, OneShotOptions};
use crate::app::session_loop::SessionLoop;
use crate::app::{config_manager, output, terminal};
use crate::cli::Args;

pub(crate) async fn run_playlistdl() -> Result<ProcessExit> {
    // Parse before tracing so --help and --version print without log noise.
    let args = Args::parse();

    let no_color = terminal::is_no_color_requested(&args);
    terminal::init_tracing(terminal::default_log_level(&args), no_color);
    debug!(?args, "CLI arguments parsed");

    let resolved = config_manager::resolve_config(&args)?;
    let use_spinner = terminal::should_use_progress_bar(
        io::stderr().is_terminal(),
        args.quiet,
        terminal::is_dumb_terminal(),
    );

    let tool = Arc::new(YtDlp::with_program(resolved.yt_dlp.clone()));
    let mut session = Session::with_defaults(resolved.settings, tool)
        .context("Failed to set up the download client")?;

    if args.interactive {
        info!("Starting interactive session");
        let lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        let mut session_loop =
            SessionLoop::new(lines, io::stdout(), resolved.config_path, resolved.yt_dlp)
                .with_spinner(use_spinner)
                .with_ctrl_c(true);
        session_loop.run(&mut session).await?;
        return Ok(ProcessExit::Success);
    }

    let inputs = one_shot::collect_inputs(&args)?;
    if inputs.is_empty() {
        output::print_quick_start_guidance();
        return Ok(ProcessExit::Success);
    }

    let options = OneShotOptions::from_args(&args, use_spinner);
    one_shot::run_one_shot(&mut session, &inputs, &options).await
}
