//! Configuration lifecycle: load the settings file, merge CLI overrides, save.

use std::path::{Path, PathBuf};

use anyhow::Result;
use playlistdl_core::Settings;
use playlistdl_core::tool::DEFAULT_PROGRAM;
use tracing::{debug, info};

use crate::app::config_file::{FileConfig, load_file_config, save_file_config};
use crate::cli::Args;

/// Settings and tool location resolved from defaults, file and CLI.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedConfig {
    pub(crate) settings: Settings,
    pub(crate) yt_dlp: PathBuf,
    /// Where settings are saved from the interactive session.
    pub(crate) config_path: Option<PathBuf>,
}

/// Loads the settings file and applies CLI overrides on top.
///
/// Priority: CLI flag > settings file > built-in default.
pub(crate) fn resolve_config(args: &Args) -> Result<ResolvedConfig> {
    let loaded = load_file_config(args.config.as_deref())?;
    let mut settings = Settings::default();
    let mut yt_dlp = PathBuf::from(DEFAULT_PROGRAM);

    if let Some(file) = &loaded.config {
        debug!(path = ?loaded.path, "applying settings file");
        file.apply_to(&mut settings);
        if let Some(path) = &file.yt_dlp {
            yt_dlp.clone_from(path);
        }
    }

    apply_cli_overrides(args, &mut settings);
    if let Some(path) = &args.yt_dlp {
        yt_dlp.clone_from(path);
    }

    Ok(ResolvedConfig {
        settings,
        yt_dlp,
        config_path: loaded.path,
    })
}

fn apply_cli_overrides(args: &Args, settings: &mut Settings) {
    if let Some(dir) = &args.output_dir {
        settings.download_dir.clone_from(dir);
    }
    if let Some(threads) = args.threads {
        settings.max_threads = usize::from(threads);
    }
    if let Some(threads) = args.resolve_threads {
        settings.resolve_threads = usize::from(threads);
    }
    if let Some(results) = args.max_results {
        settings.max_results = usize::from(results);
    }
    if let Some(depth) = args.search_depth {
        settings.search_depth = usize::from(depth);
    }
    if let Some(domain) = &args.setlist_domain {
        settings.setlist_domain.clone_from(domain);
    }
    if args.no_youtube {
        settings.enable_youtube = false;
    }
    if args.no_soundcloud {
        settings.enable_soundcloud = false;
    }
    if args.no_duckduckgo {
        settings.enable_duckduckgo = false;
    }
    if args.no_direct_file {
        settings.enable_direct_file = false;
    }
}

/// Writes the current settings to `path`.
pub(crate) fn save_settings(path: &Path, settings: &Settings, yt_dlp: &Path) -> Result<()> {
    let yt_dlp = (yt_dlp != Path::new(DEFAULT_PROGRAM)).then_some(yt_dlp);
    save_file_config(path, &FileConfig::from_settings(settings, yt_dlp))?;
    info!(path = %path.display(), "settings saved");
    Ok(())
}
