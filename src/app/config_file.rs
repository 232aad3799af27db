//! Settings file: loading, validation and saving.
//!
//! The file uses a small `key = value` syntax: double-quoted strings,
//! `true`/`false`, non-negative integers and `#` comments. Unknown keys are
//! rejected so typos surface instead of being ignored.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use playlistdl_core::Settings;
use playlistdl_core::config::{MAX_RESOLVE_THREADS, MAX_SEARCH_RESULTS, MAX_THREADS_LIMIT};

/// Values read from the settings file. `None` means "not set in the file".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FileConfig {
    pub(crate) enable_youtube: Option<bool>,
    pub(crate) enable_soundcloud: Option<bool>,
    pub(crate) enable_duckduckgo: Option<bool>,
    pub(crate) enable_direct_file: Option<bool>,
    pub(crate) allow_downloads: Option<bool>,
    pub(crate) max_results: Option<usize>,
    pub(crate) search_depth: Option<usize>,
    pub(crate) max_threads: Option<usize>,
    pub(crate) resolve_threads: Option<usize>,
    pub(crate) download_dir: Option<PathBuf>,
    pub(crate) setlist_domain: Option<String>,
    pub(crate) yt_dlp: Option<PathBuf>,
}

impl FileConfig {
    /// Validates values against the same ranges the CLI accepts.
    pub(crate) fn validate(&self) -> Result<()> {
        validate_range("max_results", self.max_results, 1, MAX_SEARCH_RESULTS)?;
        validate_range("search_depth", self.search_depth, 1, MAX_SEARCH_RESULTS)?;
        validate_range("max_threads", self.max_threads, 1, MAX_THREADS_LIMIT)?;
        validate_range("resolve_threads", self.resolve_threads, 1, MAX_RESOLVE_THREADS)?;
        if self
            .setlist_domain
            .as_deref()
            .is_some_and(|domain| domain.trim().is_empty())
        {
            bail!("Invalid config value for `setlist_domain`: must not be empty");
        }
        Ok(())
    }

    /// Overwrites the matching fields of `settings` with values set in the file.
    pub(crate) fn apply_to(&self, settings: &mut Settings) {
        if let Some(value) = self.enable_youtube {
            settings.enable_youtube = value;
        }
        if let Some(value) = self.enable_soundcloud {
            settings.enable_soundcloud = value;
        }
        if let Some(value) = self.enable_duckduckgo {
            settings.enable_duckduckgo = value;
        }
        if let Some(value) = self.enable_direct_file {
            settings.enable_direct_file = value;
        }
        if let Some(value) = self.allow_downloads {
            settings.allow_downloads = value;
        }
        if let Some(value) = self.max_results {
            settings.max_results = value;
        }
        if let Some(value) = self.search_depth {
            settings.search_depth = value;
        }
        if let Some(value) = self.max_threads {
            settings.max_threads = value;
        }
        if let Some(value) = self.resolve_threads {
            settings.resolve_threads = value;
        }
        if let Some(value) = &self.download_dir {
            settings.download_dir.clone_from(value);
        }
        if let Some(value) = &self.setlist_domain {
            settings.setlist_domain.clone_from(value);
        }
    }

    /// Captures every field of `settings` for saving.
    pub(crate) fn from_settings(settings: &Settings, yt_dlp: Option<&Path>) -> Self {
        Self {
            enable_youtube: Some(settings.enable_youtube),
            enable_soundcloud: Some(settings.enable_soundcloud),
            enable_duckduckgo: Some(settings.enable_duckduckgo),
            enable_direct_file: Some(settings.enable_direct_file),
            allow_downloads: Some(settings.allow_downloads),
            max_results: Some(settings.max_results),
            search_depth: Some(settings.search_depth),
            max_threads: Some(settings.max_threads),
            resolve_threads: Some(settings.resolve_threads),
            download_dir: Some(settings.download_dir.clone()),
            setlist_domain: Some(settings.setlist_domain.clone()),
            yt_dlp: yt_dlp.map(Path::to_path_buf),
        }
    }

    /// Renders the file text, one `key = value` line per set field.
    pub(crate) fn render(&self) -> String {
        let mut out = String::from("# playlistdl settings\n");
        let bools = [
            ("enable_youtube", self.enable_youtube),
            ("enable_soundcloud", self.enable_soundcloud),
            ("enable_duckduckgo", self.enable_duckduckgo),
            ("enable_direct_file", self.enable_direct_file),
            ("allow_downloads", self.allow_downloads),
        ];
        for (key, value) in bools {
            if let Some(value) = value {
                let _ = writeln!(out, "{key} = {value}");
            }
        }
        let numbers = [
            ("max_results", self.max_results),
            ("search_depth", self.search_depth),
            ("max_threads", self.max_threads),
            ("resolve_threads", self.resolve_threads),
        ];
        for (key, value) in numbers {
            if let Some(value) = value {
                let _ = writeln!(out, "{key} = {value}");
            }
        }
        let strings = [
            (
                "download_dir",
                self.download_dir.as_ref().map(|p| p.display().to_string()),
            ),
            ("setlist_domain", self.setlist_domain.clone()),
            (
                "yt_dlp",
                self.yt_dlp.as_ref().map(|p| p.display().to_string()),
            ),
        ];
        for (key, value) in strings {
            if let Some(value) = value {
                let _ = writeln!(out, "{key} = \"{}\"", escape_string(&value));
            }
        }
        out
    }
}

fn validate_range(field: &str, value: Option<usize>, min: usize, max: usize) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(min..=max).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: {min}..={max}");
    }
    Ok(())
}

/// Loaded config metadata.
#[derive(Debug, Clone, Default)]
pub(crate) struct LoadedConfig {
    /// Path the file was (or would be) read from.
    pub(crate) path: Option<PathBuf>,
    /// Parsed values when the file exists.
    pub(crate) config: Option<FileConfig>,
}

/// Resolves the default settings path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/playlistdl/config.toml`
/// 2. `$HOME/.config/playlistdl/config.toml`
pub(crate) fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("playlistdl")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("playlistdl")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads settings from `path`, or from the default location when `None`.
///
/// A missing file is not an error.
pub(crate) fn load_file_config(path: Option<&Path>) -> Result<LoadedConfig> {
    let path = path.map(Path::to_path_buf).or_else(resolve_default_config_path);
    let Some(path_ref) = path.as_deref() else {
        return Ok(LoadedConfig { path, config: None });
    };
    if !path_ref.exists() {
        return Ok(LoadedConfig { path, config: None });
    }

    let raw = fs::read_to_string(path_ref)
        .with_context(|| format!("Failed to read config file '{}'", path_ref.display()))?;
    let config = parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path_ref.display()))?;
    Ok(LoadedConfig {
        path,
        config: Some(config),
    })
}

/// Writes `config` to `path`, creating parent directories.
pub(crate) fn save_file_config(path: &Path, config: &FileConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory '{}'", parent.display()))?;
    }
    fs::write(path, config.render())
        .with_context(|| format!("Failed to write config file '{}'", path.display()))
}

pub(crate) fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };
        let key = raw_key.trim();
        let value = raw_value.trim();

        let invalid = || format!("Invalid `{key}` value on line {line_no}");
        match key {
            "enable_youtube" => cfg.enable_youtube = Some(parse_boolean(value).with_context(invalid)?),
            "enable_soundcloud" => {
                cfg.enable_soundcloud = Some(parse_boolean(value).with_context(invalid)?);
            }
            "enable_duckduckgo" => {
                cfg.enable_duckduckgo = Some(parse_boolean(value).with_context(invalid)?);
            }
            "enable_direct_file" => {
                cfg.enable_direct_file = Some(parse_boolean(value).with_context(invalid)?);
            }
            "allow_downloads" => {
                cfg.allow_downloads = Some(parse_boolean(value).with_context(invalid)?);
            }
            "max_results" => cfg.max_results = Some(parse_count(value).with_context(invalid)?),
            "search_depth" => cfg.search_depth = Some(parse_count(value).with_context(invalid)?),
            "max_threads" => cfg.max_threads = Some(parse_count(value).with_context(invalid)?),
            "resolve_threads" => {
                cfg.resolve_threads = Some(parse_count(value).with_context(invalid)?);
            }
            "download_dir" => {
                cfg.download_dir = Some(PathBuf::from(
                    parse_string_literal(value).with_context(invalid)?,
                ));
            }
            "setlist_domain" => {
                cfg.setlist_domain = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "yt_dlp" => {
                cfg.yt_dlp = Some(PathBuf::from(
                    parse_string_literal(value).with_context(invalid)?,
                ));
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    let mut escaped = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '\\' if in_string && !escaped => {
                escaped = true;
                continue;
            }
            '"' if !escaped => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
        escaped = false;
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    let inner = &raw_value[1..raw_value.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some(escaped @ ('\\' | '"')) => out.push(escaped),
                Some(other) => bail!("Unsupported escape sequence '\\{other}'"),
                None => bail!("Dangling backslash at end of string"),
            }
        } else {
            out.push(ch);
        }
    }
    Ok(out)
}

fn escape_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn parse_count(raw_value: &str) -> Result<usize> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    usize::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range"))
}

fn parse_boolean(raw_value: &str) -> Result<bool> {
    match raw_value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => bail!("Expected 'true' or 'false'"),
    }
}
