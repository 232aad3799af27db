//! Interactive prompt session.
//!
//! Any line that is not a command is routed and queued. Commands:
//! `-d` download a selection, `-l` paste a list, `-c` clear, `-o` options,
//! `-s` show the queue, `-h` help, `-e` exit.

use std::collections::VecDeque;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use playlistdl_core::config::{MAX_RESOLVE_THREADS, MAX_SEARCH_RESULTS, MAX_THREADS_LIMIT};
use playlistdl_core::{Selection, Session, Settings};
use tokio::io::{AsyncBufRead, Lines};
use tracing::{debug, warn};

use crate::app::config_manager::save_settings;
use crate::app::output::{self, OPTION_NAMES};
use crate::app::progress::BatchProgress;

const PROMPT: &str = "> ";

/// Prompt loop over a line source `R`, writing to `W`.
pub(crate) struct SessionLoop<R, W> {
    lines: Lines<R>,
    /// Lines typed while a download was running, replayed afterwards.
    pending: VecDeque<String>,
    out: W,
    config_path: Option<PathBuf>,
    yt_dlp: PathBuf,
    use_spinner: bool,
    handle_ctrl_c: bool,
    width: usize,
}

impl<R, W> SessionLoop<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub(crate) fn new(lines: Lines<R>, out: W, config_path: Option<PathBuf>, yt_dlp: PathBuf) -> Self {
        Self {
            lines,
            pending: VecDeque::new(),
            out,
            config_path,
            yt_dlp,
            use_spinner: false,
            handle_ctrl_c: false,
            width: output::terminal_width(),
        }
    }

    /// Enables the download spinner.
    pub(crate) fn with_spinner(mut self, use_spinner: bool) -> Self {
        self.use_spinner = use_spinner;
        self
    }

    /// Listens for Ctrl-C: at the prompt it asks to exit, during a download
    /// it stops the batch after the running items.
    pub(crate) fn with_ctrl_c(mut self, handle_ctrl_c: bool) -> Self {
        self.handle_ctrl_c = handle_ctrl_c;
        self
    }

    #[cfg(test)]
    pub(crate) fn into_output(self) -> W {
        self.out
    }

    /// Runs until `-e` is confirmed or input ends.
    pub(crate) async fn run(&mut self, session: &mut Session) -> Result<()> {
        writeln!(self.out, "playlistdl interactive session. Type -h for help.")?;
        loop {
            self.prompt(PROMPT)?;
            let line = if let Some(line) = self.pending.pop_front() {
                Some(line)
            } else {
                let handle_ctrl_c = self.handle_ctrl_c;
                tokio::select! {
                    line = self.lines.next_line() => line.context("Failed to read input")?,
                    () = interrupted(handle_ctrl_c) => {
                        writeln!(self.out)?;
                        if self.confirm("Exit? [y/N] ").await? {
                            break;
                        }
                        continue;
                    }
                }
            };
            let Some(line) = line else {
                debug!("input closed");
                break;
            };

            match line.trim() {
                "" => {}
                "-d" => self.download(session).await?,
                "-l" => self.paste_list(session).await?,
                "-c" => {
                    session.clear();
                    writeln!(self.out, "Queue cleared.")?;
                }
                "-o" => self.options(session.settings_mut()).await?,
                "-s" => self.write_lines(&output::queue_lines(session.queue(), self.width))?,
                "-h" => {
                    for line in output::HELP_LINES {
                        writeln!(self.out, "{line}")?;
                    }
                }
                "-e" => {
                    if self.confirm("Exit? [y/N] ").await? {
                        break;
                    }
                }
                input => {
                    let added = session.ingest(input).await;
                    writeln!(
                        self.out,
                        "Added {added} item(s); {} queued.",
                        session.queue().len()
                    )?;
                }
            }
        }
        Ok(())
    }

    async fn read_line(&mut self) -> Result<Option<String>> {
        if let Some(line) = self.pending.pop_front() {
            return Ok(Some(line));
        }
        self.lines.next_line().await.context("Failed to read input")
    }

    fn prompt(&mut self, text: &str) -> Result<()> {
        write!(self.out, "{text}")?;
        self.out.flush()?;
        Ok(())
    }

    fn write_lines(&mut self, lines: &[String]) -> Result<()> {
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    /// Asks a yes/no question; end of input counts as yes.
    async fn confirm(&mut self, question: &str) -> Result<bool> {
        self.prompt(question)?;
        Ok(self
            .read_line()
            .await?
            .is_none_or(|answer| is_yes(&answer)))
    }

    async fn download(&mut self, session: &mut Session) -> Result<()> {
        if session.queue().is_empty() {
            writeln!(self.out, "{}", output::EMPTY_QUEUE)?;
            return Ok(());
        }
        self.write_lines(&output::queue_lines(session.queue(), self.width))?;
        self.prompt("Select items (e.g. 1,3-5; empty for all): ")?;
        let Some(expr) = self.read_line().await? else {
            return Ok(());
        };
        let selection = Selection::parse(&expr, session.queue().len());
        if selection.is_empty() {
            writeln!(self.out, "Nothing selected.")?;
            return Ok(());
        }

        let question = format!(
            "Download {} item(s) to {}? [y/N] ",
            selection.len(),
            session.settings().download_dir.display()
        );
        self.prompt(&question)?;
        let confirmed = self.read_line().await?.is_some_and(|answer| is_yes(&answer));
        if !confirmed {
            writeln!(self.out, "Cancelled.")?;
            return Ok(());
        }

        let titles: Vec<String> = session
            .queue()
            .snapshot(&selection)
            .into_iter()
            .map(|candidate| candidate.title)
            .collect();
        let stop = session.stop_flag();
        let ctrl_c = self.handle_ctrl_c.then(|| {
            let stop = stop.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupted; finishing downloads already running");
                    stop.request_stop();
                }
            })
        });

        let progress = BatchProgress::start(self.use_spinner, selection.len());
        let mut clear_requested = false;
        let mut input_closed = false;
        let result = {
            let download = session.download(&selection, Some(progress.callback()));
            tokio::pin!(download);
            loop {
                tokio::select! {
                    biased;
                    result = &mut download => break result,
                    line = self.lines.next_line(), if !input_closed => match line {
                        Ok(Some(line)) if line.trim() == "-c" => {
                            stop.request_stop();
                            clear_requested = true;
                            writeln!(self.out, "Stopping after running downloads; the queue will be cleared.")?;
                        }
                        Ok(Some(line)) => self.pending.push_back(line),
                        Ok(None) | Err(_) => input_closed = true,
                    },
                }
            }
        };
        progress.finish();
        if let Some(handle) = ctrl_c {
            handle.abort();
        }

        match result {
            Ok(report) => {
                let lines = output::batch_summary_lines(&report, &titles, self.width);
                self.write_lines(&lines)?;
            }
            Err(err) => writeln!(self.out, "Download not started: {err}")?,
        }
        if clear_requested {
            session.clear();
            writeln!(self.out, "Queue cleared.")?;
        }
        Ok(())
    }

    async fn paste_list(&mut self, session: &mut Session) -> Result<()> {
        writeln!(self.out, "Paste titles, one per line. End with an empty line.")?;
        let mut pasted = Vec::new();
        while let Some(line) = self.read_line().await? {
            if line.trim().is_empty() {
                break;
            }
            pasted.push(line);
        }
        if pasted.is_empty() {
            writeln!(self.out, "Nothing pasted.")?;
            return Ok(());
        }

        let ingest = session.ingest_list(&pasted.join("\n")).await;
        writeln!(
            self.out,
            "Queued {} of {} title(s).",
            ingest.queued, ingest.titles
        )?;
        let lines = output::unresolved_lines(&ingest.unresolved, self.width);
        self.write_lines(&lines)
    }

    async fn options(&mut self, settings: &mut Settings) -> Result<()> {
        loop {
            self.write_lines(&output::options_lines(settings))?;
            self.prompt("option> ")?;
            let Some(choice) = self.read_line().await? else {
                return Ok(());
            };
            let choice = choice.trim();
            if choice.is_empty() {
                return Ok(());
            }
            if choice.eq_ignore_ascii_case("s") {
                self.save(settings)?;
                continue;
            }

            let Some(name) = choice
                .parse::<usize>()
                .ok()
                .and_then(|number| number.checked_sub(1))
                .and_then(|index| OPTION_NAMES.get(index).copied())
            else {
                writeln!(self.out, "Unknown option '{choice}'.")?;
                continue;
            };

            let value = if is_toggle(name) {
                None
            } else {
                self.prompt(&format!("New value for {name}: "))?;
                match self.read_line().await? {
                    Some(value) if !value.trim().is_empty() => Some(value),
                    _ => continue,
                }
            };
            if let Err(message) = apply_option(settings, name, value.as_deref()) {
                writeln!(self.out, "{message}")?;
            }
        }
    }

    fn save(&mut self, settings: &Settings) -> Result<()> {
        let Some(path) = self.config_path.clone() else {
            writeln!(self.out, "No settings file location; set HOME or XDG_CONFIG_HOME.")?;
            return Ok(());
        };
        match save_settings(&path, settings, &self.yt_dlp) {
            Ok(()) => writeln!(self.out, "Settings saved to {}.", path.display())?,
            Err(err) => writeln!(self.out, "Could not save settings: {err:#}")?,
        }
        Ok(())
    }
}

async fn interrupted(enabled: bool) {
    if enabled && tokio::signal::ctrl_c().await.is_ok() {
        return;
    }
    std::future::pending::<()>().await;
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn is_toggle(name: &str) -> bool {
    name.starts_with("enable_") || name == "allow_downloads"
}

/// Toggles a boolean option, or sets `name` from `value`.
///
/// Returns a user-facing message when the value is rejected.
pub(crate) fn apply_option(
    settings: &mut Settings,
    name: &str,
    value: Option<&str>,
) -> Result<(), String> {
    let value = value.map(str::trim);
    match (name, value) {
        ("enable_youtube", _) => settings.enable_youtube = !settings.enable_youtube,
        ("enable_soundcloud", _) => settings.enable_soundcloud = !settings.enable_soundcloud,
        ("enable_duckduckgo", _) => settings.enable_duckduckgo = !settings.enable_duckduckgo,
        ("enable_direct_file", _) => settings.enable_direct_file = !settings.enable_direct_file,
        ("allow_downloads", _) => settings.allow_downloads = !settings.allow_downloads,
        ("max_results", Some(raw)) => {
            settings.max_results = parse_in_range(name, raw, MAX_SEARCH_RESULTS)?;
        }
        ("search_depth", Some(raw)) => {
            settings.search_depth = parse_in_range(name, raw, MAX_SEARCH_RESULTS)?;
        }
        ("max_threads", Some(raw)) => {
            settings.max_threads = parse_in_range(name, raw, MAX_THREADS_LIMIT)?;
        }
        ("resolve_threads", Some(raw)) => {
            settings.resolve_threads = parse_in_range(name, raw, MAX_RESOLVE_THREADS)?;
        }
        ("download_dir", Some(raw)) if !raw.is_empty() => settings.download_dir = PathBuf::from(raw),
        ("setlist_domain", Some(raw)) if !raw.is_empty() => {
            settings.setlist_domain = raw.to_string();
        }
        _ => return Err(format!("No value given for {name}.")),
    }
    Ok(())
}

fn parse_in_range(name: &str, raw: &str, max: usize) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(value) if (1..=max).contains(&value) => Ok(value),
        _ => Err(format!("{name} must be a number between 1 and {max}.")),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use tempfile::TempDir;
    use tokio::io::{AsyncBufReadExt, BufReader};

    use super::*;
    use crate::app::test_session::test_session;

    async fn run_script(session: &mut Session, script: &str, config: Option<PathBuf>) -> String {
        let lines = BufReader::new(script.as_bytes()).lines();
        let mut session_loop = SessionLoop::new(lines, Vec::new(), config, PathBuf::from("yt-dlp"));
        session_loop.run(session).await.unwrap();
        String::from_utf8(session_loop.into_output()).unwrap()
    }

    #[tokio::test]
    async fn test_text_is_queued_and_listed() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(dir.path());

        let out = run_script(&mut session, "first song\nsecond song\n-s\n", None).await;

        assert_eq!(session.queue().len(), 2);
        assert!(out.contains("Added 1 item(s); 2 queued."));
        assert!(out.contains("  2. [youtube] second song <https://youtu.be/second-song>"));
    }

    #[tokio::test]
    async fn test_download_selection_after_confirmation() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(dir.path());

        let out = run_script(&mut session, "one\ntwo\nthree\n-d\n1,3\ny\n-s\n", None).await;

        assert!(out.contains("Batch finished: 2 total, 2 downloaded, 0 failed, 0 skipped"));
        let left: Vec<&str> = session.queue().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(left, vec!["two"]);
    }

    #[tokio::test]
    async fn test_download_declined_keeps_queue() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(dir.path());

        let out = run_script(&mut session, "one\n-d\n\nn\n", None).await;

        assert!(out.contains("Cancelled."));
        assert_eq!(session.queue().len(), 1);
    }

    #[tokio::test]
    async fn test_download_reports_failures_and_keeps_them() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(dir.path());

        let out = run_script(&mut session, "good\nbroken song\n-d\n\nyes\n", None).await;

        assert!(out.contains("1 downloaded, 1 failed"));
        assert!(out.contains("failed: broken song:"));
        assert_eq!(session.queue().len(), 1);
    }

    #[tokio::test]
    async fn test_download_on_empty_queue() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(dir.path());

        let out = run_script(&mut session, "-d\n", None).await;

        assert!(out.contains(output::EMPTY_QUEUE));
    }

    #[tokio::test]
    async fn test_clear_command() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(dir.path());

        let out = run_script(&mut session, "one\ntwo\n-c\n", None).await;

        assert!(out.contains("Queue cleared."));
        assert!(session.queue().is_empty());
    }

    #[tokio::test]
    async fn test_clear_typed_during_download_empties_queue() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(dir.path());

        run_script(&mut session, "one\nbroken song\n-d\n\ny\n-c\n", None).await;

        assert!(session.queue().is_empty());
    }

    #[tokio::test]
    async fn test_paste_list_queues_resolved_titles() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(dir.path());

        let out = run_script(&mut session, "-l\n1. Song A\n2. Song Z\n\n-s\n", None).await;

        assert!(out.contains("Queued 1 of 2 title(s)."));
        assert!(out.contains("  - Song Z"));
        assert_eq!(session.queue().len(), 1);
        assert_eq!(
            session.queue().items()[0].url.as_deref(),
            Some("https://youtu.be/song-a")
        );
    }

    #[tokio::test]
    async fn test_options_toggle_set_and_save() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("conf").join("config.toml");
        let mut session = test_session(dir.path());

        let out = run_script(
            &mut session,
            "-o\n1\n8\n99\n8\n3\ns\n\n",
            Some(config.clone()),
        )
        .await;

        assert!(!session.settings().enable_youtube);
        assert_eq!(session.settings().max_threads, 3);
        assert!(out.contains("max_threads must be a number between 1 and 8."));
        assert!(out.contains("Settings saved to"));
        let saved = std::fs::read_to_string(&config).unwrap();
        assert!(saved.contains("enable_youtube = false"));
        assert!(saved.contains("max_threads = 3"));
    }

    #[tokio::test]
    async fn test_options_unknown_choice() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(dir.path());

        let out = run_script(&mut session, "-o\n42\n\n", None).await;

        assert!(out.contains("Unknown option '42'."));
    }

    #[tokio::test]
    async fn test_exit_needs_confirmation() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(dir.path());

        let out = run_script(&mut session, "-e\nn\none\n-e\ny\ntwo\n", None).await;

        assert_eq!(session.queue().len(), 1);
        assert!(out.contains("Exit? [y/N] "));
    }

    #[tokio::test]
    async fn test_help_lists_commands() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(dir.path());

        let out = run_script(&mut session, "-h\n", None).await;

        for command in ["-d", "-l", "-c", "-o", "-s", "-h", "-e"] {
            assert!(out.contains(&format!("  {command}  ")), "missing {command}");
        }
    }

    #[test]
    fn test_apply_option_rules() {
        let mut settings = Settings::default();
        apply_option(&mut settings, "allow_downloads", None).unwrap();
        assert!(!settings.allow_downloads);
        apply_option(&mut settings, "search_depth", Some(" 12 ")).unwrap();
        assert_eq!(settings.search_depth, 12);
        assert!(apply_option(&mut settings, "max_results", Some("0")).is_err());
        assert!(apply_option(&mut settings, "resolve_threads", Some("x")).is_err());
        assert!(apply_option(&mut settings, "setlist_domain", Some("  ")).is_err());
        apply_option(&mut settings, "download_dir", Some("/tmp/music")).unwrap();
        assert_eq!(settings.download_dir, Path::new("/tmp/music"));
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
    }
}
