//! Console output: queue listings, batch summaries and the interactive help.
//!
//! Each listing is built by a `*_lines` function so it can be tested without
//! capturing stdout.

use playlistdl_core::{BatchReport, Queue, Settings, TrackCandidate};

/// Shown when there is nothing to list or download.
pub(crate) const EMPTY_QUEUE: &str = "Queue is empty.";

/// Message when no input was provided in one-shot mode.
pub(crate) const NO_INPUT_GUIDANCE: &str =
    "No input provided. Pass links or search text as arguments, pipe them via stdin, or use --interactive.";

/// Example for passing inputs as arguments.
pub(crate) const INPUT_ARG_EXAMPLE: &str =
    "Example: playlistdl 'https://www.youtube.com/playlist?list=PL123'";

/// Interactive command reference.
pub(crate) const HELP_LINES: &[&str] = &[
    "Enter a link or search text to add tracks to the queue.",
    "Commands:",
    "  -d  select queue items and download them",
    "  -l  paste a list of titles and queue the ones found",
    "  -c  clear the queue (stops a running download)",
    "  -o  show and change options",
    "  -s  show the queue",
    "  -h  show this help",
    "  -e  exit",
];

/// Returns terminal width from COLUMNS, or 80 if unset/invalid.
pub(crate) fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 20)
        .unwrap_or(80)
}

/// Truncates text to at most `width` chars, appending ellipsis if truncated.
pub(crate) fn truncate_to_width(text: &str, width: usize) -> String {
    let text_len = text.chars().count();
    if text_len <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    if width == 1 {
        return "…".to_string();
    }

    let mut output: String = text.chars().take(width - 1).collect();
    output.push('…');
    output
}

fn candidate_line(position: usize, candidate: &TrackCandidate) -> String {
    match &candidate.url {
        Some(url) => format!("{position:>3}. [{}] {} <{url}>", candidate.source, candidate.title),
        None => format!("{position:>3}. [{}] {} (unresolved)", candidate.source, candidate.title),
    }
}

/// Numbered queue listing, one line per item, positions 1-based.
pub(crate) fn queue_lines(queue: &Queue, width: usize) -> Vec<String> {
    if queue.is_empty() {
        return vec![EMPTY_QUEUE.to_string()];
    }
    let mut lines: Vec<String> = queue
        .iter()
        .enumerate()
        .map(|(index, candidate)| truncate_to_width(&candidate_line(index + 1, candidate), width))
        .collect();
    lines.push(format!("{} item(s) queued", queue.len()));
    lines
}

/// Batch statistics followed by one line per failed item.
///
/// `titles` are the batch items' titles in batch order.
pub(crate) fn batch_summary_lines(report: &BatchReport, titles: &[String], width: usize) -> Vec<String> {
    let mut lines = vec![format!("Batch finished: {}", report.stats)];
    for (position, reason) in report.failures() {
        let title = titles.get(position).map_or("?", String::as_str);
        lines.push(truncate_to_width(&format!("  failed: {title}: {reason}"), width));
    }
    lines
}

/// Lists titles no URL was found for. Empty when everything resolved.
pub(crate) fn unresolved_lines(unresolved: &[String], width: usize) -> Vec<String> {
    if unresolved.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![format!("No match found for {} title(s):", unresolved.len())];
    lines.extend(
        unresolved
            .iter()
            .map(|title| truncate_to_width(&format!("  - {title}"), width)),
    );
    lines
}

/// Option names in the order shown by the interactive options menu.
pub(crate) const OPTION_NAMES: &[&str] = &[
    "enable_youtube",
    "enable_soundcloud",
    "enable_duckduckgo",
    "enable_direct_file",
    "allow_downloads",
    "max_results",
    "search_depth",
    "max_threads",
    "resolve_threads",
    "download_dir",
    "setlist_domain",
];

fn option_value(settings: &Settings, name: &str) -> String {
    match name {
        "enable_youtube" => on_off(settings.enable_youtube),
        "enable_soundcloud" => on_off(settings.enable_soundcloud),
        "enable_duckduckgo" => on_off(settings.enable_duckduckgo),
        "enable_direct_file" => on_off(settings.enable_direct_file),
        "allow_downloads" => on_off(settings.allow_downloads),
        "max_results" => settings.max_results.to_string(),
        "search_depth" => settings.search_depth.to_string(),
        "max_threads" => settings.max_threads.to_string(),
        "resolve_threads" => settings.resolve_threads.to_string(),
        "download_dir" => settings.download_dir.display().to_string(),
        "setlist_domain" => settings.setlist_domain.clone(),
        _ => String::new(),
    }
}

fn on_off(value: bool) -> String {
    if value { "on" } else { "off" }.to_string()
}

/// Numbered options listing plus the menu footer.
pub(crate) fn options_lines(settings: &Settings) -> Vec<String> {
    let mut lines: Vec<String> = OPTION_NAMES
        .iter()
        .enumerate()
        .map(|(index, name)| format!("{:>3}. {name:<20} {}", index + 1, option_value(settings, name)))
        .collect();
    lines.push("Number to change, 's' to save, empty line to go back.".to_string());
    lines
}

/// Prints lines to stdout.
pub(crate) fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

/// Prints no-input guidance for one-shot mode.
pub(crate) fn print_quick_start_guidance() {
    let width = terminal_width();
    println!("{}", truncate_to_width(NO_INPUT_GUIDANCE, width));
    println!("{}", truncate_to_width(INPUT_ARG_EXAMPLE, width));
}
