//! CLI output formatting.
//!
//! Each command has a `format_*` function returning lines (pure, testable)
//! and a `print_*` wrapper that writes them to stdout.
//!
//! ## Scan
//!
//! ```text
//! Exports
//! 001 posts.en.json (en, 3 posts)
//! 002 posts.ru.json (ru, 3 posts)
//! ```
//!
//! ## Build
//!
//! ```text
//! en
//! 001 hello-world: Hello world, this is a test.
//! 002 long-read: Once upon a time there was a very long... (truncated)
//! 003 blank: (no excerpt)
//!
//! Summarized 3 posts: 1 truncated, 1 without excerpt
//! ```

use crate::excerpts::ExcerptManifest;
use crate::normalize::{Fragment, Summary, truncate_with_ellipsis};
use crate::posts::Export;

/// Width at which display text is shortened in listings.
const LISTING_WIDTH: usize = 60;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Scan
// ============================================================================

pub fn format_scan_output(exports: &[Export]) -> Vec<String> {
    let mut lines = vec!["Exports".to_string()];
    if exports.is_empty() {
        lines.push(format!("{}(none found)", indent(1)));
    }
    for (i, export) in exports.iter().enumerate() {
        lines.push(format!(
            "{} {} ({}, {})",
            format_index(i + 1),
            export.path.display(),
            export.locale,
            plural(export.posts.len(), "post")
        ));
    }
    lines
}

pub fn print_scan_output(exports: &[Export]) {
    for line in format_scan_output(exports) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_output(manifest: &ExcerptManifest) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_locale: Option<&str> = None;
    let mut position = 0;

    for entry in &manifest.entries {
        if current_locale != Some(entry.locale.as_str()) {
            if current_locale.is_some() {
                lines.push(String::new());
            }
            lines.push(entry.locale.clone());
            current_locale = Some(entry.locale.as_str());
            position = 0;
        }
        position += 1;

        let detail = match &entry.excerpt {
            Some(summary) => listing_text(summary),
            None => "(no excerpt)".to_string(),
        };
        lines.push(format!("{} {}: {}", format_index(position), entry.slug, detail));
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Summarized {}: {} truncated, {} without excerpt",
        plural(manifest.entries.len(), "post"),
        manifest.truncated_count(),
        manifest.empty_count()
    ));
    lines
}

pub fn print_build_output(manifest: &ExcerptManifest) {
    for line in format_build_output(manifest) {
        println!("{}", line);
    }
}

fn listing_text(summary: &Summary) -> String {
    let text = truncate_with_ellipsis(&summary.display_text, LISTING_WIDTH);
    if summary.truncated {
        format!("{text} (truncated)")
    } else {
        text
    }
}

// ============================================================================
// Summarize
// ============================================================================

/// Plain-text report for a single document.
pub fn format_summary_output(summary: Option<&Summary>) -> Vec<String> {
    let Some(summary) = summary else {
        return vec!["(no excerpt)".to_string()];
    };
    let mut lines = vec![summary.display_text.clone()];
    let code_blocks = summary
        .fragments
        .iter()
        .filter(|f| matches!(f, Fragment::CodeBlock { .. }))
        .count();
    lines.push(format!(
        "{}{}, {}{}",
        indent(1),
        plural(summary.fragments.len(), "fragment"),
        plural(code_blocks, "code block"),
        if summary.truncated { ", truncated" } else { "" }
    ));
    lines
}

pub fn print_summary_output(summary: Option<&Summary>) {
    for line in format_summary_output(summary) {
        println!("{}", line);
    }
}
