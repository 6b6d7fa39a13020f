//! Excerpt manifest generation.
//!
//! Turns scanned exports into `excerpts.json`: one entry per post and
//! locale with the summary and its pre-rendered HTML, ready for the site's
//! list pages.
//!
//! ```json
//! { "maxLength": 200, "codeSnippetLimit": 50,
//!   "entries": [ { "slug": "hello", "locale": "en", "collection": "posts",
//!                  "title": "Hello", "publishedAt": "2024-03-01",
//!                  "excerpt": { "displayText": "..", "truncated": false, "fragments": [..] },
//!                  "html": "<div class=\"excerpt\">..</div>" } ] }
//! ```
//!
//! Posts are summarized in parallel with [rayon](https://docs.rs/rayon); the
//! normalizer is a pure function over borrowed trees, so workers share
//! nothing. Entries are sorted by locale, then newest first, then slug, so
//! the manifest is stable across runs.

use crate::config::ExcerptConfig;
use crate::html;
use crate::normalize::Summary;
use crate::posts::{Export, Post};
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name of the manifest inside the output directory.
pub const MANIFEST_FILENAME: &str = "excerpts.json";

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcerptManifest {
    /// Summary limit used, `None` when truncation was disabled.
    pub max_length: Option<usize>,
    pub code_snippet_limit: usize,
    pub entries: Vec<ExcerptEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcerptEntry {
    pub slug: String,
    pub locale: String,
    pub collection: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    /// `None` when the post has no visible text.
    pub excerpt: Option<Summary>,
    pub html: String,
}

impl ExcerptManifest {
    pub fn truncated_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.excerpt.as_ref().is_some_and(|s| s.truncated))
            .count()
    }

    pub fn empty_count(&self) -> usize {
        self.entries.iter().filter(|e| e.excerpt.is_none()).count()
    }
}

/// Summarize every post of every export.
pub fn build_excerpts(exports: &[Export], config: &ExcerptConfig) -> ExcerptManifest {
    let normalizer = config.normalizer();
    let max_length = config.max_length();

    let work: Vec<(&Export, &Post)> = exports
        .iter()
        .flat_map(|export| export.posts.iter().map(move |post| (export, post)))
        .collect();

    let mut entries: Vec<ExcerptEntry> = work
        .par_iter()
        .map(|(export, post)| {
            let excerpt = normalizer.summarize(&post.content, max_length);
            let html = html::render_excerpt(excerpt.as_ref()).into_string();
            ExcerptEntry {
                slug: post.slug.clone(),
                locale: export.locale.clone(),
                collection: export.collection.clone(),
                title: post.title.clone(),
                published_at: post.published_at.clone(),
                excerpt,
                html,
            }
        })
        .collect();

    entries.sort_by(compare_entries);

    ExcerptManifest {
        max_length,
        code_snippet_limit: normalizer.code_snippet_limit(),
        entries,
    }
}

/// Locale ascending, then publish date descending (undated last), then slug.
fn compare_entries(a: &ExcerptEntry, b: &ExcerptEntry) -> Ordering {
    a.locale
        .cmp(&b.locale)
        .then_with(|| b.published_at.cmp(&a.published_at))
        .then_with(|| a.slug.cmp(&b.slug))
}

/// Write the manifest as pretty JSON into `output_dir`.
pub fn write_manifest(manifest: &ExcerptManifest, output_dir: &Path) -> Result<(), BuildError> {
    fs::create_dir_all(output_dir)?;
    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(output_dir.join(MANIFEST_FILENAME), json)?;
    Ok(())
}
