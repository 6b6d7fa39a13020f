//! Content store exports and post decoding.
//!
//! The CMS answers `find(collection, { locale })` with a paginated envelope:
//!
//! ```json
//! { "docs": [ { "id": "..", "slug": "hello", "title": "Hello",
//!               "content": { "root": { .. } },
//!               "publishedAt": "2024-03-01T09:00:00.000Z", "views": 12 } ],
//!   "totalDocs": 1, "page": 1 }
//! ```
//!
//! One response per locale is saved into the source directory as
//! `<collection>.<locale>.json`:
//!
//! ```text
//! content/
//! ├── config.toml        # Optional, see config module
//! ├── posts.en.json      # find("posts", locale=en)
//! ├── posts.ru.json      # find("posts", locale=ru)
//! └── pages.json         # No suffix → default locale
//! ```
//!
//! Documents are decoded one at a time. Only the fields the excerpts need are
//! read; anything else on the document (`id`, `views`, `updatedAt`, ..) is
//! ignored whatever its type. Optional text fields of the wrong type decode as
//! absent. A document without a string `slug` is skipped with a warning and
//! the rest of the export is kept.

use crate::config::LocaleConfig;
use crate::document::Document;
use log::{debug, warn};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Invalid export {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// A post as stored by the content store, for one locale.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub slug: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    /// Rich-text body; decoded leniently, absent bodies are empty documents.
    #[serde(default)]
    pub content: Document,
    #[serde(default, deserialize_with = "lenient_string")]
    pub published_at: Option<String>,
}

/// Optional string field: any non-string value decodes as `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Envelope returned by the store's `find`.
#[derive(Debug, Deserialize)]
struct FindResponse {
    #[serde(default)]
    docs: Vec<Value>,
}

/// All posts from one export file.
#[derive(Debug, Clone)]
pub struct Export {
    /// Path relative to the source directory.
    pub path: PathBuf,
    pub collection: String,
    pub locale: String,
    pub posts: Vec<Post>,
}

/// Split an export file stem into `(collection, locale)`.
///
/// - `"posts.en"` → `("posts", "en")` when `en` is an available locale
/// - `"posts"` → `("posts", default)`
/// - `"posts.backup"` → `("posts.backup", default)`
pub fn parse_export_name(stem: &str, locales: &LocaleConfig) -> (String, String) {
    if let Some((collection, suffix)) = stem.rsplit_once('.')
        && !collection.is_empty()
        && locales.is_available(suffix)
    {
        return (collection.to_string(), suffix.to_string());
    }
    (stem.to_string(), locales.default.clone())
}

/// Decode the documents of a `find` response into posts, skipping documents
/// that are not posts.
pub fn parse_posts(json: &str) -> Result<Vec<Post>, serde_json::Error> {
    let response: FindResponse = serde_json::from_str(json)?;
    let posts = response
        .docs
        .into_iter()
        .enumerate()
        .filter_map(|(idx, doc)| match serde_json::from_value::<Post>(doc) {
            Ok(post) => Some(post),
            Err(e) => {
                warn!("skipping document {idx}: {e}");
                None
            }
        })
        .collect();
    Ok(posts)
}

/// Read one export file.
pub fn read_export(
    path: &Path,
    root: &Path,
    locales: &LocaleConfig,
) -> Result<Export, ScanError> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let (collection, locale) = parse_export_name(&stem, locales);
    let content = fs::read_to_string(path)?;
    let posts = parse_posts(&content).map_err(|source| ScanError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        "read {} posts from {} ({collection}, {locale})",
        posts.len(),
        path.display()
    );

    Ok(Export {
        path: path.strip_prefix(root).unwrap_or(path).to_path_buf(),
        collection,
        locale,
        posts,
    })
}

/// Find and read every `*.json` export under `root`, sorted by path.
pub fn scan_exports(root: &Path, locales: &LocaleConfig) -> Result<Vec<Export>, ScanError> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && is_json(path) {
            paths.push(path.to_path_buf());
        }
    }

    paths
        .iter()
        .map(|path| read_export(path, root, locales))
        .collect()
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}
