//! # Post Excerpt
//!
//! Preview excerpts for a localized blog whose posts live in a headless CMS.
//! Post bodies are stored as rich-text editor documents; list pages need a
//! short plain-text preview of each one, with code shown distinctly.
//!
//! # Pipeline
//!
//! ```text
//! 1. Scan       content/*.json  →  Vec<Export>      (store exports → posts per locale)
//! 2. Summarize  Vec<Export>     →  ExcerptManifest  (rich text → display text + fragments)
//! 3. Write      ExcerptManifest →  dist/excerpts.json
//! ```
//!
//! The core is [`normalize`]: a pure function from a borrowed document tree
//! to a [`normalize::Summary`]. Everything around it is I/O and formatting.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`document`] | Rich-text node model and lenient decoding of editor JSON |
//! | [`normalize`] | Plain text, render fragments, and summaries |
//! | [`html`] | Maud rendering of fragments and summaries |
//! | [`posts`] | Reads content store exports (`find` responses) per locale |
//! | [`excerpts`] | Summarizes all posts in parallel into the excerpt manifest |
//! | [`config`] | `config.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Typed Nodes, Lenient Decoding
//!
//! The editor's JSON is loosely shaped. Rather than probing optional fields
//! at every step, [`document::DocumentNode`] has one variant per node kind,
//! each with only its own fields. All the tolerance for missing or odd fields
//! lives in one place, the decoder, which never fails on shape.
//!
//! ## Two Independent Cutoffs
//!
//! Code blocks are shortened to a fixed snippet length
//! ([`normalize::CODE_SNIPPET_LIMIT`]) wherever they appear; the whole
//! summary is cut to a caller-chosen `max_length`. The two never interact:
//! see the [`normalize`] module docs.
//!
//! ## No Excerpt Is Not an Error
//!
//! A post whose body has no visible text summarizes to `None`. The manifest
//! keeps the entry and the HTML shows a placeholder.

pub mod config;
pub mod document;
pub mod excerpts;
pub mod html;
pub mod normalize;
pub mod output;
pub mod posts;

#[cfg(test)]
pub(crate) mod test_helpers;
