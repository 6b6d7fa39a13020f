//! Shared test utilities for the post-excerpt test suite.
//!
//! Node builders keep document fixtures readable, and the export helpers
//! write CMS `find` responses into a temp directory the way the content
//! store would export them.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let doc = root(vec![
//!     paragraph(vec![text("Hello "), bold("world")]),
//!     code_block(vec![text("fn main() {}")]),
//! ]);
//! ```

use serde_json::{Value, json};
use std::path::Path;

use crate::document::{Document, DocumentNode, Formatting};

// =========================================================================
// Node builders
// =========================================================================

pub fn text(value: &str) -> DocumentNode {
    DocumentNode::Text {
        text: Some(value.to_string()),
        format: Formatting::PLAIN,
    }
}

pub fn bold(value: &str) -> DocumentNode {
    DocumentNode::Text {
        text: Some(value.to_string()),
        format: Formatting {
            bold: true,
            italic: false,
        },
    }
}

pub fn italic(value: &str) -> DocumentNode {
    DocumentNode::Text {
        text: Some(value.to_string()),
        format: Formatting {
            bold: false,
            italic: true,
        },
    }
}

/// A text node as stored without its `text` field.
pub fn missing_text() -> DocumentNode {
    DocumentNode::Text {
        text: None,
        format: Formatting::PLAIN,
    }
}

pub fn paragraph(children: Vec<DocumentNode>) -> DocumentNode {
    DocumentNode::Paragraph { children }
}

pub fn code_block(children: Vec<DocumentNode>) -> DocumentNode {
    DocumentNode::CodeBlock { children }
}

pub fn code_inline(value: &str) -> DocumentNode {
    DocumentNode::CodeInline {
        text: Some(value.to_string()),
        children: Vec::new(),
    }
}

pub fn root(blocks: Vec<DocumentNode>) -> Document {
    Document::new(blocks)
}

/// A short post mixing formatting, inline code, and a code block.
pub fn sample_post() -> Document {
    root(vec![
        paragraph(vec![
            text("Intro with "),
            bold("bold"),
            text(" text and "),
            code_inline("cfg!"),
        ]),
        code_block(vec![text("fn main() {}")]),
    ])
}

// =========================================================================
// Export fixtures
// =========================================================================

/// Editor JSON for a document holding one paragraph of plain text.
pub fn paragraph_json(body: &str) -> Value {
    json!({
        "root": {
            "type": "root",
            "children": [
                { "type": "paragraph", "children": [
                    { "type": "text", "text": body, "format": 0 }
                ]}
            ]
        }
    })
}

/// One post document as returned by the content store.
pub fn post_json(slug: &str, published_at: &str, body: &str) -> Value {
    json!({
        "id": format!("id-{slug}"),
        "slug": slug,
        "title": slug.replace('-', " "),
        "content": paragraph_json(body),
        "publishedAt": published_at,
        "updatedAt": published_at,
        "views": 0,
    })
}

/// Write a `{ "docs": [...] }` export file into `dir`.
pub fn write_export(dir: &Path, filename: &str, docs: Vec<Value>) {
    let total = docs.len();
    let body = json!({ "docs": docs, "totalDocs": total });
    std::fs::write(
        dir.join(filename),
        serde_json::to_string_pretty(&body).unwrap(),
    )
    .unwrap();
}
