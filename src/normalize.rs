//! Rich-text normalization: plain text, render fragments, and summaries.
//!
//! A post body is a [`Document`] tree. Previews need two things from it:
//!
//! - a **plain-text** rendition, used to measure the post and build the
//!   (possibly truncated) display text, and
//! - a flat sequence of **fragments**, used to render the preview with
//!   formatting and code treatment intact.
//!
//! [`summarize`] produces both in one [`Summary`].
//!
//! ## Two cutoffs
//!
//! Code blocks are cut to [`CODE_SNIPPET_LIMIT`] characters wherever they
//! appear, in plain text and in fragments alike. The whole summary is cut to
//! the caller's `max_length`. The two limits are applied separately: a long
//! code block is shortened even when the summary has room to spare, and a
//! short code block stays whole even when the summary is truncated.
//!
//! ```text
//! root ─┬─ paragraph ── text "Hello "           plain: "Hello world [code: fn main() {}]"
//!       ├─ paragraph ── text "world"   ──────►  fragments: [text "Hello ", text "world",
//!       └─ code ─────── text "fn main() {}"                  codeBlock "fn main() {}"]
//! ```
//!
//! All lengths count `char`s, so truncation never splits a character.
//!
//! Nothing here can fail: nodes with missing text or children contribute
//! empty strings and the rest of the tree renders normally.

use crate::document::{Document, DocumentNode, Formatting};
use serde::Serialize;

/// Maximum characters of a code block shown in a preview.
pub const CODE_SNIPPET_LIMIT: usize = 50;

/// Summary length used by the site's post previews.
pub const DEFAULT_MAX_LENGTH: usize = 200;

/// Appended to any truncated text.
pub const ELLIPSIS: &str = "...";

/// A renderable piece of a flattened document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Fragment {
    Text {
        value: String,
        #[serde(skip_serializing_if = "Formatting::is_plain")]
        format: Formatting,
    },
    /// Code block text, already cut to the snippet limit.
    CodeBlock { value: String },
    CodeInline { value: String },
}

impl Fragment {
    pub fn value(&self) -> &str {
        match self {
            Fragment::Text { value, .. }
            | Fragment::CodeBlock { value }
            | Fragment::CodeInline { value } => value,
        }
    }
}

/// Preview of a document: display text plus the fragments to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub fragments: Vec<Fragment>,
    pub display_text: String,
    pub truncated: bool,
}

/// Normalizer with a configurable code-snippet limit.
///
/// The free functions [`extract_plain_text`], [`render_node`] and
/// [`summarize`] use [`Normalizer::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalizer {
    code_snippet_limit: usize,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            code_snippet_limit: CODE_SNIPPET_LIMIT,
        }
    }
}

impl Normalizer {
    pub fn new(code_snippet_limit: usize) -> Self {
        Self { code_snippet_limit }
    }

    pub fn code_snippet_limit(&self) -> usize {
        self.code_snippet_limit
    }

    /// Plain text of a node. See [`extract_plain_text`].
    pub fn plain_text(&self, node: &DocumentNode) -> String {
        match node {
            DocumentNode::CodeBlock { .. } => format!("[code: {}]", self.code_snippet(node)),
            DocumentNode::CodeInline { .. } => inline_code_text(node).to_string(),
            DocumentNode::Text { text, .. } => text.clone().unwrap_or_default(),
            DocumentNode::Paragraph { children } | DocumentNode::Generic { children } => children
                .iter()
                .map(|child| self.plain_text(child))
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    /// Flattened fragments of a node. See [`render_node`].
    pub fn render(&self, node: &DocumentNode) -> Vec<Fragment> {
        let mut fragments = Vec::new();
        self.render_into(node, &mut fragments);
        fragments
    }

    fn render_into(&self, node: &DocumentNode, out: &mut Vec<Fragment>) {
        match node {
            DocumentNode::CodeBlock { .. } => out.push(Fragment::CodeBlock {
                value: self.code_snippet(node),
            }),
            DocumentNode::CodeInline { .. } => out.push(Fragment::CodeInline {
                value: inline_code_text(node).to_string(),
            }),
            DocumentNode::Text { text, format } => out.push(Fragment::Text {
                value: text.clone().unwrap_or_default(),
                format: *format,
            }),
            DocumentNode::Paragraph { children } | DocumentNode::Generic { children } => {
                for child in children {
                    self.render_into(child, out);
                }
            }
        }
    }

    /// Summarize a document for previews. See [`summarize`].
    pub fn summarize(&self, document: &Document, max_length: Option<usize>) -> Option<Summary> {
        let blocks = document.blocks();
        if blocks.is_empty() {
            return None;
        }

        // Blocks are trimmed at their edges only; code newlines and interior
        // spacing count toward the length.
        let full_text = blocks
            .iter()
            .map(|block| self.plain_text(block))
            .filter_map(|text| {
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            })
            .collect::<Vec<_>>()
            .join(" ");
        if full_text.is_empty() {
            return None;
        }

        let (display_text, truncated) = match max_length {
            Some(max) if full_text.chars().count() > max => {
                (format!("{}{ELLIPSIS}", take_chars(&full_text, max)), true)
            }
            _ => (full_text, false),
        };

        Some(Summary {
            fragments: self.render(&document.root),
            display_text,
            truncated,
        })
    }

    /// Newline-joined descendant text of a code block, cut to the snippet limit.
    fn code_snippet(&self, node: &DocumentNode) -> String {
        let mut lines = Vec::new();
        collect_text(node, &mut lines);
        truncate_with_ellipsis(&lines.join("\n"), self.code_snippet_limit)
    }
}

/// Plain-text rendition of a node.
///
/// - code block: `[code: <snippet>]`, snippet cut to [`CODE_SNIPPET_LIMIT`]
/// - inline code: its own text, else its first child's text
/// - text: the literal text
/// - containers: children joined with single spaces
pub fn extract_plain_text(node: &DocumentNode) -> String {
    Normalizer::default().plain_text(node)
}

/// Flatten a node into render fragments, in document order.
pub fn render_node(node: &DocumentNode) -> Vec<Fragment> {
    Normalizer::default().render(node)
}

/// Build a preview of `document`, truncating the display text to
/// `max_length` characters (plus [`ELLIPSIS`]) when set.
///
/// Returns `None` when the document has no blocks or no visible text. That
/// is the "nothing to preview" signal, not an error.
pub fn summarize(document: &Document, max_length: Option<usize>) -> Option<Summary> {
    Normalizer::default().summarize(document, max_length)
}

fn inline_code_text(node: &DocumentNode) -> &str {
    node.own_text()
        .or_else(|| node.children().first().and_then(DocumentNode::own_text))
        .unwrap_or_default()
}

fn collect_text<'a>(node: &'a DocumentNode, out: &mut Vec<&'a str>) {
    match node {
        DocumentNode::Text { text, .. } => {
            if let Some(text) = text {
                out.push(text);
            }
        }
        DocumentNode::CodeInline {
            text: Some(text), ..
        } => out.push(text),
        other => {
            for child in other.children() {
                collect_text(child, out);
            }
        }
    }
}

/// First `max` chars of `text`, borrowing.
fn take_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
pub fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        format!("{}{ELLIPSIS}", take_chars(text, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    // =========================================================================
    // extract_plain_text
    // =========================================================================

    #[test]
    fn plain_text_of_text_node_is_literal() {
        assert_eq!(extract_plain_text(&text("Hello")), "Hello");
    }

    #[test]
    fn plain_text_joins_children_with_spaces() {
        let node = paragraph(vec![text("one"), bold("two"), text("three")]);
        assert_eq!(extract_plain_text(&node), "one two three");
    }

    #[test]
    fn plain_text_wraps_code_block() {
        let node = code_block(vec![text("let a = 1;"), text("let b = 2;")]);
        assert_eq!(extract_plain_text(&node), "[code: let a = 1;\nlet b = 2;]");
    }

    #[test]
    fn plain_text_truncates_long_code_block() {
        let node = code_block(vec![text(&"x".repeat(80))]);
        let expected = format!("[code: {}...]", "x".repeat(50));
        assert_eq!(extract_plain_text(&node), expected);
    }

    #[test]
    fn plain_text_inline_code_is_not_wrapped_or_truncated() {
        let long = "y".repeat(120);
        assert_eq!(extract_plain_text(&code_inline(&long)), long);
    }

    #[test]
    fn plain_text_inline_code_falls_back_to_first_child() {
        let node = DocumentNode::CodeInline {
            text: None,
            children: vec![text("first"), text("second")],
        };
        assert_eq!(extract_plain_text(&node), "first");

        let empty = DocumentNode::CodeInline {
            text: None,
            children: vec![],
        };
        assert_eq!(extract_plain_text(&empty), "");
    }

    #[test]
    fn plain_text_of_empty_container_is_empty() {
        assert_eq!(extract_plain_text(&paragraph(vec![])), "");
        assert_eq!(extract_plain_text(&DocumentNode::empty()), "");
    }

    #[test]
    fn plain_text_is_idempotent() {
        let doc = sample_post();
        let first = extract_plain_text(&doc.root);
        let second = extract_plain_text(&doc.root);
        assert_eq!(first, second);
    }

    #[test]
    fn plain_text_tolerates_text_without_text() {
        let node = paragraph(vec![text("before"), missing_text(), text("after")]);
        assert_eq!(extract_plain_text(&node), "before  after");
    }

    // =========================================================================
    // render_node
    // =========================================================================

    #[test]
    fn render_flattens_in_document_order() {
        let doc = sample_post();
        let fragments = render_node(&doc.root);
        let values: Vec<&str> = fragments.iter().map(Fragment::value).collect();
        assert_eq!(
            values,
            vec!["Intro with ", "bold", " text and ", "cfg!", "fn main() {}"]
        );
    }

    #[test]
    fn render_keeps_formatting_on_text() {
        let fragments = render_node(&paragraph(vec![bold("B"), italic("I")]));
        assert_eq!(
            fragments,
            vec![
                Fragment::Text {
                    value: "B".into(),
                    format: Formatting {
                        bold: true,
                        italic: false
                    },
                },
                Fragment::Text {
                    value: "I".into(),
                    format: Formatting {
                        bold: false,
                        italic: true
                    },
                },
            ]
        );
    }

    #[test]
    fn render_code_block_cuts_at_fifty_regardless_of_summary_length() {
        let doc = root(vec![code_block(vec![text(&"a".repeat(60))])]);
        let summary = summarize(&doc, Some(10_000)).unwrap();
        assert_eq!(
            summary.fragments,
            vec![Fragment::CodeBlock {
                value: format!("{}...", "a".repeat(50)),
            }]
        );
    }

    #[test]
    fn render_short_code_block_is_whole_even_when_summary_truncates() {
        let doc = root(vec![
            paragraph(vec![text(&"word ".repeat(20))]),
            code_block(vec![text("ok()")]),
        ]);
        let summary = summarize(&doc, Some(10)).unwrap();
        assert!(summary.truncated);
        assert_eq!(
            summary.fragments.last(),
            Some(&Fragment::CodeBlock {
                value: "ok()".into()
            })
        );
    }

    #[test]
    fn render_code_block_exactly_at_limit_is_untouched() {
        let fragments = render_node(&code_block(vec![text(&"b".repeat(50))]));
        assert_eq!(fragments[0].value(), "b".repeat(50));
    }

    #[test]
    fn render_inline_code_is_untruncated() {
        let long = "z".repeat(70);
        assert_eq!(
            render_node(&code_inline(&long)),
            vec![Fragment::CodeInline { value: long }]
        );
    }

    #[test]
    fn render_malformed_text_contributes_empty_fragment() {
        let fragments = render_node(&paragraph(vec![text("a"), missing_text(), text("b")]));
        let values: Vec<&str> = fragments.iter().map(Fragment::value).collect();
        assert_eq!(values, vec!["a", "", "b"]);
    }

    #[test]
    fn custom_snippet_limit_is_independent_of_max_length() {
        let normalizer = Normalizer::new(5);
        let doc = root(vec![code_block(vec![text("abcdefgh")])]);
        let summary = normalizer.summarize(&doc, None).unwrap();
        assert_eq!(summary.fragments[0].value(), "abcde...");
        assert_eq!(summary.display_text, "[code: abcde...]");
        assert!(!summary.truncated);
    }

    #[test]
    fn fragment_serializes_with_type_tag() {
        let json = serde_json::to_value(Fragment::CodeInline { value: "x".into() }).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "codeInline", "value": "x" }));

        let json = serde_json::to_value(Fragment::Text {
            value: "y".into(),
            format: Formatting::PLAIN,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "type": "text", "value": "y" }));
    }

    // =========================================================================
    // summarize
    // =========================================================================

    #[test]
    fn summarize_empty_root_is_none() {
        assert_eq!(summarize(&root(vec![]), Some(10)), None);
        assert_eq!(summarize(&Document::default(), None), None);
    }

    #[test]
    fn summarize_whitespace_only_is_none() {
        let doc = root(vec![
            paragraph(vec![text("   ")]),
            paragraph(vec![missing_text()]),
            paragraph(vec![]),
        ]);
        assert_eq!(summarize(&doc, Some(200)), None);
    }

    #[test]
    fn summarize_truncates_scenario() {
        let doc = root(vec![
            paragraph(vec![text("Hello ")]),
            paragraph(vec![text("world, this is a test.")]),
        ]);
        let summary = summarize(&doc, Some(10)).unwrap();
        assert_eq!(summary.display_text, "Hello worl...");
        assert!(summary.truncated);
    }

    #[test]
    fn summarize_full_text_when_short_enough() {
        let doc = root(vec![
            paragraph(vec![text("Hello ")]),
            paragraph(vec![text("world, this is a test.")]),
        ]);
        let summary = summarize(&doc, Some(200)).unwrap();
        assert_eq!(summary.display_text, "Hello world, this is a test.");
        assert!(!summary.truncated);
    }

    #[test]
    fn summarize_without_max_length_never_truncates() {
        let long = "long ".repeat(100);
        let doc = root(vec![paragraph(vec![text(&long)])]);
        let summary = summarize(&doc, None).unwrap();
        assert!(!summary.truncated);
        assert_eq!(summary.display_text, long.trim());
    }

    #[test]
    fn summarize_truncated_length_is_max_plus_ellipsis() {
        let doc = sample_post();
        for max in [1, 5, 17, 30] {
            let summary = summarize(&doc, Some(max)).unwrap();
            assert!(summary.truncated, "max={max}");
            assert_eq!(summary.display_text.chars().count(), max + ELLIPSIS.len());
            assert!(summary.display_text.ends_with(ELLIPSIS));
        }
    }

    #[test]
    fn summarize_exact_length_is_not_truncated() {
        let doc = root(vec![paragraph(vec![text("abcde")])]);
        let summary = summarize(&doc, Some(5)).unwrap();
        assert!(!summary.truncated);
        assert_eq!(summary.display_text, "abcde");
    }

    #[test]
    fn summarize_counts_characters_not_bytes() {
        let doc = root(vec![paragraph(vec![text("Привет, мир")])]);
        let summary = summarize(&doc, Some(6)).unwrap();
        assert_eq!(summary.display_text, "Привет...");
    }

    #[test]
    fn summarize_includes_code_marker_in_display_text() {
        let doc = root(vec![
            paragraph(vec![text("See:")]),
            code_block(vec![text("x = 1")]),
        ]);
        let summary = summarize(&doc, None).unwrap();
        assert_eq!(summary.display_text, "See: [code: x = 1]");
    }

    #[test]
    fn summarize_malformed_node_keeps_siblings() {
        let doc = root(vec![paragraph(vec![
            text("kept"),
            missing_text(),
            text("too"),
        ])]);
        let summary = summarize(&doc, None).unwrap();
        assert_eq!(summary.display_text, "kept  too");
        assert_eq!(summary.fragments.len(), 3);
    }

    #[test]
    fn summarize_keeps_code_newlines() {
        let doc = root(vec![
            paragraph(vec![text("See:")]),
            code_block(vec![text("a"), text("b")]),
        ]);
        let summary = summarize(&doc, None).unwrap();
        assert_eq!(summary.display_text, "See: [code: a\nb]");
    }

    #[test]
    fn summarize_counts_interior_whitespace() {
        let doc = root(vec![paragraph(vec![text("a    b")])]);
        let summary = summarize(&doc, Some(4)).unwrap();
        assert!(summary.truncated);
        assert_eq!(summary.display_text, "a   ...");
    }

    #[test]
    fn summarize_skips_blank_blocks_between_text() {
        let doc = root(vec![
            paragraph(vec![text("one ")]),
            paragraph(vec![text("  ")]),
            paragraph(vec![text(" two")]),
        ]);
        let summary = summarize(&doc, None).unwrap();
        assert_eq!(summary.display_text, "one two");
    }

    #[test]
    fn summary_serializes_camel_case() {
        let doc = root(vec![paragraph(vec![text("hi")])]);
        let json = serde_json::to_value(summarize(&doc, None).unwrap()).unwrap();
        assert_eq!(json["displayText"], "hi");
        assert_eq!(json["truncated"], false);
        assert_eq!(json["fragments"][0]["type"], "text");
    }

    // =========================================================================
    // truncate_with_ellipsis
    // =========================================================================

    #[test]
    fn truncate_with_ellipsis_short_text_unchanged() {
        assert_eq!(truncate_with_ellipsis("abc", 3), "abc");
        assert_eq!(truncate_with_ellipsis("", 0), "");
    }

    #[test]
    fn truncate_with_ellipsis_respects_char_boundaries() {
        assert_eq!(truncate_with_ellipsis("日本語テキスト", 3), "日本語...");
    }
}
