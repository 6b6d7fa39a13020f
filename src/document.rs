//! Rich-text document model and lenient decoding of the editor's JSON.
//!
//! Post bodies are stored by the CMS as the serialized state of its rich-text
//! editor: a tree of JSON objects, each with a `type` and either `text` or
//! `children`.
//!
//! ```json
//! { "root": { "type": "root", "children": [
//!     { "type": "paragraph", "children": [
//!         { "type": "text", "text": "Hello", "format": 1 } ] },
//!     { "type": "code", "children": [
//!         { "type": "code-highlight", "text": "fn main() {}" } ] } ] } }
//! ```
//!
//! ## Decoding policy
//!
//! CMS content is semi-trusted: editors, plugins, and older schema versions
//! all write into the same field. Decoding therefore never fails on shape.
//! A node with an unknown `type` becomes a [`DocumentNode::Generic`]
//! container, a text node without `text` keeps `None`, and missing
//! `children` decode as an empty list. The only hard error is input that is
//! not JSON at all ([`DocumentError`]).
//!
//! ## Type mapping
//!
//! | editor `type` | node |
//! |---------------|------|
//! | `text`, `code-highlight`, `tab` | `Text` (or `CodeInline` when the code format bit is set) |
//! | `paragraph` | `Paragraph` |
//! | `code`, `codeBlock` | `CodeBlock` |
//! | `inlineCode`, `codeInline` | `CodeInline` |
//! | anything else | `Generic` |

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Editor format bitmask values.
const FORMAT_BOLD: u64 = 1;
const FORMAT_ITALIC: u64 = 1 << 1;
const FORMAT_CODE: u64 = 1 << 4;

/// Container types the editor is known to emit. Anything outside this list
/// still decodes as `Generic`, but is worth a debug line.
const KNOWN_CONTAINERS: &[&str] = &[
    "root",
    "heading",
    "quote",
    "list",
    "listitem",
    "link",
    "autolink",
    "linebreak",
    "horizontalrule",
    "upload",
    "relationship",
    "block",
];

/// Inline formatting flags attached to a text run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formatting {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

impl Formatting {
    pub const PLAIN: Formatting = Formatting {
        bold: false,
        italic: false,
    };

    pub fn is_plain(&self) -> bool {
        !self.bold && !self.italic
    }
}

/// One node of a rich-text document.
///
/// Each variant carries only the fields that make sense for its kind, so
/// consumers match on the variant instead of probing optional fields.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentNode {
    /// A run of text. `text` is `None` when the stored node had no text.
    Text {
        text: Option<String>,
        format: Formatting,
    },
    Paragraph {
        children: Vec<DocumentNode>,
    },
    /// Multi-line code; its text lives in descendant `Text` nodes.
    CodeBlock {
        children: Vec<DocumentNode>,
    },
    /// Single-token code. The editor writes the text either on the node
    /// itself or on its first child.
    CodeInline {
        text: Option<String>,
        children: Vec<DocumentNode>,
    },
    /// The document root and every container kind the normalizer does not
    /// treat specially (headings, lists, quotes, links, unknown types).
    Generic {
        children: Vec<DocumentNode>,
    },
}

impl DocumentNode {
    pub fn empty() -> Self {
        DocumentNode::Generic {
            children: Vec::new(),
        }
    }

    /// Child nodes; empty for text runs.
    pub fn children(&self) -> &[DocumentNode] {
        match self {
            DocumentNode::Text { .. } => &[],
            DocumentNode::Paragraph { children }
            | DocumentNode::CodeBlock { children }
            | DocumentNode::CodeInline { children, .. }
            | DocumentNode::Generic { children } => children,
        }
    }

    /// Text stored directly on this node, if any.
    pub fn own_text(&self) -> Option<&str> {
        match self {
            DocumentNode::Text { text, .. } | DocumentNode::CodeInline { text, .. } => {
                text.as_deref()
            }
            _ => None,
        }
    }

    /// Decode a node from the editor's JSON. Never fails; see the module docs.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            debug!("non-object rich-text node decoded as empty container: {value}");
            return DocumentNode::empty();
        };

        let kind = obj.get("type").and_then(Value::as_str).unwrap_or_default();
        match kind {
            "text" | "code-highlight" | "tab" => decode_text(kind, obj),
            "paragraph" => DocumentNode::Paragraph {
                children: decode_children(obj),
            },
            "code" | "codeBlock" => DocumentNode::CodeBlock {
                children: decode_children(obj),
            },
            "inlineCode" | "codeInline" => DocumentNode::CodeInline {
                text: string_field(obj, "text"),
                children: decode_children(obj),
            },
            other => {
                if !KNOWN_CONTAINERS.contains(&other) {
                    debug!("unrecognised rich-text node type {other:?}, treating as container");
                }
                DocumentNode::Generic {
                    children: decode_children(obj),
                }
            }
        }
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(String::from)
}

fn decode_children(obj: &Map<String, Value>) -> Vec<DocumentNode> {
    match obj.get("children") {
        Some(Value::Array(items)) => items.iter().map(DocumentNode::from_value).collect(),
        Some(other) => {
            debug!("rich-text children is not an array: {other}");
            Vec::new()
        }
        None => Vec::new(),
    }
}

fn decode_text(kind: &str, obj: &Map<String, Value>) -> DocumentNode {
    let mut text = string_field(obj, "text");
    if text.is_none() {
        if kind == "tab" {
            text = Some("\t".to_string());
        } else {
            debug!("rich-text {kind} node without text");
        }
    }

    let (format, is_code) = decode_format(obj.get("format"));
    if is_code {
        DocumentNode::CodeInline {
            text,
            children: Vec::new(),
        }
    } else {
        DocumentNode::Text { text, format }
    }
}

/// Read the `format` field: either the editor's bitmask or an explicit
/// `{ "bold": .., "italic": .. }` object. Returns the flags plus whether the
/// inline-code bit was set.
fn decode_format(value: Option<&Value>) -> (Formatting, bool) {
    match value {
        Some(Value::Number(n)) => {
            let bits = n.as_u64().unwrap_or(0);
            let format = Formatting {
                bold: bits & FORMAT_BOLD != 0,
                italic: bits & FORMAT_ITALIC != 0,
            };
            (format, bits & FORMAT_CODE != 0)
        }
        Some(Value::Object(flags)) => {
            let flag = |key: &str| flags.get(key).and_then(Value::as_bool).unwrap_or(false);
            let format = Formatting {
                bold: flag("bold"),
                italic: flag("italic"),
            };
            (format, flag("code"))
        }
        _ => (Formatting::PLAIN, false),
    }
}

/// A complete rich-text document, rooted at a single `Generic` node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct Document {
    pub root: DocumentNode,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            root: DocumentNode::empty(),
        }
    }
}

impl Document {
    pub fn new(blocks: Vec<DocumentNode>) -> Self {
        Self {
            root: DocumentNode::Generic { children: blocks },
        }
    }

    /// Decode from an editor state (`{ "root": .. }`) or a bare node.
    ///
    /// A bare node that is not a container is wrapped so the root is always
    /// a `Generic` node.
    pub fn from_value(value: &Value) -> Self {
        let node_value = value.get("root").unwrap_or(value);
        match DocumentNode::from_value(node_value) {
            root @ DocumentNode::Generic { .. } => Self { root },
            block => Self::new(vec![block]),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(&value))
    }

    /// Block-level nodes directly under the root.
    pub fn blocks(&self) -> &[DocumentNode] {
        self.root.children()
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}
