//! HTML presentation of summaries.
//!
//! Fragments carry formatting and code kind; this module turns them into
//! markup with [maud](https://maud.lambda.xyz/). All interpolated text is
//! auto-escaped, so CMS content cannot inject markup into a preview.
//!
//! ```text
//! Text{bold}        → <strong>..</strong>
//! Text{italic}      → <em>..</em>
//! CodeInline        → <code class="code-inline">..</code>
//! CodeBlock         → <pre class="code-snippet"><code>..</code></pre>
//! ```

use crate::document::Formatting;
use crate::normalize::{Fragment, Summary};
use maud::{Markup, html};

/// Message shown in place of an excerpt when a post has no visible text.
pub const NO_EXCERPT: &str = "No excerpt available";

/// Render fragments in order.
pub fn render_fragments(fragments: &[Fragment]) -> Markup {
    html! {
        @for fragment in fragments {
            (render_fragment(fragment))
        }
    }
}

fn render_fragment(fragment: &Fragment) -> Markup {
    match fragment {
        Fragment::Text { value, format } => styled_text(value, *format),
        Fragment::CodeInline { value } => html! { code.code-inline { (value) } },
        Fragment::CodeBlock { value } => html! { pre.code-snippet { code { (value) } } },
    }
}

fn styled_text(value: &str, format: Formatting) -> Markup {
    match (format.bold, format.italic) {
        (true, true) => html! { strong { em { (value) } } },
        (true, false) => html! { strong { (value) } },
        (false, true) => html! { em { (value) } },
        (false, false) => html! { (value) },
    }
}

/// Render a summary as a preview block.
///
/// A truncated summary shows its display text; otherwise the full fragment
/// sequence is rendered with formatting.
pub fn render_summary(summary: &Summary) -> Markup {
    html! {
        div.excerpt {
            @if summary.truncated {
                p.excerpt-text { (summary.display_text) }
            } @else {
                div.excerpt-body { (render_fragments(&summary.fragments)) }
            }
        }
    }
}

/// Render an optional summary, falling back to [`NO_EXCERPT`].
pub fn render_excerpt(summary: Option<&Summary>) -> Markup {
    match summary {
        Some(summary) => render_summary(summary),
        None => html! {
            div.excerpt {
                p.excerpt-empty { (NO_EXCERPT) }
            }
        },
    }
}
