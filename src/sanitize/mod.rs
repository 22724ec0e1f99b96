// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Solution text cleanup
//!
//! The solver answers with HTML, often wrapped in a markdown fence. Two stages:
//!
//! 1. [`clean_fences`] removes fences and a stray leading `html` token. The
//!    result is still markup and is what a trusted renderer would display.
//! 2. [`strip_markup`] removes every tag and `style`/`class`/`id` fragment,
//!    then reads the text content back out of whatever is left. This is the
//!    text that is printed by default and spoken aloud.

mod render;

pub use render::RenderMode;

use chrono::{DateTime, Utc};
use regex::Regex;
use scraper::Html;
use std::sync::OnceLock;

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static sanitizer pattern"))
}

fn leading_html_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^```html")
}

fn trailing_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"```$")
}

fn any_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"```")
}

fn leading_html_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"(?i)^\s*html\s*")
}

fn markup_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"</?[^>]+(>|$)")
}

/// A complete tag: name, then only `name=value` attributes, then `>`
fn decoded_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(
        &RE,
        r#"</?[A-Za-z][A-Za-z0-9-]*(?:\s+[A-Za-z_:][-A-Za-z0-9_:.]*\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'<>=]+))*\s*/?>"#,
    )
}

fn styling_attribute() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r#"(?:style|class|id)\s*=\s*["'][^"']*["']"#)
}

/// Display stage: trim, drop markdown fences and a leading `html` token
pub fn clean_fences(raw: &str) -> String {
    let text = raw.trim();
    let text = leading_html_fence().replace(text, "");
    let text = trailing_fence().replace(&text, "");
    let text = any_fence().replace_all(&text, "");
    leading_html_token().replace(&text, "").into_owned()
}

/// Strict stage: plain text with no tags or styling attributes
///
/// Partial markup (an unterminated `<p` at the end, stray entities) is
/// tolerated; whatever text can be recovered is returned.
pub fn strip_markup(text: &str) -> String {
    let text = markup_tag().replace_all(text, "");
    let text = styling_attribute().replace_all(&text, "");

    let fragment = Html::parse_fragment(&text);
    let content: String = fragment.root_element().text().collect();

    // Entities such as `&lt;b&gt;` decode into tags during extraction.
    // Comparisons like `x<y` or `a<b and b>c` are not tag-shaped and stay.
    decoded_tag().replace_all(&content, "").into_owned()
}

/// A solver answer after both cleanup stages
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizedSolution {
    /// Fence-free markup, only rendered when the backend is trusted
    pub display: String,
    /// Tag-free text
    pub plain: String,
    pub received_at: DateTime<Utc>,
}

impl SanitizedSolution {
    /// Text to present for `mode`
    pub fn render(&self, mode: RenderMode) -> String {
        render::render(self, mode)
    }
}

/// Run both stages over a raw solver answer
pub fn sanitize(raw: &str) -> SanitizedSolution {
    let display = clean_fences(raw);
    let plain = strip_markup(&display);
    SanitizedSolution {
        display,
        plain,
        received_at: Utc::now(),
    }
}
