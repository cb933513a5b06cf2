//! Text extraction from HTML error pages.
//!
//! BigBuy's gateway and framework error pages are matched on their literal
//! markup. Matching is case-sensitive.

use std::sync::LazyLock;

use regex::Regex;

/// Heading of the gateway timeout page.
pub const GATEWAY_TIMEOUT_HEADING: &str = "<h1>504 Gateway Time-out</h1>";

static BODY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<body[^>]*>(.*)</body>").expect("valid body regex"));

static STATUS_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*<h1>5\d\d[^<]*</h1>").expect("valid heading regex"));

static CONTAINER_PARAGRAPH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<div class="container">.*?<p>(.*?)</p>"#).expect("valid container regex")
});

/// Returns `true` if the text starts like an HTML document.
#[must_use]
pub fn looks_like_html(text: &str) -> bool {
    let text = text.trim_start();
    text.starts_with("<html") || text.starts_with("<!DOCTYPE html")
}

/// Returns `true` if the text is the gateway timeout page.
#[must_use]
pub fn is_gateway_timeout(text: &str) -> bool {
    text.contains(GATEWAY_TIMEOUT_HEADING)
}

/// Removes a leading `<h1>5xx ...</h1>` heading.
#[must_use]
pub fn strip_status_heading(text: &str) -> &str {
    STATUS_HEADING_RE
        .find(text)
        .map_or(text, |heading| &text[heading.end()..])
}

/// Extracts the meaningful text of an HTML error page.
///
/// Takes the `<body>` content, reduces framework "container" pages to their
/// paragraph, and drops a leading status heading.
#[must_use]
pub fn extract_error_text(html: &str) -> String {
    let body = BODY_RE
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map_or(html, |body| body.as_str());

    if let Some(paragraph) = CONTAINER_PARAGRAPH_RE
        .captures(body)
        .and_then(|captures| captures.get(1))
    {
        return paragraph.as_str().trim().to_string();
    }

    strip_status_heading(body).trim().to_string()
}
