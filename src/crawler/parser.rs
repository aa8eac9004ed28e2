//! HTML parser for extracting page content and links
//!
//! This module handles parsing HTML content to extract:
//! - Page title and description
//! - Visible main text
//! - Links to follow (from `<a href>` tags)

use crate::CrawlError;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;
use url::Url;

/// Maximum number of characters of page text kept per page
pub const MAX_TEXT_CHARS: usize = 50_000;

/// Elements whose content never counts as visible text
const SKIPPED_TAGS: [&str; 2] = ["script", "style"];

/// Candidate containers for the main text, in order of preference
const TEXT_ROOTS: [&str; 3] = ["main", "article", "body"];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Trimmed `<title>` text, empty if absent
    pub title: String,

    /// Meta description, falling back to `og:description`
    pub description: String,

    /// Visible text with whitespace collapsed
    pub text: String,

    /// Absolute http(s) links in document order, without duplicates
    pub links: Vec<String>,
}

/// Parses HTML content and extracts title, description, text and links
///
/// # Link Extraction Rules
///
/// **Include:**
/// - Every `<a href="...">` that resolves to an http or https URL
///
/// **Exclude:**
/// - Empty hrefs
/// - Fragment-only links (`#section`)
/// - `javascript:` links
/// - Anything resolving to another scheme (`mailto:`, `tel:`, `data:`, ...)
///
/// Links keep their fragment; the scheduler normalizes them before enqueueing.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The base URL for resolving relative links
///
/// # Returns
///
/// * `Ok(ParsedPage)` - Successfully parsed page (missing elements are empty)
/// * `Err(CrawlError::HtmlParse)` - The extraction itself could not run
///
/// # Example
///
/// ```no_run
/// use crawlbot::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url).unwrap();
/// assert_eq!(parsed.title, "Test");
/// assert_eq!(parsed.links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> Result<ParsedPage, CrawlError> {
    let document = Html::parse_document(html);

    Ok(ParsedPage {
        title: extract_title(&document, base_url)?,
        description: extract_description(&document, base_url)?,
        text: extract_text(&document, base_url)?,
        links: extract_links(&document, base_url)?,
    })
}

fn selector(css: &str, base_url: &Url) -> Result<Selector, CrawlError> {
    Selector::parse(css).map_err(|e| CrawlError::HtmlParse {
        url: base_url.to_string(),
        message: format!("invalid selector {:?}: {:?}", css, e),
    })
}

fn extract_title(document: &Html, base_url: &Url) -> Result<String, CrawlError> {
    let title_selector = selector("title", base_url)?;

    Ok(document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default())
}

fn extract_description(document: &Html, base_url: &Url) -> Result<String, CrawlError> {
    for css in [
        r#"meta[name="description"]"#,
        r#"meta[property="og:description"]"#,
    ] {
        let meta_selector = selector(css, base_url)?;
        let content = document
            .select(&meta_selector)
            .next()
            .and_then(|element| element.value().attr("content"))
            .map(str::trim)
            .unwrap_or_default();

        if !content.is_empty() {
            return Ok(content.to_string());
        }
    }

    Ok(String::new())
}

fn extract_text(document: &Html, base_url: &Url) -> Result<String, CrawlError> {
    let mut root = None;
    for css in TEXT_ROOTS {
        let root_selector = selector(css, base_url)?;
        if let Some(element) = document.select(&root_selector).next() {
            root = Some(element);
            break;
        }
    }
    let root = root.unwrap_or_else(|| document.root_element());

    let mut raw = String::new();
    collect_text(root, &mut raw);

    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    Ok(truncate_chars(collapsed, MAX_TEXT_CHARS))
}

/// Appends the text below `element`, skipping script and style subtrees
fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(&text.text);
                out.push(' ');
            }
            Node::Element(el) if SKIPPED_TAGS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
            }
            _ => {}
        }
    }
}

fn truncate_chars(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text,
    }
}

fn extract_links(document: &Html, base_url: &Url) -> Result<Vec<String>, CrawlError> {
    let a_selector = selector("a[href]", base_url)?;
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&a_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if let Some(absolute_url) = resolve_link(href, base_url) {
            if seen.insert(absolute_url.clone()) {
                links.push(absolute_url);
            }
        }
    }

    Ok(links)
}

/// Resolves a link href to an absolute http(s) URL
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href
        .get(..11)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("javascript:"))
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url.to_string()),
        _ => None,
    }
}
