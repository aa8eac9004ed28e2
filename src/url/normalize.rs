use crate::UrlError;
use url::Url;

/// Normalizes a URL according to the crawler's deduplication rules
///
/// # Normalization Steps
///
/// 1. Resolve against `base` when given, otherwise parse as absolute
/// 2. Reject anything that is not `http` or `https`
/// 3. Lowercase scheme and host (done by the parser) and drop default ports
/// 4. Remove the fragment
/// 5. Strip trailing slashes from non-root paths; empty path becomes `/`
/// 6. Drop an empty query string (trailing `?`)
///
/// The query string is otherwise kept verbatim: two URLs that differ only
/// in their query are distinct pages.
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
/// * `base` - Optional base URL for resolving relative references
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - The URL cannot be parsed or is not a web URL
///
/// # Examples
///
/// ```
/// use crawlbot::url::normalize_url;
///
/// let url = normalize_url("http://EXAMPLE.com/a/#top", None).unwrap();
/// assert_eq!(url.as_str(), "http://example.com/a");
/// ```
pub fn normalize_url(url_str: &str, base: Option<&Url>) -> Result<Url, UrlError> {
    let url_str = url_str.trim();

    let mut url = match base {
        Some(base) => base.join(url_str),
        None => Url::parse(url_str),
    }
    .map_err(|e| UrlError::Parse(format!("{}: {}", url_str, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    let path = normalize_path(url.path());
    url.set_path(&path);

    if url.query() == Some("") {
        url.set_query(None);
    }

    Ok(url)
}

/// Strips trailing slashes, keeping the root path as `/`
fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}
