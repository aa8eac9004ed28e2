use std::collections::HashSet;
use url::Url;

/// Returns the origin of a URL as `scheme://host[:port]`
///
/// The port is only included when it differs from the scheme's default.
/// This string is the key for robots.txt caching and origin policy.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use crawlbot::url::origin_of;
///
/// let url = Url::parse("https://Example.com/path?q=1").unwrap();
/// assert_eq!(origin_of(&url), "https://example.com");
///
/// let url = Url::parse("http://localhost:8080/").unwrap();
/// assert_eq!(origin_of(&url), "http://localhost:8080");
/// ```
pub fn origin_of(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default().to_lowercase();
    match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    }
}

/// True iff both URLs share scheme, host, and port
pub fn same_origin(a: &Url, b: &Url) -> bool {
    origin_of(a) == origin_of(b)
}

/// Converts a caller-supplied origin string into the key form used by
/// [`origin_of`]
///
/// Accepts bare origins (`https://example.com`) as well as full URLs, whose
/// path is ignored. Strings that do not parse are lowercased and stripped of
/// trailing slashes so that obviously-equal spellings still match.
pub fn canonical_origin(origin: &str) -> String {
    let origin = origin.trim();
    match Url::parse(origin) {
        Ok(url) if url.has_host() => origin_of(&url),
        _ => origin.trim_end_matches('/').to_lowercase(),
    }
}

/// Checks a URL against an allowed-origin set
///
/// `None` or an empty set allows every origin.
pub fn is_origin_allowed(url: &Url, allowed: Option<&HashSet<String>>) -> bool {
    match allowed {
        Some(origins) if !origins.is_empty() => origins.contains(&origin_of(url)),
        _ => true,
    }
}
