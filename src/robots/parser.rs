//! Robots.txt parser implementation
//!
//! Thin wrapper around the `robotstxt` crate's matcher.

use robotstxt::DefaultMatcher;

/// Parsed robots.txt data for one origin
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content
    content: String,
    /// Whether to allow everything without consulting `content`
    allow_all: bool,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            allow_all: false,
        }
    }

    /// Creates a permissive ParsedRobots that allows everything
    ///
    /// Used whenever robots.txt is missing, unreachable, or unreadable.
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            allow_all: true,
        }
    }

    /// Returns true if this policy places no restrictions at all
    pub fn is_unrestricted(&self) -> bool {
        self.allow_all || self.content.trim().is_empty()
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// `user_agent` may be a full user-agent header value; only its product
    /// token (`CrawlBot` in `CrawlBot/1.0 (...)`) is matched against
    /// `User-agent` lines. Groups for `*` apply when no group names the
    /// agent.
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL (or path) to check
    /// * `user_agent` - The user agent string
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.is_unrestricted() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, agent_token(user_agent), url)
    }
}

/// Extracts the product token from a user-agent string
pub fn agent_token(user_agent: &str) -> &str {
    let token = user_agent
        .split(|c: char| c == '/' || c.is_whitespace())
        .next()
        .unwrap_or_default()
        .trim();

    if token.is_empty() {
        "*"
    } else {
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AGENT: &str = "CrawlBot/1.0 (+https://example.com/bot; polite crawler)";

    #[test]
    fn test_allow_all() {
        let robots = ParsedRobots::allow_all();
        assert!(robots.is_allowed("https://a.test/any/path", AGENT));
        assert!(robots.is_unrestricted());
    }

    #[test]
    fn test_disallow_all() {
        let robots = ParsedRobots::from_content("User-agent: *\nDisallow: /");
        assert!(!robots.is_allowed("https://a.test/", AGENT));
        assert!(!robots.is_allowed("https://a.test/page", AGENT));
    }

    #[test]
    fn test_disallow_directory() {
        let robots = ParsedRobots::from_content("User-agent: *\nDisallow: /private/");
        assert!(robots.is_allowed("https://a.test/", AGENT));
        assert!(robots.is_allowed("https://a.test/public/page", AGENT));
        assert!(!robots.is_allowed("https://a.test/private/page", AGENT));
    }

    #[test]
    fn test_allow_overrides_within_disallow() {
        let content = "User-agent: *\nDisallow: /private\nAllow: /private/public";
        let robots = ParsedRobots::from_content(content);
        assert!(!robots.is_allowed("https://a.test/private", AGENT));
        assert!(robots.is_allowed("https://a.test/private/public", AGENT));
    }

    #[test]
    fn test_specific_group_matches_product_token() {
        let content = "User-agent: CrawlBot\nDisallow: /\n\nUser-agent: *\nAllow: /";
        let robots = ParsedRobots::from_content(content);
        assert!(!robots.is_allowed("https://a.test/page", AGENT));
        assert!(robots.is_allowed("https://a.test/page", "OtherBot/2.0"));
    }

    #[test]
    fn test_other_agent_group_ignored() {
        let content = "User-agent: BadBot\nDisallow: /";
        let robots = ParsedRobots::from_content(content);
        assert!(robots.is_allowed("https://a.test/page", AGENT));
    }

    #[test]
    fn test_garbage_content_allows() {
        let robots = ParsedRobots::from_content("This is not valid robots.txt {{{");
        assert!(robots.is_allowed("https://a.test/any/path", AGENT));
    }

    #[test]
    fn test_empty_content_allows() {
        let robots = ParsedRobots::from_content("");
        assert!(robots.is_unrestricted());
        assert!(robots.is_allowed("https://a.test/any/path", AGENT));
    }

    #[test]
    fn test_agent_token() {
        assert_eq!(agent_token(AGENT), "CrawlBot");
        assert_eq!(agent_token("SimpleBot"), "SimpleBot");
        assert_eq!(agent_token(""), "*");
    }
}
