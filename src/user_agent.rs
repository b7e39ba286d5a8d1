//! User-Agent sent with download requests.
//!
//! Statistics portals commonly reject non-browser clients, so downloads
//! identify as a desktop browser.

/// Browser User-Agent used for every download request.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_user_agent_looks_like_a_browser() {
        assert!(BROWSER_USER_AGENT.starts_with("Mozilla/5.0"));
        assert!(BROWSER_USER_AGENT.contains("Chrome/"));
        assert!(!BROWSER_USER_AGENT.contains("  "), "no doubled spaces");
    }
}
