use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, REFERER, USER_AGENT};

/// Pool of User-Agent strings rotated across requests
///
/// Rotation only reduces trivial fingerprinting by the portal; it carries
/// no correctness weight.
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/91.0.4472.124",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) Chrome/89.0.4389.82",
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:85.0) Firefox/85.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Edge/91.0.864.54",
];

/// Build form-post headers for the result portal
///
/// # Arguments
///
/// * `user_agent` - User agent string, typically drawn from [`USER_AGENTS`]
/// * `referer` - The per-year student result page the form lives on
pub fn build_portal_headers(user_agent: &str, referer: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    if let Ok(value) = HeaderValue::from_str(user_agent) {
        headers.insert(USER_AGENT, value);
    }
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/x-www-form-urlencoded"),
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml"),
    );
    if let Ok(value) = HeaderValue::from_str(referer) {
        headers.insert(REFERER, value);
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_carry_all_fields() {
        let headers =
            build_portal_headers(USER_AGENTS[0], "http://results.nith.ac.in/scheme21/studentresult/");

        assert_eq!(headers.get(USER_AGENT).unwrap(), USER_AGENTS[0]);
        assert_eq!(
            headers.get(CONTENT_TYPE).unwrap(),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(headers.get(ACCEPT).unwrap(), "text/html,application/xhtml+xml");
        assert_eq!(
            headers.get(REFERER).unwrap(),
            "http://results.nith.ac.in/scheme21/studentresult/"
        );
    }

    #[test]
    fn test_invalid_user_agent_is_skipped_not_fatal() {
        let headers = build_portal_headers("bad\nagent", "http://example.com/");
        assert!(!headers.contains_key(USER_AGENT));
        assert!(headers.contains_key(REFERER));
    }
}
