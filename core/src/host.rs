// SPDX-License-Identifier: MIT OR Apache-2.0

//! Navigation host policy for the embedded article view

use serde::{Deserialize, Serialize};

/// Stylesheet injected before content load to hide the search form and menu
pub const CHROME_SUPPRESSION_STYLE: &str =
    ".minerva-search-form, .menu { display: none !important; }";

const ENCYCLOPEDIA_DOMAIN: &str = "wikipedia.org";

/// Decides whether the article view may load a URL.
///
/// Allowed hosts are `{lang}.wikipedia.org` and `{lang}.{sub}.wikipedia.org`
/// where `sub` is a run of lower-case ASCII letters (e.g. the mobile `m`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPolicy {
    language: String,
}

impl HostPolicy {
    /// Create a policy for one encyclopedia language edition
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into().to_lowercase(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// True if navigation to `url` stays inside the language edition
    pub fn allows(&self, url: &str) -> bool {
        let parsed = match url::Url::parse(&url.to_lowercase()) {
            Ok(u) => u,
            Err(e) => {
                tracing::debug!("Rejecting unparseable URL {}: {}", url, e);
                return false;
            }
        };

        let Some(host) = parsed.host_str() else {
            return false;
        };
        self.allows_host(host)
    }

    fn allows_host(&self, host: &str) -> bool {
        let Some(prefix) = host
            .strip_suffix(ENCYCLOPEDIA_DOMAIN)
            .and_then(|p| p.strip_suffix('.'))
        else {
            return false;
        };

        match prefix.strip_prefix(self.language.as_str()) {
            Some("") => true,
            Some(sub) => sub
                .strip_prefix('.')
                .is_some_and(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_lowercase())),
            None => false,
        }
    }
}

impl Default for HostPolicy {
    fn default() -> Self {
        Self::new("he")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_edition_hosts() {
        let policy = HostPolicy::default();
        assert!(policy.allows("https://he.wikipedia.org/wiki/Israel"));
        assert!(policy.allows("https://he.m.wikipedia.org/wiki/Israel"));
        assert!(policy.allows("HTTPS://HE.M.WIKIPEDIA.ORG/wiki/Israel"));
    }

    #[test]
    fn test_foreign_hosts_rejected() {
        let policy = HostPolicy::default();
        assert!(!policy.allows("https://en.wikipedia.org/wiki/Israel"));
        assert!(!policy.allows("https://he.m.wikipedia.org.evil.com/wiki/Israel"));
        assert!(!policy.allows("https://hebrew.wikipedia.org/wiki/Israel"));
        assert!(!policy.allows("https://he.m2.wikipedia.org/wiki/Israel"));
        assert!(!policy.allows("https://he.a.b.wikipedia.org/"));
        assert!(!policy.allows("https://example.com/"));
        assert!(!policy.allows("not a url"));
    }

    #[test]
    fn test_other_language() {
        let policy = HostPolicy::new("EN");
        assert_eq!(policy.language(), "en");
        assert!(policy.allows("https://en.m.wikipedia.org/wiki/Rust"));
        assert!(!policy.allows("https://he.wikipedia.org/wiki/Rust"));
    }
}
