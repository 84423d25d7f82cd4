// SPDX-License-Identifier: MIT OR Apache-2.0

//! Article identifiers and encyclopedia URLs
//!
//! An article identifier is the normalized title found in a URL path after
//! the `wiki/` marker: percent-decoded, underscores turned into spaces and
//! surrounding whitespace trimmed. Comparison is exact and case-sensitive.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use thiserror::Error;

/// Path marker that precedes the article slug
pub const WIKI_PATH_MARKER: &str = "wiki/";

/// Characters left unescaped when a title is encoded as a URI component
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Errors from article URL extraction
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UrlError {
    /// The decoded URL has no `wiki/<slug>` segment
    #[error("URL has no article path: {0}")]
    MissingMarker(String),
}

/// Normalized key for an encyclopedia article
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArticleIdentifier(String);

impl ArticleIdentifier {
    /// Build an identifier from a display title or raw slug
    pub fn from_title(title: &str) -> Self {
        Self(normalize(title))
    }

    /// Extract the identifier from a navigation URL
    pub fn extract(url: &str) -> Result<Self, UrlError> {
        let decoded = decode_url(url);
        extract_slug(&decoded)
            .map(Self::from_title)
            .ok_or_else(|| UrlError::MissingMarker(url.to_string()))
    }

    /// Extract the identifier from a navigation URL, empty when the URL
    /// carries no article path
    pub fn from_url(url: &str) -> Self {
        match Self::extract(url) {
            Ok(id) => id,
            Err(err) => {
                tracing::debug!("{}", err);
                Self::default()
            }
        }
    }

    /// The normalized title text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the identifier of a URL without an article path
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Exact comparison used for target detection.
    ///
    /// An empty identifier never matches anything, including another empty one.
    pub fn matches(&self, other: &ArticleIdentifier) -> bool {
        !self.is_empty() && self == other
    }
}

impl fmt::Display for ArticleIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Replace underscores with spaces and trim surrounding whitespace
pub fn normalize(raw: &str) -> String {
    raw.replace('_', " ").trim().to_string()
}

/// Percent-decode a whole URL.
///
/// Invalid UTF-8 sequences become U+FFFD; a stray `%` is kept as literal text.
pub fn decode_url(url: &str) -> Cow<'_, str> {
    percent_decode_str(url).decode_utf8_lossy()
}

/// Slug following the first `wiki/` marker that is followed by at least one
/// character other than `#` or `?`, up to the next `#` or `?`
pub fn extract_slug(decoded: &str) -> Option<&str> {
    decoded.match_indices(WIKI_PATH_MARKER).find_map(|(idx, marker)| {
        let rest = &decoded[idx + marker.len()..];
        let end = rest.find(['#', '?']).unwrap_or(rest.len());
        (end > 0).then_some(&rest[..end])
    })
}

/// Encode a title as a single URI component
pub fn encode_title(title: &str) -> String {
    utf8_percent_encode(title, URI_COMPONENT).to_string()
}

/// Build `https://{host}/wiki/{title}` for an article title
pub fn article_url(host: &str, title: &str) -> String {
    format!("https://{}/{}{}", host, WIKI_PATH_MARKER, encode_title(title))
}
