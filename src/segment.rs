//! URL segments
//!
//! A panel stack lives in the trailing path segments of a URL. Each segment has
//! a primary path token and optional matrix parameters:
//!
//! ```text
//! /home/user/2;tab=info/order/7;pc=3
//!       ^^^^ ^^^^^^^^^^ ^^^^^ ^^^^^^
//! ```
//!
//! Tokens, keys and values are percent-encoded when serialised and decoded
//! when parsed, so `/`, `;` and `=` inside them survive a round trip.

use crate::PanelParams;
use std::borrow::Cow;
use std::fmt;

/// One `/`-delimited piece of a URL path
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct UrlSegment {
    /// Primary token (the part before any `;`)
    pub path: String,
    /// Matrix parameters attached with `;key=value`
    pub params: PanelParams,
}

impl UrlSegment {
    /// Create a segment without matrix parameters
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: PanelParams::new(),
        }
    }

    /// Attach a matrix parameter
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Parse `path;key=value;flag` into a segment.
    ///
    /// A matrix entry without `=` is stored with an empty value.
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.split(';');
        let path = decode(parts.next().unwrap_or_default());
        let params = parts
            .filter(|part| !part.is_empty())
            .map(|part| match part.split_once('=') {
                Some((key, value)) => (decode(key), decode(value)),
                None => (decode(part), String::new()),
            })
            .collect();
        Self { path, params }
    }
}

/// Percent-decode a token, keeping it verbatim if it is not valid UTF-8
fn decode(raw: &str) -> String {
    urlencoding::decode(raw).map_or_else(|_| raw.to_string(), Cow::into_owned)
}

impl fmt::Display for UrlSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&urlencoding::encode(&self.path))?;
        for (key, value) in self.params.iter() {
            write!(
                f,
                ";{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )?;
        }
        Ok(())
    }
}

/// Split a URL path into segments.
///
/// Query string and fragment are ignored, as are empty segments produced by
/// leading, trailing or doubled slashes.
///
/// # Example
///
/// ```
/// use panel_navigator::parse_segments;
///
/// let segments = parse_segments("/user/2;tab=info/order/7");
/// assert_eq!(segments.len(), 4);
/// assert_eq!(segments[1].params.get("tab"), Some(&"info".to_string()));
/// ```
pub fn parse_segments(url: &str) -> Vec<UrlSegment> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(UrlSegment::parse)
        .collect()
}

/// Serialise segments back into a relative path (no leading slash)
pub fn serialize_segments(segments: &[UrlSegment]) -> String {
    segments
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("/")
}

/// Join a base URL and a relative panel path
///
/// # Example
///
/// ```
/// use panel_navigator::join_url;
///
/// assert_eq!(join_url("/home/", "user/2"), "/home/user/2");
/// assert_eq!(join_url("/", "user/2"), "/user/2");
/// assert_eq!(join_url("/home", ""), "/home");
/// ```
pub fn join_url<'a>(base: &'a str, tail: &'a str) -> Cow<'a, str> {
    let base_trimmed = base.trim_end_matches('/');
    let tail = tail.trim_matches('/');

    if tail.is_empty() {
        if base_trimmed.is_empty() {
            Cow::Borrowed("/")
        } else if base_trimmed == base {
            Cow::Borrowed(base)
        } else {
            Cow::Owned(base_trimmed.to_string())
        }
    } else if base_trimmed.is_empty() {
        Cow::Owned(format!("/{}", tail))
    } else {
        Cow::Owned(format!("{}/{}", base_trimmed, tail))
    }
}

// ============================================================================
// Tests
// ============================================================================
