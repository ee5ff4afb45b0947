use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

// RFC 3986, appendix B. Every input matches, possibly with all groups empty.
static URL_PARTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(?:([A-Za-z][A-Za-z0-9+.\-]*):)?(?://([^/?#]*))?([^?#]*)(?:\?([^#]*))?(?:#(.*))?$")
        .expect("Invalid URL decomposition regex")
});

/// The five structural parts of a URL. Missing parts are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UrlParts {
    pub scheme: String,
    pub netloc: String,
    pub path: String,
    pub query: String,
    pub fragment: String,
}

impl UrlParts {
    pub fn split(url: &str) -> Self {
        let caps = URL_PARTS
            .captures(url)
            .unwrap_or_else(|| unreachable!("url {url:?} did not split into 5 parts"));
        let part = |i| caps.get(i).map_or("", |m| m.as_str()).to_string();
        Self {
            scheme: part(1).to_ascii_lowercase(),
            netloc: part(2),
            path: part(3),
            query: part(4),
            fragment: part(5),
        }
    }

    fn has_only_scheme(&self) -> bool {
        self.netloc.is_empty() && self.path.is_empty() && self.query.is_empty() && self.fragment.is_empty()
    }

    /// Path root and POSIX segments. An empty path under a host is the root; exactly two
    /// leading slashes form a root of their own, three or more collapse to `/`.
    fn path_segments(&self) -> (&str, Vec<&str>) {
        let path = if self.path.is_empty() && !self.netloc.is_empty() {
            "/"
        } else {
            self.path.as_str()
        };
        let root = if path.starts_with("//") && !path.starts_with("///") {
            "//"
        } else if path.starts_with('/') {
            "/"
        } else {
            ""
        };
        let segments = path
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .collect();
        (root, segments)
    }
}

/// Structural prefix test: `prefix` matches when scheme and host agree and its path
/// segments lead `url`'s path. `http://a.com/x` is not a prefix of `http://a.com/xy`.
pub fn starts_with(url: &str, prefix: &str) -> bool {
    let url = UrlParts::split(url);
    let prefix = UrlParts::split(prefix);
    trace!("Matching {url:?} against prefix {prefix:?}");

    if prefix.scheme != url.scheme {
        return false;
    }
    if prefix.netloc != url.netloc {
        return prefix.has_only_scheme();
    }
    if !prefix.path.is_empty() || !url.path.is_empty() {
        let (url_root, url_segments) = url.path_segments();
        let (prefix_root, prefix_segments) = prefix.path_segments();
        if url_root != prefix_root || !url_segments.starts_with(&prefix_segments) {
            return false;
        }
    }
    if !prefix.query.is_empty() && prefix.query != url.query {
        return false;
    }
    if !prefix.fragment.is_empty() && prefix.fragment != url.fragment {
        return false;
    }
    true
}
