//! Cache key types and construction.
//!
//! A [`CacheKey`] is derived from the request's canonical path and its
//! `Accept` header. Requests that agree on both share a cached
//! representation; requests for the same path with different `Accept`
//! values never do.
//!
//! ## Format
//!
//! When displayed, keys follow the `key1=value1&key2=value2` layout. An
//! absent `Accept` header is an explicit key-only part:
//!
//! ```
//! use http::Method;
//! use respcache::{RequestView, build_key};
//!
//! let json = RequestView::new(Method::GET, "/items", Some("application/json"), false);
//! assert_eq!(build_key(&json).to_string(), "path=/items&accept=application/json");
//!
//! let any = RequestView::new(Method::GET, "/items", None, false);
//! assert_eq!(build_key(&any).to_string(), "path=/items&accept");
//! ```
//!
//! [`CacheKey`] uses `Arc` internally, so cloning a key when carrying it from
//! the pre-handler hook to the post-handler hook is a reference count bump.

use http::HeaderValue;
use smol_str::SmolStr;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::request::RequestView;

const PATH_PART: &str = "path";
const ACCEPT_PART: &str = "accept";

#[derive(Debug, Eq, PartialEq, Hash)]
struct CacheKeyInner {
    parts: Vec<KeyPart>,
}

/// A key identifying one cached response.
#[derive(Clone, Debug)]
pub struct CacheKey {
    inner: Arc<CacheKeyInner>,
}

impl PartialEq for CacheKey {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner == other.inner
    }
}

impl Eq for CacheKey {}

impl Hash for CacheKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.inner.parts.iter().enumerate() {
            if i > 0 {
                write!(f, "&")?;
            }
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

impl CacheKey {
    /// Creates a key from its parts.
    pub fn new(parts: Vec<KeyPart>) -> Self {
        CacheKey {
            inner: Arc::new(CacheKeyInner { parts }),
        }
    }

    /// Returns an iterator over the key parts.
    pub fn parts(&self) -> impl Iterator<Item = &KeyPart> {
        self.inner.parts.iter()
    }

    /// The `Accept` token the key was built from, `None` for the empty token.
    pub fn accept_token(&self) -> Option<&str> {
        self.parts()
            .find(|part| part.key() == ACCEPT_PART)
            .and_then(KeyPart::value)
    }

    /// Content type implied by the key's `Accept` token.
    ///
    /// Used when a stored entry carries no content type. Takes the first
    /// media range, keeps its parameters and ignores wildcards.
    pub fn fallback_content_type(&self) -> Option<HeaderValue> {
        let first = self.accept_token()?.split(',').next()?.trim();
        let (media_type, params) = match first.split_once(';') {
            Some((media_type, params)) => (media_type.trim(), Some(params)),
            None => (first, None),
        };
        let (kind, subtype) = media_type.split_once('/')?;
        if kind.is_empty() || subtype.is_empty() || kind == "*" || subtype == "*" {
            return None;
        }
        // Quality values describe the request, not the representation.
        let params: Vec<&str> = params
            .into_iter()
            .flat_map(|params| params.split(';'))
            .map(str::trim)
            .filter(|param| !param.is_empty() && !param.starts_with("q="))
            .collect();
        let value = if params.is_empty() {
            media_type.to_owned()
        } else {
            format!("{}; {}", media_type, params.join("; "))
        };
        HeaderValue::from_str(&value).ok()
    }
}

/// A single component of a cache key.
///
/// The value is optional: a key-only part marks an explicitly empty token.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct KeyPart {
    key: SmolStr,
    value: Option<SmolStr>,
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)?;
        if let Some(ref value) = self.value {
            write!(f, "={}", value)?;
        }
        Ok(())
    }
}

impl KeyPart {
    /// Creates a new key part.
    pub fn new<K: AsRef<str>, V: AsRef<str>>(key: K, value: Option<V>) -> Self {
        KeyPart {
            key: SmolStr::new(key),
            value: value.map(SmolStr::new),
        }
    }

    /// Returns the key name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the value, if present.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// Derives the cache key for a request.
///
/// Total for any request: an absent or blank `Accept` header becomes the
/// empty token instead of an error.
pub fn build_key(request: &RequestView) -> CacheKey {
    let accept = request
        .accept()
        .map(str::trim)
        .filter(|accept| !accept.is_empty());
    CacheKey::new(vec![
        KeyPart::new(PATH_PART, Some(request.path())),
        KeyPart::new(ACCEPT_PART, accept),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    fn view(path: &str, accept: Option<&str>) -> RequestView {
        RequestView::new(Method::GET, path, accept, false)
    }

    #[test]
    fn identical_requests_share_a_key() {
        let first = build_key(&view("/items", Some("application/json")));
        let second = build_key(&view("/items", Some("application/json")));
        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn accept_header_separates_representations() {
        let json = build_key(&view("/items", Some("application/json")));
        let xml = build_key(&view("/items", Some("application/xml")));
        let none = build_key(&view("/items", None));
        assert_ne!(json, xml);
        assert_ne!(json, none);
        assert_ne!(xml, none);
    }

    #[test]
    fn blank_accept_is_the_empty_token() {
        let blank = build_key(&view("/items", Some("   ")));
        let absent = build_key(&view("/items", None));
        assert_eq!(blank, absent);
        assert_eq!(absent.accept_token(), None);
    }

    #[test]
    fn method_and_identity_do_not_affect_the_key() {
        let anonymous = build_key(&view("/items", Some("text/plain")));
        let authenticated = build_key(&RequestView::new(
            Method::HEAD,
            "/items",
            Some("text/plain"),
            true,
        ));
        assert_eq!(anonymous, authenticated);
    }

    #[test]
    fn fallback_content_type_uses_first_concrete_range() {
        let key = build_key(&view(
            "/items",
            Some("application/json;q=0.9; charset=utf-8, text/html"),
        ));
        assert_eq!(
            key.fallback_content_type().unwrap(),
            "application/json; charset=utf-8"
        );
    }

    #[test]
    fn fallback_content_type_ignores_wildcards() {
        assert!(
            build_key(&view("/items", Some("*/*")))
                .fallback_content_type()
                .is_none()
        );
        assert!(
            build_key(&view("/items", Some("text/*")))
                .fallback_content_type()
                .is_none()
        );
        assert!(build_key(&view("/items", None)).fallback_content_type().is_none());
    }
}
