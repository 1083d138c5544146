//! Client-facing freshness metadata.

use std::fmt;
use std::time::Duration;

use http::header::CACHE_CONTROL;
use http::{HeaderMap, HeaderValue};

use crate::config::CacheConfiguration;

/// The `Cache-Control` directive sent to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientCacheDirective {
    /// How long the client may reuse the response.
    pub max_age: Duration,
    /// Whether the client must revalidate once `max_age` elapses.
    pub must_revalidate: bool,
}

impl ClientCacheDirective {
    /// Renders the directive as a header value.
    pub fn header_value(&self) -> HeaderValue {
        // Only digits, ASCII letters, '=' ',' and ' ' are produced.
        HeaderValue::try_from(self.to_string())
            .unwrap_or_else(|_| HeaderValue::from_static("no-cache"))
    }

    /// Overwrites the `Cache-Control` header.
    pub fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(CACHE_CONTROL, self.header_value());
    }
}

impl fmt::Display for ClientCacheDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "max-age={}", self.max_age.as_secs())?;
        if self.must_revalidate {
            write!(f, ", must-revalidate")?;
        }
        Ok(())
    }
}

/// Directive advertised for responses governed by `config`.
///
/// Clients always revalidate once the configured client time span elapses.
pub fn client_cache_directive(config: &CacheConfiguration) -> ClientCacheDirective {
    ClientCacheDirective {
        max_age: config.client_ttl(),
        must_revalidate: true,
    }
}
