//! The composite value stored for a cached response.

use bytes::Bytes;
use http::header::{CACHE_CONTROL, CONTENT_TYPE};
use http::{HeaderValue, Response, StatusCode};

use crate::freshness::ClientCacheDirective;
use crate::key::CacheKey;

/// A captured response, stored and read as one unit.
///
/// Body and content type live in a single value so a reader can never pair
/// one response's body with another's content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    status: StatusCode,
    content_type: Option<HeaderValue>,
    body: Bytes,
}

impl CachedResponse {
    /// Creates a cached response.
    pub fn new(status: StatusCode, content_type: Option<HeaderValue>, body: Bytes) -> Self {
        Self {
            status,
            content_type,
            body,
        }
    }

    /// Status of the captured response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Content type of the captured response, if it had one.
    pub fn content_type(&self) -> Option<&HeaderValue> {
        self.content_type.as_ref()
    }

    /// The complete captured body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Rebuilds a response to serve in place of the handler.
    ///
    /// A missing content type is recovered from the key's `Accept` token.
    pub fn into_response(
        self,
        key: &CacheKey,
        directive: &ClientCacheDirective,
    ) -> Response<Bytes> {
        let mut response = Response::new(self.body);
        *response.status_mut() = self.status;
        let headers = response.headers_mut();
        if let Some(content_type) = self.content_type.or_else(|| key.fallback_content_type()) {
            headers.insert(CONTENT_TYPE, content_type);
        }
        headers.insert(CACHE_CONTROL, directive.header_value());
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CacheConfiguration, RequestView, build_key, client_cache_directive};
    use http::Method;

    #[test]
    fn served_response_carries_stored_parts() {
        let key = build_key(&RequestView::new(
            Method::GET,
            "/items",
            Some("application/json"),
            false,
        ));
        let directive = client_cache_directive(&CacheConfiguration::default());
        let cached = CachedResponse::new(
            StatusCode::OK,
            Some(HeaderValue::from_static("application/json")),
            Bytes::from_static(b"[1,2,3]"),
        );

        let response = cached.into_response(&key, &directive);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(
            response.headers()[CACHE_CONTROL],
            "max-age=60, must-revalidate"
        );
        assert_eq!(response.body(), &Bytes::from_static(b"[1,2,3]"));
    }

    #[test]
    fn missing_content_type_falls_back_to_accept_token() {
        let key = build_key(&RequestView::new(
            Method::GET,
            "/report",
            Some("text/csv"),
            false,
        ));
        let directive = client_cache_directive(&CacheConfiguration::default());
        let cached = CachedResponse::new(StatusCode::OK, None, Bytes::new());

        let response = cached.into_response(&key, &directive);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/csv");
    }
}
