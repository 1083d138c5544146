//! Read-only view of an incoming request.

use http::{Method, Request, header::ACCEPT};
use smol_str::SmolStr;

/// Request extension carrying the caller's authentication state.
///
/// Authentication middleware placed before the cache inserts this into the
/// request extensions. Requests without it are treated as anonymous.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Authenticated(pub bool);

/// The parts of a request the cache decisions depend on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestView {
    method: Method,
    path: SmolStr,
    accept: Option<SmolStr>,
    authenticated: bool,
}

impl RequestView {
    /// Creates a view from explicit parts.
    pub fn new(
        method: Method,
        path: impl Into<SmolStr>,
        accept: Option<&str>,
        authenticated: bool,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            accept: accept.map(SmolStr::new),
            authenticated,
        }
    }

    /// Projects an `http::Request` into a view.
    ///
    /// The path includes the query string. Repeated `Accept` headers are
    /// combined into one comma-separated value; non-UTF-8 values are skipped.
    pub fn from_request<B>(request: &Request<B>) -> Self {
        let path = request
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| request.uri().path());
        let accept = request
            .headers()
            .get_all(ACCEPT)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect::<Vec<_>>();
        let accept = (!accept.is_empty()).then(|| accept.join(", "));
        let authenticated = request
            .extensions()
            .get::<Authenticated>()
            .copied()
            .unwrap_or_default()
            .0;
        Self::new(
            request.method().clone(),
            path,
            accept.as_deref(),
            authenticated,
        )
    }

    /// Request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Canonical path, including the query string when present.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Raw `Accept` header value, if any.
    pub fn accept(&self) -> Option<&str> {
        self.accept.as_deref()
    }

    /// Whether the caller is authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_request_reads_accept_path_and_identity() {
        let mut request = Request::builder()
            .method(Method::GET)
            .uri("http://localhost/items?page=2")
            .header(ACCEPT, "application/json")
            .body(())
            .unwrap();
        request.extensions_mut().insert(Authenticated(true));

        let view = RequestView::from_request(&request);
        assert_eq!(view.method(), &Method::GET);
        assert_eq!(view.path(), "/items?page=2");
        assert_eq!(view.accept(), Some("application/json"));
        assert!(view.is_authenticated());
    }

    #[test]
    fn repeated_accept_headers_are_combined() {
        let request = Request::get("/items")
            .header(ACCEPT, "application/json")
            .header(ACCEPT, "application/xml")
            .body(())
            .unwrap();
        let single = Request::get("/items")
            .header(ACCEPT, "application/json")
            .body(())
            .unwrap();

        let view = RequestView::from_request(&request);
        assert_eq!(view.accept(), Some("application/json, application/xml"));
        assert_ne!(
            crate::build_key(&view),
            crate::build_key(&RequestView::from_request(&single))
        );
    }

    #[test]
    fn missing_extension_means_anonymous() {
        let request = Request::get("/items").body(()).unwrap();
        let view = RequestView::from_request(&request);
        assert!(!view.is_authenticated());
        assert_eq!(view.accept(), None);
    }
}
