//! Cacheability decisions.

use http::Method;

use crate::config::CacheConfiguration;
use crate::error::CacheError;
use crate::request::RequestView;

/// Decides whether caching engages for `request`.
///
/// Only `GET` requests are cached, and with `anonymous_only` only those of
/// unauthenticated callers. A configuration with a non-positive time span is
/// an error rather than a quiet "no".
pub fn is_cacheable(
    config: &CacheConfiguration,
    request: &RequestView,
) -> Result<bool, CacheError> {
    config.validate()?;
    if *request.method() != Method::GET {
        return Ok(false);
    }
    Ok(!config.anonymous_only || !request.is_authenticated())
}
