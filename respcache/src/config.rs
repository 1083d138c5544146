//! Interceptor configuration.
//!
//! [`CacheConfiguration`] is fixed for the lifetime of an interceptor. It can
//! be built fluently or deserialized from endpoint configuration files:
//!
//! ```
//! use respcache::CacheConfiguration;
//!
//! let config = CacheConfiguration::builder()
//!     .server_time_span(300)
//!     .client_time_span(30)
//!     .anonymous_only(true)
//!     .build();
//!
//! assert!(config.validate().is_ok());
//! assert_eq!(config.server_ttl().as_secs(), 300);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Default lifetime of a stored entry, in seconds.
pub const DEFAULT_SERVER_TIME_SPAN: i64 = 120;

/// Default `max-age` advertised to clients, in seconds.
pub const DEFAULT_CLIENT_TIME_SPAN: i64 = 60;

/// Caching policy of a single interceptor.
///
/// Time spans are signed so that a misconfigured value deserializes and is
/// reported by [`validate`](Self::validate) rather than by the parser.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct CacheConfiguration {
    /// How long a stored response stays valid, in seconds.
    pub server_time_span: i64,
    /// The `max-age` sent to clients, in seconds.
    pub client_time_span: i64,
    /// Restrict caching to unauthenticated callers.
    pub anonymous_only: bool,
}

impl Default for CacheConfiguration {
    fn default() -> Self {
        Self {
            server_time_span: DEFAULT_SERVER_TIME_SPAN,
            client_time_span: DEFAULT_CLIENT_TIME_SPAN,
            anonymous_only: false,
        }
    }
}

impl CacheConfiguration {
    /// Creates a new [`CacheConfigurationBuilder`] seeded with the defaults.
    pub fn builder() -> CacheConfigurationBuilder {
        CacheConfigurationBuilder::default()
    }

    /// Checks that both time spans are strictly positive.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.server_time_span <= 0 {
            return Err(ConfigurationError::NonPositiveServerTimeSpan(
                self.server_time_span,
            ));
        }
        if self.client_time_span <= 0 {
            return Err(ConfigurationError::NonPositiveClientTimeSpan(
                self.client_time_span,
            ));
        }
        Ok(())
    }

    /// Server-side TTL. Only meaningful after [`validate`](Self::validate).
    pub fn server_ttl(&self) -> Duration {
        Duration::from_secs(self.server_time_span.max(0) as u64)
    }

    /// Client-side `max-age`. Only meaningful after [`validate`](Self::validate).
    pub fn client_ttl(&self) -> Duration {
        Duration::from_secs(self.client_time_span.max(0) as u64)
    }
}

/// Builder for [`CacheConfiguration`].
#[derive(Debug, Default)]
pub struct CacheConfigurationBuilder {
    config: CacheConfiguration,
}

impl CacheConfigurationBuilder {
    /// Sets how long stored responses stay valid, in seconds.
    pub fn server_time_span(mut self, seconds: i64) -> Self {
        self.config.server_time_span = seconds;
        self
    }

    /// Sets the `max-age` advertised to clients, in seconds.
    pub fn client_time_span(mut self, seconds: i64) -> Self {
        self.config.client_time_span = seconds;
        self
    }

    /// Restricts caching to unauthenticated callers.
    pub fn anonymous_only(mut self, anonymous_only: bool) -> Self {
        self.config.anonymous_only = anonymous_only;
        self
    }

    /// Builds the configuration. Validation is deferred to the interceptor.
    pub fn build(self) -> CacheConfiguration {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = CacheConfiguration::default();
        assert_eq!(config.server_time_span, 120);
        assert_eq!(config.client_time_span, 60);
        assert!(!config.anonymous_only);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_server_span_is_rejected() {
        let config = CacheConfiguration::builder().server_time_span(0).build();
        assert_eq!(
            config.validate(),
            Err(ConfigurationError::NonPositiveServerTimeSpan(0))
        );
    }

    #[test]
    fn negative_client_span_is_rejected() {
        let config = CacheConfiguration::builder().client_time_span(-5).build();
        assert_eq!(
            config.validate(),
            Err(ConfigurationError::NonPositiveClientTimeSpan(-5))
        );
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: CacheConfiguration =
            serde_json::from_str(r#"{"anonymous_only": true}"#).unwrap();
        assert_eq!(config.server_time_span, 120);
        assert_eq!(config.client_time_span, 60);
        assert!(config.anonymous_only);
    }

    #[test]
    fn yaml_endpoint_configuration() {
        let yaml = r#"
        server_time_span: 600
        client_time_span: 30
        "#;
        let config: CacheConfiguration = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.server_ttl(), Duration::from_secs(600));
        assert_eq!(config.client_ttl(), Duration::from_secs(30));
        assert!(!config.anonymous_only);
    }
}
