//! Construction-time sizing for the service.

use std::time::Duration;

use crate::error::ServiceError;

/// Cache sizing recognized by the service constructor. Mirrors
/// `max-cache-entries` / `cache-ttl-milliseconds` from the documented
/// configuration surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    pub max_cache_entries: usize,
    pub cache_ttl: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { max_cache_entries: 100, cache_ttl: Duration::from_secs(30) }
    }
}

impl ServiceConfig {
    /// Reject zero-valued fields; a zero-capacity cache or zero TTL would
    /// make every compile a forced miss, which is never what a caller means
    /// to configure.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.max_cache_entries == 0 {
            return Err(ServiceError::InvalidConfiguration(
                "max_cache_entries must be greater than zero".to_string(),
            ));
        }
        if self.cache_ttl.is_zero() {
            return Err(ServiceError::InvalidConfiguration(
                "cache_ttl must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ServiceConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let config = ServiceConfig { max_cache_entries: 0, cache_ttl: Duration::from_secs(30) };
        assert!(matches!(config.validate(), Err(ServiceError::InvalidConfiguration(_))));
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let config = ServiceConfig { max_cache_entries: 100, cache_ttl: Duration::ZERO };
        assert!(matches!(config.validate(), Err(ServiceError::InvalidConfiguration(_))));
    }
}
