use std::time::Duration;

use crate::{RetryPolicy, SpatialError};

/// Configures HTTP timeout, retry and debug behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-request read timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum number of retries after the initial attempt.
    pub max_retries: usize,
    /// Base retry backoff in milliseconds (exponential strategy).
    pub retry_backoff_ms: u64,
    /// Upper bound of the random jitter added to each backoff, in milliseconds.
    pub retry_jitter_ms: u64,
    /// Emit debug diagnostics for every request.
    pub debug: bool,
    /// Service error messages that should be retried like timeouts.
    pub transient_service_messages: Vec<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 15_000,
            max_retries: 2,
            retry_backoff_ms: 600,
            retry_jitter_ms: 400,
            debug: false,
            transient_service_messages: Vec::new(),
        }
    }
}

impl ClientOptions {
    /// Reads overrides from the environment on top of the defaults.
    ///
    /// Reads:
    /// - `NSWSPATIAL_TIMEOUT_MS`: read timeout in milliseconds
    /// - `NSWSPATIAL_MAX_RETRIES`: retries after the first attempt
    /// - `NSWSPATIAL_DEBUG`: `1`/`true`/`yes` enables debug diagnostics
    ///
    /// Unset variables keep their default; unparsable ones are an error.
    pub fn from_env() -> Result<Self, SpatialError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, SpatialError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();

        if let Some(raw) = non_blank(lookup("NSWSPATIAL_TIMEOUT_MS")) {
            options.timeout_ms = raw.parse().map_err(|err| {
                SpatialError::InvalidInput(format!("NSWSPATIAL_TIMEOUT_MS '{raw}': {err}"))
            })?;
        }
        if let Some(raw) = non_blank(lookup("NSWSPATIAL_MAX_RETRIES")) {
            options.max_retries = raw.parse().map_err(|err| {
                SpatialError::InvalidInput(format!("NSWSPATIAL_MAX_RETRIES '{raw}': {err}"))
            })?;
        }
        if let Some(raw) = non_blank(lookup("NSWSPATIAL_DEBUG")) {
            options.debug = matches!(
                raw.to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        Ok(options)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            base_delay: Duration::from_millis(self.retry_backoff_ms),
            max_jitter: Duration::from_millis(self.retry_jitter_ms),
            transient_service_messages: self.transient_service_messages.clone(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::ClientOptions;
    use crate::SpatialError;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_match_request_defaults() {
        let options = ClientOptions::default();
        assert_eq!(options.timeout_ms, 15_000);
        assert_eq!(options.max_retries, 2);
        assert!(!options.debug);
        assert_eq!(options.retry_policy(), crate::RetryPolicy::default());
    }

    #[test]
    fn env_overrides_apply() {
        let options = ClientOptions::from_lookup(lookup(&[
            ("NSWSPATIAL_TIMEOUT_MS", "30000"),
            ("NSWSPATIAL_MAX_RETRIES", "4"),
            ("NSWSPATIAL_DEBUG", "TRUE"),
        ]))
        .expect("must parse");
        assert_eq!(options.timeout_ms, 30_000);
        assert_eq!(options.max_retries, 4);
        assert!(options.debug);
    }

    #[test]
    fn blank_env_values_keep_defaults() {
        let options = ClientOptions::from_lookup(lookup(&[("NSWSPATIAL_MAX_RETRIES", " ")]))
            .expect("must parse");
        assert_eq!(options.max_retries, 2);
    }

    #[test]
    fn invalid_env_value_is_rejected() {
        let err = ClientOptions::from_lookup(lookup(&[("NSWSPATIAL_TIMEOUT_MS", "soon")]))
            .expect_err("must fail");
        assert!(matches!(err, SpatialError::InvalidInput(_)));
    }
}
