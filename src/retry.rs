use std::time::Duration;

/// Backoff and retry-eligibility rules applied by [`JsonClient`](crate::JsonClient).
///
/// Only timeouts and connection failures are retried unless
/// `transient_service_messages` is populated, in which case embedded service
/// errors whose message contains one of the listed substrings are retried too.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before the first retry; doubled for every further attempt.
    pub base_delay: Duration,
    /// Upper bound (exclusive) of the uniform jitter added to each delay.
    pub max_jitter: Duration,
    /// Case-insensitive message substrings that mark a service error as transient.
    pub transient_service_messages: Vec<String>,
}

impl RetryPolicy {
    /// Service error messages the cadastre is known to return intermittently.
    pub const KNOWN_TRANSIENT_SERVICE_MESSAGES: &'static [&'static str] =
        &["error performing query operation"];

    /// Removes the random component so delays are exactly `base * 2^attempt`.
    pub fn without_jitter(mut self) -> Self {
        self.max_jitter = Duration::ZERO;
        self
    }

    /// Opts in to retrying the known-transient service error messages.
    pub fn retry_known_service_errors(mut self) -> Self {
        self.transient_service_messages = Self::KNOWN_TRANSIENT_SERVICE_MESSAGES
            .iter()
            .map(|message| (*message).to_owned())
            .collect();
        self
    }

    /// Delay before retry `attempt` (0-based), excluding jitter.
    ///
    /// Doubles with every attempt until the multiplier no longer fits a
    /// `u32` or the product overflows, after which it stays at
    /// [`Duration::MAX`].
    pub fn base_backoff(&self, attempt: usize) -> Duration {
        u32::try_from(attempt)
            .ok()
            .and_then(|exp| 2u32.checked_pow(exp))
            .map_or(Duration::MAX, |factor| self.base_delay.saturating_mul(factor))
    }

    /// Delay before retry `attempt` (0-based), including jitter.
    pub fn backoff(&self, attempt: usize) -> Duration {
        let base = self.base_backoff(attempt);
        if self.max_jitter.is_zero() {
            return base;
        }
        base.saturating_add(self.max_jitter.mul_f64(rand::random::<f64>()))
    }

    pub fn retries_service_message(&self, message: &str) -> bool {
        let message = message.to_lowercase();
        self.transient_service_messages
            .iter()
            .any(|needle| !needle.is_empty() && message.contains(&needle.to_lowercase()))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(600),
            max_jitter: Duration::from_millis(400),
            transient_service_messages: Vec::new(),
        }
    }
}
