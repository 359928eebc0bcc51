//! Debug diagnostics emitted by [`JsonClient`](crate::JsonClient).
//!
//! Diagnostics are only produced for requests built with
//! [`JsonRequest::with_debug`](crate::JsonRequest::with_debug). They go to a
//! [`DiagnosticSink`] owned by the client, so tests can capture them with
//! [`MemorySink`] while applications keep the default [`TracingSink`].

use std::{fmt, sync::Mutex, time::Duration};

use serde_json::Value as JsonValue;

/// A single debug event.
#[derive(Debug)]
pub enum Diagnostic<'a> {
    /// An attempt is about to be sent.
    Request {
        url: &'a str,
        params: &'a [(String, String)],
        attempt: usize,
    },
    /// The response carried an embedded `error` object.
    ServiceError {
        url: &'a str,
        payload: &'a JsonValue,
    },
    /// A retry has been scheduled.
    Retry {
        url: &'a str,
        attempt: usize,
        delay: Duration,
        reason: &'a str,
    },
    /// A labelled value reported by a caller, e.g. a returned spatial reference.
    Value {
        label: &'a str,
        value: &'a JsonValue,
    },
}

impl fmt::Display for Diagnostic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request {
                url,
                params,
                attempt,
            } => {
                write!(f, "GET {url} attempt={attempt} params=[")?;
                for (index, (name, value)) in params.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}={value}")?;
                }
                f.write_str("]")
            }
            Self::ServiceError { url, payload } => {
                write!(f, "service error from {url}: {payload}")
            }
            Self::Retry {
                url,
                attempt,
                delay,
                reason,
            } => write!(
                f,
                "retrying {url} after {} ms (attempt {attempt}): {reason}",
                delay.as_millis()
            ),
            Self::Value { label, value } => write!(f, "{label}: {value}"),
        }
    }
}

/// Destination for debug diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: &Diagnostic<'_>);
}

/// Forwards diagnostics to `tracing` at debug level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: &Diagnostic<'_>) {
        match diagnostic {
            Diagnostic::Request { url, attempt, .. } => {
                tracing::debug!(url = %url, attempt = *attempt, "{diagnostic}");
            }
            Diagnostic::Retry { url, delay, .. } => {
                tracing::debug!(url = %url, delay_ms = delay.as_millis() as u64, "{diagnostic}");
            }
            Diagnostic::ServiceError { url, .. } => {
                tracing::debug!(url = %url, "{diagnostic}");
            }
            Diagnostic::Value { .. } => tracing::debug!("{diagnostic}"),
        }
    }
}

/// Keeps rendered diagnostics in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every line recorded so far.
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, diagnostic: &Diagnostic<'_>) {
        let line = diagnostic.to_string();
        match self.lines.lock() {
            Ok(mut lines) => lines.push(line),
            Err(poisoned) => poisoned.into_inner().push(line),
        }
    }
}
