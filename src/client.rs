use std::{fmt, sync::Arc, time::Duration};

use reqwest::StatusCode;
use serde_json::Value as JsonValue;
use tokio::time::sleep;

use crate::{
    decode,
    diagnostics::{Diagnostic, DiagnosticSink, TracingSink},
    QueryParams, Result, RetryPolicy, SpatialError,
};

/// Read timeout used when a request does not set one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
/// Retries after the first attempt when a request does not set a bound.
pub const DEFAULT_MAX_RETRIES: usize = 2;
/// Connect timeout shared by every request, independent of the read timeout.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// A single GET request against a JSON endpoint.
#[derive(Clone, Debug, PartialEq)]
pub struct JsonRequest {
    /// Absolute endpoint URL.
    pub url: String,
    /// Query-string parameters.
    pub params: QueryParams,
    /// Read timeout for each attempt.
    pub timeout: Duration,
    /// Retries after the first attempt; total attempts are `max_retries + 1`.
    pub max_retries: usize,
    /// Emit diagnostics for this request.
    pub debug: bool,
}

impl JsonRequest {
    pub fn new(url: impl Into<String>, params: impl Into<QueryParams>) -> Self {
        Self {
            url: url.into(),
            params: params.into(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            debug: false,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Classification of one completed attempt.
#[derive(Debug)]
pub(crate) enum ResponseOutcome {
    Success(JsonValue),
    /// 2xx response carrying an `error` object; holds the raw payload.
    ServiceError(JsonValue),
    /// Timeout or other connection-level failure.
    TransientFailure(reqwest::Error),
}

/// HTTP client that fetches JSON with bounded retry on transient failures.
///
/// Timeouts and connection failures (refused, reset, dropped mid-body) are
/// retried with exponential backoff and jitter. Non-2xx statuses, unparsable bodies and embedded service errors
/// fail immediately.
#[derive(Clone)]
pub struct JsonClient {
    http: reqwest::Client,
    policy: RetryPolicy,
    sink: Arc<dyn DiagnosticSink>,
}

impl fmt::Debug for JsonClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonClient")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl JsonClient {
    /// Creates a client with the default retry policy and a `tracing` sink.
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(SpatialError::Transport)?;
        Ok(Self {
            http,
            policy: RetryPolicy::default(),
            sink: Arc::new(TracingSink),
        })
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the destination of debug diagnostics.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Shorthand for [`JsonClient::fetch_json`] with default timeout and retries.
    pub async fn get(&self, url: &str, params: impl Into<QueryParams>) -> Result<JsonValue> {
        self.fetch_json(&JsonRequest::new(url, params)).await
    }

    /// Issues the request and returns the parsed JSON body.
    ///
    /// Makes at most `max_retries + 1` attempts. Only the transient path
    /// (timeout or connection failure) is retried, plus service errors whose
    /// message the policy lists as transient.
    pub async fn fetch_json(&self, request: &JsonRequest) -> Result<JsonValue> {
        if request.url.trim().is_empty() {
            return Err(SpatialError::InvalidInput("url must not be empty".to_owned()));
        }
        let query = request.params.encode()?;

        let mut attempt = 0usize;
        loop {
            match self.attempt(request, &query, attempt).await? {
                ResponseOutcome::Success(body) => return Ok(body),
                ResponseOutcome::ServiceError(payload) => {
                    let err = decode::service_error(&payload);
                    let retryable = match &err {
                        SpatialError::Service { message, .. } => {
                            self.policy.retries_service_message(message)
                        }
                        _ => false,
                    };
                    if retryable && attempt < request.max_retries {
                        self.wait_before_retry(request, attempt, "transient service error")
                            .await;
                        attempt += 1;
                        continue;
                    }
                    return Err(err);
                }
                ResponseOutcome::TransientFailure(source) => {
                    if attempt < request.max_retries {
                        self.wait_before_retry(request, attempt, &source.to_string())
                            .await;
                        attempt += 1;
                        continue;
                    }
                    return Err(SpatialError::NetworkTimeout {
                        url: request.url.clone(),
                        timeout: request.timeout,
                        attempts: attempt + 1,
                        source,
                    });
                }
            }
        }
    }

    async fn attempt(
        &self,
        request: &JsonRequest,
        query: &[(String, String)],
        attempt: usize,
    ) -> Result<ResponseOutcome> {
        let outgoing = self
            .http
            .get(&request.url)
            .query(query)
            .timeout(request.timeout)
            .build()
            .map_err(SpatialError::Transport)?;

        if request.debug {
            self.sink.emit(&Diagnostic::Request {
                url: outgoing.url().as_str(),
                params: query,
                attempt,
            });
        }

        let response = match self.http.execute(outgoing).await {
            Ok(response) => response,
            Err(err) if is_transient(&err) => return Ok(ResponseOutcome::TransientFailure(err)),
            Err(err) => return Err(SpatialError::Transport(err)),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) if is_transient(&err) => return Ok(ResponseOutcome::TransientFailure(err)),
            Err(err) => return Err(SpatialError::Transport(err)),
        };

        let outcome = classify(status, body)?;
        if let (true, ResponseOutcome::ServiceError(payload)) = (request.debug, &outcome) {
            self.sink.emit(&Diagnostic::ServiceError {
                url: &request.url,
                payload,
            });
        }
        Ok(outcome)
    }

    async fn wait_before_retry(&self, request: &JsonRequest, attempt: usize, reason: &str) {
        let delay = self.policy.backoff(attempt);
        if request.debug {
            self.sink.emit(&Diagnostic::Retry {
                url: &request.url,
                attempt: attempt + 1,
                delay,
                reason,
            });
        }
        sleep(delay).await;
    }

    /// Reports a caller-side value through the diagnostic sink.
    pub(crate) fn trace_value(&self, debug: bool, label: &str, value: &JsonValue) {
        if debug {
            self.sink.emit(&Diagnostic::Value { label, value });
        }
    }
}

/// Maps a completed HTTP exchange onto an outcome or a fatal error.
pub(crate) fn classify(status: StatusCode, body: String) -> Result<ResponseOutcome> {
    if !status.is_success() {
        return Err(SpatialError::Http {
            status: status.as_u16(),
            body,
        });
    }

    let mut json: JsonValue = serde_json::from_str(&body)
        .map_err(|err| SpatialError::JsonParse(format!("{err}; body: {body}")))?;

    let embedded = json
        .as_object_mut()
        .and_then(|object| object.remove("error"))
        .filter(|error| !error.is_null());
    match embedded {
        Some(error) => Ok(ResponseOutcome::ServiceError(error)),
        None => Ok(ResponseOutcome::Success(json)),
    }
}

/// Connection-level failures: timeouts, refused or reset connections and
/// bodies cut off mid-read. Builder, redirect and decode errors are fatal.
fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request() || err.is_body()
}
