//! HTTP client used by the probes
//!
//! A probe is a single GET. Elapsed time is taken when the response headers
//! arrive; the body is then read in chunks up to a byte cap within whatever is
//! left of the deadline. Cancellation and deadline expiry surface as
//! [`AppError::Timeout`] whether they hit before or after the headers.


use crate::{
    error::{AppError, Result},
    runner::CancelSignal,
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};

/// HTTP client trait for abstraction and testing
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Execute a GET request, honoring its timeout and the cancel signal
    async fn execute_request(&self, request: HttpRequest, cancel: &CancelSignal) -> Result<HttpResponse>;
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub timeout: Duration,
    pub user_agent: Option<String>,
    pub headers: Vec<(String, String)>,
    pub max_body_bytes: usize,
}

impl HttpRequest {
    pub fn get<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            timeout: crate::defaults::DEFAULT_TIMEOUT,
            user_agent: None,
            headers: Vec::new(),
            max_body_bytes: crate::defaults::DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_header<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

/// Completed HTTP exchange
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    /// Time from send until the response headers arrived
    pub elapsed: Duration,
    /// Body bytes, at most `max_body_bytes`
    pub body: Vec<u8>,
    /// The body was cut at the cap or the connection broke mid-read
    pub body_truncated: bool,
}

impl HttpResponse {
    /// 2xx or 3xx
    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status_code)
    }
}

/// reqwest-backed probe client
pub struct ProbeHttpClient {
    client: Client,
}

impl ProbeHttpClient {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| AppError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Read the body until EOF, the byte cap, the deadline or cancellation
    async fn read_body(
        mut response: reqwest::Response,
        max_bytes: usize,
        deadline: tokio::time::Instant,
        cancel: &CancelSignal,
    ) -> (Vec<u8>, BodyEnd) {
        let mut body = Vec::new();

        loop {
            let chunk = tokio::select! {
                biased;
                _ = cancel.cancelled() => return (body, BodyEnd::Cancelled),
                chunk = tokio::time::timeout_at(deadline, response.chunk()) => chunk,
            };

            match chunk {
                Ok(Ok(Some(bytes))) => {
                    let room = max_bytes.saturating_sub(body.len());
                    if bytes.len() > room {
                        body.extend_from_slice(&bytes[..room]);
                        return (body, BodyEnd::Cap);
                    }
                    body.extend_from_slice(&bytes);
                }
                Ok(Ok(None)) => return (body, BodyEnd::Eof),
                Ok(Err(_)) => return (body, BodyEnd::ReadFailed),
                Err(_) => return (body, BodyEnd::Deadline),
            }
        }
    }
}

/// Why a body read stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyEnd {
    Eof,
    Cap,
    /// The connection broke mid-body; whatever arrived is kept
    ReadFailed,
    Deadline,
    Cancelled,
}

#[async_trait]
impl HttpClient for ProbeHttpClient {
    async fn execute_request(&self, request: HttpRequest, cancel: &CancelSignal) -> Result<HttpResponse> {
        if cancel.is_cancelled() {
            return Err(AppError::timeout("probe cancelled before start"));
        }

        let mut builder = self.client.get(&request.url);
        if let Some(ua) = &request.user_agent {
            builder = builder.header(reqwest::header::USER_AGENT, ua.as_str());
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let deadline = tokio::time::Instant::now() + request.timeout;
        let start = Instant::now();

        let sent = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AppError::timeout("probe cancelled")),
            sent = tokio::time::timeout_at(deadline, builder.send()) => sent,
        };

        let response = match sent {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(AppError::from(e)),
            Err(_) => {
                return Err(AppError::timeout(format!(
                    "request timed out after {}ms",
                    request.timeout.as_millis()
                )));
            }
        };

        let elapsed = start.elapsed();
        let status_code = response.status().as_u16();
        let (body, end) = Self::read_body(response, request.max_body_bytes, deadline, cancel).await;

        let body_truncated = match end {
            BodyEnd::Eof => false,
            BodyEnd::Cap | BodyEnd::ReadFailed => true,
            BodyEnd::Deadline => {
                return Err(AppError::timeout(format!(
                    "response body timed out after {}ms",
                    request.timeout.as_millis()
                )));
            }
            BodyEnd::Cancelled => return Err(AppError::timeout("probe cancelled while reading body")),
        };

        Ok(HttpResponse {
            status_code,
            elapsed,
            body,
            body_truncated,
        })
    }
}
