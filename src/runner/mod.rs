//! Probe runner
//!
//! Issues one GET per requested probe, classifies each outcome into a
//! [`Status`] and extracts what the endpoint reported about the client
//! address. Probes fan out up to the configured concurrency; results are put
//! back into request order before the run-level IPv4/IPv6 observations are
//! chosen, so completion order never changes the outcome.

pub mod cancel;
pub mod catalog;
pub mod observation;

pub use cancel::{CancelHandle, CancelSignal};
pub use catalog::catalog;
pub use observation::parse_ip_observation;

use crate::{
    client::{HttpClient, HttpRequest, HttpResponse, ProbeHttpClient},
    config::default_endpoints,
    error::Result,
    logging::ProbeLogger,
    models::{Config, IpObservation, ProbeResult, RunResult},
    types::{IpFamily, ProbeName, Status},
};
use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use std::{
    collections::BTreeMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Semaphore;
use uuid::Uuid;

/// Runner-wide settings
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// Probe to URL; a missing or empty entry means the probe is skipped
    pub endpoints: BTreeMap<ProbeName, String>,
    pub timeout: Duration,
    pub slow_threshold: Duration,
    /// Reported on every attempted probe and on the run
    pub packet_size: usize,
    pub user_agent: String,
    pub max_body_bytes: usize,
    pub concurrency: usize,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        use crate::defaults::*;
        Self {
            endpoints: default_endpoints(DEFAULT_DOMAIN, "", DEFAULT_PACKET_SIZE),
            timeout: DEFAULT_TIMEOUT,
            slow_threshold: DEFAULT_SLOW_THRESHOLD,
            packet_size: DEFAULT_PACKET_SIZE,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl From<&Config> for RunnerOptions {
    fn from(config: &Config) -> Self {
        Self {
            endpoints: config.endpoints(),
            timeout: config.timeout(),
            slow_threshold: config.slow_threshold(),
            packet_size: config.packet_size,
            user_agent: config.user_agent.clone(),
            max_body_bytes: config.max_body_bytes,
            concurrency: config.concurrency,
        }
    }
}

/// Per-run adjustments layered over [`RunnerOptions`]
#[derive(Debug, Clone, Default)]
pub struct RunOverrides {
    /// Replacement URLs; an empty string leaves the probe unconfigured
    pub endpoints: BTreeMap<ProbeName, String>,
    pub timeout: Option<Duration>,
    pub slow_threshold: Option<Duration>,
    pub packet_size: Option<usize>,
}

impl RunOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint<S: Into<String>>(mut self, name: ProbeName, url: S) -> Self {
        self.endpoints.insert(name, url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_slow_threshold(mut self, slow_threshold: Duration) -> Self {
        self.slow_threshold = Some(slow_threshold);
        self
    }

    pub fn with_packet_size(mut self, packet_size: usize) -> Self {
        self.packet_size = Some(packet_size);
        self
    }
}

/// Options and overrides resolved for one run
struct RunSettings {
    endpoints: BTreeMap<ProbeName, String>,
    timeout: Duration,
    slow_threshold: Duration,
    packet_size: usize,
}

impl RunSettings {
    fn resolve(options: &RunnerOptions, overrides: &RunOverrides) -> Self {
        let mut endpoints = options.endpoints.clone();
        endpoints.extend(overrides.endpoints.iter().map(|(name, url)| (*name, url.clone())));

        // Zero values fall back to the runner defaults
        Self {
            endpoints,
            timeout: overrides.timeout.filter(|d| !d.is_zero()).unwrap_or(options.timeout),
            slow_threshold: overrides
                .slow_threshold
                .filter(|d| !d.is_zero())
                .unwrap_or(options.slow_threshold),
            packet_size: overrides.packet_size.filter(|n| *n > 0).unwrap_or(options.packet_size),
        }
    }

    fn endpoint(&self, name: ProbeName) -> Option<&str> {
        self.endpoints
            .get(&name)
            .map(|url| url.trim())
            .filter(|url| !url.is_empty())
    }
}

/// Executes probe batches
pub struct ProbeRunner {
    client: Arc<dyn HttpClient>,
    options: RunnerOptions,
    logger: ProbeLogger,
}

impl ProbeRunner {
    /// Runner backed by the reqwest client
    pub fn new(options: RunnerOptions) -> Result<Self> {
        let client = ProbeHttpClient::new(&options.user_agent)?;
        Ok(Self::with_client(options, Arc::new(client)))
    }

    /// Runner over any [`HttpClient`]
    pub fn with_client(options: RunnerOptions, client: Arc<dyn HttpClient>) -> Self {
        Self {
            client,
            options,
            logger: ProbeLogger::quiet(),
        }
    }

    pub fn with_logger(mut self, logger: ProbeLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn options(&self) -> &RunnerOptions {
        &self.options
    }

    /// Run `names` (all eight when empty) to completion
    pub async fn run(&self, names: &[ProbeName], overrides: &RunOverrides) -> RunResult {
        self.run_with_cancel(names, overrides, &CancelSignal::never()).await
    }

    /// Like [`run`](Self::run); in-flight probes end as `timeout` once `cancel` fires
    pub async fn run_with_cancel(
        &self,
        names: &[ProbeName],
        overrides: &RunOverrides,
        cancel: &CancelSignal,
    ) -> RunResult {
        let names: Vec<ProbeName> = if names.is_empty() {
            ProbeName::ALL.to_vec()
        } else {
            names.to_vec()
        };
        let settings = RunSettings::resolve(&self.options, overrides);
        let concurrency = self.options.concurrency.max(1);

        let run_id = generate_run_id();
        let started_at = Utc::now();
        let start = Instant::now();
        let correlation_id = self.logger.log_run_start(&run_id, names.len(), concurrency).await;

        let semaphore = Semaphore::new(concurrency);
        let mut pending: FuturesUnordered<_> = names
            .iter()
            .enumerate()
            .map(|(index, &name)| {
                let settings = &settings;
                let semaphore = &semaphore;
                async move {
                    let result = match settings.endpoint(name) {
                        None => ProbeResult::skipped(name),
                        Some(url) => {
                            let _permit = semaphore.acquire().await;
                            self.run_single(name, url, settings, cancel).await
                        }
                    };
                    (index, result)
                }
            })
            .collect();

        let mut completed = Vec::with_capacity(names.len());
        while let Some((index, result)) = pending.next().await {
            self.logger.log_probe_result(&result, &correlation_id).await;
            completed.push((index, result));
        }
        drop(pending);

        completed.sort_by_key(|(index, _)| *index);
        let results: Vec<ProbeResult> = completed.into_iter().map(|(_, result)| result).collect();
        let (ipv4, ipv6) = first_observations(&results);

        let run = RunResult {
            run_id,
            started_at,
            duration_ms: start.elapsed().as_millis() as u64,
            ipv4,
            ipv6,
            results,
            slow_threshold_ms: settings.slow_threshold.as_millis() as u64,
            timeout_ms: settings.timeout.as_millis() as u64,
            packet_size_bytes: settings.packet_size,
        };

        self.logger.log_run_complete(&run, &correlation_id).await;
        run
    }

    async fn run_single(&self, name: ProbeName, url: &str, settings: &RunSettings, cancel: &CancelSignal) -> ProbeResult {
        let request = HttpRequest::get(url)
            .with_timeout(settings.timeout)
            .with_user_agent(self.options.user_agent.as_str())
            .with_max_body_bytes(self.options.max_body_bytes);

        let start = Instant::now();
        match self.client.execute_request(request, cancel).await {
            Ok(response) => classify_response(name, url, &response, settings.slow_threshold)
                .with_packet_size(settings.packet_size),
            Err(e) => {
                let status = if e.is_timeout() { Status::Timeout } else { Status::Error };
                ProbeResult::attempted(name, url, status, start.elapsed())
                    .with_packet_size(settings.packet_size)
                    .with_error(e.message())
            }
        }
    }
}

/// Status and observation for a completed HTTP exchange
pub fn classify_response(name: ProbeName, url: &str, response: &HttpResponse, slow_threshold: Duration) -> ProbeResult {
    let status = if response.is_success() {
        if response.elapsed > slow_threshold {
            Status::Slow
        } else {
            Status::Ok
        }
    } else {
        Status::Bad
    };

    let mut result = ProbeResult::attempted(name, url, status, response.elapsed)
        .with_http_status(response.status_code)
        .with_observation(parse_ip_observation(&response.body));

    if response.body_truncated {
        result = result.with_notes(format!("body truncated at {} bytes", response.body.len()));
    }

    if status == Status::Bad {
        result.with_error(format!("http status {}", response.status_code))
    } else {
        result
    }
}

/// First IPv4 and first IPv6 observation, in result order
pub fn first_observations(results: &[ProbeResult]) -> (Option<IpObservation>, Option<IpObservation>) {
    let first = |family: IpFamily| {
        results
            .iter()
            .find_map(|r| r.observation_of(family))
            .cloned()
    };
    (first(IpFamily::Ipv4), first(IpFamily::Ipv6))
}

/// `run-<unix nanos>-<random>`
pub fn generate_run_id() -> String {
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("run-{}-{}", nanos, Uuid::new_v4().simple())
}
