// src/onboarding/mod.rs — Source-system connection checks used during onboarding

pub mod p6;
pub mod sap;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use url::Url;

use crate::infra::errors::OrionError;
use crate::settings::{ConnectionInput, SourceSystem};

pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionTestResult {
    pub success: bool,
    pub message: String,
    pub latency_ms: u64,
}

impl ConnectionTestResult {
    /// What a mock-mode test reports; no network I/O happens.
    pub fn simulated(system: SourceSystem) -> Self {
        Self {
            success: true,
            message: format!("Connected to {} (demo data)", system.label()),
            latency_ms: 0,
        }
    }
}

/// Probe `system` with the given credentials. Transport and HTTP failures
/// are reported in the result; only invalid input is an error.
pub async fn test_connection(
    http: &Client,
    system: SourceSystem,
    input: &ConnectionInput,
) -> Result<ConnectionTestResult, OrionError> {
    input.validate()?;
    let started = Instant::now();
    let outcome = match system {
        SourceSystem::P6 => p6::probe(http, input).await?,
        SourceSystem::Sap => sap::probe(http, input).await?,
    };
    let latency_ms = started.elapsed().as_millis() as u64;

    let (success, message) = match outcome {
        Ok(detail) => (true, detail),
        Err(reason) => (false, reason),
    };
    if success {
        tracing::info!(system = %system, host = %input.host, latency_ms, "Connection test passed");
    } else {
        tracing::warn!(system = %system, host = %input.host, %message, "Connection test failed");
    }
    Ok(ConnectionTestResult {
        success,
        message,
        latency_ms,
    })
}

/// Base URL for a user-entered host. A bare hostname gets `https://`.
pub fn base_url(host: &str) -> Result<Url, OrionError> {
    let host = host.trim().trim_end_matches('/');
    let with_scheme = if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{host}")
    };
    let url = Url::parse(&with_scheme)
        .map_err(|e| OrionError::InvalidSetting(format!("invalid host '{host}': {e}")))?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url),
        _ => Err(OrionError::InvalidSetting(format!(
            "invalid host '{host}': expected an http(s) address"
        ))),
    }
}

/// Append path segments to a base URL, keeping any path it already has.
fn join(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Probe outcome: `Ok(detail)` when reachable and authorized, otherwise
/// `Err(reason)` for the caller to report.
pub(crate) type Probe = Result<String, String>;

fn describe_status(system: &str, status: StatusCode) -> String {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            format!("{system} rejected the credentials ({})", status.as_u16())
        }
        StatusCode::NOT_FOUND => format!("{system} endpoint not found (404); check the host"),
        s => format!("{system} returned {}", s.as_u16()),
    }
}

fn describe_transport(system: &str, err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("{system} did not answer within {}s", PROBE_TIMEOUT.as_secs())
    } else if err.is_connect() {
        format!("Could not reach {system}: connection refused or DNS failure")
    } else {
        format!("Could not reach {system}: {err}")
    }
}
