use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;

use super::validation::{ValidationError, validate_http_target, validate_interval, validate_name};
use crate::config::WebsiteConfig;
use crate::duration::parse_duration;

/// Coarse status of a website, used as a structured log field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorStatus {
    Up,
    Down,
}

impl fmt::Display for MonitorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorStatus::Up => write!(f, "up"),
            MonitorStatus::Down => write!(f, "down"),
        }
    }
}

/// A monitored website
///
/// Built once from configuration and owned by exactly one monitor loop.
/// Construction enforces a non-empty name, an absolute http(s) URL and a
/// positive interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    name: String,
    url: String,
    interval: Duration,
}

impl Target {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        interval: Duration,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let url = url.into();

        validate_name(&name)?;
        validate_http_target(&url)?;
        validate_interval(interval)?;

        Ok(Self { name, url, interval })
    }

    /// Build a target from its configuration entry, parsing the interval string
    pub fn from_config(website: &WebsiteConfig) -> Result<Self, ValidationError> {
        let interval = parse_duration(&website.interval).map_err(|source| {
            ValidationError::InvalidInterval { value: website.interval.clone(), source }
        })?;

        Self::new(website.name.clone(), website.url.clone(), interval)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self.name, self.url)
    }
}

/// Classified result of a single probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The site answered `200 OK`.
    Healthy,
    /// The request never completed: DNS, connect, TLS or timeout failure.
    Unreachable { cause: String },
    /// The site answered with any status other than `200 OK`.
    UnhealthyStatus { code: u16, status_text: String },
}

impl ProbeOutcome {
    /// Classify a received status code. Only `200 OK` counts as healthy.
    pub fn from_status(status: StatusCode) -> Self {
        if status == StatusCode::OK {
            return Self::Healthy;
        }

        Self::UnhealthyStatus {
            code: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    }

    /// Classify a transport failure, keeping the whole error chain as the cause
    pub fn unreachable(error: &(dyn StdError + 'static)) -> Self {
        let mut cause = error.to_string();
        let mut source = error.source();
        while let Some(inner) = source {
            let text = inner.to_string();
            if !cause.contains(&text) {
                cause.push_str(": ");
                cause.push_str(&text);
            }
            source = inner.source();
        }

        Self::Unreachable { cause }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    pub fn status(&self) -> MonitorStatus {
        if self.is_healthy() { MonitorStatus::Up } else { MonitorStatus::Down }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeOutcome::Healthy => write!(f, "healthy"),
            ProbeOutcome::Unreachable { cause } => write!(f, "unreachable: {cause}"),
            ProbeOutcome::UnhealthyStatus { code, status_text } => {
                write!(f, "unhealthy status: {code} {status_text}")
            }
        }
    }
}
