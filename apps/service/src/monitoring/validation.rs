//! Validation of monitored targets.
//!
//! Runs once while configuration is turned into targets, so a bad entry
//! stops the process before any website is probed.

use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::duration::DurationError;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("website name must not be empty")]
    EmptyName,
    #[error("invalid URL {url:?}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported scheme {scheme:?} in {url:?}, expected http or https")]
    UnsupportedScheme { url: String, scheme: String },
    #[error("URL {0:?} has no host")]
    MissingHost(String),
    #[error("invalid check interval {value:?}")]
    InvalidInterval {
        value: String,
        #[source]
        source: DurationError,
    },
    #[error("check interval must be greater than zero")]
    NonPositiveInterval,
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

/// Validate HTTP/HTTPS target
pub fn validate_http_target(target: &str) -> Result<(), ValidationError> {
    let url = Url::parse(target)
        .map_err(|source| ValidationError::InvalidUrl { url: target.to_string(), source })?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ValidationError::UnsupportedScheme {
                url: target.to_string(),
                scheme: other.to_string(),
            });
        }
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(ValidationError::MissingHost(target.to_string())),
    }
}

/// A zero interval would turn the monitor loop into a busy loop
pub fn validate_interval(interval: Duration) -> Result<(), ValidationError> {
    if interval.is_zero() {
        return Err(ValidationError::NonPositiveInterval);
    }
    Ok(())
}
