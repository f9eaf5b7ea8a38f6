use std::io::Error as IoError;

use thiserror::Error;

use crate::config::ConfigError;

/// Fatal errors raised before any website is probed
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build HTTP client")]
    HttpClient(#[from] reqwest::Error),
    #[error("failed to install signal handler")]
    Signal(#[source] IoError),
}
