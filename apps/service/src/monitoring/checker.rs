use std::time::Duration;

use reqwest::redirect::Policy;

use super::types::{ProbeOutcome, Target};

/// Performs a single reachability check against a target
///
/// Implementations never fail: every result, including transport errors,
/// is classified into a [`ProbeOutcome`]. Shared by all monitor loops, so
/// it must be safe to call concurrently.
#[async_trait::async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, target: &Target) -> ProbeOutcome;
}

/// HTTP/HTTPS prober issuing `HEAD` requests
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    /// Build a prober whose requests are bounded by `timeout`.
    ///
    /// A zero timeout installs no bound at all. Redirects are not followed
    /// so that a `3xx` is reported as it was received.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder()
            .redirect(Policy::none())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));

        if !timeout.is_zero() {
            builder = builder.timeout(timeout);
        }

        Ok(Self { client: builder.build()? })
    }
}

#[async_trait::async_trait]
impl Prober for HttpProber {
    async fn probe(&self, target: &Target) -> ProbeOutcome {
        match self.client.head(target.url()).send().await {
            Ok(response) => ProbeOutcome::from_status(response.status()),
            Err(error) => ProbeOutcome::unreachable(&error),
        }
    }
}
