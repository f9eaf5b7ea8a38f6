use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{Local, TimeDelta};
use tokio::task::{AbortHandle, JoinSet};
use tokio::time::sleep;
use tracing::{debug, error, info};

use super::checker::Prober;
use super::types::{ProbeOutcome, Target};
use crate::notifications::{NotificationMessage, Notifier};

#[derive(Debug, Default)]
struct Counters {
    probes: AtomicU64,
    notifications: AtomicU64,
    failed_deliveries: AtomicU64,
}

/// Read-only view of a monitor loop's activity
#[derive(Debug, Clone, Default)]
pub struct LoopStats {
    counters: Arc<Counters>,
}

impl LoopStats {
    /// Number of probes started
    pub fn probes(&self) -> u64 {
        self.counters.probes.load(Ordering::Relaxed)
    }

    /// Number of notification attempts, successful or not
    pub fn notifications(&self) -> u64 {
        self.counters.notifications.load(Ordering::Relaxed)
    }

    /// Number of notification attempts the notifier rejected
    pub fn failed_deliveries(&self) -> u64 {
        self.counters.failed_deliveries.load(Ordering::Relaxed)
    }
}

/// Probes one target forever on its own cadence
///
/// The first probe fires immediately. Every non-healthy outcome triggers
/// exactly one notification attempt before the loop sleeps for the target's
/// interval. Delivery failures are logged and never stop the loop.
pub struct MonitorLoop {
    target: Target,
    prober: Arc<dyn Prober>,
    notifier: Arc<dyn Notifier>,
    recipient: Arc<str>,
    stats: LoopStats,
}

impl MonitorLoop {
    pub fn new(
        target: Target,
        prober: Arc<dyn Prober>,
        notifier: Arc<dyn Notifier>,
        recipient: Arc<str>,
    ) -> Self {
        Self { target, prober, notifier, recipient, stats: LoopStats::default() }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn stats(&self) -> LoopStats {
        self.stats.clone()
    }

    /// Run a single probe cycle without the trailing sleep
    pub async fn run_once(&self) -> ProbeOutcome {
        self.stats.counters.probes.fetch_add(1, Ordering::Relaxed);
        let outcome = self.prober.probe(&self.target).await;

        let Some(message) = NotificationMessage::for_outcome(&self.target, &outcome) else {
            info!(
                website = self.target.name(),
                url = self.target.url(),
                status = %outcome.status(),
                next_check = %next_check_at(self.target.interval()),
                "Website {} ok",
                self.target
            );
            return outcome;
        };

        match &outcome {
            ProbeOutcome::Unreachable { cause } => error!(
                website = self.target.name(),
                url = self.target.url(),
                status = %outcome.status(),
                error = %cause,
                "{message}"
            ),
            _ => error!(
                website = self.target.name(),
                url = self.target.url(),
                status = %outcome.status(),
                "{message}"
            ),
        }

        self.stats.counters.notifications.fetch_add(1, Ordering::Relaxed);
        match self.notifier.notify(&self.recipient, &message.render()).await {
            Ok(()) => debug!(website = self.target.name(), "Notification delivered"),
            Err(error) => {
                self.stats.counters.failed_deliveries.fetch_add(1, Ordering::Relaxed);
                error!(website = self.target.name(), error = %error, "Cannot send notification");
            }
        }

        outcome
    }

    /// Probe, notify, sleep, repeat. Only returns when the task is aborted.
    pub async fn run(self) {
        debug!(
            website = self.target.name(),
            interval = ?self.target.interval(),
            "Monitor loop started"
        );

        loop {
            self.run_once().await;
            sleep(self.target.interval()).await;
        }
    }
}

fn next_check_at(interval: Duration) -> String {
    TimeDelta::from_std(interval)
        .ok()
        .and_then(|delta| Local::now().checked_add_signed(delta))
        .map_or_else(|| "never".to_string(), |at| at.to_rfc3339())
}

/// Monitoring scheduler - builds monitor loops and spawns one task per target
pub struct MonitoringScheduler {
    prober: Arc<dyn Prober>,
    notifier: Arc<dyn Notifier>,
    recipient: Arc<str>,
}

impl MonitoringScheduler {
    pub fn new(
        prober: Arc<dyn Prober>,
        notifier: Arc<dyn Notifier>,
        recipient: impl Into<Arc<str>>,
    ) -> Self {
        Self { prober, notifier, recipient: recipient.into() }
    }

    /// Create the loop for a target without starting it
    pub fn build_loop(&self, target: Target) -> MonitorLoop {
        MonitorLoop::new(target, self.prober.clone(), self.notifier.clone(), self.recipient.clone())
    }

    /// Spawn a loop onto `tasks`
    pub fn schedule_monitor(&self, monitor: MonitorLoop, tasks: &mut JoinSet<()>) -> AbortHandle {
        tasks.spawn(monitor.run())
    }
}
