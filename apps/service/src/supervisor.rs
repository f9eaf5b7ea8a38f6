//! Supervisor - starts one monitor loop per target and keeps them running
//!
//! The supervisor:
//! - Validates credentials, timeout and every target before anything runs
//! - Spawns one independent task per target
//! - Waits for a shutdown signal, then aborts all loops
//!
//! Loops that end unexpectedly (a panic inside a prober or notifier) are
//! logged and not restarted.
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::task::{Id, JoinSet};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::StartupError;
use crate::monitoring::{HttpProber, LoopStats, MonitorLoop, MonitoringScheduler, Prober, Target};
use crate::notifications::{Notifier, TelegramNotifier};

/// Main supervisor for the sitewatch service
pub struct Supervisor {
    scheduler: MonitoringScheduler,
    pending: Vec<MonitorLoop>,
    stats: Vec<(String, LoopStats)>,
    running: JoinSet<()>,
    task_names: HashMap<Id, String>,
}

impl Supervisor {
    /// Build the production supervisor: HTTP prober and Telegram notifier
    ///
    /// Every fatal configuration problem surfaces here, before any loop exists.
    pub fn from_config(config: &Config) -> Result<Self, StartupError> {
        let (bot_token, recipient) = config.credentials()?;
        let timeout = config.request_timeout()?;
        let targets = config.targets()?;

        if timeout.is_zero() {
            warn!("Client request timeout is 0, probes may wait indefinitely");
        }

        let prober = Arc::new(HttpProber::new(timeout)?);
        let notifier = Arc::new(TelegramNotifier::with_api_url(config.api_url(), bot_token)?);

        Ok(Self::new(targets, prober, notifier, recipient))
    }

    /// Create a supervisor from already validated targets and injected capabilities
    pub fn new(
        targets: Vec<Target>,
        prober: Arc<dyn Prober>,
        notifier: Arc<dyn Notifier>,
        recipient: impl Into<Arc<str>>,
    ) -> Self {
        let scheduler = MonitoringScheduler::new(prober, notifier, recipient);
        let pending: Vec<MonitorLoop> =
            targets.into_iter().map(|target| scheduler.build_loop(target)).collect();
        let stats = pending
            .iter()
            .map(|monitor| (monitor.target().name().to_string(), monitor.stats()))
            .collect();

        Self { scheduler, pending, stats, running: JoinSet::new(), task_names: HashMap::new() }
    }

    /// Activity counters per target, in configuration order
    pub fn stats(&self) -> &[(String, LoopStats)] {
        &self.stats
    }

    /// Number of loops currently running
    pub fn running(&self) -> usize {
        self.running.len()
    }

    /// Spawn every loop that has not been started yet
    pub fn start(&mut self) {
        if self.pending.is_empty() && self.running.is_empty() {
            warn!("No websites configured, nothing to monitor");
        }

        for monitor in self.pending.drain(..) {
            let name = monitor.target().name().to_string();
            info!(
                website = %name,
                url = monitor.target().url(),
                interval = ?monitor.target().interval(),
                "Starting monitor"
            );
            let handle = self.scheduler.schedule_monitor(monitor, &mut self.running);
            self.task_names.insert(handle.id(), name);
        }
    }

    /// Start all loops and run until `shutdown` completes
    pub async fn run_until<F>(mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        self.start();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => break,
                Some(joined) = self.running.join_next_with_id(), if !self.running.is_empty() => {
                    self.report_exit(joined);
                }
            }
        }

        info!(loops = self.running.len(), "Shutting down monitor loops");
        self.running.shutdown().await;
    }

    fn report_exit(&mut self, joined: Result<(Id, ()), tokio::task::JoinError>) {
        let id = match &joined {
            Ok((id, ())) => *id,
            Err(join_error) => join_error.id(),
        };
        let website = self.task_names.remove(&id).unwrap_or_else(|| "<unknown>".to_string());

        match joined {
            Err(join_error) if join_error.is_panic() => {
                error!(website = %website, "Monitor loop panicked, it will not be restarted");
            }
            Err(join_error) => warn!(website = %website, error = %join_error, "Monitor loop cancelled"),
            Ok(_) => warn!(website = %website, "Monitor loop exited"),
        }
    }
}

/// Process termination signals: Ctrl-C everywhere, SIGTERM on unix
pub struct ShutdownSignal {
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl ShutdownSignal {
    /// Register the handlers up front so a failure is fatal at startup
    pub fn install() -> Result<Self, StartupError> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};

            let terminate = signal(SignalKind::terminate()).map_err(StartupError::Signal)?;
            Ok(Self { terminate })
        }
        #[cfg(not(unix))]
        {
            Ok(Self {})
        }
    }

    /// Resolves once the process is asked to stop
    pub async fn wait(mut self) {
        #[cfg(unix)]
        tokio::select! {
            result = tokio::signal::ctrl_c() => log_interrupt(result),
            _ = self.terminate.recv() => info!("Received termination signal"),
        }
        #[cfg(not(unix))]
        log_interrupt(tokio::signal::ctrl_c().await);
    }
}

fn log_interrupt(result: std::io::Result<()>) {
    match result {
        Ok(()) => info!("Received interrupt signal"),
        Err(error) => error!(error = %error, "Failed to listen for interrupt signal"),
    }
}
