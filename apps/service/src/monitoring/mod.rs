/// Monitoring module - probes websites and reports failures
///
/// This module is responsible for:
/// - Describing monitored targets and classifying probe outcomes
/// - Executing HTTP `HEAD` probes
/// - Running one independent loop per target
/// - Validating targets before anything is scheduled
pub mod checker;
pub mod scheduler;
pub mod types;
pub mod validation;

pub use checker::{HttpProber, Prober};
pub use scheduler::{LoopStats, MonitorLoop, MonitoringScheduler};
pub use types::{MonitorStatus, ProbeOutcome, Target};
pub use validation::ValidationError;
