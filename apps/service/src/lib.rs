//! sitewatch - periodic website reachability monitor
//!
//! Polls a configured set of websites, each on its own interval, and sends a
//! Telegram message whenever a site is unreachable or answers with anything
//! but `200 OK`.

pub mod config;
pub mod duration;
pub mod error;
pub mod monitoring;
pub mod notifications;
pub mod supervisor;

pub use config::Config;
pub use error::StartupError;
pub use monitoring::{ProbeOutcome, Prober, Target};
pub use notifications::{DeliveryError, Notifier};
pub use supervisor::{ShutdownSignal, Supervisor};
