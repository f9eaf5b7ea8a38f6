use std::fmt;

use crate::monitoring::{ProbeOutcome, Target};

/// Prepended to every outgoing message.
pub const MESSAGE_PREFIX: &str = "Website reachability: ";

/// Alert text for a target whose probe did not come back healthy
#[derive(Debug, Clone, Copy)]
pub struct NotificationMessage<'a> {
    target: &'a Target,
    outcome: &'a ProbeOutcome,
}

impl<'a> NotificationMessage<'a> {
    /// `None` for healthy outcomes, which are never reported
    pub fn for_outcome(target: &'a Target, outcome: &'a ProbeOutcome) -> Option<Self> {
        if outcome.is_healthy() {
            return None;
        }
        Some(Self { target, outcome })
    }

    /// Full text as sent to the recipient
    pub fn render(&self) -> String {
        format!("{MESSAGE_PREFIX}{self}")
    }
}

impl fmt::Display for NotificationMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Website {} is down!", self.target)?;
        match self.outcome {
            ProbeOutcome::Unreachable { cause } => writeln!(f, "Cause: {cause}")?,
            ProbeOutcome::UnhealthyStatus { code, status_text } => {
                writeln!(f, "StatusCode: {code}")?;
                writeln!(f, "Status: {code} {status_text}")?;
            }
            ProbeOutcome::Healthy => {}
        }
        write!(f, "Please take immediate action.")
    }
}
