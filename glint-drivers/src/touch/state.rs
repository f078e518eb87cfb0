//! Touch driver state machine
//!
//! Lifecycle of a touch controller instance. Identification failures and a
//! lost link both land in `Failed`, which only an external re-start leaves.

/// Touch driver lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchState {
    /// Constructed, nothing probed yet
    #[default]
    Uninitialized,
    /// Identity probe in progress
    Identifying,
    /// Identified and configured, no report seen yet
    Configured,
    /// Actively delivering reports
    Reporting,
    /// Identification failed or the link error threshold was exceeded
    Failed,
}

/// Events driving state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TouchEvent {
    /// `start` began the identity probe
    ProbeStarted,
    /// The probe matched a candidate ID and configuration applied
    ConfigApplied,
    /// The probe or configuration failed
    ProbeFailed,
    /// A poll completed cleanly
    ReportOk,
    /// Consecutive bus errors exceeded the threshold
    LinkLost,
    /// External re-initialization requested
    Restart,
}

impl TouchState {
    /// True when `poll` is a valid operation
    pub fn can_poll(&self) -> bool {
        matches!(self, TouchState::Configured | TouchState::Reporting)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: TouchEvent) -> Self {
        use TouchEvent::*;
        use TouchState::*;

        match (self, event) {
            (Uninitialized, ProbeStarted) => Identifying,

            (Identifying, ConfigApplied) => Configured,
            (Identifying, ProbeFailed) => Failed,

            (Configured, ReportOk) => Reporting,
            (Configured, LinkLost) => Failed,

            (Reporting, ReportOk) => Reporting,
            (Reporting, LinkLost) => Failed,

            (Failed, Restart) => Identifying,

            // Default: stay in current state
            _ => self,
        }
    }
}
