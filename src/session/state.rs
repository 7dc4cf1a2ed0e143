use serde::{Deserialize, Serialize};

/// Health of the link to the analyzer backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// The most recent dispatch cycle had at least one successful analyzer
    /// call
    Connected,
    /// No cycle has run yet, or the most recent cycle failed entirely
    Disconnected,
    /// An analyzer rejected the bearer token. Terminal.
    AuthExpired,
}

impl ConnectionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConnectionState::AuthExpired)
    }
}

/// Classification of one completed dispatch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStatus {
    /// At least one analyzer call succeeded
    Ok,
    /// Both analyzer calls failed for non-auth reasons
    Failed,
    /// At least one analyzer answered with an authentication rejection
    AuthRejected,
}

/// Connection-health state machine.
///
/// Starts `Disconnected`. `AuthExpired` accepts incoming transitions from
/// any state and permits none out: once entered, the tracker ignores every
/// further cycle for the lifetime of the session object.
#[derive(Debug)]
pub struct ConnectionTracker {
    state: ConnectionState,
}

impl ConnectionTracker {
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Disconnected,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Apply a completed cycle. Returns the new state when a transition
    /// occurred, `None` when the state is unchanged or already terminal.
    pub fn apply(&mut self, status: CycleStatus) -> Option<ConnectionState> {
        if self.state.is_terminal() {
            return None;
        }

        let next = match status {
            CycleStatus::Ok => ConnectionState::Connected,
            CycleStatus::Failed => ConnectionState::Disconnected,
            CycleStatus::AuthRejected => ConnectionState::AuthExpired,
        };

        if next == self.state {
            None
        } else {
            self.state = next;
            Some(next)
        }
    }
}

impl Default for ConnectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_disconnected() {
        assert_eq!(ConnectionTracker::new().state(), ConnectionState::Disconnected);
    }

    #[test]
    fn auth_rejection_is_terminal() {
        let mut tracker = ConnectionTracker::new();
        assert_eq!(
            tracker.apply(CycleStatus::AuthRejected),
            Some(ConnectionState::AuthExpired)
        );

        assert_eq!(tracker.apply(CycleStatus::Ok), None);
        assert_eq!(tracker.apply(CycleStatus::Failed), None);
        assert_eq!(tracker.apply(CycleStatus::AuthRejected), None);
        assert_eq!(tracker.state(), ConnectionState::AuthExpired);
    }

    #[test]
    fn unchanged_state_reports_no_transition() {
        let mut tracker = ConnectionTracker::new();
        assert_eq!(tracker.apply(CycleStatus::Failed), None);
        assert_eq!(tracker.apply(CycleStatus::Ok), Some(ConnectionState::Connected));
        assert_eq!(tracker.apply(CycleStatus::Ok), None);
        assert_eq!(
            tracker.apply(CycleStatus::Failed),
            Some(ConnectionState::Disconnected)
        );
    }
}
