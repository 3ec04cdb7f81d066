use std::collections::HashMap;

/// Logical actions whose responses can race each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Connect,
    Tables,
    DbInfo,
    Schema,
    Query,
    Generate,
}

impl Action {
    /// Responses that belong to one connection and must not leak into the next
    #[must_use]
    pub const fn is_session_scoped(self) -> bool {
        match self {
            Self::Tables | Self::DbInfo | Self::Schema => true,
            Self::Connect | Self::Query | Self::Generate => false,
        }
    }
}

/// Tag attached to a request and echoed back with its response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub action: Action,
    pub generation: u64,
    /// Generation of the connect that was live when the request was issued
    pub session: u64,
}

/// Monotonic generation counters, one per [`Action`].
///
/// Only the response to the most recently issued request of an action is
/// accepted; anything older is stale.
#[derive(Debug, Default)]
pub struct RequestTracker {
    issued: HashMap<Action, u64>,
    settled: HashMap<Action, u64>,
    session: u64,
}

impl RequestTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag a new request, superseding any request of the same action
    pub fn issue(&mut self, action: Action) -> Ticket {
        let generation = self.issued.entry(action).or_insert(0);
        *generation += 1;
        Ticket {
            action,
            generation: *generation,
            session: self.session,
        }
    }

    /// Whether `ticket` is still the latest request of its action
    #[must_use]
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        let latest = self.issued.get(&ticket.action).copied().unwrap_or(0);
        latest == ticket.generation
            && (!ticket.action.is_session_scoped()
                || ticket.session == self.session)
    }

    /// Accept the response for `ticket`.
    ///
    /// Returns `false`, leaving all state untouched, if the ticket is stale.
    pub fn settle(&mut self, ticket: &Ticket) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                action = ?ticket.action,
                generation = ticket.generation,
                session = ticket.session,
                current_session = self.session,
                "Discarding stale response"
            );
            return false;
        }
        self.settled.insert(ticket.action, ticket.generation);
        true
    }

    /// Start a new session from a successful connect
    pub const fn begin_session(&mut self, connect: &Ticket) {
        self.session = connect.generation;
    }

    #[must_use]
    pub const fn session(&self) -> u64 {
        self.session
    }

    /// Whether the latest request of `action` is still unanswered
    #[must_use]
    pub fn is_pending(&self, action: Action) -> bool {
        let issued = self.issued.get(&action).copied().unwrap_or(0);
        let settled = self.settled.get(&action).copied().unwrap_or(0);
        issued > settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_ticket_is_current() {
        let mut tracker = RequestTracker::new();
        let first = tracker.issue(Action::Query);
        let second = tracker.issue(Action::Query);

        assert!(!tracker.is_current(&first));
        assert!(tracker.is_pending(Action::Query));
        assert!(tracker.settle(&second));
        assert!(!tracker.is_pending(Action::Query));
        assert!(!tracker.settle(&first));
    }

    #[test]
    fn test_actions_are_independent() {
        let mut tracker = RequestTracker::new();
        let query = tracker.issue(Action::Query);
        let _ = tracker.issue(Action::Generate);
        assert!(tracker.is_current(&query));
    }

    #[test]
    fn test_new_session_invalidates_scoped_requests() {
        let mut tracker = RequestTracker::new();
        let connect = tracker.issue(Action::Connect);
        tracker.begin_session(&connect);
        let tables = tracker.issue(Action::Tables);
        let query = tracker.issue(Action::Query);

        let reconnect = tracker.issue(Action::Connect);
        tracker.begin_session(&reconnect);

        assert!(!tracker.is_current(&tables));
        assert!(tracker.is_current(&query));
        assert_eq!(tracker.session(), reconnect.generation);
    }

    #[test]
    fn test_stale_settle_keeps_pending() {
        let mut tracker = RequestTracker::new();
        let old = tracker.issue(Action::Schema);
        let _new = tracker.issue(Action::Schema);
        assert!(!tracker.settle(&old));
        assert!(tracker.is_pending(Action::Schema));
    }
}
