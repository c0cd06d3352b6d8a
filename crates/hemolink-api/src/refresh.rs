//! Single-flight coordination for access-token refresh.
//!
//! At most one refresh exchange may be in flight per client scope. The first
//! request to see a 401 becomes the leader and performs the exchange; requests
//! that 401 while the exchange is outstanding park as waiters and are resumed
//! with the outcome, in the order their failures were observed.
//!
//! The gate returns to idle *before* waiters are resumed, so a refresh
//! triggered from within a resumed request can start a fresh exchange instead
//! of deadlocking against stale state.

use std::sync::Mutex;

use tokio::sync::oneshot;

/// Outcome delivered to waiters: the new access token, or `None` when the
/// exchange failed and each caller must surface its own original failure.
pub type RefreshOutcome = Option<String>;

#[derive(Debug, Default)]
pub struct RefreshGate {
    state: Mutex<GateState>,
}

#[derive(Debug, Default)]
struct GateState {
    refreshing: bool,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

/// Role handed to a request that hit a 401.
#[derive(Debug)]
pub enum RefreshTicket {
    /// This request owns the exchange and must call [`RefreshGate::settle`].
    Leader,
    /// Another exchange is in flight; await the outcome.
    Waiter(oneshot::Receiver<RefreshOutcome>),
}

impl RefreshGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the current failure storm. The check-and-set is done under one
    /// lock acquisition, so exactly one caller per storm becomes the leader.
    pub fn join(&self) -> RefreshTicket {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if state.refreshing {
            let (tx, rx) = oneshot::channel();
            state.waiters.push(tx);
            RefreshTicket::Waiter(rx)
        } else {
            state.refreshing = true;
            RefreshTicket::Leader
        }
    }

    /// End the storm: flip back to idle and hand the parked waiters to the
    /// leader for resumption. Idle is restored before any waiter runs.
    #[must_use]
    pub fn settle(&self) -> Vec<oneshot::Sender<RefreshOutcome>> {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        state.refreshing = false;
        std::mem::take(&mut state.waiters)
    }

    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .refreshing
    }
}

#[cfg(test)]
mod tests {
    use super::{RefreshGate, RefreshTicket};

    #[test]
    fn first_joiner_leads_and_later_joiners_wait() {
        let gate = RefreshGate::new();
        assert!(matches!(gate.join(), RefreshTicket::Leader));
        assert!(matches!(gate.join(), RefreshTicket::Waiter(_)));
        assert!(matches!(gate.join(), RefreshTicket::Waiter(_)));
        assert!(gate.is_refreshing());
    }

    #[test]
    fn settle_returns_waiters_in_fifo_order_and_reopens_gate() {
        let gate = RefreshGate::new();
        assert!(matches!(gate.join(), RefreshTicket::Leader));

        let mut receivers = Vec::new();
        for _ in 0..3 {
            match gate.join() {
                RefreshTicket::Waiter(rx) => receivers.push(rx),
                RefreshTicket::Leader => unreachable!("gate already held"),
            }
        }

        let waiters = gate.settle();
        assert_eq!(waiters.len(), 3);
        assert!(!gate.is_refreshing());

        // The gate reopened before anyone was resumed: a new storm can start.
        assert!(matches!(gate.join(), RefreshTicket::Leader));

        for (index, waiter) in waiters.into_iter().enumerate() {
            let _ = waiter.send(Some(format!("token-{index}")));
        }
        for (index, rx) in receivers.into_iter().enumerate() {
            let outcome = rx.blocking_recv().expect("waiter resumed");
            assert_eq!(outcome, Some(format!("token-{index}")));
        }
    }

    #[test]
    fn dropped_waiter_does_not_block_settlement() {
        let gate = RefreshGate::new();
        assert!(matches!(gate.join(), RefreshTicket::Leader));
        match gate.join() {
            RefreshTicket::Waiter(rx) => drop(rx),
            RefreshTicket::Leader => unreachable!("gate already held"),
        }
        let waiters = gate.settle();
        assert_eq!(waiters.len(), 1);
        // Sending to the dropped receiver fails quietly.
        for waiter in waiters {
            assert!(waiter.send(None).is_err());
        }
    }
}
