use crate::models::CanonicalPayload;

/// A payload waiting for navigation, with the OS identifier it arrived under.
#[derive(Debug, Clone, PartialEq)]
pub struct Pending {
    pub id: Option<String>,
    pub payload: CanonicalPayload,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlotState {
    Empty,
    Filled(Pending),
    Dispatching(Pending),
}

/// Whether the slot may hand out its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchGuard {
    Armed,
    /// A notification was navigated to; waits for the app to come back to the foreground.
    Spent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FillResult {
    Filled,
    /// Replaced a payload that had not been dispatched yet.
    Replaced(Pending),
    /// Same OS notification as the one last navigated to.
    Duplicate,
}

/// Holds at most one notification awaiting dispatch.
#[derive(Debug)]
pub struct PendingNotificationSlot {
    state: SlotState,
    guard: DispatchGuard,
    last_dispatched_id: Option<String>,
}

impl Default for PendingNotificationSlot {
    fn default() -> Self {
        PendingNotificationSlot {
            state: SlotState::Empty,
            guard: DispatchGuard::Armed,
            last_dispatched_id: None,
        }
    }
}

impl PendingNotificationSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SlotState {
        &self.state
    }

    pub fn guard(&self) -> DispatchGuard {
        self.guard
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.state, SlotState::Empty)
    }

    /// Last write wins. Never blocked by the guard. A second delivery of the
    /// notification already waiting, or of the one last navigated to, is a duplicate.
    pub fn fill(&mut self, pending: Pending) -> FillResult {
        if pending.id.is_some() {
            let waiting_id = match &self.state {
                SlotState::Filled(current) | SlotState::Dispatching(current) => current.id.as_ref(),
                SlotState::Empty => None,
            };
            if pending.id.as_ref() == waiting_id || pending.id == self.last_dispatched_id {
                return FillResult::Duplicate;
            }
        }
        match std::mem::replace(&mut self.state, SlotState::Filled(pending)) {
            SlotState::Filled(previous) => FillResult::Replaced(previous),
            SlotState::Empty => FillResult::Filled,
            SlotState::Dispatching(in_flight) => {
                // Dispatch runs to completion before the next event is handled.
                log::warn!("Slot filled during dispatch of {:?}", in_flight.id);
                FillResult::Filled
            }
        }
    }

    /// True when the watcher should fire: filled and armed. Readiness is checked by the caller.
    pub fn can_dispatch(&self) -> bool {
        self.guard == DispatchGuard::Armed && matches!(self.state, SlotState::Filled(_))
    }

    /// Move `Filled -> Dispatching` and spend the guard. Returns `None` from any other state.
    pub fn begin_dispatch(&mut self) -> Option<CanonicalPayload> {
        if !self.can_dispatch() {
            return None;
        }
        let SlotState::Filled(pending) = std::mem::replace(&mut self.state, SlotState::Empty)
        else {
            return None;
        };
        let payload = pending.payload.clone();
        self.state = SlotState::Dispatching(pending);
        self.guard = DispatchGuard::Spent;
        Some(payload)
    }

    /// `Dispatching -> Empty` after a successful navigation.
    pub fn complete_dispatch(&mut self) {
        if let SlotState::Dispatching(pending) = std::mem::replace(&mut self.state, SlotState::Empty)
        {
            self.last_dispatched_id = pending.id;
        }
    }

    /// `Dispatching -> Empty` after a failure: the notification is dropped and the guard rolled back.
    pub fn abort_dispatch(&mut self) {
        if matches!(self.state, SlotState::Dispatching(_)) {
            self.state = SlotState::Empty;
        }
        self.guard = DispatchGuard::Armed;
    }

    /// The app came back to the foreground.
    pub fn rearm(&mut self) {
        self.guard = DispatchGuard::Armed;
    }
}
