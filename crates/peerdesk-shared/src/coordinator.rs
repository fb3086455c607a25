use std::sync::mpsc::Receiver;

use crate::active_view::ActiveViewRegistry;
use crate::dispatcher::{DispatchOutcome, NavigationDispatcher, Router};
use crate::models::{AppLifecycle, Arrival};
use crate::normalize;
use crate::presentation::PresentationPolicy;
use crate::readiness::ReadinessGate;
use crate::routes::RouteBuilder;
use crate::slot::{FillResult, Pending, PendingNotificationSlot, SlotState};

/// Everything that can move the pipeline forward, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationEvent {
    /// Result of asking the OS which notification, if any, launched the app.
    LaunchResponse(Option<Arrival>),
    /// The user opened a notification while the process was alive.
    Opened(Arrival),
    AuthResolved,
    PresentationReady,
    AppStateChanged(AppLifecycle),
}

/// Single owner of readiness and the pending slot. All events are applied
/// one at a time, and the dispatch watcher runs after each of them.
pub struct Coordinator<R: Router> {
    active_view: ActiveViewRegistry,
    gate: ReadinessGate,
    slot: PendingNotificationSlot,
    dispatcher: NavigationDispatcher<R>,
    app_state: AppLifecycle,
}

impl<R: Router> Coordinator<R> {
    pub fn new(router: R, routes: RouteBuilder, active_view: ActiveViewRegistry) -> Self {
        Coordinator {
            active_view,
            gate: ReadinessGate::new(),
            slot: PendingNotificationSlot::new(),
            dispatcher: NavigationDispatcher::new(router, routes),
            app_state: AppLifecycle::Active,
        }
    }

    /// Policy sharing this coordinator's view registry, for the OS alert callback.
    pub fn presentation_policy(&self) -> PresentationPolicy {
        PresentationPolicy::new(self.active_view.clone())
    }

    pub fn active_view(&self) -> &ActiveViewRegistry {
        &self.active_view
    }

    pub fn slot(&self) -> &PendingNotificationSlot {
        &self.slot
    }

    pub fn router(&self) -> &R {
        self.dispatcher.router()
    }

    pub fn handle(&mut self, event: NotificationEvent) -> Vec<DispatchOutcome> {
        let mut outcomes = Vec::new();
        let mut filled = false;

        match event {
            NotificationEvent::LaunchResponse(None) => {
                log::debug!("App was not launched from a notification");
            }
            NotificationEvent::LaunchResponse(Some(arrival)) | NotificationEvent::Opened(arrival) => {
                filled = self.accept(arrival, &mut outcomes);
            }
            NotificationEvent::AuthResolved => self.gate.mark_auth_resolved(),
            NotificationEvent::PresentationReady => self.gate.mark_presentation_ready(),
            NotificationEvent::AppStateChanged(next) => self.change_app_state(next),
        }

        if let Some(outcome) = self.dispatcher.poll(&mut self.slot, &self.gate) {
            outcomes.push(outcome);
        } else if let (true, SlotState::Filled(pending)) = (filled, self.slot.state()) {
            log::info!(
                "Holding '{}' notification (ready={}, guard={:?})",
                pending.payload.screen,
                self.gate.is_ready(),
                self.slot.guard()
            );
            outcomes.push(DispatchOutcome::Held {
                screen: pending.payload.screen.clone(),
            });
        }

        outcomes
    }

    /// Apply events until every sender is dropped, then hand back the router.
    /// `on_batch` sees the outcomes of every event, even when there were none.
    pub fn run<F>(mut self, rx: Receiver<NotificationEvent>, mut on_batch: F) -> R
    where
        F: FnMut(Vec<DispatchOutcome>),
    {
        while let Ok(event) = rx.recv() {
            on_batch(self.handle(event));
        }
        log::debug!("Notification channel closed");
        self.dispatcher.into_router()
    }

    /// Normalize and fill the slot. Returns true when the slot now holds this arrival.
    fn accept(&mut self, arrival: Arrival, outcomes: &mut Vec<DispatchOutcome>) -> bool {
        let payload = match normalize::normalize_value(&arrival.payload) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("Dropping notification {:?}: {}", arrival.id, e);
                let screen = arrival
                    .payload
                    .get("screen")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default();
                outcomes.push(DispatchOutcome::Dropped {
                    screen: screen.to_string(),
                    reason: e.to_string(),
                });
                return false;
            }
        };

        let id = arrival.id;
        let screen = payload.screen.clone();
        match self.slot.fill(Pending {
            id: id.clone(),
            payload,
        }) {
            FillResult::Filled => true,
            FillResult::Replaced(previous) => {
                log::info!(
                    "Pending '{}' notification superseded before dispatch",
                    previous.payload.screen
                );
                outcomes.push(DispatchOutcome::Dropped {
                    reason: format!(
                        "Superseded by a newer notification (screen '{}')",
                        screen
                    ),
                    screen: previous.payload.screen,
                });
                true
            }
            FillResult::Duplicate => {
                let id = id.unwrap_or_default();
                log::info!("Ignoring redelivered notification {}", id);
                outcomes.push(DispatchOutcome::Duplicate { screen, id });
                false
            }
        }
    }

    fn change_app_state(&mut self, next: AppLifecycle) {
        let previous = std::mem::replace(&mut self.app_state, next);
        match next {
            AppLifecycle::Active => {
                if previous != AppLifecycle::Active {
                    log::debug!("Foregrounded, re-arming dispatch guard");
                    self.slot.rearm();
                }
            }
            AppLifecycle::Inactive | AppLifecycle::Background => {
                self.active_view.clear();
            }
        }
    }
}
