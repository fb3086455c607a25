use serde::Serialize;

use crate::error::NotificationError;
use crate::models::RouteTarget;
use crate::readiness::ReadinessGate;
use crate::routes::RouteBuilder;
use crate::slot::PendingNotificationSlot;

/// Replaces the current screen. Treated as fire-and-forget; an `Err` means
/// the navigation did not happen.
pub trait Router {
    fn replace(&mut self, target: &RouteTarget) -> Result<(), String>;
}

impl<R: Router + ?Sized> Router for &mut R {
    fn replace(&mut self, target: &RouteTarget) -> Result<(), String> {
        (**self).replace(target)
    }
}

/// Router that records every navigation. Used by the CLI simulator and tests.
#[derive(Debug, Default)]
pub struct RecordingRouter {
    pub navigations: Vec<RouteTarget>,
}

impl Router for RecordingRouter {
    fn replace(&mut self, target: &RouteTarget) -> Result<(), String> {
        self.navigations.push(target.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum DispatchOutcome {
    Navigated {
        screen: String,
        target: RouteTarget,
    },
    Dropped {
        screen: String,
        reason: String,
    },
    Duplicate {
        screen: String,
        id: String,
    },
    Held {
        screen: String,
    },
}

impl DispatchOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchOutcome::Navigated { .. } => "navigated",
            DispatchOutcome::Dropped { .. } => "dropped",
            DispatchOutcome::Duplicate { .. } => "duplicate",
            DispatchOutcome::Held { .. } => "held",
        }
    }
}

/// Drains the pending slot into the router once the app is ready.
pub struct NavigationDispatcher<R: Router> {
    router: R,
    routes: RouteBuilder,
}

impl<R: Router> NavigationDispatcher<R> {
    pub fn new(router: R, routes: RouteBuilder) -> Self {
        NavigationDispatcher { router, routes }
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    pub fn into_router(self) -> R {
        self.router
    }

    /// The dispatch watcher. Safe to call after any state change; does
    /// nothing unless the slot is filled, armed and the gate is open.
    pub fn poll(
        &mut self,
        slot: &mut PendingNotificationSlot,
        gate: &ReadinessGate,
    ) -> Option<DispatchOutcome> {
        if !gate.is_ready() {
            return None;
        }
        let payload = slot.begin_dispatch()?;

        let result = self.routes.build(&payload).and_then(|target| {
            self.router
                .replace(&target)
                .map(|()| target)
                .map_err(NotificationError::NavigationFailure)
        });

        match result {
            Ok(target) => {
                slot.complete_dispatch();
                log::info!("Navigated to {} {:?}", target.path, target.params);
                Some(DispatchOutcome::Navigated {
                    screen: payload.screen.clone(),
                    target,
                })
            }
            Err(e) => {
                slot.abort_dispatch();
                log::error!("Dropping notification for screen '{}': {}", payload.screen, e);
                Some(DispatchOutcome::Dropped {
                    screen: payload.screen.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }
}
