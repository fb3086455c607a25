use serde_json::Value;

use crate::active_view::ActiveViewRegistry;
use crate::models::{AlertPresentation, CanonicalPayload, Screen};
use crate::normalize;

/// Decides whether the OS should surface a notification that arrives while
/// the app is running. Badge updates are never requested here.
#[derive(Debug, Clone)]
pub struct PresentationPolicy {
    active_view: ActiveViewRegistry,
}

impl PresentationPolicy {
    pub fn new(active_view: ActiveViewRegistry) -> Self {
        PresentationPolicy { active_view }
    }

    /// True when the payload is a chat message for the conversation already on screen.
    pub fn should_suppress(payload: &CanonicalPayload, active_receiver: Option<&str>) -> bool {
        if payload.screen() != Screen::Chat {
            return false;
        }
        match (payload.field("receiverId"), active_receiver) {
            (Some(incoming), Some(active)) => incoming == active,
            _ => false,
        }
    }

    pub fn presentation_for(&self, payload: &CanonicalPayload) -> AlertPresentation {
        let active = self.active_view.get_active();
        if Self::should_suppress(payload, active.as_deref()) {
            log::debug!(
                "Suppressing alert for conversation {}",
                active.as_deref().unwrap_or_default()
            );
            AlertPresentation::silenced()
        } else {
            AlertPresentation::shown()
        }
    }

    /// Entry point for the OS "should I alert" callback. Runs synchronously.
    /// A payload that cannot be normalized is still shown; only routing drops it.
    pub fn decide(&self, raw: &Value) -> AlertPresentation {
        match normalize::normalize_value(raw) {
            Ok(payload) => self.presentation_for(&payload),
            Err(e) => {
                log::warn!("Presenting unroutable notification as-is: {}", e);
                AlertPresentation::shown()
            }
        }
    }
}
