/// Conditions that must hold before any navigation is safe.
///
/// Both flags latch: once set they stay set for the life of the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadinessGate {
    auth_resolved: bool,
    presentation_ready: bool,
}

impl ReadinessGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_auth_resolved(&mut self) {
        if !self.auth_resolved {
            log::info!("Readiness: auth resolved");
        }
        self.auth_resolved = true;
    }

    pub fn mark_presentation_ready(&mut self) {
        if !self.presentation_ready {
            log::info!("Readiness: presentation resources loaded");
        }
        self.presentation_ready = true;
    }

    pub fn is_ready(&self) -> bool {
        self.auth_resolved && self.presentation_ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn needs_both_conditions_in_any_order() {
        let mut gate = ReadinessGate::new();
        assert!(!gate.is_ready());
        gate.mark_presentation_ready();
        assert!(!gate.is_ready());
        gate.mark_auth_resolved();
        assert!(gate.is_ready());

        let mut gate = ReadinessGate::new();
        gate.mark_auth_resolved();
        assert!(!gate.is_ready());
        gate.mark_presentation_ready();
        assert!(gate.is_ready());
    }

    #[test]
    fn repeated_marks_are_harmless() {
        let mut gate = ReadinessGate::new();
        gate.mark_auth_resolved();
        gate.mark_auth_resolved();
        assert!(!gate.is_ready());
        gate.mark_presentation_ready();
        gate.mark_presentation_ready();
        assert!(gate.is_ready());
    }
}
