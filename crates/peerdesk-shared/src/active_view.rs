use std::sync::{Arc, Mutex, MutexGuard};

/// Which conversation, if any, is currently on screen.
///
/// Cloning yields another handle to the same slot. Only an identifier is
/// stored; the conversation itself is owned elsewhere.
#[derive(Debug, Clone, Default)]
pub struct ActiveViewRegistry {
    receiver_id: Arc<Mutex<Option<String>>>,
}

impl ActiveViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        match self.receiver_id.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::error!("ActiveViewRegistry lock poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    pub fn set_active(&self, receiver_id: Option<&str>) {
        let mut current = self.lock();
        *current = receiver_id.filter(|id| !id.is_empty()).map(str::to_string);
        log::debug!("Active conversation: {:?}", *current);
    }

    pub fn get_active(&self) -> Option<String> {
        self.lock().clone()
    }

    /// Clear the slot only if `receiver_id` still owns it, so a late blur
    /// from the previous view cannot wipe the one that just gained focus.
    pub fn release(&self, receiver_id: &str) -> bool {
        let mut current = self.lock();
        if current.as_deref() == Some(receiver_id) {
            *current = None;
            log::debug!("Active conversation released: {}", receiver_id);
            true
        } else {
            false
        }
    }

    pub fn clear(&self) {
        *self.lock() = None;
    }
}
