//! Nullable ticket store — in-memory storage for testing.

use boarding_store::{PendingTicket, StoreError, TicketStore};
use std::sync::Mutex;

/// An in-memory ticket store.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullTicketStore {
    pending: Mutex<Option<PendingTicket>>,
    failing: bool,
}

impl NullTicketStore {
    /// An empty store.
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(None),
            failing: false,
        }
    }

    /// A store already holding `pending`.
    pub fn with(pending: PendingTicket) -> Self {
        Self {
            pending: Mutex::new(Some(pending)),
            failing: false,
        }
    }

    /// A store whose every operation fails.
    pub fn failing() -> Self {
        Self {
            pending: Mutex::new(None),
            failing: true,
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing {
            Err(StoreError::Io("null store configured to fail".into()))
        } else {
            Ok(())
        }
    }
}

impl Default for NullTicketStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketStore for NullTicketStore {
    fn get(&self) -> Result<Option<PendingTicket>, StoreError> {
        self.check()?;
        Ok(self.pending.lock().unwrap().clone())
    }

    fn set(&self, pending: &PendingTicket) -> Result<(), StoreError> {
        self.check()?;
        *self.pending.lock().unwrap() = Some(pending.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.check()?;
        *self.pending.lock().unwrap() = None;
        Ok(())
    }
}
