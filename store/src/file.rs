//! JSON-file ticket store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{PendingTicket, StoreError, TicketStore};

/// Stores the pending ticket as a small JSON document on disk.
///
/// A file that cannot be parsed is reported as "no ticket" rather than an
/// error, so a stale or hand-edited file sends the user back to ticket
/// creation instead of blocking verification.
pub struct FileTicketStore {
    path: PathBuf,
}

impl FileTicketStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TicketStore for FileTicketStore {
    fn get(&self) -> Result<Option<PendingTicket>, StoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e.to_string())),
        };

        match serde_json::from_str::<PendingTicket>(&contents) {
            Ok(pending) => Ok(Some(pending)),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "ignoring unreadable ticket file: {e}"
                );
                Ok(None)
            }
        }
    }

    fn set(&self, pending: &PendingTicket) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(pending)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| StoreError::Io(e.to_string()))?;
        tracing::debug!(path = %self.path.display(), ticket_id = %pending.ticket_id, "stored pending ticket");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boarding_types::Ticket;

    fn pending() -> PendingTicket {
        PendingTicket {
            ticket_id: "4f2a".into(),
            ticket: Ticket::with_document("Jane", "Doe", "X1234567"),
        }
    }

    #[test]
    fn missing_file_means_no_ticket() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTicketStore::new(dir.path().join("ticket.json"));
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTicketStore::new(dir.path().join("nested/ticket.json"));
        store.set(&pending()).unwrap();
        assert_eq!(store.get().unwrap(), Some(pending()));
        assert!(store.path().is_file());
    }

    #[test]
    fn stored_layout_uses_ticket_id_and_ticket_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ticket.json");
        let store = FileTicketStore::new(&path);
        store.set(&pending()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["ticketId"], "4f2a");
        assert_eq!(raw["ticket"]["documentNumber"], "X1234567");
    }

    #[test]
    fn corrupt_file_means_no_ticket() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ticket.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = FileTicketStore::new(&path);
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTicketStore::new(dir.path().join("ticket.json"));
        store.set(&pending()).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }
}
