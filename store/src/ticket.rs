//! Pending ticket storage trait.

use crate::StoreError;
use boarding_types::Ticket;
use serde::{Deserialize, Serialize};

/// A ticket created by the backend and awaiting verification.
///
/// Serialized as `{"ticketId": …, "ticket": {…}}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingTicket {
    /// Identifier assigned by the backend on creation.
    pub ticket_id: String,
    pub ticket: Ticket,
}

/// Local persistence of the single pending ticket.
pub trait TicketStore: Send + Sync {
    /// The pending ticket, if one is stored.
    fn get(&self) -> Result<Option<PendingTicket>, StoreError>;

    /// Replace the pending ticket.
    fn set(&self, pending: &PendingTicket) -> Result<(), StoreError>;

    /// Forget the pending ticket. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), StoreError>;
}
