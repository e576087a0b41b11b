//! Pending ticket storage.
//!
//! The check-in flow remembers the ticket a passenger just bought so the
//! verification step can bind its session to it. Every backend (a JSON file
//! for the CLI, in-memory for testing) implements [`TicketStore`]; the rest of
//! the workspace depends only on the trait.

pub mod error;
pub mod file;
pub mod ticket;

pub use error::StoreError;
pub use file::FileTicketStore;
pub use ticket::{PendingTicket, TicketStore};
