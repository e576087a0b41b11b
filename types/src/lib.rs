//! Fundamental types for the boarding pass verification flow.
//!
//! This crate defines the value objects shared across every other crate in the
//! workspace: tickets and itineraries, session pointers and start requests, the
//! session state enum, display languages, and API endpoint resolution.

pub mod endpoint;
pub mod language;
pub mod session;
pub mod state;
pub mod ticket;

pub use endpoint::{ApiEndpoint, DEFAULT_API_ROOT};
pub use language::Language;
pub use session::{SessionPointer, SessionRequest};
pub use state::SessionState;
pub use ticket::{Itinerary, NewTicket, Ticket, TicketDetails};
