//! Verification session lifecycle.
//!
//! A session is started against the verification backend through a widget
//! that presents the session pointer to the user and waits for their
//! credential app to disclose the requested attributes:
//! 1. **Start**: the widget issues the start request built by [`SessionUrls`].
//! 2. **Await**: the widget waits for the session to finish and fetches the
//!    result for the session id derived from the pointer.
//! 3. **Extract**: the controller unwraps the result and parses the disclosed
//!    attributes into a boarding-pass [`Ticket`](boarding_types::Ticket).
//!
//! The widget itself is a pluggable capability; the controller only depends on
//! the traits in [`widget`].

pub mod controller;
pub mod disclosure;
pub mod error;
pub mod outcome;
pub mod session_id;
pub mod widget;

pub use controller::{SessionConfig, SessionFlow, SessionView, VerificationSessionController};
pub use disclosure::parse_ticket;
pub use error::{ErrorKind, ParseError, SessionError, WidgetError};
pub use outcome::WidgetOutcome;
pub use session_id::derive_session_id;
pub use widget::{
    MountAnchor, SessionUrls, StartRequest, VerificationWidget, WidgetLoader, WidgetModule,
    WidgetOptions,
};
