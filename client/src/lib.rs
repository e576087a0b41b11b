//! HTTP side of the boarding-pass demo.
//!
//! - [`HttpWidgetLoader`] implements the verification widget contract against
//!   the backend: `GET|POST {endpoint}/start` returns a session pointer, which
//!   is presented on the mount anchor, then `GET {endpoint}/result?sessionID=…`
//!   is polled until the session settles.
//! - [`TicketClient`] creates demo tickets with `POST {endpoint}/tickets`.

pub mod error;
pub mod http;
pub mod tickets;
pub mod widget;

pub use error::ClientError;
pub use tickets::TicketClient;
pub use widget::{HttpWidget, HttpWidgetLoader, HttpWidgetLoaderBuilder, HttpWidgetModule};
