//! Nullable infrastructure for deterministic testing.
//!
//! Everything the session controller talks to (the widget, the ticket store,
//! the mount anchor) is abstracted behind traits. This crate provides
//! test-friendly implementations that:
//! - Resolve with scripted values, or only when the test says so
//! - Record every interaction for assertions
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod anchor;
pub mod store;
pub mod widget;

pub use anchor::NullAnchor;
pub use store::NullTicketStore;
pub use widget::{NullWidget, NullWidgetLoader, WidgetEvent, WidgetRecord};
