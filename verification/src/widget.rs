//! Verification widget contract.
//!
//! The widget renders the session pointer (QR code or app link) into a mount
//! anchor and performs the network exchanges with the verification backend.
//! The controller never talks to the backend itself: it hands the widget two
//! URL builders and waits for `start()` to settle.
//!
//! A widget is obtained in two steps so a cancelled session never mounts:
//! [`WidgetLoader::load`] resolves the widget module asynchronously, then
//! [`WidgetModule::create`] mounts an instance synchronously.

use std::future::Future;
use std::sync::Arc;

use boarding_types::{ApiEndpoint, Language, SessionPointer, SessionRequest};
use serde_json::Value;

use crate::error::WidgetError;
use crate::session_id::derive_session_id;

/// How the session start request is issued.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartRequest {
    /// Disclosure-only session: `GET {endpoint}/start`, no body.
    Get { url: String },
    /// Ticket-bound session: `POST {endpoint}/start` with a JSON body.
    Post { url: String, body: SessionRequest },
}

impl StartRequest {
    pub fn url(&self) -> &str {
        match self {
            Self::Get { url } | Self::Post { url, .. } => url,
        }
    }

    pub fn method(&self) -> &'static str {
        match self {
            Self::Get { .. } => "GET",
            Self::Post { .. } => "POST",
        }
    }
}

/// The start-URL and result-URL builders for one session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionUrls {
    endpoint: ApiEndpoint,
    payload: Option<SessionRequest>,
}

impl SessionUrls {
    pub fn new(endpoint: ApiEndpoint, payload: Option<SessionRequest>) -> Self {
        Self { endpoint, payload }
    }

    /// POST with the session request when one is present, GET otherwise.
    pub fn start(&self) -> StartRequest {
        let url = self.endpoint.start_url();
        tracing::debug!(%url, bound = self.payload.is_some(), "building session start request");
        match &self.payload {
            Some(body) => StartRequest::Post {
                url,
                body: body.clone(),
            },
            None => StartRequest::Get { url },
        }
    }

    /// `GET {endpoint}/result?sessionID={id}` for the given pointer.
    pub fn result(&self, pointer: Option<&SessionPointer>) -> String {
        let url = self.endpoint.result_url(&derive_session_id(pointer));
        tracing::debug!(%url, "building session result url");
        url
    }
}

/// Stable UI location a widget renders into.
pub trait MountAnchor: Send + Sync {
    /// Identifier of the anchor (e.g. an element id).
    fn id(&self) -> &str;

    /// Show the session pointer to the user.
    fn present(&self, pointer: &SessionPointer, language: Language);

    /// Remove whatever the widget rendered.
    fn clear(&self);
}

/// Everything a widget instance is created with.
#[derive(Clone)]
pub struct WidgetOptions {
    pub anchor: Arc<dyn MountAnchor>,
    pub language: Language,
    pub urls: SessionUrls,
}

/// Asynchronously loads the widget module.
pub trait WidgetLoader: Send + Sync + 'static {
    type Module: WidgetModule;

    fn load(&self) -> impl Future<Output = Result<Self::Module, WidgetError>> + Send;
}

/// A loaded widget module.
pub trait WidgetModule: Send + 'static {
    type Widget: VerificationWidget;

    /// Mount a widget instance on `options.anchor`.
    fn create(&self, options: WidgetOptions) -> Self::Widget;
}

/// One mounted widget instance driving one session.
pub trait VerificationWidget: Send + Sync + 'static {
    /// Start the session and resolve with the raw result once it finishes.
    fn start(&self) -> impl Future<Output = Result<Value, WidgetError>> + Send;

    /// Stop any polling and unmount. Must be safe to call more than once.
    fn abort(&self);
}
