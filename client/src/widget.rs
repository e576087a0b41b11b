//! Verification widget over HTTP.
//!
//! Starts the session through the backend and presents the returned session
//! pointer on the mount anchor. The session status is then followed on the
//! pointer's `u` URL until it is terminal, and the result endpoint is fetched
//! exactly once after `DONE`; the backend computes its verdict on that single
//! fetch. Without a pointer URL, or with status following turned off, the
//! result endpoint itself is polled until the result reports a terminal status.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use boarding_types::SessionPointer;
use boarding_verification::{
    StartRequest, VerificationWidget, WidgetError, WidgetLoader, WidgetModule, WidgetOptions,
    WidgetOutcome,
};
use serde_json::Value;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::http::{build_client, describe, DEFAULT_TIMEOUT};

/// Default delay between two result polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default time a user has to finish the session.
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(300);

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Settings {
    poll_interval: Duration,
    session_timeout: Duration,
    request_timeout: Duration,
    follow_status: bool,
}

/// Builder for [`HttpWidgetLoader`].
#[derive(Clone, Debug)]
pub struct HttpWidgetLoaderBuilder {
    settings: Settings,
}

impl HttpWidgetLoaderBuilder {
    /// Delay between result polls; clamped to at least one millisecond.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.settings.poll_interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    pub fn session_timeout(mut self, timeout: Duration) -> Self {
        self.settings.session_timeout = timeout;
        self
    }

    /// Timeout of each individual HTTP request.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.settings.request_timeout = timeout;
        self
    }

    /// Follow the session status on the pointer URL (the default), or poll
    /// the result endpoint instead.
    pub fn follow_status(mut self, follow: bool) -> Self {
        self.settings.follow_status = follow;
        self
    }

    pub fn build(self) -> HttpWidgetLoader {
        HttpWidgetLoader {
            settings: self.settings,
        }
    }
}

impl Default for HttpWidgetLoaderBuilder {
    fn default() -> Self {
        Self {
            settings: Settings {
                poll_interval: DEFAULT_POLL_INTERVAL,
                session_timeout: DEFAULT_SESSION_TIMEOUT,
                request_timeout: DEFAULT_TIMEOUT,
                follow_status: true,
            },
        }
    }
}

/// Loads the HTTP widget module. Loading fails if no HTTP client can be built.
#[derive(Clone, Debug)]
pub struct HttpWidgetLoader {
    settings: Settings,
}

impl HttpWidgetLoader {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> HttpWidgetLoaderBuilder {
        HttpWidgetLoaderBuilder::default()
    }

    pub fn poll_interval(&self) -> Duration {
        self.settings.poll_interval
    }

    pub fn session_timeout(&self) -> Duration {
        self.settings.session_timeout
    }
}

impl Default for HttpWidgetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetLoader for HttpWidgetLoader {
    type Module = HttpWidgetModule;

    fn load(&self) -> impl Future<Output = Result<HttpWidgetModule, WidgetError>> + Send {
        let settings = self.settings;
        async move {
            let http = build_client(settings.request_timeout)
                .map_err(|e| WidgetError::Unavailable(format!("failed to build HTTP client: {e}")))?;
            Ok(HttpWidgetModule { http, settings })
        }
    }
}

/// A loaded HTTP widget module sharing one connection pool.
pub struct HttpWidgetModule {
    http: reqwest::Client,
    settings: Settings,
}

impl WidgetModule for HttpWidgetModule {
    type Widget = HttpWidget;

    fn create(&self, options: WidgetOptions) -> HttpWidget {
        let (aborted, _) = watch::channel(false);
        HttpWidget {
            session: Session {
                http: self.http.clone(),
                options,
                settings: self.settings,
                settled: Arc::new(AtomicBool::new(false)),
            },
            aborted,
        }
    }
}

/// One HTTP-backed verification session.
pub struct HttpWidget {
    session: Session,
    aborted: watch::Sender<bool>,
}

impl VerificationWidget for HttpWidget {
    fn start(&self) -> impl Future<Output = Result<Value, WidgetError>> + Send {
        let session = self.session.clone();
        let mut aborted = self.aborted.subscribe();
        async move {
            tokio::select! {
                biased;
                _ = wait_aborted(&mut aborted) => Err(WidgetError::Aborted),
                result = session.run() => result,
            }
        }
    }

    fn abort(&self) {
        if self.aborted.send_replace(true) {
            return;
        }
        tracing::debug!(anchor = %self.session.options.anchor.id(), "verification widget aborted");
        self.session.settle();
    }
}

async fn wait_aborted(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            // Widget dropped without aborting; nothing can abort us anymore.
            std::future::pending::<()>().await;
        }
    }
}

#[derive(Clone)]
struct Session {
    http: reqwest::Client,
    options: WidgetOptions,
    settings: Settings,
    /// Set once the anchor has been cleared, by either the run or an abort.
    settled: Arc<AtomicBool>,
}

impl Session {
    async fn run(self) -> Result<Value, WidgetError> {
        let pointer = self.open().await?;
        self.options.anchor.present(&pointer, self.options.language);

        let result_url = self.options.urls.result(Some(&pointer));
        let status_url = pointer
            .u
            .as_deref()
            .filter(|_| self.settings.follow_status)
            .map(|u| format!("{}/status", u.trim_end_matches('/')));
        let wait = async {
            match &status_url {
                Some(status_url) => {
                    self.follow(status_url).await?;
                    self.fetch_final(&result_url).await
                }
                None => self.poll(&result_url).await,
            }
        };
        let outcome = tokio::time::timeout(self.settings.session_timeout, wait)
            .await
            .unwrap_or(Err(WidgetError::Timeout));
        self.settle();
        outcome
    }

    /// Clear the anchor unless that already happened.
    fn settle(&self) {
        if !self.settled.swap(true, Ordering::AcqRel) {
            self.options.anchor.clear();
        }
    }

    /// Issue the start request and read the session pointer from the response.
    async fn open(&self) -> Result<SessionPointer, WidgetError> {
        let request = self.options.urls.start();
        let builder = match &request {
            StartRequest::Get { url } => self.http.get(url),
            StartRequest::Post { url, body } => self.http.post(url).json(body),
        };
        tracing::debug!(method = request.method(), url = request.url(), "starting session");

        let response = builder
            .send()
            .await
            .map_err(|e| WidgetError::Request(describe(&e)))?;
        let status = response.status();
        if !status.is_success() {
            return Err(WidgetError::Status(status.as_u16()));
        }

        let body: Value = response.json().await.map_err(|e| {
            WidgetError::InvalidResponse(format!("failed to parse start response: {e}"))
        })?;
        session_pointer(body)
    }

    /// Poll the session status until it is `DONE`.
    async fn follow(&self, url: &str) -> Result<(), WidgetError> {
        let mut ticker = tokio::time::interval(self.settings.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let body = self.get_json(url, "session status").await?;
            let status = body.as_str().ok_or_else(|| {
                WidgetError::InvalidResponse(format!("unexpected session status {body}"))
            })?;
            match status {
                "DONE" => return Ok(()),
                "CANCELLED" | "TIMEOUT" => {
                    return Err(WidgetError::SessionEnded(status.to_string()))
                }
                _ => tracing::trace!(status, "session still pending"),
            }
        }
    }

    /// Fetch the result of a session whose status is already `DONE`.
    async fn fetch_final(&self, url: &str) -> Result<Value, WidgetError> {
        let body = self.get_json(url, "session result").await?;
        match progress(&body) {
            Progress::Finished => Ok(body),
            Progress::Ended(reason) => Err(WidgetError::SessionEnded(reason)),
            Progress::Pending(status) => Err(WidgetError::InvalidResponse(format!(
                "session result still {status} after the session finished"
            ))),
        }
    }

    /// Poll the result endpoint until the result itself is terminal.
    async fn poll(&self, url: &str) -> Result<Value, WidgetError> {
        let mut ticker = tokio::time::interval(self.settings.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let body = self.get_json(url, "session result").await?;
            match progress(&body) {
                Progress::Finished => return Ok(body),
                Progress::Ended(reason) => return Err(WidgetError::SessionEnded(reason)),
                Progress::Pending(status) => tracing::trace!(%status, "session still pending"),
            }
        }
    }

    async fn get_json(&self, url: &str, what: &str) -> Result<Value, WidgetError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| WidgetError::Request(describe(&e)))?;
        let status = response.status();
        if !status.is_success() {
            return Err(WidgetError::Status(status.as_u16()));
        }
        response
            .json()
            .await
            .map_err(|e| WidgetError::InvalidResponse(format!("failed to parse {what}: {e}")))
    }
}

/// Read the pointer from `{sessionPtr, sessionId}`, or take the body as the
/// pointer itself.
fn session_pointer(body: Value) -> Result<SessionPointer, WidgetError> {
    let raw = match body {
        Value::Object(mut map) if map.contains_key("sessionPtr") => {
            map.remove("sessionPtr").unwrap_or(Value::Null)
        }
        other => other,
    };
    let pointer: SessionPointer = serde_json::from_value(raw)
        .map_err(|e| WidgetError::InvalidResponse(format!("invalid session pointer: {e}")))?;
    if pointer.u.is_none() {
        tracing::warn!("session pointer carries no url");
    }
    Ok(pointer)
}

/// Where a polled result says the session stands.
#[derive(Debug, PartialEq, Eq)]
enum Progress {
    Finished,
    Pending(String),
    Ended(String),
}

/// Classify a result body the way the controller will later unwrap it.
///
/// A `sessionResult` that does not decode is handed on as finished so the
/// controller reports it as unreadable.
fn progress(body: &Value) -> Progress {
    let Ok(result) = WidgetOutcome::from_value(body.clone()).into_disclosure() else {
        return Progress::Finished;
    };
    if let Some(error) = result.get("error") {
        let reason = error.as_str().map_or_else(|| error.to_string(), str::to_owned);
        return Progress::Ended(reason);
    }
    match result.get("status") {
        None | Some(Value::Null) => Progress::Finished,
        Some(Value::String(status)) => match status.as_str() {
            "DONE" => Progress::Finished,
            "CANCELLED" | "TIMEOUT" => Progress::Ended(status.clone()),
            _ => Progress::Pending(status.clone()),
        },
        Some(other) => Progress::Ended(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pointer_from_backend_wrapper() {
        let body = json!({
            "sessionPtr": {"u": "https://irma.example/irma/session/abc", "irmaqr": "disclosing"},
            "sessionId": "abc"
        });
        let pointer = session_pointer(body).unwrap();
        assert_eq!(pointer.u.as_deref(), Some("https://irma.example/irma/session/abc"));
        assert_eq!(pointer.extra["irmaqr"], "disclosing");
    }

    #[test]
    fn bare_pointer_is_accepted() {
        let pointer = session_pointer(json!({"u": "https://irma.example/s/xyz"})).unwrap();
        assert_eq!(pointer.u.as_deref(), Some("https://irma.example/s/xyz"));
    }

    #[test]
    fn non_object_pointer_is_invalid() {
        assert!(matches!(
            session_pointer(json!("nope")),
            Err(WidgetError::InvalidResponse(_))
        ));
        assert!(matches!(
            session_pointer(json!({"sessionPtr": 42})),
            Err(WidgetError::InvalidResponse(_))
        ));
    }

    #[test]
    fn status_is_read_through_the_wrapper() {
        assert_eq!(
            progress(&json!({"sessionResult": {"status": "CONNECTED"}})),
            Progress::Pending("CONNECTED".into())
        );
        assert_eq!(progress(&json!({"status": "DONE"})), Progress::Finished);
        assert_eq!(progress(&json!({"disclosed": []})), Progress::Finished);
        assert_eq!(progress(&json!({"sessionResult": null})), Progress::Finished);
        assert_eq!(
            progress(&json!({"sessionResult": {"status": "TIMEOUT"}})),
            Progress::Ended("TIMEOUT".into())
        );
    }

    #[test]
    fn string_encoded_pending_result_is_still_pending() {
        let body = json!({"sessionResult": "{\"status\":\"INITIALIZED\"}"});
        assert_eq!(progress(&body), Progress::Pending("INITIALIZED".into()));

        let done = json!({"sessionResult": "{\"status\":\"DONE\",\"disclosed\":[]}"});
        assert_eq!(progress(&done), Progress::Finished);
    }

    #[test]
    fn error_result_ends_the_session() {
        let body = json!({"sessionResult": {"error": "SESSION_UNKNOWN", "status": 400}});
        assert_eq!(progress(&body), Progress::Ended("SESSION_UNKNOWN".into()));
        assert_eq!(
            progress(&json!({"status": 500})),
            Progress::Ended("500".into())
        );
    }

    #[test]
    fn undecodable_result_is_left_to_the_parser() {
        assert_eq!(progress(&json!({"sessionResult": "<html>"})), Progress::Finished);
    }

    #[test]
    fn builder_overrides_defaults() {
        let loader = HttpWidgetLoader::builder()
            .poll_interval(Duration::from_millis(20))
            .session_timeout(Duration::from_secs(5))
            .build();
        assert_eq!(loader.poll_interval(), Duration::from_millis(20));
        assert_eq!(loader.session_timeout(), Duration::from_secs(5));
        assert!(loader.settings.follow_status);
        assert!(!HttpWidgetLoader::builder().follow_status(false).build().settings.follow_status);
        assert_eq!(HttpWidgetLoader::new().poll_interval(), DEFAULT_POLL_INTERVAL);
    }
}
