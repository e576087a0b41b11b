//! Verification session controller.
//!
//! Owns the session state machine for one check-in view:
//! `Idle → Starting → AwaitingUser → Completed | Failed | Cancelled`.
//!
//! Each `start` spawns a task that loads the widget, mounts it, waits for the
//! session to settle, and parses the result. Every state change the task makes
//! goes through a per-session guard: `cancel` marks the guard cancelled before
//! aborting the widget, and the task checks the mark (under the same lock)
//! before mounting and before committing, so a cancelled session never mounts
//! a widget and its late resolutions are discarded. A task that panics fails
//! its session instead of leaving it pending.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use boarding_store::{PendingTicket, TicketStore};
use boarding_types::{ApiEndpoint, Itinerary, Language, SessionRequest, SessionState, Ticket};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::disclosure::parse_ticket;
use crate::error::SessionError;
use crate::outcome::WidgetOutcome;
use crate::widget::{
    MountAnchor, SessionUrls, VerificationWidget, WidgetLoader, WidgetModule, WidgetOptions,
};

/// Widget type produced by a loader.
pub type WidgetOf<L> = <<L as WidgetLoader>::Module as WidgetModule>::Widget;

/// Which kind of session to start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionFlow {
    /// Pure disclosure: no payload, `GET {endpoint}/start`.
    #[default]
    Disclosure,
    /// Bound to the pending ticket in the store: `POST {endpoint}/start`.
    TicketBound,
}

/// Parameters of one `start` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub endpoint: ApiEndpoint,
    pub language: Language,
    pub flow: SessionFlow,
}

impl SessionConfig {
    /// Build a config from raw, possibly absent, endpoint and language values.
    pub fn new(endpoint: Option<&str>, language: Option<&str>, flow: SessionFlow) -> Self {
        Self {
            endpoint: ApiEndpoint::resolve(endpoint),
            language: Language::normalize(language),
            flow,
        }
    }

    pub fn disclosure(endpoint: Option<&str>, language: Option<&str>) -> Self {
        Self::new(endpoint, language, SessionFlow::Disclosure)
    }

    pub fn ticket_bound(endpoint: Option<&str>, language: Option<&str>) -> Self {
        Self::new(endpoint, language, SessionFlow::TicketBound)
    }
}

/// UI-consumable snapshot of the session.
///
/// `ready` and `ticket` are independent: a completed session whose disclosure
/// contained no usable attributes is ready without a ticket, and a running
/// ticket-bound session shows the pending ticket without being ready.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionView {
    pub state: SessionState,
    pub ticket: Option<Ticket>,
    pub ready: bool,
    pub error: Option<SessionError>,
    /// Verdict the backend attached to the result, if any.
    pub verified: Option<bool>,
    /// Explanation the backend attached to the result, if any.
    pub message: Option<String>,
}

impl SessionView {
    fn starting(skeleton: Option<Ticket>) -> Self {
        Self {
            state: SessionState::Starting,
            ticket: skeleton,
            ..Self::default()
        }
    }

    fn fail(&mut self, error: SessionError) {
        self.state = SessionState::Failed;
        self.ready = false;
        self.error = Some(error);
    }

    /// The user-facing error string, if the session failed.
    pub fn error_message(&self) -> Option<&'static str> {
        self.error.as_ref().map(SessionError::user_message)
    }
}

struct Guard<W> {
    cancelled: bool,
    widget: Option<Arc<W>>,
}

type SharedGuard<W> = Arc<Mutex<Guard<W>>>;

struct ActiveSession<W> {
    id: u64,
    guard: SharedGuard<W>,
}

fn lock<W>(guard: &Mutex<Guard<W>>) -> MutexGuard<'_, Guard<W>> {
    guard.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drives verification sessions for one mount anchor.
///
/// At most one session is active at a time; starting again cancels the
/// previous session first. Dropping the controller cancels the active session.
pub struct VerificationSessionController<L: WidgetLoader, S: TicketStore + ?Sized> {
    loader: Arc<L>,
    store: Arc<S>,
    anchor: Arc<dyn MountAnchor>,
    itinerary: Itinerary,
    view: Arc<watch::Sender<SessionView>>,
    active: Option<ActiveSession<WidgetOf<L>>>,
    next_session: u64,
}

impl<L: WidgetLoader, S: TicketStore + ?Sized> VerificationSessionController<L, S> {
    pub fn new(
        loader: Arc<L>,
        store: Arc<S>,
        anchor: Arc<dyn MountAnchor>,
        itinerary: Itinerary,
    ) -> Self {
        let (view, _) = watch::channel(SessionView::default());
        Self {
            loader,
            store,
            anchor,
            itinerary,
            view: Arc::new(view),
            active: None,
            next_session: 1,
        }
    }

    /// Current snapshot.
    pub fn view(&self) -> SessionView {
        self.view.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.view.subscribe()
    }

    /// Wait until the current session settles.
    ///
    /// Returns immediately when no session was ever started.
    pub async fn wait(&self) -> SessionView {
        let mut rx = self.view.subscribe();
        let settled = rx
            .wait_for(|v| v.state == SessionState::Idle || v.state.is_terminal())
            .await
            .map(|v| SessionView::clone(&v));
        settled.unwrap_or_else(|_| self.view())
    }

    /// Start a new session, cancelling any session still in flight.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, config: SessionConfig) {
        self.cancel();

        let session = self.next_session;
        self.next_session += 1;

        let (payload, skeleton) = match config.flow {
            SessionFlow::Disclosure => (None, None),
            SessionFlow::TicketBound => match self.pending_ticket() {
                Some(pending) => (
                    Some(SessionRequest::for_ticket(&pending.ticket_id, &pending.ticket)),
                    Some(pending.ticket),
                ),
                None => {
                    tracing::warn!(session, "no pending ticket, verification not started");
                    let mut failed = SessionView::default();
                    failed.fail(SessionError::MissingTicket);
                    self.view.send_replace(failed);
                    return;
                }
            },
        };

        tracing::info!(
            session,
            endpoint = %config.endpoint,
            language = %config.language,
            flow = ?config.flow,
            "starting verification session"
        );
        self.view.send_replace(SessionView::starting(skeleton));

        let options = WidgetOptions {
            anchor: self.anchor.clone(),
            language: config.language,
            urls: SessionUrls::new(config.endpoint, payload),
        };
        let guard: SharedGuard<WidgetOf<L>> = Arc::new(Mutex::new(Guard {
            cancelled: false,
            widget: None,
        }));

        let task = tokio::spawn(run_session(
            session,
            self.loader.clone(),
            options,
            self.itinerary.clone(),
            guard.clone(),
            self.view.clone(),
        ));
        tokio::spawn(supervise::<L>(session, task, guard.clone(), self.view.clone()));

        self.active = Some(ActiveSession { id: session, guard });
    }

    /// Abort the active session, if any. Idempotent.
    ///
    /// A session that already settled keeps its state; its widget is still
    /// aborted so nothing stays mounted.
    pub fn cancel(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        let widget = {
            let mut guard = lock(&active.guard);
            guard.cancelled = true;
            guard.widget.take()
        };
        if let Some(widget) = widget {
            widget.abort();
        }

        let interrupted = self.view.send_if_modified(|v| {
            if v.state.is_active() {
                v.state = SessionState::Cancelled;
                v.ready = false;
                true
            } else {
                false
            }
        });
        if interrupted {
            tracing::info!(session = active.id, "verification session cancelled");
        } else {
            tracing::debug!(session = active.id, "released settled verification session");
        }
    }

    fn pending_ticket(&self) -> Option<PendingTicket> {
        match self.store.get() {
            Ok(Some(pending)) if !pending.ticket_id.trim().is_empty() => Some(pending),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("failed to read pending ticket: {e}");
                None
            }
        }
    }
}

impl<L: WidgetLoader, S: TicketStore + ?Sized> Drop for VerificationSessionController<L, S> {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Apply `update` unless the session was cancelled. Returns whether it applied.
fn commit<W>(
    guard: &Mutex<Guard<W>>,
    view: &watch::Sender<SessionView>,
    update: impl FnOnce(&mut SessionView),
) -> bool {
    let guard = lock(guard);
    if guard.cancelled {
        return false;
    }
    view.send_modify(update);
    true
}

/// Fail the session if its task panicked, so waiters are released.
async fn supervise<L: WidgetLoader>(
    session: u64,
    task: JoinHandle<()>,
    guard: SharedGuard<WidgetOf<L>>,
    view: Arc<watch::Sender<SessionView>>,
) {
    let Err(e) = task.await else {
        return;
    };
    if !e.is_panic() {
        return;
    }
    tracing::error!(session, "verification session task panicked");
    commit(&guard, &view, |v| {
        v.fail(SessionError::SessionStart("verification session task panicked".into()))
    });
}

async fn run_session<L: WidgetLoader>(
    session: u64,
    loader: Arc<L>,
    options: WidgetOptions,
    itinerary: Itinerary,
    guard: SharedGuard<WidgetOf<L>>,
    view: Arc<watch::Sender<SessionView>>,
) {
    let module = match loader.load().await {
        Ok(module) => module,
        Err(e) => {
            tracing::warn!(session, "verification client failed to load: {e}");
            commit(&guard, &view, |v| {
                v.fail(SessionError::ClientUnavailable(e.to_string()))
            });
            return;
        }
    };

    let widget = {
        let mut slot = lock(&guard);
        if slot.cancelled {
            tracing::debug!(session, "session cancelled before the widget was mounted");
            return;
        }
        let anchor = options.anchor.id().to_string();
        let widget = Arc::new(module.create(options));
        slot.widget = Some(widget.clone());
        view.send_modify(|v| v.state = SessionState::AwaitingUser);
        tracing::debug!(session, %anchor, "widget mounted");
        widget
    };

    let raw = match widget.start().await {
        Ok(raw) => raw,
        Err(e) => {
            if commit(&guard, &view, |v| {
                v.fail(SessionError::SessionStart(e.to_string()))
            }) {
                tracing::warn!(session, "verification session failed: {e}");
            } else {
                tracing::debug!(session, "discarding failure of a cancelled session: {e}");
            }
            return;
        }
    };

    let outcome = WidgetOutcome::from_value(raw);
    let verified = outcome.verified();
    let message = outcome.message().map(str::to_owned);

    match outcome
        .into_disclosure()
        .and_then(|disclosure| parse_ticket(&disclosure, &itinerary))
    {
        Ok(ticket) => {
            let extracted = ticket.is_some();
            let committed = commit(&guard, &view, |v| {
                v.state = SessionState::Completed;
                v.ready = true;
                v.error = None;
                v.verified = verified;
                v.message = message;
                if let Some(ticket) = ticket {
                    v.ticket = Some(ticket);
                }
            });
            if committed {
                tracing::info!(session, extracted, ?verified, "verification session completed");
            } else {
                tracing::debug!(session, "discarding result of a cancelled session");
            }
        }
        Err(e) => {
            tracing::error!(session, raw = %e.raw, "could not read disclosure result: {}", e.reason);
            commit(&guard, &view, |v| v.fail(SessionError::Parse(e)));
        }
    }
}
