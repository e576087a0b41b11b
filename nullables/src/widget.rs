//! Nullable widget — scripted session outcomes without a backend.

use std::future::Future;
use std::sync::{Arc, Mutex};

use boarding_types::{Language, SessionPointer};
use boarding_verification::{
    StartRequest, VerificationWidget, WidgetError, WidgetLoader, WidgetModule, WidgetOptions,
};
use serde_json::Value;
use tokio::sync::oneshot;

/// How started widgets settle.
#[derive(Clone, Debug)]
enum Script {
    Resolve(Value),
    Reject(WidgetError),
    Manual,
    Panic,
}

/// Something that happened to a widget, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WidgetEvent {
    Mounted(usize),
    Started(usize),
    Aborted(usize),
}

/// What one widget instance was created with and did.
#[derive(Clone, Debug)]
pub struct WidgetRecord {
    pub anchor: String,
    pub language: Language,
    /// Start request built when the widget was started.
    pub start: Option<StartRequest>,
    /// Result URL built from the scripted pointer.
    pub result_url: Option<String>,
    pub aborted: bool,
}

#[derive(Default)]
struct Shared {
    loads: usize,
    records: Vec<WidgetRecord>,
    resolvers: Vec<Option<oneshot::Sender<Result<Value, WidgetError>>>>,
    events: Vec<WidgetEvent>,
    mounted: usize,
    max_mounted: usize,
}

/// A widget loader whose widgets settle as scripted.
///
/// `abort` never settles a pending `start`; a test can still deliver a late
/// result with [`NullWidgetLoader::resolve`] to check that it is ignored.
pub struct NullWidgetLoader {
    shared: Arc<Mutex<Shared>>,
    script: Script,
    available: bool,
    pointer_base: String,
}

impl NullWidgetLoader {
    fn with_script(script: Script) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared::default())),
            script,
            available: true,
            pointer_base: "https://irma.example/irma/session".into(),
        }
    }

    /// Every widget resolves immediately with `value`.
    pub fn resolving(value: Value) -> Self {
        Self::with_script(Script::Resolve(value))
    }

    /// Every widget rejects immediately with `error`.
    pub fn rejecting(error: WidgetError) -> Self {
        Self::with_script(Script::Reject(error))
    }

    /// Widgets stay pending until [`resolve`](Self::resolve) or
    /// [`reject`](Self::reject) is called.
    pub fn manual() -> Self {
        Self::with_script(Script::Manual)
    }

    /// Every widget panics once started.
    pub fn panicking() -> Self {
        Self::with_script(Script::Panic)
    }

    /// Loading the widget module always fails.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::manual()
        }
    }

    /// Settle widget `index` (in creation order) with `value`.
    ///
    /// Returns false if that widget does not exist or already settled.
    pub fn resolve(&self, index: usize, value: Value) -> bool {
        self.settle(index, Ok(value))
    }

    /// Settle widget `index` (in creation order) with `error`.
    pub fn reject(&self, index: usize, error: WidgetError) -> bool {
        self.settle(index, Err(error))
    }

    fn settle(&self, index: usize, outcome: Result<Value, WidgetError>) -> bool {
        let sender = self
            .shared
            .lock()
            .unwrap()
            .resolvers
            .get_mut(index)
            .and_then(Option::take);
        match sender {
            Some(tx) => tx.send(outcome).is_ok(),
            None => false,
        }
    }

    /// Number of module loads attempted.
    pub fn loads(&self) -> usize {
        self.shared.lock().unwrap().loads
    }

    /// Records of every widget created, in creation order.
    pub fn records(&self) -> Vec<WidgetRecord> {
        self.shared.lock().unwrap().records.clone()
    }

    /// Everything that happened to widgets, in order.
    pub fn events(&self) -> Vec<WidgetEvent> {
        self.shared.lock().unwrap().events.clone()
    }

    /// Widgets currently mounted.
    pub fn mounted(&self) -> usize {
        self.shared.lock().unwrap().mounted
    }

    /// Highest number of widgets ever mounted at the same time.
    pub fn max_mounted(&self) -> usize {
        self.shared.lock().unwrap().max_mounted
    }
}

impl WidgetLoader for NullWidgetLoader {
    type Module = NullWidgetModule;

    fn load(&self) -> impl Future<Output = Result<NullWidgetModule, WidgetError>> + Send {
        self.shared.lock().unwrap().loads += 1;
        let module = NullWidgetModule {
            shared: self.shared.clone(),
            script: self.script.clone(),
            pointer_base: self.pointer_base.clone(),
        };
        let available = self.available;
        async move {
            if available {
                Ok(module)
            } else {
                Err(WidgetError::Unavailable("null widget module missing".into()))
            }
        }
    }
}

/// Module handed out by [`NullWidgetLoader`].
pub struct NullWidgetModule {
    shared: Arc<Mutex<Shared>>,
    script: Script,
    pointer_base: String,
}

impl WidgetModule for NullWidgetModule {
    type Widget = NullWidget;

    fn create(&self, options: WidgetOptions) -> NullWidget {
        let mut shared = self.shared.lock().unwrap();
        let index = shared.records.len();
        let (tx, rx) = oneshot::channel();

        shared.records.push(WidgetRecord {
            anchor: options.anchor.id().to_string(),
            language: options.language,
            start: None,
            result_url: None,
            aborted: false,
        });
        shared.resolvers.push(Some(tx));
        shared.events.push(WidgetEvent::Mounted(index));
        shared.mounted += 1;
        shared.max_mounted = shared.max_mounted.max(shared.mounted);

        NullWidget {
            index,
            shared: self.shared.clone(),
            script: self.script.clone(),
            pointer: SessionPointer::new(format!("{}/session-{index}", self.pointer_base)),
            options,
            pending: Mutex::new(Some(rx)),
        }
    }
}

/// A widget that never touches the network.
pub struct NullWidget {
    index: usize,
    shared: Arc<Mutex<Shared>>,
    script: Script,
    pointer: SessionPointer,
    options: WidgetOptions,
    pending: Mutex<Option<oneshot::Receiver<Result<Value, WidgetError>>>>,
}

impl VerificationWidget for NullWidget {
    fn start(&self) -> impl Future<Output = Result<Value, WidgetError>> + Send {
        let start = self.options.urls.start();
        let result_url = self.options.urls.result(Some(&self.pointer));
        {
            let mut shared = self.shared.lock().unwrap();
            let record = &mut shared.records[self.index];
            record.start = Some(start);
            record.result_url = Some(result_url);
            shared.events.push(WidgetEvent::Started(self.index));
        }
        self.options
            .anchor
            .present(&self.pointer, self.options.language);

        let script = self.script.clone();
        let pending = self.pending.lock().unwrap().take();
        async move {
            match script {
                Script::Resolve(value) => Ok(value),
                Script::Reject(error) => Err(error),
                Script::Manual => match pending {
                    Some(rx) => rx.await.unwrap_or(Err(WidgetError::Aborted)),
                    None => Err(WidgetError::Aborted),
                },
                Script::Panic => panic!("null widget scripted to panic"),
            }
        }
    }

    fn abort(&self) {
        let mut shared = self.shared.lock().unwrap();
        if shared.records[self.index].aborted {
            return;
        }
        shared.records[self.index].aborted = true;
        shared.events.push(WidgetEvent::Aborted(self.index));
        shared.mounted -= 1;
        drop(shared);
        self.options.anchor.clear();
    }
}
