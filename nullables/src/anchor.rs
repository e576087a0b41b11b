//! Nullable mount anchor — record what widgets render.

use boarding_types::{Language, SessionPointer};
use boarding_verification::MountAnchor;
use std::sync::Mutex;

/// A mount anchor that records presented pointers instead of drawing them.
pub struct NullAnchor {
    id: String,
    presented: Mutex<Vec<(SessionPointer, Language)>>,
    clears: Mutex<usize>,
}

impl NullAnchor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            presented: Mutex::new(Vec::new()),
            clears: Mutex::new(0),
        }
    }

    /// All pointers presented so far, with the language they were shown in.
    pub fn presented(&self) -> Vec<(SessionPointer, Language)> {
        self.presented.lock().unwrap().clone()
    }

    /// Number of times the anchor was cleared.
    pub fn clears(&self) -> usize {
        *self.clears.lock().unwrap()
    }
}

impl Default for NullAnchor {
    fn default() -> Self {
        Self::new("#verification-widget")
    }
}

impl MountAnchor for NullAnchor {
    fn id(&self) -> &str {
        &self.id
    }

    fn present(&self, pointer: &SessionPointer, language: Language) {
        self.presented
            .lock()
            .unwrap()
            .push((pointer.clone(), language));
    }

    fn clear(&self) {
        *self.clears.lock().unwrap() += 1;
    }
}
