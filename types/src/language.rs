//! Display language for the verification widget.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages the verification widget can be displayed in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Dutch.
    Nl,
}

impl Language {
    /// Normalize a two-letter language code.
    ///
    /// `nl` (any case, surrounding whitespace ignored) selects Dutch; anything
    /// else, including an absent code, falls back to English.
    pub fn normalize(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            Some(c) if c.eq_ignore_ascii_case("nl") => Self::Nl,
            _ => Self::En,
        }
    }

    /// Two-letter code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Nl => "nl",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
