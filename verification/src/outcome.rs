//! Resolution values of a verification widget.
//!
//! The backend may return the disclosure result directly or wrapped as
//! `{ "sessionResult": …, "verified": …, "message": … }`. The shape is decided
//! once here so nothing downstream has to look for the wrapper.

use serde_json::Value;

use crate::error::ParseError;

/// What a widget resolved with.
#[derive(Clone, Debug, PartialEq)]
pub enum WidgetOutcome {
    /// The backend wrapped the result and may have added its own verdict.
    Wrapped {
        session_result: Value,
        verified: Option<bool>,
        message: Option<String>,
    },
    /// The raw disclosure result.
    Bare(Value),
}

impl WidgetOutcome {
    /// Classify a resolved value. Only an object with a `sessionResult` key
    /// counts as wrapped.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut map) => match map.remove("sessionResult") {
                Some(session_result) => Self::Wrapped {
                    session_result,
                    verified: map.get("verified").and_then(Value::as_bool),
                    message: map
                        .get("message")
                        .and_then(Value::as_str)
                        .filter(|m| !m.is_empty())
                        .map(str::to_owned),
                },
                None => Self::Bare(Value::Object(map)),
            },
            other => Self::Bare(other),
        }
    }

    /// The backend's verdict, if it sent one.
    pub fn verified(&self) -> Option<bool> {
        match self {
            Self::Wrapped { verified, .. } => *verified,
            Self::Bare(_) => None,
        }
    }

    /// The backend's explanatory message, if it sent one.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Wrapped { message, .. } => message.as_deref(),
            Self::Bare(_) => None,
        }
    }

    /// The disclosure result itself.
    ///
    /// A wrapped result delivered as a JSON-encoded string is decoded first.
    pub fn into_disclosure(self) -> Result<Value, ParseError> {
        match self {
            Self::Wrapped {
                session_result: Value::String(encoded),
                ..
            } => serde_json::from_str(&encoded).map_err(|e| {
                ParseError::new(
                    format!("sessionResult is not valid JSON: {e}"),
                    Value::String(encoded.clone()),
                )
            }),
            Self::Wrapped { session_result, .. } => Ok(session_result),
            Self::Bare(value) => Ok(value),
        }
    }
}
