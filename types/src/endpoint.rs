//! API endpoint resolution.
//!
//! The base URL of the verification backend usually comes from the
//! environment. Deployments that template the value in at release time can
//! leave the token unreplaced, so placeholders are detected and treated the
//! same as an absent value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Relative API root used when no usable endpoint is configured.
pub const DEFAULT_API_ROOT: &str = "/api";

/// Marker present in unreplaced deployment placeholders.
const PLACEHOLDER_TOKEN: &str = "API_ENDPOINT";

/// A normalized API base endpoint (never ends with `/`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiEndpoint(String);

impl ApiEndpoint {
    /// Resolve a raw, possibly absent, endpoint value.
    ///
    /// The value is trimmed and trailing slashes are stripped. Empty values and
    /// unreplaced placeholders resolve to [`DEFAULT_API_ROOT`].
    pub fn resolve(raw: Option<&str>) -> Self {
        let normalized = raw.map(normalize).unwrap_or_default();
        if normalized.is_empty() || is_placeholder(&normalized) {
            Self(DEFAULT_API_ROOT.to_string())
        } else {
            Self(normalized)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `{endpoint}/start`
    pub fn start_url(&self) -> String {
        format!("{}/start", self.0)
    }

    /// `{endpoint}/result?sessionID={session_id}`
    pub fn result_url(&self, session_id: &str) -> String {
        format!("{}/result?sessionID={}", self.0, session_id)
    }

    /// `{endpoint}/tickets`
    pub fn tickets_url(&self) -> String {
        format!("{}/tickets", self.0)
    }
}

impl Default for ApiEndpoint {
    fn default() -> Self {
        Self(DEFAULT_API_ROOT.to_string())
    }
}

impl fmt::Display for ApiEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn normalize(value: &str) -> String {
    value
        .trim_start()
        .trim_end_matches(|c: char| c == '/' || c.is_whitespace())
        .to_string()
}

fn is_placeholder(value: &str) -> bool {
    value.contains(PLACEHOLDER_TOKEN)
        || (value.len() > 1 && value.starts_with('%') && value.ends_with('%'))
}
