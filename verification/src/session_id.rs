//! Session identifier derivation.

use boarding_types::SessionPointer;

/// Derive the session id from a session pointer.
///
/// The id is the final path segment of the pointer's `u` URL. An absent
/// pointer or `u` yields the empty string; the result request is still issued
/// and left to fail server-side.
pub fn derive_session_id(pointer: Option<&SessionPointer>) -> String {
    pointer
        .and_then(|p| p.u.as_deref())
        .and_then(|u| u.rsplit('/').next())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_the_last_path_segment() {
        let ptr = SessionPointer::new("https://irma.example/irma/session/abc123");
        assert_eq!(derive_session_id(Some(&ptr)), "abc123");
    }

    #[test]
    fn url_without_slash_is_its_own_id() {
        let ptr = SessionPointer::new("abc123");
        assert_eq!(derive_session_id(Some(&ptr)), "abc123");
    }

    #[test]
    fn trailing_slash_gives_empty_id() {
        let ptr = SessionPointer::new("https://irma.example/session/");
        assert_eq!(derive_session_id(Some(&ptr)), "");
    }

    #[test]
    fn absent_pointer_or_url() {
        assert_eq!(derive_session_id(None), "");
        assert_eq!(derive_session_id(Some(&SessionPointer::default())), "");
    }
}
