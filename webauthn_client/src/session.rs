//! Correlation between the two round-trips of one ceremony.
//!
//! The relying party keeps no state between issuing a challenge and checking
//! the authenticator's answer. Instead it hands out an opaque token in the
//! `Webauthn-Session` header of the GET response, and expects the very same
//! value back on the POST.

use crate::error::ProtocolError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};

/// Header carrying the session correlation token, in both directions.
pub const SESSION_HEADER: HeaderName = HeaderName::from_static("webauthn-session");

const JSON: HeaderValue = HeaderValue::from_static("application/json");

/// Session state of a single in-flight ceremony.
///
/// Produced by the challenge fetch and consumed by the result submission. It
/// lives exactly as long as one ceremony and is never reused.
#[derive(Clone, PartialEq, Eq)]
pub struct CeremonySession {
    token: HeaderValue,
}

impl CeremonySession {
    /// Extract the session token from the headers of the challenge response.
    pub fn from_response(headers: &HeaderMap) -> Result<Self, ProtocolError> {
        let token = headers
            .get(&SESSION_HEADER)
            .ok_or(ProtocolError::MissingSessionHeader)?;
        if token.is_empty() {
            return Err(ProtocolError::EmptySessionToken);
        }
        Ok(Self {
            token: token.clone(),
        })
    }

    /// The token exactly as the server sent it.
    pub fn token(&self) -> &HeaderValue {
        &self.token
    }

    /// Headers for the submission: `base` plus the session token and the JSON
    /// content type.
    pub fn request_headers(&self, base: &HeaderMap) -> HeaderMap {
        let mut headers = base.clone();
        self.apply_to(&mut headers);
        headers
    }

    /// Write the session token and the JSON content type into `headers`,
    /// replacing whatever a previous ceremony left there.
    pub fn apply_to(&self, headers: &mut HeaderMap) {
        headers.insert(SESSION_HEADER, self.token.clone());
        headers.insert(CONTENT_TYPE, JSON);
    }
}

// The token is a bearer secret for the duration of the ceremony.
impl std::fmt::Debug for CeremonySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CeremonySession")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Headers for a challenge request: the caller's headers without any session
/// token left over from an earlier ceremony.
pub(crate) fn challenge_headers(base: &HeaderMap) -> HeaderMap {
    let mut headers = base.clone();
    headers.remove(&SESSION_HEADER);
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with(token: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_HEADER, HeaderValue::from_static(token));
        headers
    }

    #[test]
    fn token_is_taken_verbatim() {
        let session = CeremonySession::from_response(&response_with("abc123")).unwrap();
        assert_eq!(session.token(), "abc123");
    }

    #[test]
    fn missing_header_is_a_protocol_error() {
        let err = CeremonySession::from_response(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, ProtocolError::MissingSessionHeader));
    }

    #[test]
    fn empty_header_is_a_protocol_error() {
        let err = CeremonySession::from_response(&response_with("")).unwrap_err();
        assert!(matches!(err, ProtocolError::EmptySessionToken));
    }

    #[test]
    fn request_headers_keep_the_base() {
        let session = CeremonySession::from_response(&response_with("abc123")).unwrap();
        let mut base = HeaderMap::new();
        base.insert("user", HeaderValue::from_static("alice"));

        let headers = session.request_headers(&base);
        assert_eq!(headers["user"], "alice");
        assert_eq!(headers["webauthn-session"], "abc123");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        // base is untouched
        assert!(!base.contains_key(SESSION_HEADER));
    }

    #[test]
    fn apply_replaces_a_stale_token() {
        let mut headers = response_with("old");
        let session = CeremonySession::from_response(&response_with("new")).unwrap();
        session.apply_to(&mut headers);
        let tokens: Vec<_> = headers.get_all(SESSION_HEADER).iter().collect();
        assert_eq!(tokens, vec!["new"]);
    }

    #[test]
    fn challenge_headers_drop_the_session() {
        let mut base = response_with("old");
        base.insert("user", HeaderValue::from_static("alice"));
        let headers = challenge_headers(&base);
        assert!(!headers.contains_key(SESSION_HEADER));
        assert_eq!(headers["user"], "alice");
    }

    #[test]
    fn debug_does_not_leak_the_token() {
        let session = CeremonySession::from_response(&response_with("abc123")).unwrap();
        assert!(!format!("{session:?}").contains("abc123"));
    }
}
