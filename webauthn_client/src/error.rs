//! Error types for the registration and login ceremonies.
//!
//! A ceremony either completes both round-trips or stops at the first failure.
//! The failure is always returned to the caller, tagged with the category it
//! belongs to:
//!
//! - [`TransportError`]: the GET or the POST could not be completed
//! - [`CeremonyError::Rejected`]: the server answered with a non-success status
//! - [`ProtocolError`]: the server broke the ceremony contract
//! - [`AuthenticatorError`]: the user or the platform declined
//! - [`CeremonyError::Cancelled`]: the caller gave up

use crate::codec::DecodeError;
use reqwest::{Method, StatusCode};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a ceremony, returned by [`WebauthnClient`](crate::WebauthnClient).
#[derive(Error, Debug)]
pub enum CeremonyError {
    /// The request never produced a response
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The relying party answered, but not with a 2xx status
    #[error("server rejected {method} with status {status}")]
    Rejected { method: Method, status: StatusCode },

    /// The relying party broke the ceremony contract
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The authenticator did not produce a credential
    #[error("authenticator error: {0}")]
    Authenticator(#[from] AuthenticatorError),

    #[error("ceremony cancelled")]
    Cancelled,
}

/// Coarse classification of a [`CeremonyError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Rejected,
    Protocol,
    Authenticator,
    Cancelled,
}

impl CeremonyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CeremonyError::Transport(_) => ErrorKind::Transport,
            CeremonyError::Rejected { .. } => ErrorKind::Rejected,
            CeremonyError::Protocol(_) => ErrorKind::Protocol,
            CeremonyError::Authenticator(_) => ErrorKind::Authenticator,
            CeremonyError::Cancelled => ErrorKind::Cancelled,
        }
    }
}

/// The HTTP request could not be completed.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("could not connect: {0}")]
    Connect(#[source] BoxError),

    #[error("request timed out")]
    Timeout,

    #[error("{0}")]
    Other(#[source] BoxError),
}

impl TransportError {
    pub fn other(error: impl Into<BoxError>) -> Self {
        TransportError::Other(error.into())
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TransportError::Timeout
        } else if error.is_connect() {
            TransportError::Connect(Box::new(error))
        } else {
            TransportError::Other(Box::new(error))
        }
    }
}

/// The relying party's answer violates the ceremony contract.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Round-trip 1 did not carry a `Webauthn-Session` header
    #[error("challenge response is missing the Webauthn-Session header")]
    MissingSessionHeader,

    #[error("challenge response carries an empty Webauthn-Session header")]
    EmptySessionToken,

    /// The challenge body is not the expected JSON document
    #[error("malformed challenge document: {0}")]
    MalformedChallenge(#[source] serde_json::Error),

    /// A binary field of the challenge document is not valid base64url
    #[error("field `{field}` is not valid base64url: {source}")]
    Decode {
        field: String,
        #[source]
        source: DecodeError,
    },

    #[error("could not serialize the authenticator result: {0}")]
    Payload(#[source] serde_json::Error),
}

/// Why the authenticator did not return a credential.
///
/// The variants follow the DOMException names browsers use for the same
/// situations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthenticatorError {
    /// The user cancelled or did not consent
    #[error("the user declined the request")]
    NotAllowed,

    /// No eligible credential, or the credential is already registered
    #[error("no eligible authenticator: {0}")]
    InvalidState(String),

    #[error("operation not supported: {0}")]
    NotSupported(String),

    #[error("authenticator timed out")]
    Timeout,

    #[error("platform error: {0}")]
    Platform(String),
}

/// Convenience alias used throughout the crate.
pub type CeremonyResult<T> = Result<T, CeremonyError>;
