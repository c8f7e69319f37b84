//! # WebAuthn ceremony client
//!
//! Client half of the WebAuthn registration and login ceremonies. Each
//! ceremony is two HTTP round-trips against the same endpoint with one
//! authenticator invocation in between:
//!
//! 1. `GET <endpoint>` returns a challenge document and a `Webauthn-Session`
//!    header
//! 2. the binary fields of the document are decoded and the authenticator is
//!    asked to create a credential (registration) or sign an assertion (login)
//! 3. the binary fields of the result are encoded and `POST <endpoint>` sends
//!    them back, together with the session token from step 1
//!
//! ```no_run
//! # async fn demo(authenticator: impl webauthn_client::Authenticator) -> Result<(), Box<dyn std::error::Error>> {
//! use webauthn_client::{ClientConfig, WebauthnClient};
//!
//! let client = WebauthnClient::from_config(ClientConfig::from_env()?, authenticator)?;
//! let mut headers = reqwest::header::HeaderMap::new();
//! headers.insert("user", "alice".parse()?);
//! client.register(&mut headers).await?;
//! client.login(&mut headers).await?;
//! # Ok(())
//! # }
//! ```

pub mod authenticator;
pub mod ceremony;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod network;
pub mod session;
pub mod transport;
pub mod types;

pub use authenticator::Authenticator;
pub use ceremony::{Ceremony, Login, Registration};
pub use client::WebauthnClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{
    AuthenticatorError, CeremonyError, CeremonyResult, ErrorKind, ProtocolError, TransportError,
};
pub use session::{CeremonySession, SESSION_HEADER};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, SubmitResponse};
pub use types::{
    AssertionResponse, AttestationResponse, CreationOptions, CredentialDescriptor,
    PublicKeyCredential, RequestOptions,
};
pub use tokio_util::sync::CancellationToken;
