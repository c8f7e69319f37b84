//! The two ceremonies and the state machine they share.
//!
//! Registration and login run the same four steps and differ only in their
//! endpoint, their documents and the authenticator call. [`Ceremony`]
//! captures exactly those differences so a single orchestrator drives both.

use crate::{
    authenticator::Authenticator,
    config::ClientConfig,
    error::{AuthenticatorError, ProtocolError},
    types::{
        AssertionResponse, AttestationResponse, CreationOptions, CredentialPayload,
        EncodeResponse, LoginChallenge, PublicKeyCredential, RegistrationChallenge,
        RequestOptions,
    },
};
use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::fmt;

/// Progress of one ceremony.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CeremonyState {
    Init,
    ChallengeFetched,
    AuthenticatorInvoked,
    Submitted,
    Done,
    Failed,
}

impl CeremonyState {
    pub(crate) fn advance(&mut self, ceremony: &'static str, next: CeremonyState) {
        tracing::debug!(ceremony, from = %self, to = %next, "ceremony state change");
        *self = next;
    }
}

impl fmt::Display for CeremonyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CeremonyState::Init => "init",
            CeremonyState::ChallengeFetched => "challenge_fetched",
            CeremonyState::AuthenticatorInvoked => "authenticator_invoked",
            CeremonyState::Submitted => "submitted",
            CeremonyState::Done => "done",
            CeremonyState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// What distinguishes one ceremony from the other.
#[async_trait]
pub trait Ceremony: Send + Sync {
    /// Wire form of the challenge document
    type Challenge: DeserializeOwned + Send;
    /// Decoded options handed to the authenticator
    type Options: Send;
    /// Authenticator response carried inside the credential
    type Response: EncodeResponse + Send + Sync;

    fn name(&self) -> &'static str;

    fn endpoint<'a>(&self, config: &'a ClientConfig) -> &'a Url;

    /// Decode every binary field of the challenge document.
    fn decode(&self, challenge: Self::Challenge) -> Result<Self::Options, ProtocolError>;

    async fn invoke(
        &self,
        authenticator: &dyn Authenticator,
        options: Self::Options,
    ) -> Result<PublicKeyCredential<Self::Response>, AuthenticatorError>;

    /// Encode every binary field of the authenticator result.
    fn encode(
        &self,
        credential: &PublicKeyCredential<Self::Response>,
    ) -> CredentialPayload<<Self::Response as EncodeResponse>::Payload> {
        credential.encode()
    }
}

/// Enrolment of a new credential.
#[derive(Clone, Copy, Debug, Default)]
pub struct Registration;

#[async_trait]
impl Ceremony for Registration {
    type Challenge = RegistrationChallenge;
    type Options = CreationOptions;
    type Response = AttestationResponse;

    fn name(&self) -> &'static str {
        "register"
    }

    fn endpoint<'a>(&self, config: &'a ClientConfig) -> &'a Url {
        &config.register_url
    }

    fn decode(&self, challenge: RegistrationChallenge) -> Result<CreationOptions, ProtocolError> {
        challenge.decode()
    }

    async fn invoke(
        &self,
        authenticator: &dyn Authenticator,
        options: CreationOptions,
    ) -> Result<PublicKeyCredential<AttestationResponse>, AuthenticatorError> {
        authenticator.create_credential(options).await
    }
}

/// Proof of possession of an existing credential.
#[derive(Clone, Copy, Debug, Default)]
pub struct Login;

#[async_trait]
impl Ceremony for Login {
    type Challenge = LoginChallenge;
    type Options = RequestOptions;
    type Response = AssertionResponse;

    fn name(&self) -> &'static str {
        "login"
    }

    fn endpoint<'a>(&self, config: &'a ClientConfig) -> &'a Url {
        &config.login_url
    }

    fn decode(&self, challenge: LoginChallenge) -> Result<RequestOptions, ProtocolError> {
        challenge.decode()
    }

    async fn invoke(
        &self,
        authenticator: &dyn Authenticator,
        options: RequestOptions,
    ) -> Result<PublicKeyCredential<AssertionResponse>, AuthenticatorError> {
        authenticator.get_assertion(options).await
    }
}
