//! The platform authenticator, seen from the ceremony.
//!
//! Key generation, user verification and attestation signing all happen
//! behind this trait. The ceremony hands it fully decoded options and expects
//! raw binary results back.

use crate::{
    error::AuthenticatorError,
    types::{AssertionResponse, AttestationResponse, CreationOptions, PublicKeyCredential, RequestOptions},
};
use async_trait::async_trait;
use std::sync::Arc;

/// Platform capability holding the private key material.
///
/// Either call may prompt the user. A refusal, a missing authenticator or a
/// timeout is reported as an [`AuthenticatorError`] and ends the ceremony.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Create a new credential for `options.user` at `options.rp`.
    async fn create_credential(
        &self,
        options: CreationOptions,
    ) -> Result<PublicKeyCredential<AttestationResponse>, AuthenticatorError>;

    /// Sign `options.challenge` with one of `options.allow_credentials`.
    async fn get_assertion(
        &self,
        options: RequestOptions,
    ) -> Result<PublicKeyCredential<AssertionResponse>, AuthenticatorError>;
}

#[async_trait]
impl<A: Authenticator + ?Sized> Authenticator for Arc<A> {
    async fn create_credential(
        &self,
        options: CreationOptions,
    ) -> Result<PublicKeyCredential<AttestationResponse>, AuthenticatorError> {
        (**self).create_credential(options).await
    }

    async fn get_assertion(
        &self,
        options: RequestOptions,
    ) -> Result<PublicKeyCredential<AssertionResponse>, AuthenticatorError> {
        (**self).get_assertion(options).await
    }
}
