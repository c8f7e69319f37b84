//! Shared doubles for the ceremony integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use reqwest::{header::HeaderMap, StatusCode, Url};
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};
use webauthn_client::{
    types::PUBLIC_KEY, AssertionResponse, AttestationResponse, Authenticator, AuthenticatorError,
    CreationOptions, HttpResponse, HttpTransport, PublicKeyCredential, RequestOptions, SubmitResponse,
    TransportError, SESSION_HEADER,
};

pub const CREDENTIAL_ID: [u8; 4] = [0xde, 0xad, 0xbe, 0xef];

/// Registration challenge in the shape the relying party sends it.
pub fn registration_challenge() -> Value {
    json!({
        "publicKey": {
            "challenge": "AAE",
            "rp": { "name": "twofer", "id": "localhost" },
            "user": { "id": "Ag", "name": "alice", "displayName": "alice" },
            "pubKeyCredParams": [{ "type": "public-key", "alg": -7 }],
            "timeout": 60000,
            "authenticatorSelection": { "requireResidentKey": false, "userVerification": "preferred" }
        }
    })
}

/// Login challenge with two allowed credentials.
pub fn login_challenge() -> Value {
    json!({
        "challenge": "AAE",
        "timeout": 60000,
        "rpId": "localhost",
        "allowCredentials": [
            { "type": "public-key", "id": "3q2-7w" },
            { "type": "public-key", "id": "AQID" }
        ],
        "userVerification": "preferred"
    })
}

/// Authenticator that answers every request and remembers what it was asked.
#[derive(Default)]
pub struct RecordingAuthenticator {
    pub created: Mutex<Vec<CreationOptions>>,
    pub asserted: Mutex<Vec<RequestOptions>>,
    pub fail_with: Option<AuthenticatorError>,
}

impl RecordingAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: AuthenticatorError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.created.lock().unwrap().len() + self.asserted.lock().unwrap().len()
    }
}

#[async_trait]
impl Authenticator for RecordingAuthenticator {
    async fn create_credential(
        &self,
        options: CreationOptions,
    ) -> Result<PublicKeyCredential<AttestationResponse>, AuthenticatorError> {
        self.created.lock().unwrap().push(options);
        if let Some(error) = &self.fail_with {
            return Err(error.clone());
        }
        Ok(PublicKeyCredential {
            id: webauthn_client::codec::encode(CREDENTIAL_ID),
            raw_id: CREDENTIAL_ID.to_vec(),
            kind: PUBLIC_KEY.to_string(),
            response: AttestationResponse {
                attestation_object: vec![0xa3, 0x63, 0x66, 0x6d, 0x74],
                client_data_json: br#"{"type":"webauthn.create"}"#.to_vec(),
            },
        })
    }

    async fn get_assertion(
        &self,
        options: RequestOptions,
    ) -> Result<PublicKeyCredential<AssertionResponse>, AuthenticatorError> {
        self.asserted.lock().unwrap().push(options);
        if let Some(error) = &self.fail_with {
            return Err(error.clone());
        }
        Ok(PublicKeyCredential {
            id: webauthn_client::codec::encode(CREDENTIAL_ID),
            raw_id: CREDENTIAL_ID.to_vec(),
            kind: PUBLIC_KEY.to_string(),
            response: AssertionResponse {
                authenticator_data: vec![0x49; 37],
                client_data_json: br#"{"type":"webauthn.get"}"#.to_vec(),
                signature: vec![0x30, 0x45, 0x02],
                user_handle: Some(vec![2]),
            },
        })
    }
}

/// Authenticator whose prompt never returns.
pub struct StuckAuthenticator;

#[async_trait]
impl Authenticator for StuckAuthenticator {
    async fn create_credential(
        &self,
        _options: CreationOptions,
    ) -> Result<PublicKeyCredential<AttestationResponse>, AuthenticatorError> {
        std::future::pending().await
    }

    async fn get_assertion(
        &self,
        _options: RequestOptions,
    ) -> Result<PublicKeyCredential<AssertionResponse>, AuthenticatorError> {
        std::future::pending().await
    }
}

/// Transport that serves a fixed challenge and cannot deliver the POST.
pub struct UnreachableOnPost {
    challenge: Value,
    token: &'static str,
    pub posts: AtomicUsize,
    pub post_headers: Mutex<Option<HeaderMap>>,
}

impl UnreachableOnPost {
    pub fn new(challenge: Value, token: &'static str) -> Self {
        Self {
            challenge,
            token,
            posts: AtomicUsize::new(0),
            post_headers: Mutex::new(None),
        }
    }
}

#[async_trait]
impl HttpTransport for UnreachableOnPost {
    async fn get(&self, _url: &Url, _headers: HeaderMap) -> Result<HttpResponse, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(SESSION_HEADER, self.token.parse().unwrap());
        Ok(HttpResponse {
            status: StatusCode::OK,
            headers,
            body: serde_json::to_vec(&self.challenge).unwrap(),
        })
    }

    async fn post(
        &self,
        _url: &Url,
        headers: HeaderMap,
        _body: Vec<u8>,
    ) -> Result<SubmitResponse, TransportError> {
        self.posts.fetch_add(1, Ordering::SeqCst);
        *self.post_headers.lock().unwrap() = Some(headers);
        Err(TransportError::Connect("connection reset by peer".into()))
    }
}
