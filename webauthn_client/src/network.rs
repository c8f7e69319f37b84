use crate::{
    error::{CeremonyError, CeremonyResult, ProtocolError},
    session::{self, CeremonySession},
    transport::HttpTransport,
};
use reqwest::{header::HeaderMap, Method, Url};
use serde::{de::DeserializeOwned, Serialize};

/// Runs the two HTTP round-trips of a ceremony.
pub struct NetworkManager<T> {
    transport: T,
}

impl<T: HttpTransport> NetworkManager<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Round-trip 1: request a challenge document and the session token that
    /// binds it to the submission.
    pub async fn fetch_challenge<D: DeserializeOwned>(
        &self,
        url: &Url,
        headers: &HeaderMap,
    ) -> CeremonyResult<(CeremonySession, D)> {
        tracing::debug!(%url, "requesting challenge");
        let response = self
            .transport
            .get(url, session::challenge_headers(headers))
            .await?;

        if !response.status.is_success() {
            return Err(CeremonyError::Rejected {
                method: Method::GET,
                status: response.status,
            });
        }

        let document =
            serde_json::from_slice(&response.body).map_err(ProtocolError::MalformedChallenge)?;
        let session = CeremonySession::from_response(&response.headers)?;
        Ok((session, document))
    }

    /// Round-trip 2: send the encoded authenticator result, tagged with the
    /// session of round-trip 1. Only the status of the answer is looked at.
    pub async fn submit_result<P: Serialize>(
        &self,
        url: &Url,
        session: &CeremonySession,
        headers: &HeaderMap,
        payload: &P,
    ) -> CeremonyResult<()> {
        let body = serde_json::to_vec(payload).map_err(ProtocolError::Payload)?;

        tracing::debug!(%url, bytes = body.len(), "submitting authenticator result");
        let response = self
            .transport
            .post(url, session.request_headers(headers), body)
            .await?;

        if response.status.is_success() {
            Ok(())
        } else {
            Err(CeremonyError::Rejected {
                method: Method::POST,
                status: response.status,
            })
        }
    }
}
