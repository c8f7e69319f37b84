use crate::{
    authenticator::Authenticator,
    ceremony::{Ceremony, CeremonyState, Login, Registration},
    config::ClientConfig,
    error::{CeremonyError, CeremonyResult, TransportError},
    network::NetworkManager,
    transport::{HttpTransport, ReqwestTransport},
};
use reqwest::header::HeaderMap;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Runs registration and login ceremonies against one relying party.
///
/// Each call is independent: it fetches a fresh challenge and session token,
/// and never retries. Several ceremonies may run at once on the same client
/// as long as each gets its own `HeaderMap`.
pub struct WebauthnClient<T, A> {
    config: ClientConfig,
    network: NetworkManager<T>,
    authenticator: A,
}

impl<A: Authenticator> WebauthnClient<ReqwestTransport, A> {
    /// Client talking HTTP through `reqwest`.
    pub fn from_config(config: ClientConfig, authenticator: A) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::new(config, transport, authenticator))
    }
}

impl<T: HttpTransport, A: Authenticator> WebauthnClient<T, A> {
    pub fn new(config: ClientConfig, transport: T, authenticator: A) -> Self {
        Self {
            config,
            network: NetworkManager::new(transport),
            authenticator,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Enrol a new credential.
    ///
    /// Once the challenge is fetched, the session token and
    /// `Content-Type: application/json` are written into `headers`, so the
    /// caller can reuse them for follow-up requests. This happens even if a
    /// later step fails.
    pub async fn register(&self, headers: &mut HeaderMap) -> CeremonyResult<()> {
        self.run(&Registration, headers, &CancellationToken::new())
            .await
    }

    /// Prove possession of an existing credential. `headers` are updated as
    /// in [`register`](Self::register).
    pub async fn login(&self, headers: &mut HeaderMap) -> CeremonyResult<()> {
        self.run(&Login, headers, &CancellationToken::new()).await
    }

    /// [`register`](Self::register) that gives up with
    /// [`CeremonyError::Cancelled`] as soon as `cancel` fires.
    pub async fn register_cancellable(
        &self,
        headers: &mut HeaderMap,
        cancel: &CancellationToken,
    ) -> CeremonyResult<()> {
        self.run(&Registration, headers, cancel).await
    }

    /// [`login`](Self::login) that gives up with
    /// [`CeremonyError::Cancelled`] as soon as `cancel` fires.
    pub async fn login_cancellable(
        &self,
        headers: &mut HeaderMap,
        cancel: &CancellationToken,
    ) -> CeremonyResult<()> {
        self.run(&Login, headers, cancel).await
    }

    async fn run<C: Ceremony>(
        &self,
        ceremony: &C,
        headers: &mut HeaderMap,
        cancel: &CancellationToken,
    ) -> CeremonyResult<()> {
        let name = ceremony.name();
        let mut state = CeremonyState::Init;
        tracing::info!(ceremony = name, "starting ceremony");

        match self.drive(ceremony, headers, cancel, &mut state).await {
            Ok(()) => {
                state.advance(name, CeremonyState::Done);
                tracing::info!(ceremony = name, "ceremony completed");
                Ok(())
            }
            Err(error) => {
                tracing::warn!(ceremony = name, %state, %error, "ceremony failed");
                state.advance(name, CeremonyState::Failed);
                Err(error)
            }
        }
    }

    async fn drive<C: Ceremony>(
        &self,
        ceremony: &C,
        headers: &mut HeaderMap,
        cancel: &CancellationToken,
        state: &mut CeremonyState,
    ) -> CeremonyResult<()> {
        let name = ceremony.name();
        let url = ceremony.endpoint(&self.config);

        let (session, challenge) = until_cancelled(
            cancel,
            self.network.fetch_challenge::<C::Challenge>(url, headers),
        )
        .await??;
        session.apply_to(headers);
        state.advance(name, CeremonyState::ChallengeFetched);

        let options = ceremony.decode(challenge)?;
        let credential =
            until_cancelled(cancel, ceremony.invoke(&self.authenticator, options)).await??;
        state.advance(name, CeremonyState::AuthenticatorInvoked);

        let payload = ceremony.encode(&credential);
        state.advance(name, CeremonyState::Submitted);
        until_cancelled(
            cancel,
            self.network.submit_result(url, &session, headers, &payload),
        )
        .await?
    }
}

/// Await `step` unless `cancel` fires first. An already cancelled token wins.
async fn until_cancelled<F: Future>(
    cancel: &CancellationToken,
    step: F,
) -> CeremonyResult<F::Output> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(CeremonyError::Cancelled),
        output = step => Ok(output),
    }
}
