use std::time::Duration;

use tracing::{event, Level};

use crate::auth::{
    AttemptStore, AuthorizationRequest, BeginLoginError, CallbackParams, FlowError, LoginAttempt,
    StoreError,
};
use crate::core::models::{PendingLogin, ProviderConfig, UserProfile};
use crate::core::types::{AntiForgeryState, AttemptId, AuthCode, ResponseType};
use crate::util::random::FromRandom;

pub mod client;

pub use client::{HttpIdentityProvider, IdentityProvider};

/// Drives the authorization-code grant for one provider.
///
/// The configuration is shared read-only by every request; everything that
/// belongs to a single login attempt lives in the attempt store under that
/// attempt's id.
#[derive(Debug)]
pub struct OAuthLoginFlow<P, S> {
    config: ProviderConfig,
    provider: P,
    store: S,
}

impl<P: IdentityProvider, S: AttemptStore> OAuthLoginFlow<P, S> {
    pub fn new(config: ProviderConfig, provider: P, store: S) -> Self {
        Self {
            config,
            provider,
            store,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Starts a login attempt with a fresh state and records it.
    #[tracing::instrument(skip_all)]
    pub fn begin_login(&self) -> Result<LoginAttempt, BeginLoginError> {
        let pending = PendingLogin::new(AttemptId::from_random(), AntiForgeryState::from_random());

        let url = AuthorizationRequest {
            client_id: &self.config.client_id,
            redirect_uri: &self.config.redirect_uri,
            response_type: ResponseType::Code,
            scope: &self.config.scope,
            state: &pending.state,
        }
        .to_url(&self.config.auth_endpoint)?;

        let attempt = LoginAttempt {
            id: pending.id.clone(),
            state: pending.state.clone(),
            url,
        };
        self.store.put_attempt(pending)?;

        event!(Level::DEBUG, attempt_id = %attempt.id, "Issued authorization request");
        Ok(attempt)
    }

    /// Validates a callback against the state issued for its attempt, then
    /// trades the code for a token and the token for a profile.
    ///
    /// The state is checked before anything else; nothing is sent to the
    /// provider for a callback that fails it.
    #[tracing::instrument(skip_all)]
    pub async fn handle_callback(
        &self,
        issued: &AntiForgeryState,
        params: &CallbackParams,
    ) -> Result<UserProfile, FlowError> {
        if !issued.matches(params.state.as_deref()) {
            event!(
                Level::WARN,
                received = ?params.state,
                "Callback state does not match issued state, rejecting"
            );
            return Err(FlowError::InvalidState);
        }

        if let Some(reason) = params.provider_error() {
            event!(Level::INFO, %reason, "Provider denied authorization");
            return Err(FlowError::ProviderDenied(reason));
        }

        let code = params
            .code
            .as_deref()
            .filter(|c| !c.is_empty())
            .map(|c| AuthCode(c.to_string()))
            .ok_or_else(|| {
                FlowError::TokenExchangeFailed("callback carried no authorization code".to_string())
            })?;

        let token = self
            .provider
            .exchange_code(&self.config, &code)
            .await
            .map_err(log_failure)?;

        let profile = self
            .provider
            .fetch_profile(&self.config, &token)
            .await
            .map_err(log_failure)?;

        event!(Level::INFO, subject = %profile.subject, "Login authenticated");
        Ok(profile)
    }

    /// Finishes the attempt identified by `attempt`. The attempt record is
    /// consumed whatever the outcome, so each state validates one callback.
    #[tracing::instrument(skip_all, fields(attempt_id = ?attempt))]
    pub async fn complete_login(
        &self,
        attempt: Option<&AttemptId>,
        params: &CallbackParams,
    ) -> Result<UserProfile, FlowError> {
        let id = match attempt {
            Some(id) => id,
            None => {
                event!(Level::WARN, "Callback without a login attempt, rejecting");
                return Err(FlowError::InvalidState);
            }
        };

        let pending = match self.store.take_attempt(id) {
            Ok(Some(pending)) => pending,
            Ok(None) => {
                event!(Level::WARN, "No pending login for callback, rejecting");
                return Err(FlowError::InvalidState);
            }
            Err(e) => {
                event!(Level::ERROR, error = %e, "Could not load pending login");
                return Err(FlowError::InvalidState);
            }
        };

        self.handle_callback(&pending.state, params).await
    }

    /// Periodically drops attempts whose callback never arrived.
    pub async fn run_clean_up_worker(&self, period: Duration) -> Result<(), StoreError> {
        let mut interval = tokio::time::interval(period);

        loop {
            interval.tick().await;
            let removed = self.store.clean_up()?;
            if removed > 0 {
                event!(Level::DEBUG, removed, "Dropped expired login attempts");
            }
        }
    }
}

fn log_failure(e: FlowError) -> FlowError {
    event!(Level::WARN, kind = %e.kind(), cause = %e, "Login attempt failed");
    e
}
