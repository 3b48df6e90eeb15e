use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use tracing::{event, Level};

use crate::auth::{ErrorResponse, FlowError, TokenEndpointResponse, TokenRequest};
use crate::core::models::{ProviderConfig, UserProfile};
use crate::core::types::{AccessToken, AuthCode, GrantType};

const MAX_DETAIL_CHARS: usize = 256;

/// The two server-to-server calls of the authorization-code grant.
///
/// Neither call is retried: a code is single-use, and a retry after a
/// transient failure can only be answered with "already redeemed".
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn exchange_code(
        &self,
        config: &ProviderConfig,
        code: &AuthCode,
    ) -> Result<AccessToken, FlowError>;

    async fn fetch_profile(
        &self,
        config: &ProviderConfig,
        token: &AccessToken,
    ) -> Result<UserProfile, FlowError>;
}

#[derive(Debug, Clone)]
pub struct HttpIdentityProvider {
    client: reqwest::Client,
}

impl HttpIdentityProvider {
    /// `timeout` bounds each outbound call, connection setup included.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn describe(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {}", e)
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    }
}

fn detail(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(e) => e.to_string(),
        Err(_) => body.trim().chars().take(MAX_DETAIL_CHARS).collect(),
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    #[tracing::instrument(skip_all, fields(endpoint = %config.token_endpoint))]
    async fn exchange_code(
        &self,
        config: &ProviderConfig,
        code: &AuthCode,
    ) -> Result<AccessToken, FlowError> {
        let form = TokenRequest {
            grant_type: GrantType::AuthorizationCode,
            code,
            redirect_uri: &config.redirect_uri,
            client_id: &config.client_id,
            client_secret: &config.client_secret,
        };

        let response = self
            .client
            .post(config.token_endpoint.clone())
            .header(ACCEPT, "application/json")
            .form(&form)
            .send()
            .await
            .map_err(|e| FlowError::TokenExchangeFailed(describe(&e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FlowError::TokenExchangeFailed(describe(&e)))?;

        if !status.is_success() {
            return Err(FlowError::TokenExchangeFailed(format!(
                "token endpoint returned {}: {}",
                status,
                detail(&body)
            )));
        }

        match serde_json::from_str::<TokenEndpointResponse>(&body) {
            Ok(TokenEndpointResponse::Token(t)) if t.is_bearer() => {
                event!(Level::DEBUG, expires_in = ?t.expires_in, "Received access token");
                Ok(t.access_token)
            }
            Ok(TokenEndpointResponse::Token(t)) => Err(FlowError::TokenExchangeFailed(format!(
                "unsupported token type {:?}",
                t.token_type
            ))),
            Ok(TokenEndpointResponse::Error(e)) => Err(FlowError::TokenExchangeFailed(format!(
                "token endpoint returned error: {}",
                e
            ))),
            Err(e) => Err(FlowError::TokenExchangeFailed(format!(
                "malformed token response: {}",
                e
            ))),
        }
    }

    #[tracing::instrument(skip_all, fields(endpoint = %config.profile_endpoint))]
    async fn fetch_profile(
        &self,
        config: &ProviderConfig,
        token: &AccessToken,
    ) -> Result<UserProfile, FlowError> {
        let response = self
            .client
            .get(config.profile_endpoint.clone())
            .header(ACCEPT, "application/json")
            .bearer_auth(token.as_ref())
            .send()
            .await
            .map_err(|e| FlowError::ProfileFetchFailed(describe(&e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FlowError::ProfileFetchFailed(describe(&e)))?;

        if !status.is_success() {
            return Err(FlowError::ProfileFetchFailed(format!(
                "profile endpoint returned {}: {}",
                status,
                detail(&body)
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| FlowError::ProfileFetchFailed(format!("malformed profile: {}", e)))
    }
}
