use crate::core::types::{AccessToken, AuthCode, ClientId, ClientSecret, GrantType, RedirectUri};

use super::error::ErrorResponse;

/// Form body POSTed to the token endpoint.
#[derive(Debug)]
#[derive(serde::Serialize)]
pub struct TokenRequest<'r> {
    pub grant_type: GrantType,
    pub code: &'r AuthCode,
    pub redirect_uri: &'r RedirectUri,
    pub client_id: &'r ClientId,
    pub client_secret: &'r ClientSecret,
}

#[derive(Debug)]
#[derive(serde::Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: AccessToken,
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl AccessTokenResponse {
    pub fn is_bearer(&self) -> bool {
        self.token_type.eq_ignore_ascii_case("bearer")
    }
}

/// Some providers answer 200 with an error document, so a token endpoint
/// body is decoded as either.
#[derive(Debug)]
#[derive(serde::Deserialize)]
#[serde(untagged)]
pub enum TokenEndpointResponse {
    Error(ErrorResponse),
    Token(AccessTokenResponse),
}
