use url::Url;

use crate::core::types::{AntiForgeryState, AttemptId, ClientId, RedirectUri, ResponseType, Scope};

/// Query parameters sent to the provider's authorization endpoint.
#[derive(Debug, Clone)]
#[derive(serde::Serialize)]
pub struct AuthorizationRequest<'r> {
    pub client_id: &'r ClientId,
    pub redirect_uri: &'r RedirectUri,
    pub response_type: ResponseType,
    pub scope: &'r Scope,
    pub state: &'r AntiForgeryState,
}

impl AuthorizationRequest<'_> {
    /// Appends this request to `endpoint`, keeping any query the endpoint
    /// already carries.
    pub fn to_url(&self, endpoint: &Url) -> Result<Url, serde_urlencoded::ser::Error> {
        let mut url = endpoint.clone();
        let new_qs = serde_urlencoded::to_string(self)?;
        let pairs = form_urlencoded::parse(new_qs.as_bytes());
        url.query_pairs_mut().extend_pairs(pairs);
        Ok(url)
    }
}

/// Result of starting a login: where to send the browser and how to find
/// the attempt again when the callback arrives.
#[derive(Debug, Clone)]
pub struct LoginAttempt {
    pub id: AttemptId,
    pub state: AntiForgeryState,
    pub url: Url,
}

/// Query parameters of the provider's redirect back to us.
#[derive(Debug, Clone, Default)]
#[derive(serde::Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl CallbackParams {
    /// The provider's error indicator, if it sent one instead of a code.
    pub fn provider_error(&self) -> Option<String> {
        let error = self.error.as_deref().filter(|e| !e.is_empty())?;
        Some(match self.error_description.as_deref() {
            Some(d) if !d.is_empty() => format!("{}: {}", error, d),
            _ => error.to_string(),
        })
    }
}
