use url::Url;

use super::types::*;

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
pub const GOOGLE_PROFILE_SCOPE: &str = "https://www.googleapis.com/auth/userinfo.profile";

/// Everything the flow needs to know about the identity provider.
/// Built once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
    /// Must match the URI registered with the provider byte-for-byte.
    pub redirect_uri: RedirectUri,
    pub scope: Scope,
    pub auth_endpoint: Url,
    pub token_endpoint: Url,
    pub profile_endpoint: Url,
}

/// The identity returned by the provider's profile endpoint.
///
/// Google's userinfo endpoint names the subject `id`, OpenID Connect
/// userinfo names it `sub`; both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UserProfile {
    #[serde(alias = "sub", alias = "id")]
    pub subject: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
}

impl UserProfile {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.given_name.as_deref())
            .unwrap_or(&self.subject)
    }
}

/// Server-side record of a login attempt awaiting its callback.
#[derive(Debug, Clone)]
pub struct PendingLogin {
    pub id: AttemptId,
    pub state: AntiForgeryState,
    pub expires: Expiry,
}

impl Expire for PendingLogin {
    const EXPIRES_IN_SECS: u64 = 5 * 60;
}

impl PendingLogin {
    pub fn new(id: AttemptId, state: AntiForgeryState) -> Self {
        Self {
            id,
            state,
            expires: Self::expiry(),
        }
    }
}
