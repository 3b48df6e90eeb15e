use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use url::Url;

use crate::core::models::{
    ProviderConfig, GOOGLE_AUTH_URL, GOOGLE_PROFILE_SCOPE, GOOGLE_TOKEN_URL, GOOGLE_USERINFO_URL,
};
use crate::core::types::{ClientId, ClientSecret, RedirectUri, Scope};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is not a valid URL: {source}")]
    BadUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("HTTP_TIMEOUT_SECS must be at least 1")]
    ZeroTimeout,
}

#[derive(Parser)]
#[clap(
    name = "oauth-logind",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = env!("CARGO_PKG_DESCRIPTION")
)]
pub struct Options {
    #[clap(long, env = "GOOGLE_CLIENT_ID")]
    pub client_id: String,
    #[clap(long, env = "GOOGLE_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: String,
    #[clap(long, env = "REDIRECT_URL", default_value = "http://localhost:8080/auth/callback")]
    pub redirect_url: String,
    #[clap(long, env = "AUTH_URL", default_value = GOOGLE_AUTH_URL)]
    pub auth_url: String,
    #[clap(long, env = "TOKEN_URL", default_value = GOOGLE_TOKEN_URL)]
    pub token_url: String,
    #[clap(long, env = "USERINFO_URL", default_value = GOOGLE_USERINFO_URL)]
    pub userinfo_url: String,
    /// Space-delimited scopes to request.
    #[clap(long, env = "SCOPES", default_value = GOOGLE_PROFILE_SCOPE)]
    pub scopes: String,
    #[clap(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,
    /// Upper bound on each call to the provider's token and profile endpoints.
    #[clap(long, env = "HTTP_TIMEOUT_SECS", default_value = "10")]
    pub http_timeout_secs: u64,
    /// Mark the login cookie `Secure`. Enable when served over HTTPS.
    #[clap(long, env = "SECURE_COOKIES")]
    pub secure_cookies: bool,
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|source| ConfigError::BadUrl { name, source })
}

fn non_empty(name: &'static str, value: &str) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::Empty(name))
    } else {
        Ok(value.to_string())
    }
}

impl Options {
    pub fn provider_config(&self) -> Result<ProviderConfig, ConfigError> {
        // validated but passed on verbatim: the provider compares it byte-for-byte
        parse_url("REDIRECT_URL", &self.redirect_url)?;

        Ok(ProviderConfig {
            client_id: ClientId(non_empty("GOOGLE_CLIENT_ID", &self.client_id)?),
            client_secret: ClientSecret(non_empty("GOOGLE_CLIENT_SECRET", &self.client_secret)?),
            redirect_uri: RedirectUri(self.redirect_url.clone()),
            scope: Scope::from_delimited_parts(&self.scopes),
            auth_endpoint: parse_url("AUTH_URL", &self.auth_url)?,
            token_endpoint: parse_url("TOKEN_URL", &self.token_url)?,
            profile_endpoint: parse_url("USERINFO_URL", &self.userinfo_url)?,
        })
    }

    /// A zero timeout would fail every provider call, so it is refused.
    pub fn http_timeout(&self) -> Result<Duration, ConfigError> {
        match self.http_timeout_secs {
            0 => Err(ConfigError::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_google() {
        let opts = Options::try_parse_from(&[
            "oauth-logind",
            "--client-id",
            "id",
            "--client-secret",
            "secret",
        ])
        .unwrap();
        let config = opts.provider_config().unwrap();

        assert_eq!(config.redirect_uri.0, "http://localhost:8080/auth/callback");
        assert_eq!(config.auth_endpoint.as_str(), GOOGLE_AUTH_URL);
        assert_eq!(config.scope.as_joined(), GOOGLE_PROFILE_SCOPE);
        assert_eq!(opts.http_timeout().unwrap(), Duration::from_secs(10));
        assert!(!opts.secure_cookies);
    }

    #[test]
    fn rejects_bad_endpoint() {
        let opts = Options::try_parse_from(&[
            "oauth-logind",
            "--client-id",
            "id",
            "--client-secret",
            "secret",
            "--token-url",
            "not a url",
        ])
        .unwrap();
        assert!(matches!(
            opts.provider_config(),
            Err(ConfigError::BadUrl { name: "TOKEN_URL", .. })
        ));
    }

    #[test]
    fn rejects_blank_client_id() {
        let opts = Options::try_parse_from(&[
            "oauth-logind",
            "--client-id",
            " ",
            "--client-secret",
            "secret",
        ])
        .unwrap();
        assert!(matches!(
            opts.provider_config(),
            Err(ConfigError::Empty("GOOGLE_CLIENT_ID"))
        ));
    }

    #[test]
    fn rejects_zero_timeout() {
        let opts = Options::try_parse_from(&[
            "oauth-logind",
            "--client-id",
            "id",
            "--client-secret",
            "secret",
            "--http-timeout-secs",
            "0",
        ])
        .unwrap();
        assert!(matches!(opts.http_timeout(), Err(ConfigError::ZeroTimeout)));
    }
}
