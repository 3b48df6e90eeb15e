use std::fmt;

/// Why a login attempt ended without an authenticated profile.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    /// The callback's `state` did not match the value issued for the attempt.
    #[error("invalid oauth state")]
    InvalidState,
    #[error("provider denied the request: {0}")]
    ProviderDenied(String),
    #[error("token exchange failed: {0}")]
    TokenExchangeFailed(String),
    #[error("profile fetch failed: {0}")]
    ProfileFetchFailed(String),
}

impl FlowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidState => ErrorKind::InvalidState,
            Self::ProviderDenied(_) => ErrorKind::ProviderDenied,
            Self::TokenExchangeFailed(_) => ErrorKind::TokenExchangeFailed,
            Self::ProfileFetchFailed(_) => ErrorKind::ProfileFetchFailed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidState,
    ProviderDenied,
    TokenExchangeFailed,
    ProfileFetchFailed,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InvalidState => "invalid_state",
            Self::ProviderDenied => "provider_denied",
            Self::TokenExchangeFailed => "token_exchange_failed",
            Self::ProfileFetchFailed => "profile_fetch_failed",
        };
        f.write_str(s)
    }
}

/// RFC 6749 §5.2 error body, as returned by token endpoints and carried on
/// error redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "error")]
    pub kind: String,
    #[serde(rename = "error_description")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "error_uri")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(d) => write!(f, "{}: {}", self.kind, d),
            None => f.write_str(&self.kind),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("attempt store unavailable: {0}")]
    Unavailable(String),
}

/// Failure to start a login attempt. These are server faults, not
/// properties of the browser's request.
#[derive(Debug, thiserror::Error)]
pub enum BeginLoginError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("could not encode authorization request: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_display_includes_description() {
        let e: ErrorResponse = serde_json::from_str(
            r#"{"error":"invalid_grant","error_description":"Bad Request"}"#,
        )
        .unwrap();
        assert_eq!(e.to_string(), "invalid_grant: Bad Request");

        let bare: ErrorResponse = serde_json::from_str(r#"{"error":"access_denied"}"#).unwrap();
        assert_eq!(bare.to_string(), "access_denied");
    }

    #[test]
    fn flow_error_carries_cause() {
        let e = FlowError::TokenExchangeFailed("invalid_grant".to_string());
        assert_eq!(e.kind(), ErrorKind::TokenExchangeFailed);
        assert_eq!(e.to_string(), "token exchange failed: invalid_grant");
        assert_eq!(FlowError::InvalidState.kind().to_string(), "invalid_state");
    }
}
