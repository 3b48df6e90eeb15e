use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use crate::auth::AttemptStore;
use crate::flow::{IdentityProvider, OAuthLoginFlow};

mod endpoints;

use endpoints::{home::home_endpoint, login::login_endpoint};

use super::encoding::{error::handle_reject, CookieSettings};

#[derive(Debug)]
pub struct Server<P, S> {
    flow: Arc<OAuthLoginFlow<P, S>>,
    cookies: CookieSettings,
}

impl<P, S> Server<P, S>
where
    P: IdentityProvider + 'static,
    S: AttemptStore + Send + Sync + 'static,
{
    pub fn new(flow: Arc<OAuthLoginFlow<P, S>>, cookies: CookieSettings) -> Self {
        Self { flow, cookies }
    }

    pub fn routes(
        &self,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
        let home = home_endpoint();
        let login = login_endpoint(self.flow.clone(), self.cookies);

        home.or(login)
            .recover(handle_reject)
            .with(warp::log("oauth_login::http"))
    }

    pub async fn serve(self, addr: impl Into<SocketAddr>) {
        warp::serve(self.routes()).run(addr).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::FlowError;
    use crate::core::models::{ProviderConfig, UserProfile};
    use crate::core::types::{AccessToken, AuthCode, ClientId, ClientSecret, RedirectUri, Scope};
    use crate::http::encoding::ATTEMPT_COOKIE;
    use crate::store::MemoryStore;

    use async_trait::async_trait;
    use url::Url;
    use warp::http::{header, StatusCode};

    struct FixedProvider;

    #[async_trait]
    impl IdentityProvider for FixedProvider {
        async fn exchange_code(
            &self,
            _config: &ProviderConfig,
            code: &AuthCode,
        ) -> Result<AccessToken, FlowError> {
            match code.as_ref() {
                "good" => Ok(AccessToken("t".to_string())),
                _ => Err(FlowError::TokenExchangeFailed("invalid_grant".to_string())),
            }
        }

        async fn fetch_profile(
            &self,
            _config: &ProviderConfig,
            _token: &AccessToken,
        ) -> Result<UserProfile, FlowError> {
            Ok(UserProfile {
                subject: "42".to_string(),
                name: Some("Grace".to_string()),
                given_name: None,
                family_name: None,
                picture: None,
                locale: None,
            })
        }
    }

    fn server() -> Server<FixedProvider, MemoryStore> {
        let config = ProviderConfig {
            client_id: ClientId("client-1".to_string()),
            client_secret: ClientSecret("secret".to_string()),
            redirect_uri: RedirectUri("http://localhost:8080/auth/callback".to_string()),
            scope: Scope::from_delimited_parts("profile"),
            auth_endpoint: Url::parse("https://idp.example/authorize").unwrap(),
            token_endpoint: Url::parse("https://idp.example/token").unwrap(),
            profile_endpoint: Url::parse("https://idp.example/userinfo").unwrap(),
        };
        let flow = OAuthLoginFlow::new(config, FixedProvider, MemoryStore::new());
        Server::new(Arc::new(flow), CookieSettings::default())
    }

    /// Returns (attempt cookie value, state) from a `/login` response.
    fn parse_login(response: &warp::http::Response<warp::hyper::body::Bytes>) -> (String, String) {
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        let value = cookie
            .split(';')
            .next()
            .and_then(|kv| kv.strip_prefix(&format!("{}=", ATTEMPT_COOKIE)))
            .unwrap()
            .to_string();
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        let state = Url::parse(location)
            .unwrap()
            .query_pairs()
            .find(|(k, _)| k == "state")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        (value, state)
    }

    #[tokio::test]
    async fn home_is_anonymous() {
        let response = warp::test::request()
            .path("/")
            .reply(&server().routes())
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(std::str::from_utf8(response.body())
            .unwrap()
            .contains("Please log in with Google"));
    }

    #[tokio::test]
    async fn login_redirects_to_provider_with_cookie() {
        let response = warp::test::request()
            .path("/login")
            .reply(&server().routes())
            .await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("https://idp.example/authorize?client_id=client-1"));
        let (cookie, state) = parse_login(&response);
        assert!(!cookie.is_empty());
        assert!(!state.is_empty());
        assert!(response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .contains("HttpOnly"));
    }

    #[tokio::test]
    async fn callback_success_renders_logged_in_page() {
        let server = server();
        let routes = server.routes();
        let login = warp::test::request().path("/login").reply(&routes).await;
        let (cookie, state) = parse_login(&login);

        let response = warp::test::request()
            .path(&format!("/auth/callback?state={}&code=good", state))
            .header("cookie", format!("{}={}", ATTEMPT_COOKIE, cookie))
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(std::str::from_utf8(response.body())
            .unwrap()
            .contains("logged-in as Grace"));
        assert!(response.headers()[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn callback_failures_redirect_home() {
        let server = server();
        let routes = server.routes();

        // no attempt cookie
        let response = warp::test::request()
            .path("/auth/callback?state=abc&code=good")
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/");

        // rejected code
        let login = warp::test::request().path("/login").reply(&routes).await;
        let (cookie, state) = parse_login(&login);
        let response = warp::test::request()
            .path(&format!("/auth/callback?state={}&code=stale", state))
            .header("cookie", format!("{}={}", ATTEMPT_COOKIE, cookie))
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn replayed_callback_is_rejected() {
        let server = server();
        let routes = server.routes();
        let login = warp::test::request().path("/login").reply(&routes).await;
        let (cookie, state) = parse_login(&login);
        let callback = format!("/auth/callback?state={}&code=good", state);
        let cookie = format!("{}={}", ATTEMPT_COOKIE, cookie);

        let first = warp::test::request()
            .path(&callback)
            .header("cookie", cookie.as_str())
            .reply(&routes)
            .await;
        assert_eq!(first.status(), StatusCode::OK);

        let second = warp::test::request()
            .path(&callback)
            .header("cookie", cookie.as_str())
            .reply(&routes)
            .await;
        assert_eq!(second.status(), StatusCode::TEMPORARY_REDIRECT);
    }
}
