pub mod error;
pub mod reply;

use std::convert::Infallible;

use warp::Filter;

use crate::auth::CallbackParams;
use crate::core::models::PendingLogin;
use crate::core::types::{AttemptId, Expire};

/// Carries the id of the browser's pending login attempt between `/login`
/// and `/auth/callback`.
pub const ATTEMPT_COOKIE: &str = "oauth_attempt";
const ATTEMPT_COOKIE_PATH: &str = "/auth";

#[derive(Debug, Clone, Copy, Default)]
pub struct CookieSettings {
    /// Adds the `Secure` attribute; set when served over HTTPS.
    pub secure: bool,
}

impl CookieSettings {
    pub fn set_attempt(&self, id: &AttemptId) -> String {
        self.attempt_cookie(&id.0, PendingLogin::EXPIRES_IN_SECS)
    }

    pub fn clear_attempt(&self) -> String {
        self.attempt_cookie("", 0)
    }

    fn attempt_cookie(&self, value: &str, max_age: u64) -> String {
        let mut cookie = format!(
            "{}={}; Path={}; Max-Age={}; HttpOnly; SameSite=Lax",
            ATTEMPT_COOKIE, value, ATTEMPT_COOKIE_PATH, max_age
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

pub fn attempt_id() -> impl Filter<Extract = (Option<AttemptId>,), Error = Infallible> + Clone {
    warp::cookie::optional::<String>(ATTEMPT_COOKIE)
        .map(|c: Option<String>| c.filter(|v| !v.is_empty()).map(AttemptId))
}

/// Callback query parameters. A missing or undecodable query yields empty
/// parameters, which fail state validation.
pub fn callback_params() -> impl Filter<Extract = (CallbackParams,), Error = Infallible> + Clone {
    warp::query::raw()
        .or(warp::any().map(String::new))
        .unify()
        .map(|qs: String| serde_urlencoded::from_str(&qs).unwrap_or_default())
}
