use std::sync::Arc;

use tracing::{event, Level};
use warp::reply::Reply;
use warp::Filter;

use crate::auth::{AttemptStore, CallbackParams};
use crate::core::types::AttemptId;
use crate::flow::{IdentityProvider, OAuthLoginFlow};
use crate::http::encoding::{self, reply, CookieSettings};
use crate::http::response::{LandingPage, Redirect};

pub fn login_endpoint<P, S>(
    flow: Arc<OAuthLoginFlow<P, S>>,
    cookies: CookieSettings,
) -> impl warp::Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
where
    P: IdentityProvider + 'static,
    S: AttemptStore + Send + Sync + 'static,
{
    let with_flow = warp::any().map(move || flow.clone());

    let login = warp::path!("login")
        .and(warp::get())
        .and(with_flow.clone())
        .and_then(move |flow: Arc<OAuthLoginFlow<P, S>>| async move {
            let result = flow.begin_login().map(|attempt| {
                Redirect::to(attempt.url.to_string()).with_cookie(cookies.set_attempt(&attempt.id))
            });
            reply::reply(result)
        });

    // Whatever the outcome the attempt is over, so its cookie goes too.
    let callback = warp::path!("auth" / "callback")
        .and(warp::get())
        .and(with_flow)
        .and(encoding::attempt_id())
        .and(encoding::callback_params())
        .then(
            move |flow: Arc<OAuthLoginFlow<P, S>>,
                  attempt: Option<AttemptId>,
                  params: CallbackParams| async move {
                match flow.complete_login(attempt.as_ref(), &params).await {
                    Ok(profile) => LandingPage::logged_in(profile)
                        .with_cookie(cookies.clear_attempt())
                        .into_response(),
                    Err(e) => {
                        event!(Level::INFO, kind = %e.kind(), "Login failed, redirecting home");
                        Redirect::to("/")
                            .with_cookie(cookies.clear_attempt())
                            .into_response()
                    }
                }
            },
        );

    login.or(callback)
}
