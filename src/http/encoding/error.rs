use crate::auth::BeginLoginError;
use tracing::{event, Level};
use warp::{Rejection, Reply};

#[derive(Debug)]
pub enum LoginRejection {
    /// A login attempt could not be started.
    Begin(BeginLoginError),
}

impl warp::reject::Reject for LoginRejection {}

impl From<BeginLoginError> for LoginRejection {
    fn from(error: BeginLoginError) -> Self {
        Self::Begin(error)
    }
}

pub async fn handle_reject(err: Rejection) -> Result<impl Reply, Rejection> {
    match err.find::<LoginRejection>() {
        Some(LoginRejection::Begin(e)) => {
            event!(Level::ERROR, error = %e, "Could not start login");
            Ok(warp::reply::with_status(
                "login is temporarily unavailable",
                warp::http::StatusCode::INTERNAL_SERVER_ERROR,
            )
            .into_response())
        }
        None => Err(err),
    }
}
