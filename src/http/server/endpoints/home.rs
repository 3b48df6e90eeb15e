use warp::Filter;

use crate::http::response::LandingPage;

pub fn home_endpoint(
) -> impl warp::Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path::end()
        .and(warp::get())
        .map(LandingPage::anonymous)
}
