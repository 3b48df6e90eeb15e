use crate::core::models::UserProfile;
use warp::http::{header, StatusCode};
use warp::reply::{Reply, Response};

/// A 307 redirect, optionally setting a cookie on the way.
#[derive(Debug, Clone)]
pub struct Redirect {
    location: String,
    cookie: Option<String>,
}

impl Redirect {
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            cookie: None,
        }
    }

    pub fn with_cookie(mut self, cookie: String) -> Self {
        self.cookie = Some(cookie);
        self
    }
}

impl Reply for Redirect {
    fn into_response(self) -> Response {
        let redirect = warp::reply::with_header(
            warp::reply::with_status(warp::reply(), StatusCode::TEMPORARY_REDIRECT),
            header::LOCATION,
            self.location,
        );
        match self.cookie {
            Some(cookie) => warp::reply::with_header(redirect, header::SET_COOKIE, cookie)
                .into_response(),
            None => redirect.into_response(),
        }
    }
}

/// The landing page. Authentication is only known for the request that
/// completed the login; every other request sees the anonymous page.
#[derive(Debug, Clone, Default)]
pub struct LandingPage {
    profile: Option<UserProfile>,
    cookie: Option<String>,
}

impl LandingPage {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn logged_in(profile: UserProfile) -> Self {
        Self {
            profile: Some(profile),
            cookie: None,
        }
    }

    pub fn with_cookie(mut self, cookie: String) -> Self {
        self.cookie = Some(cookie);
        self
    }

    pub fn render(&self) -> String {
        let title = "Welcome";
        let body = match &self.profile {
            Some(profile) => {
                let name = html_escape::encode_text(profile.display_name());
                let picture = profile
                    .picture
                    .as_deref()
                    .map(|p| {
                        format!(
                            "<img src=\"{}\" alt=\"\" width=\"48\" height=\"48\">\n",
                            html_escape::encode_double_quoted_attribute(p)
                        )
                    })
                    .unwrap_or_default();
                format!("{}<p>logged-in as {}</p>", picture, name)
            }
            None => "<p>Please log in with Google</p>\n<p><a href=\"/login\">Log in</a></p>"
                .to_string(),
        };

        format!(
            "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
             <body>\n<h1>{title}</h1>\n{body}\n</body>\n</html>\n",
            title = title,
            body = body
        )
    }
}

impl Reply for LandingPage {
    fn into_response(self) -> Response {
        let html = warp::reply::html(self.render());
        match self.cookie {
            Some(cookie) => warp::reply::with_header(html, header::SET_COOKIE, cookie)
                .into_response(),
            None => html.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_sets_location_and_cookie() {
        let response = Redirect::to("/")
            .with_cookie("a=b".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/");
        assert_eq!(response.headers()[header::SET_COOKIE], "a=b");
    }

    #[test]
    fn landing_page_escapes_profile_fields() {
        let page = LandingPage::logged_in(UserProfile {
            subject: "1".to_string(),
            name: Some("<script>alert(1)</script>".to_string()),
            given_name: None,
            family_name: None,
            picture: Some("https://p/\"x".to_string()),
            locale: None,
        })
        .render();
        assert!(page.contains("logged-in as &lt;script&gt;"));
        assert!(!page.contains("<script>"));
        assert!(page.contains("https://p/&quot;x"));

        let anonymous = LandingPage::anonymous().render();
        assert!(anonymous.contains("Please log in with Google"));
        assert!(anonymous.contains("href=\"/login\""));
    }
}
