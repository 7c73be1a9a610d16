//! Authenticated HTTP client for the activity site.
//!
//! This module provides the [`SiteClient`] struct for performing the login
//! handshake and fetching per-team activity feeds over one shared,
//! cookie-carrying session.

use log::{debug, info};
use mockall::automock;
use reqwest::Client;

use crate::error::WatchError;

/// Login credentials for the activity site.
///
/// Always loaded from configuration, never embedded as literals.
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Trait for making requests to the activity site.
///
/// This trait abstracts the HTTP operations for easier testing with mocks.
/// The implementation owns the session: all requests issued after a
/// successful [`Requester::login`] carry the authenticated cookies, and the
/// underlying client is safe for concurrent use by multiple in-flight
/// fetches.
#[automock]
pub trait Requester {
    /// Performs the login handshake and returns the authenticated landing
    /// page body.
    async fn login(&self, credentials: &Credentials) -> Result<String, WatchError>;
    /// Fetches one team's activity feed document.
    async fn fetch_feed(&self, feed_url: &str) -> Result<String, WatchError>;
    /// Builds the activity feed URL for a team name.
    fn feed_url(&self, team_name: &str) -> String;
}

/// HTTP client holding the authenticated session.
///
/// Session state lives in the client's cookie store: it is written once
/// during [`Requester::login`] and only read afterwards, so the client can be
/// shared across concurrent fetch tasks.
pub struct SiteClient {
    /// Site base URL, without trailing slash, e.g. `https://amara.org/en`.
    base_url: String,
    /// HTTP client with cookie store enabled.
    client: Client,
}

impl SiteClient {
    /// Create a new [SiteClient].
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the activity site, without trailing slash.
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(SiteClient {
            base_url: base_url.to_string(),
            client,
        })
    }

    fn login_url(&self) -> String {
        format!("{}/auth/login/?next=/", self.base_url)
    }
}

impl Requester for SiteClient {
    /// Performs the two-step login handshake.
    ///
    /// 1. GET the login page; the site answers with an anti-forgery token in
    ///    the `csrftoken` cookie.
    /// 2. POST the credentials plus that token to the login endpoint, with
    ///    the login page as referer.
    ///
    /// Returns the response body, which on success is the authenticated
    /// landing page carrying the team navigation menu.
    ///
    /// # Errors
    ///
    /// [`WatchError::Auth`] when either request fails or the login page does
    /// not set the anti-forgery cookie. A wrong password is not detectable
    /// here: the site still answers 200, but the landing page lacks the team
    /// navigation, which the caller treats as an authentication failure.
    async fn login(&self, credentials: &Credentials) -> Result<String, WatchError> {
        let login_url = self.login_url();
        info!("requesting anti-forgery token");
        debug!("request {}", &login_url);

        let response = self
            .client
            .get(&login_url)
            .send()
            .await
            .map_err(|e| WatchError::Auth {
                reason: format!("login page request failed: {e}"),
            })?;

        let csrf = response
            .cookies()
            .find(|cookie| cookie.name() == "csrftoken")
            .map(|cookie| cookie.value().to_owned())
            .ok_or_else(|| WatchError::Auth {
                reason: "login page did not set a csrftoken cookie".to_owned(),
            })?;

        let post_url = format!("{}/auth/login_post/", self.base_url);
        info!("logging in as {}", &credentials.username);
        debug!("request {}", &post_url);

        let response = self
            .client
            .post(&post_url)
            .form(&[
                ("csrfmiddlewaretoken", csrf.as_str()),
                ("username", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .header("referer", &login_url)
            .send()
            .await
            .map_err(|e| WatchError::Auth {
                reason: format!("login request failed: {e}"),
            })?;

        let body = response.text().await.map_err(|e| WatchError::Auth {
            reason: format!("reading login response failed: {e}"),
        })?;

        Ok(body)
    }

    /// Issues an authenticated GET for one feed and returns the raw body.
    async fn fetch_feed(&self, feed_url: &str) -> Result<String, WatchError> {
        debug!("request {}", feed_url);

        let body = self
            .client
            .get(feed_url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| WatchError::Fetch {
                url: feed_url.to_owned(),
                source,
            })?
            .text()
            .await
            .map_err(|source| WatchError::Fetch {
                url: feed_url.to_owned(),
                source,
            })?;

        debug!("response from {} -> {} bytes", feed_url, body.len());

        Ok(body)
    }

    fn feed_url(&self, team_name: &str) -> String {
        format!("{}/teams/{}/activity/", self.base_url, team_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials {
            username: "watcher".to_string(),
            password: "hunter2".to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_posts_csrf_token_and_credentials() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        server
            .mock("GET", "/auth/login/")
            .match_query(mockito::Matcher::UrlEncoded("next".into(), "/".into()))
            .with_status(200)
            .with_header("set-cookie", "csrftoken=tok123; Path=/")
            .create_async()
            .await;

        let login_post = server
            .mock("POST", "/auth/login_post/")
            .match_header(
                "referer",
                format!("{}/auth/login/?next=/", url).as_str(),
            )
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("csrfmiddlewaretoken".into(), "tok123".into()),
                mockito::Matcher::UrlEncoded("username".into(), "watcher".into()),
                mockito::Matcher::UrlEncoded("password".into(), "hunter2".into()),
            ]))
            .with_status(200)
            .with_body("<html><div id=\"user-menu\"></div></html>")
            .create_async()
            .await;

        let client = SiteClient::new(&url).unwrap();
        let landing = client.login(&credentials()).await.unwrap();

        login_post.assert_async().await;
        assert!(landing.contains("user-menu"));
    }

    #[tokio::test]
    async fn test_login_fails_without_csrf_cookie() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        server
            .mock("GET", "/auth/login/")
            .match_query(mockito::Matcher::UrlEncoded("next".into(), "/".into()))
            .with_status(200)
            .create_async()
            .await;

        let client = SiteClient::new(&url).unwrap();
        let error = client.login(&credentials()).await.unwrap_err();

        assert!(matches!(error, WatchError::Auth { .. }));
        assert!(error.to_string().contains("csrftoken"));
    }

    #[tokio::test]
    async fn test_fetch_feed_returns_body() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        server
            .mock("GET", "/teams/alpha/activity/")
            .with_status(200)
            .with_body("<ul id=\"activity-list\"></ul>")
            .create_async()
            .await;

        let client = SiteClient::new(&url).unwrap();
        let feed_url = client.feed_url("alpha");
        let body = client.fetch_feed(&feed_url).await.unwrap();

        assert!(body.contains("activity-list"));
    }

    #[tokio::test]
    async fn test_fetch_feed_maps_http_error() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        server
            .mock("GET", "/teams/alpha/activity/")
            .with_status(500)
            .create_async()
            .await;

        let client = SiteClient::new(&url).unwrap();
        let feed_url = client.feed_url("alpha");
        let error = client.fetch_feed(&feed_url).await.unwrap_err();

        assert!(matches!(error, WatchError::Fetch { .. }));
    }

    #[test]
    fn test_feed_url() {
        let client = SiteClient::new("https://amara.example.org/en").unwrap();
        assert_eq!(
            client.feed_url("alpha"),
            "https://amara.example.org/en/teams/alpha/activity/"
        );
    }
}
