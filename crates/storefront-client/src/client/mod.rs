//! Authenticated HTTP client for the storefront REST backend.

mod variants;

use std::time::Duration;

use reqwest::{Client, Method, StatusCode, Url};
use serde::Deserialize;
use storefront_core::{Action, AppConfig};

use crate::error::{extract_message, ClientError};
use crate::session::SessionStore;

/// Client for the storefront REST backend.
///
/// Attaches the session's bearer token to every request. A 401 triggers one
/// token refresh and one replay of the request; if the refresh fails the
/// session is logged out and [`ClientError::Unauthorized`] is returned.
pub struct StorefrontClient {
    client: Client,
    base_url: Url,
    session: SessionStore,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    #[serde(alias = "token")]
    access_token: String,
}

impl StorefrontClient {
    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`].
    pub fn new(config: &AppConfig, session: SessionStore) -> Result<Self, ClientError> {
        Self::build(
            &config.api_url,
            config.request_timeout_secs,
            &config.user_agent,
            session,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontClient::new`].
    pub fn with_base_url(base_url: &str, session: SessionStore) -> Result<Self, ClientError> {
        Self::build(base_url, 30, "storefront-test/0.1", session)
    }

    fn build(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        session: SessionStore,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        let base_url = parse_base_url(base_url)?;
        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Builds `<base>/<segments...>`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends a request, refreshing the session once on 401.
    pub(crate) async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<&serde_json::Value>,
    ) -> Result<String, ClientError> {
        let response = self.send_once(method.clone(), url.clone(), body).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return read_body(response, &url).await;
        }

        tracing::info!(url = %url, "access token rejected, refreshing session");
        self.refresh_session().await?;

        let retried = self.send_once(method, url.clone(), body).await?;
        if retried.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!(url = %url, "request still unauthorized after refresh");
            self.session.dispatch(Action::LoggedOut).await;
            return Err(ClientError::Unauthorized);
        }
        read_body(retried, &url).await
    }

    async fn send_once(
        &self,
        method: Method,
        url: Url,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, ClientError> {
        let mut request = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = self.session.access_token().await {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    /// Exchanges the refresh token for a new access token.
    ///
    /// Any failure logs the session out.
    async fn refresh_session(&self) -> Result<(), ClientError> {
        match self.request_new_token().await {
            Ok(access_token) => {
                self.session
                    .dispatch(Action::TokenRefreshed { access_token })
                    .await;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "session refresh failed, logging out");
                self.session.dispatch(Action::LoggedOut).await;
                Err(ClientError::Unauthorized)
            }
        }
    }

    async fn request_new_token(&self) -> Result<String, ClientError> {
        let url = self.endpoint(&["auth", "refresh-token"])?;
        let body = match self.session.refresh_token().await {
            Some(token) => serde_json::json!({ "refreshToken": token }),
            None => serde_json::json!({}),
        };
        let response = self.client.post(url.clone()).json(&body).send().await?;
        let text = read_body(response, &url).await?;
        let parsed: RefreshResponse =
            serde_json::from_str(&text).map_err(|e| ClientError::Deserialize {
                context: "refresh-token response".to_string(),
                source: e,
            })?;
        Ok(parsed.access_token)
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, ClientError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })
}

/// Returns the body of a 2xx response, or a [`ClientError::Api`] carrying
/// the backend's message.
pub(crate) async fn read_body(
    response: reqwest::Response,
    url: &Url,
) -> Result<String, ClientError> {
    let status = response.status();
    let text = response.text().await?;
    if status.is_success() {
        return Ok(text);
    }

    let body = serde_json::from_str::<serde_json::Value>(&text).ok();
    let message = body
        .as_ref()
        .and_then(extract_message)
        .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()));
    tracing::debug!(status = status.as_u16(), url = %url, %message, "request failed");
    Err(ClientError::Api {
        status: status.as_u16(),
        url: url.to_string(),
        message,
        body,
    })
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
