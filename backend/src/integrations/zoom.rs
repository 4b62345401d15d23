//! Zoom Meetings API client.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::json;

use shared::models::Credential;

use super::OAuthTokens;

const TOKEN_URL: &str = "https://zoom.us/oauth/token";
const API_BASE: &str = "https://api.zoom.us/v2";

/// Client for the Zoom meetings API, bound to one host's stored OAuth tokens
pub struct ZoomClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    tokens: OAuthTokens,
}

/// Meeting created on Zoom
#[derive(Debug, Clone)]
pub struct CreatedMeeting {
    pub id: String,
    pub join_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct MeetingResponse {
    id: i64,
    join_url: String,
}

impl ZoomClient {
    pub fn new(
        http: reqwest::Client,
        client_id: String,
        client_secret: String,
        credential: &Credential,
    ) -> Self {
        Self {
            http,
            client_id,
            client_secret,
            tokens: OAuthTokens {
                access_token: credential.access_token.clone(),
                refresh_token: credential.refresh_token.clone(),
                expires_at: credential.expires_at,
            },
        }
    }

    /// Exchange the refresh token for a fresh access token. Zoom rotates the
    /// refresh token on every exchange.
    pub async fn refresh_access_token(&mut self) -> Result<()> {
        let response = self
            .http
            .post(TOKEN_URL)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.tokens.refresh_token.as_str()),
            ])
            .send()
            .await
            .context("Failed to reach Zoom token endpoint")?;

        if !response.status().is_success() {
            bail!("Zoom token refresh failed with status {}", response.status());
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to parse Zoom token response")?;

        tracing::info!("Refreshed Zoom access token");
        self.tokens = OAuthTokens {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
        };
        Ok(())
    }

    pub async fn create_meeting(
        &mut self,
        topic: &str,
        start_time: DateTime<Utc>,
        duration_minutes: i32,
    ) -> Result<CreatedMeeting> {
        let body = meeting_payload(topic, start_time, duration_minutes);
        let url = format!("{}/users/me/meetings", API_BASE);

        let response = self
            .send_authorized(Method::POST, &url, Some(&body))
            .await?;
        if !response.status().is_success() {
            bail!(
                "Zoom meeting creation failed with status {}",
                response.status()
            );
        }

        let meeting: MeetingResponse = response
            .json()
            .await
            .context("Failed to parse Zoom meeting response")?;

        tracing::info!("Created Zoom meeting {} for '{}'", meeting.id, topic);
        Ok(CreatedMeeting {
            id: meeting.id.to_string(),
            join_url: meeting.join_url,
        })
    }

    pub async fn delete_meeting(&mut self, meeting_id: &str) -> Result<()> {
        let url = format!("{}/meetings/{}", API_BASE, meeting_id);

        let response = self.send_authorized(Method::DELETE, &url, None).await?;
        // Already gone upstream is as good as deleted.
        if !response.status().is_success() && response.status() != StatusCode::NOT_FOUND {
            bail!(
                "Zoom meeting deletion failed with status {}",
                response.status()
            );
        }

        tracing::info!("Deleted Zoom meeting {}", meeting_id);
        Ok(())
    }

    /// Hand the (possibly rotated) tokens back for persistence.
    pub fn into_tokens(self) -> OAuthTokens {
        self.tokens
    }

    /// Send a request with the current access token; on 401, refresh once
    /// and retry.
    async fn send_authorized(
        &mut self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response> {
        let response = self.request(method.clone(), url, body).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        self.refresh_access_token().await?;
        self.request(method, url, body).await
    }

    async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response> {
        let mut builder = self
            .http
            .request(method, url)
            .bearer_auth(&self.tokens.access_token);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        builder.send().await.context("Failed to reach Zoom API")
    }
}

fn meeting_payload(
    topic: &str,
    start_time: DateTime<Utc>,
    duration_minutes: i32,
) -> serde_json::Value {
    json!({
        "topic": topic,
        "type": 2,
        "start_time": start_time.to_rfc3339_opts(SecondsFormat::Secs, true),
        "duration": duration_minutes,
        "timezone": "UTC",
        "settings": {
            "join_before_host": true,
            "waiting_room": false,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn meeting_payload_uses_utc_rfc3339_start() {
        let start = Utc.with_ymd_and_hms(2024, 6, 3, 9, 30, 0).unwrap();
        let payload = meeting_payload("Intro Call with Ada", start, 30);

        assert_eq!(payload["topic"], "Intro Call with Ada");
        assert_eq!(payload["type"], 2);
        assert_eq!(payload["start_time"], "2024-06-03T09:30:00Z");
        assert_eq!(payload["duration"], 30);
    }
}
