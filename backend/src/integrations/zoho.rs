//! Zoho Calendar API client.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Utc};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::json;

use shared::models::Credential;

use super::OAuthTokens;

const TOKEN_URL: &str = "https://accounts.zoho.com/oauth/v2/token";
const API_BASE: &str = "https://calendar.zoho.com/api/v1";

/// Client for the Zoho Calendar API, bound to one host's stored OAuth tokens
pub struct ZohoCalendarClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    calendar_uid: String,
    tokens: OAuthTokens,
}

/// Event created on Zoho Calendar
#[derive(Debug, Clone)]
pub struct CreatedEvent {
    pub uid: String,
}

/// Zoho does not rotate the refresh token on exchange.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct EventsResponse {
    events: Vec<EventEntry>,
}

#[derive(Debug, Deserialize)]
struct EventEntry {
    uid: String,
}

impl ZohoCalendarClient {
    pub fn new(
        http: reqwest::Client,
        client_id: String,
        client_secret: String,
        calendar_uid: String,
        credential: &Credential,
    ) -> Self {
        Self {
            http,
            client_id,
            client_secret,
            calendar_uid,
            tokens: OAuthTokens {
                access_token: credential.access_token.clone(),
                refresh_token: credential.refresh_token.clone(),
                expires_at: credential.expires_at,
            },
        }
    }

    /// Exchange the refresh token for a fresh access token.
    pub async fn refresh_access_token(&mut self) -> Result<()> {
        let response = self
            .http
            .post(TOKEN_URL)
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", self.tokens.refresh_token.as_str()),
            ])
            .send()
            .await
            .context("Failed to reach Zoho token endpoint")?;

        if !response.status().is_success() {
            bail!("Zoho token refresh failed with status {}", response.status());
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to parse Zoho token response")?;

        tracing::info!("Refreshed Zoho access token");
        self.tokens.access_token = token.access_token;
        self.tokens.expires_at = Utc::now() + Duration::seconds(token.expires_in);
        Ok(())
    }

    pub async fn create_event(
        &mut self,
        title: &str,
        description: Option<&str>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<CreatedEvent> {
        let event_data = json!({
            "title": title,
            "description": description,
            "dateandtime": {
                "timezone": "UTC",
                "start": zoho_timestamp(start),
                "end": zoho_timestamp(end),
            },
        });
        let url = format!("{}/calendars/{}/events", API_BASE, self.calendar_uid);

        let response = self
            .send_authorized(Method::POST, &url, &[("eventdata", event_data.to_string())])
            .await?;
        if !response.status().is_success() {
            bail!(
                "Zoho event creation failed with status {}",
                response.status()
            );
        }

        let events: EventsResponse = response
            .json()
            .await
            .context("Failed to parse Zoho event response")?;
        let Some(event) = events.events.into_iter().next() else {
            bail!("Zoho event creation returned no event");
        };

        tracing::info!("Created Zoho event {} for '{}'", event.uid, title);
        Ok(CreatedEvent { uid: event.uid })
    }

    pub async fn delete_event(&mut self, event_uid: &str) -> Result<()> {
        let url = format!(
            "{}/calendars/{}/events/{}",
            API_BASE, self.calendar_uid, event_uid
        );

        let response = self.send_authorized(Method::DELETE, &url, &[]).await?;
        if !response.status().is_success() && response.status() != StatusCode::NOT_FOUND {
            bail!(
                "Zoho event deletion failed with status {}",
                response.status()
            );
        }

        tracing::info!("Deleted Zoho event {}", event_uid);
        Ok(())
    }

    /// Hand the tokens back for persistence.
    pub fn into_tokens(self) -> OAuthTokens {
        self.tokens
    }

    /// Send a request with the current access token; on 401, refresh once
    /// and retry.
    async fn send_authorized(
        &mut self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response> {
        let response = self.request(method.clone(), url, query).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        self.refresh_access_token().await?;
        self.request(method, url, query).await
    }

    async fn request(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response> {
        self.http
            .request(method, url)
            .header(
                "Authorization",
                format!("Zoho-oauthtoken {}", self.tokens.access_token),
            )
            .query(query)
            .send()
            .await
            .context("Failed to reach Zoho Calendar API")
    }
}

/// Zoho's compact timestamp format, `yyyyMMdd'T'HHmmss'Z'`.
fn zoho_timestamp(time: DateTime<Utc>) -> String {
    time.format("%Y%m%dT%H%M%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_use_the_compact_utc_format() {
        let time = Utc.with_ymd_and_hms(2024, 6, 3, 9, 30, 0).unwrap();
        assert_eq!(zoho_timestamp(time), "20240603T093000Z");
    }
}
