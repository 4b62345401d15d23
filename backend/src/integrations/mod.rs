//! Third-party calendar/video provider integrations.
//!
//! Both clients follow the same shape: stored OAuth tokens, a refresh-token
//! exchange against the provider's token endpoint, and REST calls that retry
//! once after a refresh when the access token has expired.

mod zoho;
mod zoom;

pub use zoho::ZohoCalendarClient;
pub use zoom::ZoomClient;

use anyhow::Result;
use chrono::{DateTime, Utc};

use shared::models::{Booking, EventType, LocationKind, ProviderKind, User};

use crate::error::{ApiError, ApiResult};
use crate::store::AppState;

/// Reference to a meeting or event created on a provider.
#[derive(Debug, Clone)]
pub struct MeetingRef {
    pub provider_id: String,
    pub join_url: Option<String>,
}

/// OAuth tokens held by a provider client, written back to the store after
/// each call in case a refresh rotated them.
#[derive(Debug, Clone)]
pub struct OAuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Create the provider-side meeting for a new booking, if the event type
/// calls for one and the provider is configured with credentials.
///
/// Missing configuration or credentials downgrade the booking to one without
/// a meeting link rather than failing it; an actual provider failure is
/// surfaced as an error so the attendee is not left with a dead booking.
pub async fn create_meeting_for_booking(
    state: &AppState,
    event_type: &EventType,
    owner: &User,
    title: &str,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> ApiResult<Option<MeetingRef>> {
    match event_type.location {
        LocationKind::ZoomVideo => {
            let Some(config) = &state.config.zoom else {
                tracing::warn!("Zoom is not configured, booking created without meeting link");
                return Ok(None);
            };
            let Some(credential) = state
                .store
                .credential_for(owner.id, ProviderKind::Zoom)
                .await
            else {
                tracing::warn!(
                    "No Zoom credential for host {}, booking created without meeting link",
                    owner.username
                );
                return Ok(None);
            };

            let mut client = ZoomClient::new(
                state.http.clone(),
                config.client_id.clone(),
                config.client_secret.clone(),
                &credential,
            );
            let meeting = client
                .create_meeting(title, start, event_type.length_minutes)
                .await
                .map_err(|e| ApiError::Provider(e.to_string()))?;

            persist_tokens(state, credential.id, client.into_tokens()).await;
            Ok(Some(MeetingRef {
                provider_id: meeting.id,
                join_url: Some(meeting.join_url),
            }))
        }
        LocationKind::ZohoCalendar => {
            let Some(config) = &state.config.zoho else {
                tracing::warn!("Zoho is not configured, booking created without calendar event");
                return Ok(None);
            };
            let Some(credential) = state
                .store
                .credential_for(owner.id, ProviderKind::ZohoCalendar)
                .await
            else {
                tracing::warn!(
                    "No Zoho credential for host {}, booking created without calendar event",
                    owner.username
                );
                return Ok(None);
            };

            let mut client = ZohoCalendarClient::new(
                state.http.clone(),
                config.client_id.clone(),
                config.client_secret.clone(),
                config.calendar_uid.clone(),
                &credential,
            );
            let event = client
                .create_event(title, None, start, end)
                .await
                .map_err(|e| ApiError::Provider(e.to_string()))?;

            persist_tokens(state, credential.id, client.into_tokens()).await;
            Ok(Some(MeetingRef {
                provider_id: event.uid,
                join_url: None,
            }))
        }
        LocationKind::InPerson | LocationKind::Link => Ok(None),
    }
}

/// Delete the provider-side meeting behind a cancelled booking. Best-effort:
/// callers log failures instead of propagating them to the attendee.
pub async fn delete_meeting_for_booking(state: &AppState, booking: &Booking) -> Result<()> {
    let Some(meeting_id) = &booking.meeting_id else {
        return Ok(());
    };
    let Some(event_type) = state.store.event_type(booking.event_type_id).await else {
        return Ok(());
    };
    let Some(owner) = state.store.user(event_type.owner_id).await else {
        return Ok(());
    };

    match event_type.location {
        LocationKind::ZoomVideo => {
            let (Some(config), Some(credential)) = (
                &state.config.zoom,
                state
                    .store
                    .credential_for(owner.id, ProviderKind::Zoom)
                    .await,
            ) else {
                return Ok(());
            };

            let mut client = ZoomClient::new(
                state.http.clone(),
                config.client_id.clone(),
                config.client_secret.clone(),
                &credential,
            );
            client.delete_meeting(meeting_id).await?;
            persist_tokens(state, credential.id, client.into_tokens()).await;
            Ok(())
        }
        LocationKind::ZohoCalendar => {
            let (Some(config), Some(credential)) = (
                &state.config.zoho,
                state
                    .store
                    .credential_for(owner.id, ProviderKind::ZohoCalendar)
                    .await,
            ) else {
                return Ok(());
            };

            let mut client = ZohoCalendarClient::new(
                state.http.clone(),
                config.client_id.clone(),
                config.client_secret.clone(),
                config.calendar_uid.clone(),
                &credential,
            );
            client.delete_event(meeting_id).await?;
            persist_tokens(state, credential.id, client.into_tokens()).await;
            Ok(())
        }
        LocationKind::InPerson | LocationKind::Link => Ok(()),
    }
}

/// A refresh may have rotated the tokens while the client held them; write
/// the latest set back to the store.
async fn persist_tokens(state: &AppState, credential_id: uuid::Uuid, tokens: OAuthTokens) {
    state
        .store
        .update_credential_tokens(
            credential_id,
            tokens.access_token,
            tokens.refresh_token,
            tokens.expires_at,
        )
        .await;
}
