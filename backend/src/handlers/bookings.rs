use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Duration, Utc};
use uuid::Uuid;
use validator::Validate;

use shared::api::{
    BookingResponse, CancelBookingRequest, CreateBookingRequest, ListBookingsQuery,
    ListBookingsResponse,
};
use shared::models::{Booking, BookingStatus};

use crate::error::{ApiError, ApiResult};
use crate::integrations;
use crate::store::AppState;

pub async fn create_booking(
    State(state): State<AppState>,
    Json(payload): Json<CreateBookingRequest>,
) -> ApiResult<(StatusCode, Json<BookingResponse>)> {
    payload.validate()?;

    let event_type = state
        .store
        .event_type(payload.event_type_id)
        .await
        .ok_or_else(|| ApiError::not_found("Event type"))?;
    let owner = state
        .store
        .user(event_type.owner_id)
        .await
        .ok_or_else(|| ApiError::not_found("Host"))?;

    let now = Utc::now();
    if payload.start_time <= now {
        return Err(ApiError::bad_request("start_time must be in the future"));
    }

    let end_time = payload.start_time + Duration::minutes(i64::from(event_type.length_minutes));
    if state
        .store
        .has_conflict(owner.id, payload.start_time, end_time)
        .await
    {
        return Err(ApiError::conflict("That slot is no longer available"));
    }

    let title = format!("{} with {}", event_type.title, payload.attendee_name);
    let meeting = integrations::create_meeting_for_booking(
        &state,
        &event_type,
        &owner,
        &title,
        payload.start_time,
        end_time,
    )
    .await?;

    let booking = Booking {
        id: Uuid::new_v4(),
        uid: short_uid(),
        event_type_id: event_type.id,
        title,
        description: payload.notes,
        start_time: payload.start_time,
        end_time,
        attendee_name: payload.attendee_name,
        attendee_email: payload.attendee_email,
        status: BookingStatus::Accepted,
        meeting_id: meeting.as_ref().map(|m| m.provider_id.clone()),
        meeting_url: meeting.and_then(|m| m.join_url),
        created_at: now,
        updated_at: now,
    };

    tracing::info!(
        "Created booking {} for '{}' at {}",
        booking.uid,
        booking.title,
        booking.start_time
    );

    state.store.insert_booking(booking.clone()).await;
    Ok((StatusCode::CREATED, Json(booking.into())))
}

pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<ListBookingsQuery>,
) -> ApiResult<Json<ListBookingsResponse>> {
    let bookings: Vec<BookingResponse> = state
        .store
        .list_bookings(query.status, query.event_type_id)
        .await
        .into_iter()
        .map(Into::into)
        .collect();

    let total = bookings.len();
    Ok(Json(ListBookingsResponse { bookings, total }))
}

pub async fn get_booking(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> ApiResult<Json<BookingResponse>> {
    let booking = state
        .store
        .booking_by_uid(&uid)
        .await
        .ok_or_else(|| ApiError::not_found("Booking"))?;

    Ok(Json(booking.into()))
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Json(payload): Json<CancelBookingRequest>,
) -> ApiResult<Json<BookingResponse>> {
    payload.validate()?;

    let booking = state
        .store
        .booking_by_uid(&uid)
        .await
        .ok_or_else(|| ApiError::not_found("Booking"))?;

    // Cancelling twice is a no-op.
    if booking.status == BookingStatus::Cancelled {
        return Ok(Json(booking.into()));
    }

    // The provider-side meeting is removed best-effort; a failed upstream
    // delete must not keep the attendee locked into the booking.
    if let Err(e) = integrations::delete_meeting_for_booking(&state, &booking).await {
        tracing::warn!("Failed to delete provider meeting for {}: {:?}", uid, e);
    }

    let cancelled = state
        .store
        .update_booking_status(&uid, BookingStatus::Cancelled)
        .await
        .ok_or_else(|| ApiError::not_found("Booking"))?;

    tracing::info!(
        "Cancelled booking {}{}",
        uid,
        payload
            .reason
            .map(|r| format!(" ({})", r))
            .unwrap_or_default()
    );

    Ok(Json(cancelled.into()))
}

fn short_uid() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_uids_are_url_safe_and_distinct() {
        let a = short_uid();
        let b = short_uid();
        assert_eq!(a.len(), 12);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
