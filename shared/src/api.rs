use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Booking, BookingStatus, EventType, LocationKind};

// ============================================================================
// Schedule API Types
// ============================================================================

/// One bookable slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub time: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct GetScheduleQuery {
    pub event_type_id: Uuid,
    /// Month to query, formatted `YYYY-MM`
    pub month: String,
    pub timezone: Option<String>,
}

/// Availability for a month: bookable slots keyed by `YYYY-MM-DD`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetScheduleResponse {
    pub slots: BTreeMap<String, Vec<Slot>>,
}

// ============================================================================
// Booking API Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub event_type_id: Uuid,
    pub start_time: DateTime<Utc>,

    #[validate(length(min = 1, max = 200))]
    pub attendee_name: String,

    #[validate(email)]
    pub attendee_email: String,

    #[validate(length(max = 5000))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub uid: String,
    pub event_type_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub attendee_name: String,
    pub attendee_email: String,
    pub status: BookingStatus,
    pub meeting_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            uid: booking.uid,
            event_type_id: booking.event_type_id,
            title: booking.title,
            description: booking.description,
            start_time: booking.start_time,
            end_time: booking.end_time,
            attendee_name: booking.attendee_name,
            attendee_email: booking.attendee_email,
            status: booking.status,
            meeting_url: booking.meeting_url,
            created_at: booking.created_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListBookingsQuery {
    pub status: Option<BookingStatus>,
    pub event_type_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListBookingsResponse {
    pub bookings: Vec<BookingResponse>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CancelBookingRequest {
    #[validate(length(max = 1000))]
    pub reason: Option<String>,
}

// ============================================================================
// Event Type API Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventTypeResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub length_minutes: i32,
    pub location: LocationKind,
}

impl From<EventType> for EventTypeResponse {
    fn from(event_type: EventType) -> Self {
        Self {
            id: event_type.id,
            title: event_type.title,
            slug: event_type.slug,
            description: event_type.description,
            length_minutes: event_type.length_minutes,
            location: event_type.location,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListEventTypesResponse {
    pub event_types: Vec<EventTypeResponse>,
    pub total: usize,
}

// ============================================================================
// Error Response
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}
