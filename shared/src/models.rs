use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a booked meeting takes place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    InPerson,
    ZoomVideo,
    ZohoCalendar,
    Link,
}

/// Lifecycle status of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Accepted,
    Pending,
    Cancelled,
    Rejected,
}

/// Third-party provider a credential belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Zoom,
    ZohoCalendar,
}

/// One bookable window on a weekday, in minutes from midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    /// 0 = Sunday .. 6 = Saturday
    pub weekday: u8,
    pub start_minute: u16,
    pub end_minute: u16,
}

/// User model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub username: String,
    pub time_zone: String,
    /// Week-start convention for this user's calendars, 0 = Sunday
    pub week_start: u8,
    pub working_hours: Vec<WorkingHours>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A bookable meeting type owned by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventType {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub length_minutes: i32,
    pub location: LocationKind,
    pub hidden: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Booking model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    /// Short public identifier used in links
    pub uid: String,
    pub event_type_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub attendee_name: String,
    pub attendee_email: String,
    pub status: BookingStatus,
    /// Provider-side identifier of the created meeting or event, kept for
    /// cancellation
    pub meeting_id: Option<String>,
    /// Join link created on the video provider, when the event type has one
    pub meeting_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stored OAuth tokens for a third-party provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub id: Uuid,
    pub user_id: Uuid,
    pub provider: ProviderKind,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
