//! In-memory application store.
//!
//! Persistence is deliberately not a core concern here: storage sits behind
//! this store type and everything above it only sees simple request/response
//! shaped methods, so a database-backed implementation can replace it
//! without touching the handlers.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use shared::models::{
    Booking, BookingStatus, Credential, EventType, LocationKind, ProviderKind, User, WorkingHours,
};

use crate::config::AppConfig;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: AppStore,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: AppConfig, store: AppStore) -> Self {
        Self {
            config: Arc::new(config),
            store,
            http: reqwest::Client::new(),
        }
    }
}

#[derive(Clone, Default)]
pub struct AppStore {
    inner: Arc<RwLock<StoreInner>>,
}

#[derive(Default)]
struct StoreInner {
    users: HashMap<Uuid, User>,
    event_types: HashMap<Uuid, EventType>,
    bookings: HashMap<Uuid, Booking>,
    credentials: HashMap<Uuid, Credential>,
}

impl AppStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: User) {
        self.inner.write().await.users.insert(user.id, user);
    }

    pub async fn user(&self, id: Uuid) -> Option<User> {
        self.inner.read().await.users.get(&id).cloned()
    }

    pub async fn insert_event_type(&self, event_type: EventType) {
        self.inner
            .write()
            .await
            .event_types
            .insert(event_type.id, event_type);
    }

    pub async fn event_type(&self, id: Uuid) -> Option<EventType> {
        self.inner.read().await.event_types.get(&id).cloned()
    }

    pub async fn event_type_by_slug(&self, slug: &str) -> Option<EventType> {
        self.inner
            .read()
            .await
            .event_types
            .values()
            .find(|et| et.slug == slug)
            .cloned()
    }

    /// All visible event types, sorted by title for stable listings.
    pub async fn list_event_types(&self) -> Vec<EventType> {
        let mut event_types: Vec<_> = self
            .inner
            .read()
            .await
            .event_types
            .values()
            .filter(|et| !et.hidden)
            .cloned()
            .collect();
        event_types.sort_by(|a, b| a.title.cmp(&b.title));
        event_types
    }

    pub async fn insert_booking(&self, booking: Booking) {
        self.inner.write().await.bookings.insert(booking.id, booking);
    }

    pub async fn booking_by_uid(&self, uid: &str) -> Option<Booking> {
        self.inner
            .read()
            .await
            .bookings
            .values()
            .find(|b| b.uid == uid)
            .cloned()
    }

    pub async fn list_bookings(
        &self,
        status: Option<BookingStatus>,
        event_type_id: Option<Uuid>,
    ) -> Vec<Booking> {
        let mut bookings: Vec<_> = self
            .inner
            .read()
            .await
            .bookings
            .values()
            .filter(|b| status.is_none_or(|s| b.status == s))
            .filter(|b| event_type_id.is_none_or(|id| b.event_type_id == id))
            .cloned()
            .collect();
        bookings.sort_by_key(|b| b.start_time);
        bookings
    }

    pub async fn update_booking_status(
        &self,
        uid: &str,
        status: BookingStatus,
    ) -> Option<Booking> {
        let mut inner = self.inner.write().await;
        let booking = inner.bookings.values_mut().find(|b| b.uid == uid)?;
        booking.status = status;
        booking.updated_at = Utc::now();
        Some(booking.clone())
    }

    /// Accepted bookings across all event types owned by `owner_id` that
    /// overlap the given window. Used for double-booking detection.
    pub async fn has_conflict(
        &self,
        owner_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> bool {
        let inner = self.inner.read().await;
        inner.bookings.values().any(|b| {
            b.status == BookingStatus::Accepted
                && b.start_time < end
                && start < b.end_time
                && inner
                    .event_types
                    .get(&b.event_type_id)
                    .is_some_and(|et| et.owner_id == owner_id)
        })
    }

    /// Busy windows for an owner, for availability expansion.
    pub async fn busy_windows(&self, owner_id: Uuid) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
        let inner = self.inner.read().await;
        inner
            .bookings
            .values()
            .filter(|b| b.status == BookingStatus::Accepted)
            .filter(|b| {
                inner
                    .event_types
                    .get(&b.event_type_id)
                    .is_some_and(|et| et.owner_id == owner_id)
            })
            .map(|b| (b.start_time, b.end_time))
            .collect()
    }

    pub async fn insert_credential(&self, credential: Credential) {
        self.inner
            .write()
            .await
            .credentials
            .insert(credential.id, credential);
    }

    pub async fn credential_for(
        &self,
        user_id: Uuid,
        provider: ProviderKind,
    ) -> Option<Credential> {
        self.inner
            .read()
            .await
            .credentials
            .values()
            .find(|c| c.user_id == user_id && c.provider == provider)
            .cloned()
    }

    /// Write rotated OAuth tokens back after a refresh.
    pub async fn update_credential_tokens(
        &self,
        id: Uuid,
        access_token: String,
        refresh_token: String,
        expires_at: DateTime<Utc>,
    ) {
        let mut inner = self.inner.write().await;
        if let Some(credential) = inner.credentials.get_mut(&id) {
            credential.access_token = access_token;
            credential.refresh_token = refresh_token;
            credential.expires_at = expires_at;
            credential.updated_at = Utc::now();
        }
    }

    /// Seed a demo host with two event types so the app is usable without
    /// any signup flow.
    pub async fn seed_demo_data(&self) -> Uuid {
        let now = Utc::now();
        let owner_id = Uuid::new_v4();

        let working_hours = (1..=5)
            .map(|weekday| WorkingHours {
                weekday,
                start_minute: 9 * 60,
                end_minute: 17 * 60,
            })
            .collect();

        self.insert_user(User {
            id: owner_id,
            email: "demo@meetgrid.dev".to_string(),
            name: Some("Demo Host".to_string()),
            username: "demo".to_string(),
            time_zone: "UTC".to_string(),
            week_start: 0,
            working_hours,
            created_at: now,
            updated_at: now,
        })
        .await;

        self.insert_event_type(EventType {
            id: Uuid::new_v4(),
            owner_id,
            title: "Intro Call".to_string(),
            slug: "intro-call".to_string(),
            description: Some("A quick 30 minute introduction.".to_string()),
            length_minutes: 30,
            location: LocationKind::ZoomVideo,
            hidden: false,
            created_at: now,
            updated_at: now,
        })
        .await;

        self.insert_event_type(EventType {
            id: Uuid::new_v4(),
            owner_id,
            title: "Consultation".to_string(),
            slug: "consultation".to_string(),
            description: Some("A full hour, in person.".to_string()),
            length_minutes: 60,
            location: LocationKind::InPerson,
            hidden: false,
            created_at: now,
            updated_at: now,
        })
        .await;

        owner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn booking(event_type_id: Uuid, start: DateTime<Utc>, minutes: i64) -> Booking {
        let now = Utc::now();
        Booking {
            id: Uuid::new_v4(),
            uid: Uuid::new_v4().simple().to_string(),
            event_type_id,
            title: "Test".to_string(),
            description: None,
            start_time: start,
            end_time: start + chrono::Duration::minutes(minutes),
            attendee_name: "Ada".to_string(),
            attendee_email: "ada@example.com".to_string(),
            status: BookingStatus::Accepted,
            meeting_id: None,
            meeting_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn detects_overlapping_accepted_bookings_across_event_types() {
        let store = AppStore::new();
        let owner_id = store.seed_demo_data().await;
        let event_types = store.list_event_types().await;
        let start = Utc.with_ymd_and_hms(2030, 6, 3, 10, 0, 0).unwrap();

        store
            .insert_booking(booking(event_types[0].id, start, 30))
            .await;

        // Overlap with the other event type of the same owner still counts.
        assert!(
            store
                .has_conflict(
                    owner_id,
                    start + chrono::Duration::minutes(15),
                    start + chrono::Duration::minutes(45),
                )
                .await
        );

        // Back to back is fine.
        assert!(
            !store
                .has_conflict(
                    owner_id,
                    start + chrono::Duration::minutes(30),
                    start + chrono::Duration::minutes(60),
                )
                .await
        );
    }

    #[tokio::test]
    async fn cancelled_bookings_do_not_conflict() {
        let store = AppStore::new();
        let owner_id = store.seed_demo_data().await;
        let event_types = store.list_event_types().await;
        let start = Utc.with_ymd_and_hms(2030, 6, 3, 10, 0, 0).unwrap();

        let b = booking(event_types[0].id, start, 30);
        let uid = b.uid.clone();
        store.insert_booking(b).await;
        store
            .update_booking_status(&uid, BookingStatus::Cancelled)
            .await
            .expect("booking exists");

        assert!(
            !store
                .has_conflict(owner_id, start, start + chrono::Duration::minutes(30))
                .await
        );
    }

    #[tokio::test]
    async fn looks_up_event_types_by_slug() {
        let store = AppStore::new();
        store.seed_demo_data().await;

        let found = store.event_type_by_slug("intro-call").await;
        assert!(found.is_some());
        assert_eq!(found.map(|et| et.length_minutes), Some(30));
        assert!(store.event_type_by_slug("missing").await.is_none());
    }
}
