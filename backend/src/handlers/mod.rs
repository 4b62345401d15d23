pub mod bookings;
pub mod event_types;
pub mod health;
pub mod schedule;
