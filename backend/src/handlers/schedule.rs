//! Availability query: expands a host's working hours over a month into
//! concrete bookable slots, minus busy windows and past times. The response
//! is the `{ slots }` mapping the booking calendar feeds to the grid engine.

use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use shared::api::{GetScheduleQuery, GetScheduleResponse, Slot};
use shared::calendar::{days_in_month, format_date};
use shared::models::WorkingHours;

use crate::error::{ApiError, ApiResult};
use crate::store::AppState;

pub async fn get_schedule(
    State(state): State<AppState>,
    Query(query): Query<GetScheduleQuery>,
) -> ApiResult<Json<GetScheduleResponse>> {
    let event_type = state
        .store
        .event_type(query.event_type_id)
        .await
        .ok_or_else(|| ApiError::not_found("Event type"))?;
    let owner = state
        .store
        .user(event_type.owner_id)
        .await
        .ok_or_else(|| ApiError::not_found("Host"))?;

    let month_first = parse_month(&query.month)?;
    let busy = state.store.busy_windows(owner.id).await;

    let slots = expand_month_slots(
        &owner.working_hours,
        month_first,
        event_type.length_minutes,
        Utc::now(),
        &busy,
    );

    Ok(Json(GetScheduleResponse { slots }))
}

fn parse_month(month: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
        .map_err(|_| ApiError::bad_request("month must be formatted YYYY-MM"))
}

/// Expand working hours into slot start times for every day of the month.
///
/// Slots step by the event length, must end within the working window, must
/// start after `now`, and must not overlap any busy window. Days without a
/// single slot are left out of the mapping entirely.
fn expand_month_slots(
    working_hours: &[WorkingHours],
    month_first: NaiveDate,
    length_minutes: i32,
    now: DateTime<Utc>,
    busy: &[(DateTime<Utc>, DateTime<Utc>)],
) -> BTreeMap<String, Vec<Slot>> {
    let mut slots = BTreeMap::new();

    // A non-positive length would never advance the slot cursor.
    if length_minutes <= 0 {
        return slots;
    }

    let length = Duration::minutes(i64::from(length_minutes));

    for offset in 0..days_in_month(month_first) {
        let date = month_first + Duration::days(offset);
        let weekday = date.weekday().num_days_from_sunday() as u8;
        let midnight = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));

        let mut day_slots = Vec::new();
        for hours in working_hours.iter().filter(|h| h.weekday == weekday) {
            let mut minute = i64::from(hours.start_minute);
            while minute + length.num_minutes() <= i64::from(hours.end_minute) {
                let start = midnight + Duration::minutes(minute);
                let end = start + length;

                let clashes = busy.iter().any(|(b_start, b_end)| *b_start < end && start < *b_end);
                if start > now && !clashes {
                    day_slots.push(Slot { time: start });
                }
                minute += length.num_minutes();
            }
        }

        if !day_slots.is_empty() {
            day_slots.sort_by_key(|s| s.time);
            slots.insert(format_date(date), day_slots);
        }
    }

    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hours(weekday: u8, start: u16, end: u16) -> WorkingHours {
        WorkingHours {
            weekday,
            start_minute: start,
            end_minute: end,
        }
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn past() -> DateTime<Utc> {
        utc(2020, 1, 1, 0, 0)
    }

    #[test]
    fn expands_working_hours_into_stepped_slots() {
        // Mondays 09:00-10:00, 30 minute meetings.
        let june = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let slots = expand_month_slots(&[hours(1, 540, 600)], june, 30, past(), &[]);

        // June 2024 has four Mondays: 3, 10, 17, 24.
        assert_eq!(slots.len(), 4);
        let monday = slots.get("2024-06-03").expect("Monday present");
        assert_eq!(
            monday.iter().map(|s| s.time).collect::<Vec<_>>(),
            vec![utc(2024, 6, 3, 9, 0), utc(2024, 6, 3, 9, 30)]
        );
    }

    #[test]
    fn slot_must_fit_within_the_working_window() {
        // 45 minute window cannot fit a second 30 minute slot.
        let june = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let slots = expand_month_slots(&[hours(1, 540, 585)], june, 30, past(), &[]);

        let monday = slots.get("2024-06-03").expect("Monday present");
        assert_eq!(monday.len(), 1);
    }

    #[test]
    fn busy_windows_remove_overlapping_slots() {
        let june = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let busy = vec![(utc(2024, 6, 3, 9, 15), utc(2024, 6, 3, 9, 45))];
        let slots = expand_month_slots(&[hours(1, 540, 660)], june, 30, past(), &busy);

        let monday = slots.get("2024-06-03").expect("Monday present");
        // 09:00 and 09:30 both overlap the busy window; 10:00 and 10:30 remain.
        assert_eq!(
            monday.iter().map(|s| s.time).collect::<Vec<_>>(),
            vec![utc(2024, 6, 3, 10, 0), utc(2024, 6, 3, 10, 30)]
        );
    }

    #[test]
    fn past_slots_are_dropped_and_empty_days_omitted() {
        let june = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        // "Now" is after the whole month.
        let now = utc(2024, 7, 1, 0, 0);
        let slots = expand_month_slots(&[hours(1, 540, 600)], june, 30, now, &[]);
        assert!(slots.is_empty());
    }

    #[test]
    fn non_positive_event_length_yields_no_slots() {
        let june = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(expand_month_slots(&[hours(1, 540, 600)], june, 0, past(), &[]).is_empty());
        assert!(expand_month_slots(&[hours(1, 540, 600)], june, -30, past(), &[]).is_empty());
    }

    #[test]
    fn month_parsing_accepts_yyyy_mm_only() {
        assert!(parse_month("2024-06").is_ok());
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("June 2024").is_err());
    }
}
