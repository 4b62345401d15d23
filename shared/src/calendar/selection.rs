//! Date selection matching.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::grid::format_date;

/// The three shapes a calendar selection can take: a single date, a list of
/// dates (range or multi-select), or a per-event map of date string to the
/// time slots picked on that date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateSelection {
    Single(NaiveDate),
    Multiple(Vec<NaiveDate>),
    PerSlot(BTreeMap<String, Vec<DateTime<Utc>>>),
}

/// Whether `candidate` is part of `selection`.
///
/// Comparison is by normalized `YYYY-MM-DD` string, never by identity. A
/// selection that matches no rendered day simply reads as "nothing
/// selected"; this never fails.
pub fn is_date_selected(candidate: NaiveDate, selection: &DateSelection) -> bool {
    let key = format_date(candidate);
    match selection {
        DateSelection::Single(date) => format_date(*date) == key,
        DateSelection::Multiple(dates) => dates.iter().any(|d| format_date(*d) == key),
        DateSelection::PerSlot(map) => map.get(&key).is_some_and(|times| !times.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn single_selection_matches_by_date_string() {
        let selection = DateSelection::Single(date(2024, 6, 5));
        assert!(is_date_selected(date(2024, 6, 5), &selection));
        assert!(!is_date_selected(date(2024, 6, 6), &selection));
    }

    #[test]
    fn multi_selection_matches_any_member() {
        let selection = DateSelection::Multiple(vec![date(2024, 6, 5), date(2024, 6, 7)]);
        assert!(is_date_selected(date(2024, 6, 7), &selection));
        assert!(!is_date_selected(date(2024, 6, 6), &selection));
    }

    #[test]
    fn per_slot_selection_matches_dates_with_picked_times() {
        let mut map = BTreeMap::new();
        map.insert(
            "2024-06-05".to_string(),
            vec![Utc.with_ymd_and_hms(2024, 6, 5, 9, 0, 0).unwrap()],
        );
        map.insert("2024-06-06".to_string(), Vec::new());
        let selection = DateSelection::PerSlot(map);

        assert!(is_date_selected(date(2024, 6, 5), &selection));
        // A date key with no picked times does not count as selected.
        assert!(!is_date_selected(date(2024, 6, 6), &selection));
        assert!(!is_date_selected(date(2024, 6, 7), &selection));
    }

    #[test]
    fn unmatched_selection_is_simply_unselected() {
        let selection = DateSelection::Multiple(Vec::new());
        assert!(!is_date_selected(date(2024, 6, 5), &selection));
    }
}
