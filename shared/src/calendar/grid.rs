//! Month grid computation.
//!
//! Builds the flat day sequence for a browsing month, decides whether the
//! grid should continue into the next month, and groups days into display
//! weeks. All functions are pure; identical inputs produce structurally
//! equal outputs.

use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::DATE_FORMAT;

/// Minimum number of available days the grid tries to keep visible before it
/// stops extending into the next month.
pub const MIN_VISIBLE_AVAILABLE_DAYS: usize = 7;

/// Hard cap on the number of weeks a continuation window may span.
pub const MAX_VISIBLE_WEEKS: usize = 5;

/// One cell of the calendar grid.
///
/// `Padding` cells sit before the first day of the month (and after the last
/// day in the final week) so that every week renders exactly seven cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CalendarDay {
    Padding,
    Day { date: NaiveDate, disabled: bool },
}

impl CalendarDay {
    /// The calendar date of this cell, if it is a real day.
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            CalendarDay::Padding => None,
            CalendarDay::Day { date, .. } => Some(*date),
        }
    }

    /// True for a real, bookable day.
    pub fn is_available(&self) -> bool {
        matches!(self, CalendarDay::Day { disabled: false, .. })
    }
}

/// A display week: exactly seven cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    pub days: [CalendarDay; 7],
}

impl Week {
    /// Number of bookable days in this week.
    pub fn available_count(&self) -> usize {
        self.days.iter().filter(|d| d.is_available()).count()
    }
}

/// Set of bookable date strings (`YYYY-MM-DD`), supplied by the availability
/// data source. An empty set used as an include-list means "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilitySet {
    dates: BTreeSet<String>,
}

impl AvailabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_dates<I>(dates: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self {
            dates: dates.into_iter().map(Into::into).collect(),
        }
    }

    pub fn insert(&mut self, date: NaiveDate) {
        self.dates.insert(format_date(date));
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&format_date(date))
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }
}

/// Inputs for one grid computation. The sets are borrowed snapshots; the
/// engine never mutates them.
#[derive(Debug, Clone, Copy)]
pub struct GridRequest<'a> {
    pub browsing_date: NaiveDate,
    pub week_start: Weekday,
    pub included_dates: &'a AvailabilitySet,
    pub excluded_dates: &'a AvailabilitySet,
    pub show_one_month: bool,
}

/// Fully computed grid for one browsing month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthGrid {
    pub weeks: Vec<Week>,
    pub continues_to_next_month: bool,
    pub current_month_label: String,
    pub next_month_label: Option<String>,
}

/// Result of a grid computation. A browsing month with no bookable days is a
/// state the caller renders (with navigation to the next month), not an
/// empty grid and not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GridOutcome {
    Grid(MonthGrid),
    NoAvailability,
}

/// Format a date with the `YYYY-MM-DD` convention used by the availability
/// contract.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Map a 0-6 week-start index (0 = Sunday) to a weekday.
pub fn week_start_from_index(index: u8) -> Weekday {
    match index % 7 {
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        6 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}

/// First day of the month containing `date`.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// First day of the month after the one containing `date`.
pub fn first_of_next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

/// Number of days in the month containing `date`.
pub fn days_in_month(date: NaiveDate) -> i64 {
    (first_of_next_month(date) - first_of_month(date)).num_days()
}

/// Build the flat day sequence for the month containing `browsing_date`.
///
/// The sequence starts with `(weekday_of_first - week_start + 7) mod 7`
/// padding cells, followed by one `Day` cell per calendar date. A day is
/// disabled when the include set is non-empty and does not contain it, or
/// when the exclude set contains it.
pub fn compute_month_days(
    browsing_date: NaiveDate,
    week_start: Weekday,
    included_dates: &AvailabilitySet,
    excluded_dates: &AvailabilitySet,
) -> Vec<CalendarDay> {
    let first = first_of_month(browsing_date);
    let padding = (first.weekday().num_days_from_sunday() + 7
        - week_start.num_days_from_sunday())
        % 7;
    let total_days = days_in_month(browsing_date);

    let mut days = Vec::with_capacity(padding as usize + total_days as usize);
    days.extend((0..padding).map(|_| CalendarDay::Padding));

    for offset in 0..total_days {
        let date = first + Duration::days(offset);
        let disabled = (!included_dates.is_empty() && !included_dates.contains(date))
            || excluded_dates.contains(date);
        days.push(CalendarDay::Day { date, disabled });
    }

    days
}

/// Decide whether the grid should render trailing days of the next month.
///
/// Continuation keeps a full week's worth of choices on screen when the
/// current month is nearly exhausted: it requires the current month to still
/// have at least one bookable day but fewer than
/// [`MIN_VISIBLE_AVAILABLE_DAYS`], and the next month to have at least one.
/// `show_one_month` always wins and forces a single-month grid.
pub fn should_continue_to_next_month(
    current_month_days: &[CalendarDay],
    next_month_available: usize,
    show_one_month: bool,
) -> bool {
    if show_one_month {
        return false;
    }
    let available = available_count(current_month_days);
    available >= 1 && available < MIN_VISIBLE_AVAILABLE_DAYS && next_month_available >= 1
}

/// Chunk a flat day sequence into weeks of exactly seven cells, padding the
/// final week with `Padding`. Never drops a day.
pub fn group_into_weeks(days: &[CalendarDay]) -> Vec<Week> {
    days.chunks(7)
        .map(|chunk| {
            let mut cells = [CalendarDay::Padding; 7];
            cells[..chunk.len()].copy_from_slice(chunk);
            Week { days: cells }
        })
        .collect()
}

/// Trim a continuation grid down to the window the UI shows.
///
/// Leading fully-disabled weeks are dropped, then the window extends forward
/// week by week until at least [`MIN_VISIBLE_AVAILABLE_DAYS`] bookable days
/// are visible or [`MAX_VISIBLE_WEEKS`] weeks are reached, whichever comes
/// first. The window only ever extends forward; trailing weeks beyond it
/// (including fully-disabled ones) are dropped.
pub fn window_weeks(weeks: Vec<Week>) -> Vec<Week> {
    let start = weeks
        .iter()
        .position(|w| w.available_count() > 0)
        .unwrap_or(0);

    let mut visible = 0usize;
    let mut end = start;
    for week in weeks.iter().skip(start) {
        end += 1;
        visible += week.available_count();
        if visible >= MIN_VISIBLE_AVAILABLE_DAYS || end - start >= MAX_VISIBLE_WEEKS {
            break;
        }
    }

    // Fully-disabled weeks picked up while extending are dropped from the
    // tail of the window.
    while end > start + 1 && weeks[end - 1].available_count() == 0 {
        end -= 1;
    }

    weeks[start..end].to_vec()
}

/// Month labels for the current and next month. The year is appended only at
/// a year boundary (December/January cutover), matching how the header
/// renders.
pub fn month_labels(browsing_date: NaiveDate) -> (String, String) {
    let next = first_of_next_month(browsing_date);
    if next.year() != browsing_date.year() {
        (
            browsing_date.format("%B %Y").to_string(),
            next.format("%B %Y").to_string(),
        )
    } else {
        (
            browsing_date.format("%B").to_string(),
            next.format("%B").to_string(),
        )
    }
}

/// Compute the full grid for one browsing month.
///
/// When continuation is active the next month's days (without their leading
/// padding) are appended to the current month's sequence before grouping, so
/// the cutover week holds cells from both months in ascending date order.
pub fn compute_month_grid(request: &GridRequest<'_>) -> GridOutcome {
    let current = compute_month_days(
        request.browsing_date,
        request.week_start,
        request.included_dates,
        request.excluded_dates,
    );

    if available_count(&current) == 0 {
        return GridOutcome::NoAvailability;
    }

    let next_first = first_of_next_month(request.browsing_date);
    let next = compute_month_days(
        next_first,
        request.week_start,
        request.included_dates,
        request.excluded_dates,
    );
    let next_available = available_count(&next);

    let continues =
        should_continue_to_next_month(&current, next_available, request.show_one_month);

    let (current_label, next_label) = month_labels(request.browsing_date);

    let weeks = if continues {
        let mut combined = current;
        combined.extend(next.iter().filter(|d| d.date().is_some()));
        window_weeks(group_into_weeks(&combined))
    } else {
        group_into_weeks(&current)
    };

    GridOutcome::Grid(MonthGrid {
        weeks,
        continues_to_next_month: continues,
        current_month_label: current_label,
        next_month_label: continues.then_some(next_label),
    })
}

fn available_count(days: &[CalendarDay]) -> usize {
    days.iter().filter(|d| d.is_available()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn none() -> AvailabilitySet {
        AvailabilitySet::new()
    }

    #[test]
    fn month_days_count_equals_padding_plus_days() {
        // June 2024 starts on a Saturday: 6 padding cells with a Sunday start.
        let days = compute_month_days(date(2024, 6, 15), Weekday::Sun, &none(), &none());
        assert_eq!(days.len(), 6 + 30);

        // Leap February.
        let days = compute_month_days(date(2024, 2, 1), Weekday::Sun, &none(), &none());
        assert_eq!(days.len(), 4 + 29);

        // Non-leap February.
        let days = compute_month_days(date(2023, 2, 1), Weekday::Sun, &none(), &none());
        assert_eq!(days.len(), 3 + 28);
    }

    #[test]
    fn month_starting_wednesday_gets_three_leading_padding_cells() {
        // May 2024 starts on a Wednesday.
        let days = compute_month_days(date(2024, 5, 1), Weekday::Sun, &none(), &none());
        let padding: Vec<_> = days
            .iter()
            .take_while(|d| matches!(d, CalendarDay::Padding))
            .collect();
        assert_eq!(padding.len(), 3);
    }

    #[test]
    fn week_start_shifts_padding() {
        // May 2024 starts on a Wednesday; with a Monday start the offset is 2.
        let days = compute_month_days(date(2024, 5, 1), Weekday::Mon, &none(), &none());
        assert!(matches!(days[2], CalendarDay::Day { .. }));
        assert!(matches!(days[1], CalendarDay::Padding));
    }

    #[test]
    fn include_list_disables_everything_else() {
        let included = AvailabilitySet::from_dates(["2024-06-05", "2024-06-06"]);
        let days = compute_month_days(date(2024, 6, 1), Weekday::Sun, &included, &none());

        for day in &days {
            if let CalendarDay::Day { date: d, disabled } = day {
                let expected_enabled = *d == date(2024, 6, 5) || *d == date(2024, 6, 6);
                assert_eq!(*disabled, !expected_enabled, "wrong state for {}", d);
            }
        }
    }

    #[test]
    fn exclude_list_disables_members() {
        let excluded = AvailabilitySet::from_dates(["2024-06-10"]);
        let days = compute_month_days(date(2024, 6, 1), Weekday::Sun, &none(), &excluded);

        let target = days
            .iter()
            .find(|d| d.date() == Some(date(2024, 6, 10)))
            .expect("day present");
        assert!(!target.is_available());

        let other = days
            .iter()
            .find(|d| d.date() == Some(date(2024, 6, 11)))
            .expect("day present");
        assert!(other.is_available());
    }

    #[test]
    fn grouping_yields_weeks_of_seven_and_preserves_order() {
        let days = compute_month_days(date(2024, 6, 1), Weekday::Sun, &none(), &none());
        let weeks = group_into_weeks(&days);

        for week in &weeks {
            assert_eq!(week.days.len(), 7);
        }

        let flattened: Vec<_> = weeks
            .iter()
            .flat_map(|w| w.days.iter())
            .filter_map(|d| d.date())
            .collect();
        let original: Vec<_> = days.iter().filter_map(|d| d.date()).collect();
        assert_eq!(flattened, original);
    }

    #[test]
    fn show_one_month_forces_no_continuation() {
        let included = AvailabilitySet::from_dates(["2024-06-28", "2024-07-02"]);
        let days = compute_month_days(date(2024, 6, 1), Weekday::Sun, &included, &none());
        assert!(!should_continue_to_next_month(&days, 5, true));
        assert!(should_continue_to_next_month(&days, 5, false));
    }

    #[test]
    fn continuation_requires_availability_on_both_sides() {
        let included = AvailabilitySet::from_dates(["2024-06-28"]);
        let days = compute_month_days(date(2024, 6, 1), Weekday::Sun, &included, &none());

        // Next month empty: stay on a single month.
        assert!(!should_continue_to_next_month(&days, 0, false));

        // Current month empty: nothing to continue from.
        let empty_month = compute_month_days(
            date(2024, 6, 1),
            Weekday::Sun,
            &AvailabilitySet::from_dates(["2024-07-01"]),
            &none(),
        );
        assert!(!should_continue_to_next_month(&empty_month, 5, false));
    }

    #[test]
    fn seven_or_more_available_days_stops_continuation() {
        let included = AvailabilitySet::from_dates([
            "2024-06-20", "2024-06-21", "2024-06-22", "2024-06-23", "2024-06-24", "2024-06-25",
            "2024-06-26",
        ]);
        let days = compute_month_days(date(2024, 6, 1), Weekday::Sun, &included, &none());
        assert!(!should_continue_to_next_month(&days, 5, false));
    }

    #[test]
    fn window_drops_leading_dead_weeks_and_caps_forward() {
        // Only the last two days of June and early July are bookable.
        let included = AvailabilitySet::from_dates([
            "2024-06-29", "2024-06-30", "2024-07-01", "2024-07-02", "2024-07-03",
        ]);
        let request = GridRequest {
            browsing_date: date(2024, 6, 1),
            week_start: Weekday::Sun,
            included_dates: &included,
            excluded_dates: &AvailabilitySet::new(),
            show_one_month: false,
        };

        let grid = match compute_month_grid(&request) {
            GridOutcome::Grid(grid) => grid,
            GridOutcome::NoAvailability => panic!("expected a grid"),
        };

        assert!(grid.continues_to_next_month);
        assert!(grid.weeks.len() <= MAX_VISIBLE_WEEKS);
        // The first visible week must contain a bookable day.
        assert!(grid.weeks[0].available_count() > 0);
        // 5 available days total, fewer than the target, so the window runs to
        // the end of the combined sequence rather than stopping early.
        let visible: usize = grid.weeks.iter().map(|w| w.available_count()).sum();
        assert_eq!(visible, 5);
    }

    #[test]
    fn cutover_week_mixes_two_months_in_ascending_order() {
        let included = AvailabilitySet::from_dates(["2024-06-29", "2024-07-02"]);
        let request = GridRequest {
            browsing_date: date(2024, 6, 1),
            week_start: Weekday::Sun,
            included_dates: &included,
            excluded_dates: &AvailabilitySet::new(),
            show_one_month: false,
        };

        let grid = match compute_month_grid(&request) {
            GridOutcome::Grid(grid) => grid,
            GridOutcome::NoAvailability => panic!("expected a grid"),
        };

        let dates: Vec<_> = grid
            .weeks
            .iter()
            .flat_map(|w| w.days.iter())
            .filter_map(|d| d.date())
            .collect();

        assert!(dates.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(dates.iter().any(|d| d.month() == 6));
        assert!(dates.iter().any(|d| d.month() == 7));
    }

    #[test]
    fn no_availability_is_a_state_not_an_empty_grid() {
        let included = AvailabilitySet::from_dates(["2030-01-01"]);
        let request = GridRequest {
            browsing_date: date(2024, 6, 1),
            week_start: Weekday::Sun,
            included_dates: &included,
            excluded_dates: &AvailabilitySet::new(),
            show_one_month: false,
        };
        assert_eq!(compute_month_grid(&request), GridOutcome::NoAvailability);
    }

    #[test]
    fn identical_inputs_give_structurally_equal_grids() {
        let included = AvailabilitySet::from_dates(["2024-06-05", "2024-06-28", "2024-07-01"]);
        let excluded = AvailabilitySet::from_dates(["2024-06-28"]);
        let request = GridRequest {
            browsing_date: date(2024, 6, 9),
            week_start: Weekday::Mon,
            included_dates: &included,
            excluded_dates: &excluded,
            show_one_month: false,
        };

        assert_eq!(compute_month_grid(&request), compute_month_grid(&request));
    }

    #[test]
    fn labels_show_year_only_at_year_boundary() {
        let (current, next) = month_labels(date(2024, 6, 1));
        assert_eq!(current, "June");
        assert_eq!(next, "July");

        let (current, next) = month_labels(date(2024, 12, 1));
        assert_eq!(current, "December 2024");
        assert_eq!(next, "January 2025");
    }
}
