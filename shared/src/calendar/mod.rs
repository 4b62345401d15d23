//! Availability grid engine.
//!
//! Pure, caller-driven computation that turns a browsing month plus an
//! availability snapshot into renderable calendar weeks. The engine holds no
//! state between calls and never mutates the snapshot it is given; the UI
//! recomputes the grid whenever the browsing month, the selection, or the
//! availability data changes.

mod grid;
mod navigation;
mod selection;

pub use grid::{
    compute_month_days, compute_month_grid, days_in_month, first_of_month, first_of_next_month,
    format_date, group_into_weeks, month_labels, should_continue_to_next_month,
    week_start_from_index, window_weeks,
    AvailabilitySet, CalendarDay, GridOutcome, GridRequest, MonthGrid, Week,
    MAX_VISIBLE_WEEKS, MIN_VISIBLE_AVAILABLE_DAYS,
};
pub use navigation::{MonthNavigator, NavState};
pub use selection::{is_date_selected, DateSelection};

/// Date string format used throughout the availability contract.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
