//! Browsing-month navigation.
//!
//! The navigator is caller-owned state: the UI feeds it availability counts
//! as fresh data arrives and asks it which month to browse. Manual
//! navigation always interrupts auto-advance.

use chrono::NaiveDate;

use super::grid::{first_of_month, first_of_next_month};

/// Months auto-advance will scan before giving up. A calendar with no
/// availability at all must terminate in the no-availability state rather
/// than walk forward forever.
const MAX_AUTO_ADVANCE_MONTHS: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Idle,
    AutoAdvancing,
}

#[derive(Debug, Clone)]
pub struct MonthNavigator {
    browsing_month: NaiveDate,
    state: NavState,
    auto_advance: bool,
    advanced: u32,
}

impl MonthNavigator {
    /// Start browsing the month containing `start`.
    pub fn new(start: NaiveDate, auto_advance: bool) -> Self {
        Self {
            browsing_month: first_of_month(start),
            state: NavState::Idle,
            auto_advance,
            advanced: 0,
        }
    }

    /// First day of the month currently browsed.
    pub fn browsing_month(&self) -> NaiveDate {
        self.browsing_month
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    /// Manual forward navigation. Interrupts auto-advance.
    pub fn next_month(&mut self) {
        self.interrupt();
        self.browsing_month = first_of_next_month(self.browsing_month);
    }

    /// Manual backward navigation. Interrupts auto-advance.
    pub fn previous_month(&mut self) {
        self.interrupt();
        let prev = self.browsing_month - chrono::Duration::days(1);
        self.browsing_month = first_of_month(prev);
    }

    /// Jump straight to the month containing `date`. Interrupts auto-advance.
    pub fn go_to(&mut self, date: NaiveDate) {
        self.interrupt();
        self.browsing_month = first_of_month(date);
    }

    /// Feed the navigator fresh availability counts for the browsing month
    /// and its successor. Returns true when the browsing month changed and
    /// the caller should recompute.
    ///
    /// Idle moves to auto-advancing only when both months are empty; while
    /// auto-advancing, each empty month steps one month forward until a
    /// month with availability is reached or the scan horizon is exhausted.
    pub fn observe_availability(
        &mut self,
        current_available: usize,
        next_available: usize,
    ) -> bool {
        match self.state {
            NavState::Idle => {
                if self.auto_advance && current_available == 0 && next_available == 0 {
                    self.state = NavState::AutoAdvancing;
                    self.advanced = 0;
                    self.step_forward()
                } else {
                    false
                }
            }
            NavState::AutoAdvancing => {
                if current_available > 0 || self.advanced >= MAX_AUTO_ADVANCE_MONTHS {
                    self.state = NavState::Idle;
                    false
                } else {
                    self.step_forward()
                }
            }
        }
    }

    fn step_forward(&mut self) -> bool {
        self.advanced += 1;
        self.browsing_month = first_of_next_month(self.browsing_month);
        true
    }

    fn interrupt(&mut self) {
        self.state = NavState::Idle;
        self.advanced = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn starts_idle_on_first_of_month() {
        let nav = MonthNavigator::new(date(2024, 6, 17), true);
        assert_eq!(nav.browsing_month(), date(2024, 6, 1));
        assert_eq!(nav.state(), NavState::Idle);
    }

    #[test]
    fn manual_navigation_moves_by_whole_months() {
        let mut nav = MonthNavigator::new(date(2024, 12, 5), false);
        nav.next_month();
        assert_eq!(nav.browsing_month(), date(2025, 1, 1));
        nav.previous_month();
        assert_eq!(nav.browsing_month(), date(2024, 12, 1));
    }

    #[test]
    fn empty_months_trigger_auto_advance() {
        let mut nav = MonthNavigator::new(date(2024, 6, 1), true);
        assert!(nav.observe_availability(0, 0));
        assert_eq!(nav.state(), NavState::AutoAdvancing);
        assert_eq!(nav.browsing_month(), date(2024, 7, 1));

        // Still empty: keep walking.
        assert!(nav.observe_availability(0, 3));
        assert_eq!(nav.browsing_month(), date(2024, 8, 1));

        // Availability reached: settle down.
        assert!(!nav.observe_availability(3, 0));
        assert_eq!(nav.state(), NavState::Idle);
        assert_eq!(nav.browsing_month(), date(2024, 8, 1));
    }

    #[test]
    fn auto_advance_disabled_stays_put() {
        let mut nav = MonthNavigator::new(date(2024, 6, 1), false);
        assert!(!nav.observe_availability(0, 0));
        assert_eq!(nav.state(), NavState::Idle);
        assert_eq!(nav.browsing_month(), date(2024, 6, 1));
    }

    #[test]
    fn near_availability_keeps_navigator_idle() {
        let mut nav = MonthNavigator::new(date(2024, 6, 1), true);
        assert!(!nav.observe_availability(0, 2));
        assert_eq!(nav.state(), NavState::Idle);
    }

    #[test]
    fn manual_navigation_interrupts_auto_advance() {
        let mut nav = MonthNavigator::new(date(2024, 6, 1), true);
        assert!(nav.observe_availability(0, 0));
        assert_eq!(nav.state(), NavState::AutoAdvancing);

        nav.previous_month();
        assert_eq!(nav.state(), NavState::Idle);
        assert_eq!(nav.browsing_month(), date(2024, 6, 1));

        // After the interrupt the navigator does not resume walking on the
        // next observation unless both months are empty again.
        assert!(!nav.observe_availability(1, 0));
        assert_eq!(nav.browsing_month(), date(2024, 6, 1));
    }

    #[test]
    fn auto_advance_gives_up_after_scan_horizon() {
        let mut nav = MonthNavigator::new(date(2024, 1, 1), true);
        assert!(nav.observe_availability(0, 0));

        let mut steps = 1;
        while nav.state() == NavState::AutoAdvancing && steps < 100 {
            if !nav.observe_availability(0, 0) {
                break;
            }
            steps += 1;
        }

        assert_eq!(nav.state(), NavState::Idle);
        assert!(steps <= super::MAX_AUTO_ADVANCE_MONTHS as usize);
    }
}
