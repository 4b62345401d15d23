use chrono::NaiveDate;
use yew::prelude::*;

use shared::calendar::{is_date_selected, CalendarDay, DateSelection, GridOutcome};

const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Properties, PartialEq)]
pub struct BookingCalendarProps {
    pub outcome: GridOutcome,
    pub selected: Option<NaiveDate>,
    pub on_select: Callback<NaiveDate>,
    pub on_prev: Callback<()>,
    pub on_next: Callback<()>,
}

/// Month calendar driven by the availability grid engine. Padding cells and
/// disabled days render inert; clicking an available day reports it upward.
#[function_component(BookingCalendar)]
pub fn booking_calendar(props: &BookingCalendarProps) -> Html {
    let on_prev = {
        let on_prev = props.on_prev.clone();
        Callback::from(move |_| on_prev.emit(()))
    };
    let on_next = {
        let on_next = props.on_next.clone();
        Callback::from(move |_| on_next.emit(()))
    };

    let grid = match &props.outcome {
        GridOutcome::Grid(grid) => grid,
        GridOutcome::NoAvailability => {
            return html! {
                <div class="calendar calendar-empty">
                    <p>{ "No available times this month." }</p>
                    <button class="nav-btn" onclick={on_next}>
                        { "Look at next month" }
                    </button>
                </div>
            };
        }
    };

    let label = match &grid.next_month_label {
        Some(next) => format!("{} / {}", grid.current_month_label, next),
        None => grid.current_month_label.clone(),
    };

    let selection = props.selected.map(DateSelection::Single);

    html! {
        <div class="calendar">
            <div class="calendar-header">
                <button class="nav-btn" onclick={on_prev}>{ "<" }</button>
                <span class="month-label">{ label }</span>
                <button class="nav-btn" onclick={on_next}>{ ">" }</button>
            </div>
            <div class="calendar-weekdays">
                { for WEEKDAY_LABELS.iter().map(|w| html! {
                    <span class="weekday">{ *w }</span>
                }) }
            </div>
            { for grid.weeks.iter().map(|week| html! {
                <div class="calendar-week">
                    { for week.days.iter().map(|day| render_day(day, &selection, &props.on_select)) }
                </div>
            }) }
        </div>
    }
}

fn render_day(
    day: &CalendarDay,
    selection: &Option<DateSelection>,
    on_select: &Callback<NaiveDate>,
) -> Html {
    match day {
        CalendarDay::Padding => html! { <span class="day padding"></span> },
        CalendarDay::Day { date, disabled } => {
            let selected = selection
                .as_ref()
                .is_some_and(|s| is_date_selected(*date, s));
            let class = classes!(
                "day",
                disabled.then_some("disabled"),
                selected.then_some("selected"),
            );

            let onclick = {
                let on_select = on_select.clone();
                let date = *date;
                Callback::from(move |_| on_select.emit(date))
            };

            html! {
                <button {class} disabled={*disabled} {onclick}>
                    { date.format("%-d").to_string() }
                </button>
            }
        }
    }
}
