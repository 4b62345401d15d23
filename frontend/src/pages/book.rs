use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use yew::prelude::*;

use shared::api::{BookingResponse, EventTypeResponse, Slot};
use shared::calendar::{
    compute_month_grid, first_of_month, first_of_next_month, format_date, week_start_from_index,
    AvailabilitySet, GridRequest, MonthNavigator,
};

use crate::components::booking_calendar::BookingCalendar;
use crate::components::booking_form::BookingForm;
use crate::components::slot_picker::SlotPicker;
use crate::services::api::ApiService;

#[derive(Properties, PartialEq)]
pub struct BookProps {
    pub slug: String,
}

/// The booking page: availability calendar, slot picker, attendee form.
///
/// Every state change (month navigation, fresh availability, selection)
/// feeds fresh inputs into the grid engine; the grid itself is recomputed
/// per render and never cached.
#[function_component(Book)]
pub fn book(props: &BookProps) -> Html {
    let event_type = use_state(|| None::<EventTypeResponse>);
    let slots = use_state(BTreeMap::<String, Vec<Slot>>::new);
    let loading = use_state(|| true);
    let error = use_state(|| None::<String>);

    // Caller-owned navigation state. Auto-advance walks past empty months;
    // the manual buttons always interrupt it.
    let navigator = use_mut_ref(|| MonthNavigator::new(Utc::now().date_naive(), true));
    let browsing_month = use_state(|| first_of_month(Utc::now().date_naive()));

    let selected_date = use_state(|| None::<NaiveDate>);
    let selected_slot = use_state(|| None::<DateTime<Utc>>);
    let booked = use_state(|| None::<BookingResponse>);

    // Fetch the event type for the slug.
    {
        let event_type = event_type.clone();
        let error = error.clone();

        use_effect_with(props.slug.clone(), move |slug| {
            let slug = slug.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match ApiService::get_event_type(&slug).await {
                    Ok(response) => event_type.set(Some(response)),
                    Err(e) => {
                        tracing::error!("Failed to fetch event type: {:?}", e);
                        error.set(Some("This event type does not exist.".to_string()));
                    }
                }
            });
            || ()
        });
    }

    // Fetch availability for the browsing month and its successor. The next
    // month feeds both the continuation rendering and auto-advance.
    {
        let slots = slots.clone();
        let loading = loading.clone();
        let error = error.clone();
        let navigator = navigator.clone();
        let browsing_month = browsing_month.clone();
        let event_type_id = event_type.as_ref().map(|et| et.id);

        use_effect_with((event_type_id, *browsing_month), move |(event_type_id, browsing)| {
            if let Some(id) = *event_type_id {
                let browsing = *browsing;
                loading.set(true);
                error.set(None);

                wasm_bindgen_futures::spawn_local(async move {
                    let next = first_of_next_month(browsing);
                    let current_month = fetch_month(id, browsing).await;
                    let next_month = fetch_month(id, next).await;

                    // Navigation may have moved on while the fetches were in
                    // flight; a late response for the old month is dropped.
                    if !fetch_is_current(&navigator.borrow(), browsing) {
                        return;
                    }

                    match (current_month, next_month) {
                        (Ok(mut merged), Ok(next_slots)) => {
                            merged.extend(next_slots);

                            let current_count = month_day_count(&merged, browsing);
                            let next_count = month_day_count(&merged, next);
                            let advanced = navigator
                                .borrow_mut()
                                .observe_availability(current_count, next_count);

                            slots.set(merged);
                            if advanced {
                                // Triggers a refetch for the new month.
                                browsing_month.set(navigator.borrow().browsing_month());
                            } else {
                                loading.set(false);
                            }
                        }
                        (Err(e), _) | (_, Err(e)) => {
                            tracing::error!("Failed to fetch schedule: {:?}", e);
                            error.set(Some("Could not load availability.".to_string()));
                            loading.set(false);
                        }
                    }
                });
            }
            || ()
        });
    }

    let on_prev = {
        let navigator = navigator.clone();
        let browsing_month = browsing_month.clone();
        let selected_date = selected_date.clone();
        let selected_slot = selected_slot.clone();
        Callback::from(move |_| {
            navigator.borrow_mut().previous_month();
            browsing_month.set(navigator.borrow().browsing_month());
            selected_date.set(None);
            selected_slot.set(None);
        })
    };
    let on_next = {
        let navigator = navigator.clone();
        let browsing_month = browsing_month.clone();
        let selected_date = selected_date.clone();
        let selected_slot = selected_slot.clone();
        Callback::from(move |_| {
            navigator.borrow_mut().next_month();
            browsing_month.set(navigator.borrow().browsing_month());
            selected_date.set(None);
            selected_slot.set(None);
        })
    };
    let on_select = {
        let selected_date = selected_date.clone();
        let selected_slot = selected_slot.clone();
        Callback::from(move |date: NaiveDate| {
            selected_date.set(Some(date));
            selected_slot.set(None);
        })
    };
    let on_pick = {
        let selected_slot = selected_slot.clone();
        Callback::from(move |slot: Slot| {
            selected_slot.set(Some(slot.time));
        })
    };
    let on_booked = {
        let booked = booked.clone();
        Callback::from(move |booking: BookingResponse| {
            booked.set(Some(booking));
        })
    };

    if let Some(booking) = &*booked {
        return html! {
            <div class="container confirmation">
                <h2>{ "You are booked!" }</h2>
                <p>{ &booking.title }</p>
                <p>{ booking.start_time.format("%A, %B %-d at %H:%M UTC").to_string() }</p>
                if let Some(url) = &booking.meeting_url {
                    <p><a href={url.clone()}>{ "Join link" }</a></p>
                }
                <p class="booking-ref">{ format!("Reference: {}", booking.uid) }</p>
            </div>
        };
    }

    let Some(event_type) = &*event_type else {
        return html! {
            <div class="container">
                if let Some(message) = &*error {
                    <div class="form-error">{ message }</div>
                } else {
                    <div class="loading"><div class="spinner"></div></div>
                }
            </div>
        };
    };

    // Fresh grid from the current snapshot. The availability set is the keys
    // of the slots mapping; nothing is excluded on top of it here.
    let included = AvailabilitySet::from_dates(slots.keys().cloned());
    let excluded = AvailabilitySet::new();
    let outcome = compute_month_grid(&GridRequest {
        browsing_date: *browsing_month,
        week_start: week_start_from_index(0),
        included_dates: &included,
        excluded_dates: &excluded,
        show_one_month: false,
    });

    let day_slots: Vec<Slot> = selected_date
        .and_then(|d| slots.get(&format_date(d)).cloned())
        .unwrap_or_default();

    html! {
        <div class="container booking-page">
            <div class="event-type-info">
                <h2>{ &event_type.title }</h2>
                <p>{ format!("{} min", event_type.length_minutes) }</p>
                if let Some(description) = &event_type.description {
                    <p class="description">{ description }</p>
                }
            </div>
            if let Some(message) = &*error {
                <div class="form-error">{ message }</div>
            }
            <div class="booking-layout">
                if *loading {
                    <div class="loading"><div class="spinner"></div></div>
                } else {
                    <BookingCalendar
                        outcome={outcome}
                        selected={*selected_date}
                        on_select={on_select}
                        on_prev={on_prev}
                        on_next={on_next}
                    />
                    if selected_date.is_some() {
                        <SlotPicker
                            slots={day_slots}
                            selected={*selected_slot}
                            on_pick={on_pick}
                        />
                    }
                    if let Some(start_time) = *selected_slot {
                        <BookingForm
                            event_type_id={event_type.id}
                            start_time={start_time}
                            on_booked={on_booked}
                        />
                    }
                }
            </div>
        </div>
    }
}

async fn fetch_month(
    event_type_id: uuid::Uuid,
    month_first: NaiveDate,
) -> Result<BTreeMap<String, Vec<Slot>>, String> {
    let month = format!("{:04}-{:02}", month_first.year(), month_first.month());
    ApiService::get_schedule(event_type_id, &month)
        .await
        .map(|response| response.slots)
}

/// Days with at least one bookable slot inside the month of `month_first`.
fn month_day_count(slots: &BTreeMap<String, Vec<Slot>>, month_first: NaiveDate) -> usize {
    let prefix = format!("{:04}-{:02}", month_first.year(), month_first.month());
    slots
        .iter()
        .filter(|(key, day_slots)| key.starts_with(&prefix) && !day_slots.is_empty())
        .count()
}

/// An availability snapshot only applies while the navigator is still on the
/// month it was fetched for. Anything else is a superseded fetch.
fn fetch_is_current(navigator: &MonthNavigator, fetched_month: NaiveDate) -> bool {
    navigator.browsing_month() == fetched_month
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn navigating_away_supersedes_an_in_flight_fetch() {
        let mut navigator = MonthNavigator::new(date(2024, 6, 1), true);
        let started_for = navigator.browsing_month();
        assert!(fetch_is_current(&navigator, started_for));

        // The user clicks forward while the fetch is still pending; its
        // response must not feed the navigator or replace the slots.
        navigator.next_month();
        assert!(!fetch_is_current(&navigator, started_for));
    }

    #[test]
    fn refetches_for_the_same_month_still_apply() {
        let navigator = MonthNavigator::new(date(2024, 6, 15), false);
        assert!(fetch_is_current(&navigator, date(2024, 6, 1)));
    }
}
