use chrono::{DateTime, Utc};
use uuid::Uuid;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use shared::api::{BookingResponse, CreateBookingRequest};

use crate::services::api::ApiService;

#[derive(Properties, PartialEq)]
pub struct BookingFormProps {
    pub event_type_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub on_booked: Callback<BookingResponse>,
}

/// Attendee details form. Submits the booking and reports the confirmed
/// booking upward.
#[function_component(BookingForm)]
pub fn booking_form(props: &BookingFormProps) -> Html {
    let name = use_state(String::new);
    let email = use_state(String::new);
    let notes = use_state(String::new);
    let submitting = use_state(|| false);
    let error = use_state(|| None::<String>);

    let on_name_input = {
        let name = name.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            name.set(input.value());
        })
    };
    let on_email_input = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            email.set(input.value());
        })
    };
    let on_notes_input = {
        let notes = notes.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            notes.set(input.value());
        })
    };

    let onsubmit = {
        let name = name.clone();
        let email = email.clone();
        let notes = notes.clone();
        let submitting = submitting.clone();
        let error = error.clone();
        let on_booked = props.on_booked.clone();
        let event_type_id = props.event_type_id;
        let start_time = props.start_time;

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            if name.is_empty() || email.is_empty() {
                error.set(Some("Name and email are required.".to_string()));
                return;
            }

            let request = CreateBookingRequest {
                event_type_id,
                start_time,
                attendee_name: (*name).clone(),
                attendee_email: (*email).clone(),
                notes: (!notes.is_empty()).then(|| (*notes).clone()),
            };

            let submitting = submitting.clone();
            let error = error.clone();
            let on_booked = on_booked.clone();
            submitting.set(true);
            error.set(None);

            wasm_bindgen_futures::spawn_local(async move {
                match ApiService::create_booking(request).await {
                    Ok(booking) => {
                        submitting.set(false);
                        on_booked.emit(booking);
                    }
                    Err(e) => {
                        tracing::error!("Failed to create booking: {:?}", e);
                        error.set(Some(format!("Booking failed: {}", e)));
                        submitting.set(false);
                    }
                }
            });
        })
    };

    html! {
        <form class="booking-form" {onsubmit}>
            <h3>{ format!("Confirm for {}", props.start_time.format("%B %-d, %H:%M UTC")) }</h3>
            if let Some(message) = &*error {
                <div class="form-error">{ message }</div>
            }
            <label>
                { "Name" }
                <input type="text" value={(*name).clone()} oninput={on_name_input} />
            </label>
            <label>
                { "Email" }
                <input type="email" value={(*email).clone()} oninput={on_email_input} />
            </label>
            <label>
                { "Notes" }
                <textarea value={(*notes).clone()} oninput={on_notes_input} />
            </label>
            <button type="submit" disabled={*submitting}>
                { if *submitting { "Booking..." } else { "Confirm booking" } }
            </button>
        </form>
    }
}
