use chrono::{DateTime, Utc};
use yew::prelude::*;

use shared::api::Slot;

#[derive(Properties, PartialEq)]
pub struct SlotPickerProps {
    pub slots: Vec<Slot>,
    pub selected: Option<DateTime<Utc>>,
    pub on_pick: Callback<Slot>,
}

/// Time list for the selected day.
#[function_component(SlotPicker)]
pub fn slot_picker(props: &SlotPickerProps) -> Html {
    if props.slots.is_empty() {
        return html! {
            <div class="slot-picker">
                <p>{ "No times left on this day." }</p>
            </div>
        };
    }

    html! {
        <div class="slot-picker">
            <h3>{ "Pick a time" }</h3>
            <ul class="slot-list">
                { for props.slots.iter().map(|slot| {
                    let picked = props.selected == Some(slot.time);
                    let class = classes!("slot-btn", picked.then_some("selected"));
                    let onclick = {
                        let on_pick = props.on_pick.clone();
                        let slot = slot.clone();
                        Callback::from(move |_| on_pick.emit(slot.clone()))
                    };
                    html! {
                        <li>
                            <button {class} {onclick}>
                                { slot.time.format("%H:%M").to_string() }
                            </button>
                        </li>
                    }
                }) }
            </ul>
        </div>
    }
}
