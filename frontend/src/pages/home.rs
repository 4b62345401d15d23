use yew::prelude::*;
use yew_router::prelude::*;

use shared::api::EventTypeResponse;

use crate::router::Route;
use crate::services::api::ApiService;

#[function_component(Home)]
pub fn home() -> Html {
    let event_types = use_state(Vec::<EventTypeResponse>::new);
    let loading = use_state(|| true);

    {
        let event_types = event_types.clone();
        let loading = loading.clone();

        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                match ApiService::list_event_types().await {
                    Ok(response) => {
                        event_types.set(response.event_types);
                        loading.set(false);
                    }
                    Err(e) => {
                        tracing::error!("Failed to fetch event types: {:?}", e);
                        loading.set(false);
                    }
                }
            });
            || ()
        });
    }

    html! {
        <div class="container">
            <h2>{ "Book a meeting" }</h2>
            if *loading {
                <div class="loading">
                    <div class="spinner"></div>
                </div>
            } else {
                <ul class="event-type-list">
                    { for event_types.iter().map(|et| html! {
                        <li class="event-type-card">
                            <Link<Route> to={Route::Book { slug: et.slug.clone() }}>
                                <h3>{ &et.title }</h3>
                                <p>{ format!("{} min", et.length_minutes) }</p>
                                if let Some(description) = &et.description {
                                    <p class="description">{ description }</p>
                                }
                            </Link<Route>>
                        </li>
                    }) }
                </ul>
            }
        </div>
    }
}
