use yew::prelude::*;
use yew_router::prelude::*;

use crate::router::Route;

#[function_component(Header)]
pub fn header() -> Html {
    html! {
        <header class="header">
            <div class="container">
                <h1>{ "MeetGrid" }</h1>
                <nav>
                    <Link<Route> to={Route::Home}>{ "Event Types" }</Link<Route>>
                </nav>
            </div>
        </header>
    }
}
