use yew::prelude::*;
use yew_router::prelude::*;

use crate::pages::{book::Book, home::Home, not_found::NotFound};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/book/:slug")]
    Book { slug: String },
    #[not_found]
    #[at("/404")]
    NotFound,
}

pub fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => html! { <Home /> },
        Route::Book { slug } => html! { <Book {slug} /> },
        Route::NotFound => html! { <NotFound /> },
    }
}
