use payloads::APIClient;
use yew::prelude::*;
use yew_router::prelude::*;

mod components;
mod hooks;
mod logs;
mod pages;

use components::layout::MainLayout;
use pages::{NotFoundPage, PlayersPage, ReportsPage, ScoutsPage};

// Global API client - configurable via environment or same-origin fallback
pub fn get_api_client() -> APIClient {
    // Try environment variable first (set at build time)
    let address = option_env!("BACKEND_URL")
        .map(|url| url.to_string())
        .or_else(|| web_sys::window()?.location().origin().ok())
        .unwrap_or_default();

    APIClient {
        address,
        inner_client: reqwest::Client::new(),
    }
}

#[function_component]
pub fn App() -> Html {
    logs::init_logging();
    html! {
        <BrowserRouter>
            <MainLayout>
                <Switch<Route> render={switch} />
            </MainLayout>
        </BrowserRouter>
    }
}

#[derive(Clone, Routable, PartialEq)]
pub(crate) enum Route {
    #[at("/")]
    Home,
    #[at("/players")]
    Players,
    #[at("/scouts")]
    Scouts,
    #[at("/reports")]
    Reports,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => html! { <Redirect<Route> to={Route::Players} /> },
        Route::Players => html! { <PlayersPage /> },
        Route::Scouts => html! { <ScoutsPage /> },
        Route::Reports => html! { <ReportsPage /> },
        Route::NotFound => html! { <NotFoundPage /> },
    }
}
