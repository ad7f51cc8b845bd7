use yew::prelude::*;
use yew_router::prelude::*;

use crate::Route;

#[function_component]
pub fn Header() -> Html {
    let current = use_route::<Route>();
    let link_class = |route: &Route| {
        if current.as_ref() == Some(route) {
            "text-sm font-semibold text-gray-900 dark:text-white"
        } else {
            "text-sm text-gray-600 dark:text-gray-300 \
             hover:text-gray-900 dark:hover:text-white"
        }
    };

    html! {
        <header class="bg-white dark:bg-gray-800 border-b border-gray-200 dark:border-gray-700">
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                <div class="flex justify-between items-center h-16">
                    <div class="flex-shrink-0">
                        <h1 class="text-xl font-semibold text-gray-900 dark:text-white">{"Scouting"}</h1>
                    </div>
                    <nav class="flex items-center space-x-6">
                        <Link<Route> to={Route::Players} classes={link_class(&Route::Players)}>
                            {"Players"}
                        </Link<Route>>
                        <Link<Route> to={Route::Scouts} classes={link_class(&Route::Scouts)}>
                            {"Scouts"}
                        </Link<Route>>
                        <Link<Route> to={Route::Reports} classes={link_class(&Route::Reports)}>
                            {"Reports"}
                        </Link<Route>>
                    </nav>
                </div>
            </div>
        </header>
    }
}
