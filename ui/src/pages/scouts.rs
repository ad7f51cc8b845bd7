use payloads::Filters;
use payloads::scouting::ScoutSummary;
use yew::prelude::*;

use super::players::total_badge;
use crate::components::{ListFooter, SearchBox};
use crate::hooks::{InfiniteScrollConfig, use_infinite_scroll};

pub const ENDPOINT: &str = "/api/scouts";

#[function_component]
pub fn ScoutsPage() -> Html {
    let search = use_state(String::new);

    let on_search = {
        let search = search.clone();
        Callback::from(move |value: String| search.set(value))
    };

    let scouts = use_infinite_scroll(
        InfiniteScrollConfig::new(ENDPOINT, ScoutSummary::item_id)
            .filters(Filters::new().with("search", (*search).clone())),
    );

    html! {
        <div class="space-y-4">
            <div class="flex items-center justify-between gap-4">
                <h2 class="text-2xl font-bold">{"Scouts"}</h2>
                {total_badge(scouts.total_count)}
            </div>
            <SearchBox
                value={(*search).clone()}
                placeholder="Search by name or nationality"
                on_change={on_search}
            />
            <ul class="divide-y divide-neutral-200 dark:divide-neutral-700">
                {for scouts.items.iter().map(|scout| html! {
                    <li key={scout.item_id()} class="py-3 flex justify-between">
                        <div>
                            <p class="font-medium">{&scout.scout_name}</p>
                            <p class="text-sm text-neutral-500 dark:text-neutral-400">
                                {scout.nationality.clone().unwrap_or_default()}
                            </p>
                        </div>
                        <div class="text-right text-sm">
                            <p>{format!("{} reports", scout.total_reports)}</p>
                            <p class="text-neutral-500 dark:text-neutral-400">
                                {scout.scout_level.clone().unwrap_or_default()}
                                {scout.scout_elo.map(|elo| format!(" · {elo:.0} ELO")).unwrap_or_default()}
                            </p>
                        </div>
                    </li>
                })}
            </ul>
            <ListFooter
                context="scouts"
                item_count={scouts.items.len()}
                loading={scouts.loading}
                has_more={scouts.has_more}
                error={scouts.error.as_ref().map(ToString::to_string)}
                on_retry={scouts.refresh.clone()}
                observer_target={scouts.observer_target.clone()}
            />
        </div>
    }
}
