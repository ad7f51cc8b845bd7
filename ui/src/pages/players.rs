use payloads::Filters;
use payloads::scouting::PlayerSummary;
use yew::prelude::*;

use crate::components::{ListFooter, SearchBox};
use crate::hooks::{InfiniteScrollConfig, use_infinite_scroll};

pub const ENDPOINT: &str = "/api/players";

#[function_component]
pub fn PlayersPage() -> Html {
    let search = use_state(String::new);

    let on_search = {
        let search = search.clone();
        Callback::from(move |value: String| search.set(value))
    };

    let players = use_infinite_scroll(
        InfiniteScrollConfig::new(ENDPOINT, PlayerSummary::item_id)
            .filters(Filters::new().with("search", (*search).clone())),
    );

    html! {
        <div class="space-y-4">
            <div class="flex items-center justify-between gap-4">
                <h2 class="text-2xl font-bold">{"Players"}</h2>
                {total_badge(players.total_count)}
            </div>
            <SearchBox
                value={(*search).clone()}
                placeholder="Search by name, nationality, team or position"
                on_change={on_search}
            />
            <table class="w-full text-sm">
                <thead>
                    <tr class="text-left text-neutral-500 dark:text-neutral-400">
                        <th class="py-2">{"Name"}</th>
                        <th>{"Position"}</th>
                        <th>{"Team"}</th>
                        <th>{"Nationality"}</th>
                        <th class="text-right">{"Age"}</th>
                        <th class="text-right">{"Rating"}</th>
                        <th class="text-right">{"Value"}</th>
                    </tr>
                </thead>
                <tbody>
                    {for players.items.iter().map(player_row)}
                </tbody>
            </table>
            <ListFooter
                context="players"
                item_count={players.items.len()}
                loading={players.loading}
                has_more={players.has_more}
                error={players.error.as_ref().map(ToString::to_string)}
                on_retry={players.refresh.clone()}
                observer_target={players.observer_target.clone()}
            />
        </div>
    }
}

fn player_row(player: &PlayerSummary) -> Html {
    let text = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".into());
    html! {
        <tr key={player.item_id()} class="border-t border-neutral-200 dark:border-neutral-700">
            <td class="py-2 font-medium">{&player.player_name}</td>
            <td>{text(&player.position_player)}</td>
            <td>{text(&player.team_name)}</td>
            <td>{text(&player.nationality_1)}</td>
            <td class="text-right">
                {player.age.map(|age| age.to_string()).unwrap_or_else(|| "-".into())}
            </td>
            <td class="text-right">
                {player.player_rating.map(|r| format!("{r:.1}")).unwrap_or_else(|| "-".into())}
            </td>
            <td class="text-right">
                {player.player_trfm_value.map(format_value).unwrap_or_else(|| "-".into())}
            </td>
        </tr>
    }
}

/// Market value in euros, abbreviated.
fn format_value(euros: f64) -> String {
    if euros >= 1_000_000.0 {
        format!("€{:.1}M", euros / 1_000_000.0)
    } else if euros >= 1_000.0 {
        format!("€{:.0}K", euros / 1_000.0)
    } else {
        format!("€{euros:.0}")
    }
}

pub(crate) fn total_badge(total: Option<u64>) -> Html {
    match total {
        Some(total) => html! {
            <span class="text-sm text-neutral-600 dark:text-neutral-400">
                {format!("{total} total")}
            </span>
        },
        None => html! {},
    }
}
