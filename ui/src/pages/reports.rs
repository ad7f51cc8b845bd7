use payloads::Filters;
use payloads::scouting::ReportSummary;
use yew::prelude::*;

use super::players::total_badge;
use crate::components::{ListFooter, SearchBox};
use crate::hooks::{InfiniteScrollConfig, use_infinite_scroll};

pub const ENDPOINT: &str = "/api/reports";
const PAGE_SIZE: u32 = 20;

#[function_component]
pub fn ReportsPage() -> Html {
    let search = use_state(String::new);

    let on_search = {
        let search = search.clone();
        Callback::from(move |value: String| search.set(value))
    };

    let reports = use_infinite_scroll(
        InfiniteScrollConfig::new(ENDPOINT, ReportSummary::item_id)
            .limit(PAGE_SIZE)
            .filters(Filters::new().with("search", (*search).clone())),
    );

    html! {
        <div class="space-y-4">
            <div class="flex items-center justify-between gap-4">
                <h2 class="text-2xl font-bold">{"Reports"}</h2>
                {total_badge(reports.total_count)}
            </div>
            <SearchBox
                value={(*search).clone()}
                placeholder="Search by player"
                on_change={on_search}
            />
            <ul class="divide-y divide-neutral-200 dark:divide-neutral-700">
                {for reports.items.iter().map(report_row)}
            </ul>
            <ListFooter
                context="reports"
                item_count={reports.items.len()}
                loading={reports.loading}
                has_more={reports.has_more}
                error={reports.error.as_ref().map(ToString::to_string)}
                on_retry={reports.refresh.clone()}
                observer_target={reports.observer_target.clone()}
            />
        </div>
    }
}

fn report_row(report: &ReportSummary) -> Html {
    let stars = report
        .rating
        .map(|rating| "★".repeat(rating.into()))
        .unwrap_or_default();

    html! {
        <li key={report.item_id()} class="py-3 flex justify-between">
            <div>
                <p class="font-medium">{&report.player_name}</p>
                <p class="text-sm text-neutral-500 dark:text-neutral-400">
                    {format!("by {}", report.scout_name)}
                    {report.report_type.as_ref().map(|t| format!(" · {t}")).unwrap_or_default()}
                </p>
            </div>
            <div class="text-right text-sm">
                <p>{stars}</p>
                <p class="text-neutral-500 dark:text-neutral-400">
                    {report.created_at.strftime("%Y-%m-%d").to_string()}
                </p>
            </div>
        </li>
    }
}
