use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    /// Plural noun for the rows, like "players".
    pub context: AttrValue,
    pub item_count: usize,
    pub loading: bool,
    pub has_more: bool,
    pub error: Option<String>,
    pub on_retry: Callback<()>,
    /// The sentinel that triggers the next page when scrolled into view.
    pub observer_target: NodeRef,
}

/// Status line under an infinitely scrolling list.
#[function_component]
pub fn ListFooter(props: &Props) -> Html {
    let on_retry = {
        let on_retry = props.on_retry.clone();
        Callback::from(move |_: MouseEvent| on_retry.emit(()))
    };

    let status = if let Some(error) = &props.error {
        html! {
            <div class="p-4 rounded-md bg-red-50 dark:bg-red-900/20 border \
                        border-red-200 dark:border-red-800 flex items-center \
                        justify-between">
                <p class="text-sm text-red-700 dark:text-red-400">
                    {format!("Error loading {}: {}", props.context, error)}
                </p>
                <button
                    onclick={on_retry}
                    class="px-3 py-1 text-sm font-medium rounded-md \
                           text-red-700 dark:text-red-300 border \
                           border-red-300 dark:border-red-700 \
                           hover:bg-red-100 dark:hover:bg-red-900/40"
                >
                    {"Retry"}
                </button>
            </div>
        }
    } else if props.loading {
        html! {
            <p class="text-neutral-600 dark:text-neutral-400">
                {format!("Loading {}...", props.context)}
            </p>
        }
    } else if props.item_count == 0 {
        html! {
            <p class="text-neutral-600 dark:text-neutral-400">
                {format!("No {} found", props.context)}
            </p>
        }
    } else if !props.has_more {
        html! {
            <p class="text-sm text-neutral-500 dark:text-neutral-500">
                {format!("All {} loaded", props.context)}
            </p>
        }
    } else {
        html! {}
    };

    html! {
        <div class="text-center py-6">
            {status}
            <div ref={props.observer_target.clone()} class="h-px" />
        </div>
    }
}
