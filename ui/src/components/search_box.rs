use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub value: AttrValue,
    pub placeholder: AttrValue,
    pub on_change: Callback<String>,
}

#[function_component]
pub fn SearchBox(props: &Props) -> Html {
    let oninput = {
        let on_change = props.on_change.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_change.emit(input.value());
        })
    };

    html! {
        <input
            type="search"
            class="w-full px-3 py-2 border border-neutral-300 \
                   dark:border-neutral-600 rounded-md text-sm \
                   bg-white dark:bg-neutral-800 \
                   text-neutral-900 dark:text-neutral-100"
            value={props.value.clone()}
            placeholder={props.placeholder.clone()}
            {oninput}
        />
    }
}
