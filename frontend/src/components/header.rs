use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <h1>{"Real Estate Price Predictor 🏠"}</h1>
            <p class="subtitle">
                {
                    "Application to predict the price of real estate based on \
                     user-provided variables."
                }
            </p>
            <p class="subtitle">{"Please fill in the details below to get a prediction."}</p>
        </header>
    }
}
