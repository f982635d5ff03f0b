use super::super::Model;
use yew::prelude::*;

pub fn render_result(model: &Model) -> Html {
    match &model.page.result {
        Some(result) => html! {
            <div class="results-container" title={format!("Request {}", result.request_id)}>
                <p class="predicted-price">{ &result.display }</p>
            </div>
        },
        None => html! {},
    }
}
