mod api;
mod components;
mod state;

use components::form_sections::render_sections;
use components::handlers;
use components::header::render_header;
use components::results::render_result;
use components::utils::{debounce, render_error_message};
use shared::{FieldId, PredictionResponse, StatusResponse};
use state::{PageState, Startup};
use yew::prelude::*;

// Yew msg components
pub enum Msg {
    StatusLoaded(Result<StatusResponse, String>),

    // Form operations
    SetField(FieldId, String),
    StepField(FieldId, bool),
    ResetForm,

    // Prediction
    Predict,
    PredictionResult(PredictionResponse),

    SetError(Option<String>),
}

// Main component
pub struct Model {
    page: PageState,
}

impl Component for Model {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        handlers::load_status(ctx);

        Self {
            page: PageState::default(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::StatusLoaded(status) => handlers::handle_status_loaded(self, status),

            Msg::SetField(id, raw) => handlers::handle_set_field(self, id, raw),
            Msg::StepField(id, up) => handlers::handle_step_field(self, id, up),
            Msg::ResetForm => handlers::handle_reset_form(self),

            Msg::Predict => handlers::handle_predict(self, ctx),
            Msg::PredictionResult(response) => handlers::handle_prediction_result(self, response),

            Msg::SetError(error) => handlers::handle_set_error(self, error),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="container">
                { render_header() }

                <main class="main-content">
                    { self.render_body(ctx) }
                </main>

                <footer class="app-footer">
                    <p>{"Real Estate Price Predictor | Fullstack Rust WASM"}</p>
                </footer>
            </div>
        }
    }
}

// Rendering methods
impl Model {
    fn render_body(&self, ctx: &Context<Self>) -> Html {
        match &self.page.startup {
            Startup::Checking => html! {
                <p><i class="fa-solid fa-spinner fa-spin"></i>{" Loading model..."}</p>
            },
            // The form is never rendered without a model.
            Startup::Failed(message) => html! {
                <div class="error-message">
                    <i class="fa-solid fa-circle-exclamation"></i>
                    <p>{ message }</p>
                </div>
            },
            Startup::Ready => html! {
                <>
                    { render_sections(self, ctx.link()) }
                    { self.render_actions(ctx) }
                    { render_error_message(self) }
                    { render_result(self) }
                </>
            },
        }
    }

    fn render_actions(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link().clone();

        html! {
            <div class="button-container">
                <button
                    class="analyze-btn"
                    style="background-color: var(--danger-color);"
                    onclick={link.callback(|_| Msg::ResetForm)}
                >
                    {"Reset"}
                </button>
                <button
                    class="analyze-btn"
                    disabled={self.page.loading}
                    onclick={debounce(300, {
                        let link = link.clone();
                        move || link.send_message(Msg::Predict)
                    })}
                >
                    {
                        if self.page.loading {
                            html! {
                                <><i class="fa-solid fa-spinner fa-spin"></i>{" Predicting..."}</>
                            }
                        } else {
                            html! { {"Predict Price"} }
                        }
                    }
                </button>
            </div>
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<Model>::new().render();
}
