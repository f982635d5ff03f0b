use super::super::{Model, Msg};
use crate::api;
use shared::{FieldId, PredictionResponse, StatusResponse};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

pub fn load_status(ctx: &Context<Model>) {
    let link = ctx.link().clone();
    spawn_local(async move {
        link.send_message(Msg::StatusLoaded(api::fetch_status().await));
    });
}

pub fn handle_status_loaded(model: &mut Model, status: Result<StatusResponse, String>) -> bool {
    model.page.apply_status(status);
    true
}

pub fn handle_set_field(model: &mut Model, id: FieldId, raw: String) -> bool {
    model.page.set_field(id, &raw);
    true
}

pub fn handle_step_field(model: &mut Model, id: FieldId, up: bool) -> bool {
    model.page.step_field(id, up);
    true
}

pub fn handle_reset_form(model: &mut Model) -> bool {
    model.page.reset();
    true
}

pub fn handle_predict(model: &mut Model, ctx: &Context<Model>) -> bool {
    let Some(record) = model.page.begin_prediction() else {
        return false;
    };

    let link = ctx.link().clone();
    spawn_local(async move {
        match api::request_prediction(&record).await {
            Ok(response) => link.send_message(Msg::PredictionResult(response)),
            Err(e) => link.send_message(Msg::SetError(Some(e))),
        }
    });

    true
}

pub fn handle_prediction_result(model: &mut Model, response: PredictionResponse) -> bool {
    model.page.finish_prediction(response);
    true
}

pub fn handle_set_error(model: &mut Model, error: Option<String>) -> bool {
    model.page.fail(error);
    true
}
