use super::super::{Model, Msg};
use shared::{FieldId, Group, SECTIONS, Section};
use web_sys::HtmlInputElement;
use yew::html::Scope;
use yew::prelude::*;

pub fn render_sections(model: &Model, link: &Scope<Model>) -> Html {
    html! {
        <div class="form-sections">
            { for SECTIONS.iter().map(|section| render_section(model, link, section)) }
        </div>
    }
}

fn render_section(model: &Model, link: &Scope<Model>, section: &Section) -> Html {
    html! {
        <section class="form-section">
            <h2>{ section.title }</h2>
            {
                match section.note {
                    Some(note) => html! { <p class="section-note">{ note }</p> },
                    None => html! {},
                }
            }
            { for section.groups.iter().map(|group| render_group(model, link, group)) }
        </section>
    }
}

// Browser-managed <details>, so open/closed state survives re-renders.
fn render_group(model: &Model, link: &Scope<Model>, group: &Group) -> Html {
    html! {
        <details class="expander">
            <summary>{ group.title }</summary>
            { for group.fields.iter().map(|id| render_field(model, link, *id)) }
        </details>
    }
}

fn render_field(model: &Model, link: &Scope<Model>, id: FieldId) -> Html {
    let spec = id.spec();
    let input_id = format!("field-{}", id.column());

    let handle_change = link.callback(move |e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::SetField(id, input.value())
    });

    html! {
        <div class="field" key={id.column()}>
            <label for={input_id.clone()}>{ spec.label }</label>
            <div class="number-input">
                <input
                    id={input_id}
                    type="number"
                    step={spec.step.to_string()}
                    value={model.page.form.display(id)}
                    onchange={handle_change}
                />
                <button
                    class="step-btn"
                    title="Decrease"
                    onclick={link.callback(move |_| Msg::StepField(id, false))}
                >{"−"}</button>
                <button
                    class="step-btn"
                    title="Increase"
                    onclick={link.callback(move |_| Msg::StepField(id, true))}
                >{"+"}</button>
            </div>
            {
                match model.page.field_errors.get(&id) {
                    Some(err) => html! { <p class="field-error">{ err }</p> },
                    None => html! {},
                }
            }
        </div>
    }
}
