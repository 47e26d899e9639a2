//! # Report Form
//!
//! Description, optional photo and device location, submitted as one
//! multipart report. All form state lives in a
//! [`ReportSubmissionController`] owned by this component.

use hazard_client::submission::CONFIRM_PROMPT;
use hazard_client::{Confirmation, ReportSubmissionController, ReportsApi, SubmitOutcome};
use hazard_domain::{GeolocationResult, ImageAttachment, Position};
use leptos::ev::{Event, SubmitEvent};
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, HtmlFormElement, HtmlInputElement};

use super::location_picker::LocationPickerMap;
use crate::services::{BrowserLocation, BrowserReportsApi, request_context};
use crate::state::client_config;

/// `window.confirm`
struct BrowserConfirm;

impl Confirmation for BrowserConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        web_sys::window()
            .and_then(|window| window.confirm_with_message(prompt).ok())
            .unwrap_or(false)
    }
}

async fn read_attachment(file: File) -> Option<ImageAttachment> {
    let buffer = match JsFuture::from(file.array_buffer()).await {
        Ok(buffer) => buffer,
        Err(err) => {
            log::warn!("could not read {}: {err:?}", file.name());
            return None;
        }
    };
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Some(ImageAttachment::new(file.name(), file.type_(), bytes))
}

#[component]
pub fn ReportForm() -> impl IntoView {
    let controller = RwSignal::new(ReportSubmissionController::new(client_config().geolocation));
    on_cleanup(move || {
        controller.try_update(ReportSubmissionController::detach);
    });

    let position = Signal::derive(move || controller.with(|c| c.position()));
    let locating = move || controller.with(|c| c.location().is_pending());
    let busy = move || controller.with(|c| !c.can_submit());
    let banner = move || controller.with(|c| c.state().banner());
    let location_error = move || {
        controller.with(|c| match c.location() {
            GeolocationResult::Failure(err) => Some(err.to_string()),
            _ => None,
        })
    };

    let on_locate = move |_| {
        let Some(ticket) = controller.try_update(|c| c.begin_locate()) else {
            return;
        };
        let options = controller.with_untracked(|c| *c.location_options());
        spawn_local(async move {
            let outcome = BrowserLocation.locate(&options).await;
            // a disposed controller means the form is gone
            controller.try_update(|c| c.finish_locate(ticket, outcome));
        });
    };

    let on_position_changed = Callback::new(move |p: Position| controller.update(|c| c.set_position(p)));

    let on_description = move |ev: Event| {
        controller.update(|c| c.set_description(event_target_value(&ev)));
    };

    let on_image = move |ev: Event| {
        let file = ev
            .target()
            .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
            .and_then(|input| input.files())
            .and_then(|files| files.get(0));
        let Some(file) = file else {
            controller.update(|c| c.set_image(None));
            return;
        };
        let Some(ticket) = controller.try_with(|c| c.begin_attach()) else {
            return;
        };
        spawn_local(async move {
            let image = read_attachment(file).await;
            controller.try_update(|c| c.finish_attach(ticket, image));
        });
    };

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let form = ev
            .target()
            .and_then(|target| target.dyn_into::<HtmlFormElement>().ok());

        if !matches!(controller.try_update(|c| c.validate()), Some(Ok(()))) {
            return;
        }
        if !BrowserConfirm.confirm(CONFIRM_PROMPT) {
            controller.update(|c| c.decline());
            return;
        }
        let Some(Ok((ticket, payload))) = controller.try_update(|c| c.dispatch()) else {
            return;
        };

        let ctx = request_context();
        spawn_local(async move {
            let result = BrowserReportsApi.create_report(&ctx, &payload).await;
            // the banner reports the outcome; only the file input needs clearing
            let outcome = controller.try_update(|c| c.complete(ticket, result));
            if let (Some(SubmitOutcome::Submitted(_)), Some(form)) = (outcome, form) {
                form.reset();
            }
        });
    };

    view! {
        <form class="report-form" on:submit=on_submit>
            <h2>"Report a Hazard"</h2>

            {move || banner().map(|banner| view! {
                <div class=format!("banner {}", banner.kind.class())>{banner.text}</div>
            })}

            <label for="description">"Description"</label>
            <textarea
                id="description"
                placeholder="Describe the hazard (e.g. fallen tree, open manhole)"
                prop:value=move || controller.with(|c| c.draft().description.clone())
                on:input=on_description
            ></textarea>

            <label for="image">"Photo (optional)"</label>
            <input id="image" type="file" accept="image/*" on:change=on_image />

            <div class="location-section">
                <Show
                    when=move || position.get().is_some()
                    fallback=move || view! {
                        <button
                            type="button"
                            class="btn btn-location"
                            disabled=locating
                            on:click=on_locate
                        >
                            {move || if locating() { "Fetching Location..." } else { "Get My Location" }}
                        </button>
                        {move || location_error().map(|message| view! {
                            <p class="location-error">{message}</p>
                        })}
                    }
                >
                    <LocationPickerMap position=position on_position_changed=on_position_changed />
                    {move || position.get().map(|p| view! {
                        <p class="location-readout">{format!("Lat: {:.4}, Lng: {:.4}", p.lat, p.lng)}</p>
                    })}
                </Show>
            </div>

            <button type="submit" class="btn btn-primary" disabled=busy>
                {move || if busy() { "Submitting..." } else { "Submit Report" }}
            </button>
        </form>
    }
}
