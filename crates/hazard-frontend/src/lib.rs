//! # Hazard Watch Frontend
//!
//! Citizen-facing web client: report a hazard with a photo and a
//! draggable map location, or browse the verified hazards near you.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod components;
pub mod services;
pub mod state;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};

use components::*;
use state::*;

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    provide_app_state();
    let state = use_app_state();

    view! {
        <Title text=move || format!("Hazard Watch | {}", state.page.get().label()) />
        <div class="app-container">
            <Header />
            <main class="app-main">
                {move || match state.page.get() {
                    Page::Report => view! { <ReportForm /> }.into_any(),
                    Page::Map => view! { <HazardMap /> }.into_any(),
                }}
            </main>
        </div>
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    log::info!("Hazard Watch v{}", env!("CARGO_PKG_VERSION"));
    leptos::mount::mount_to_body(App);
}
