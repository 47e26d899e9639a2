//! # Header Component
//!
//! Top bar with the logo, page switcher and session badge.

use leptos::prelude::*;

use crate::services::request_context;
use crate::state::{Page, use_app_state};

const PAGES: [Page; 2] = [Page::Report, Page::Map];

#[component]
pub fn Header() -> impl IntoView {
    let state = use_app_state();
    // credential is re-read on page switch; sign-in happens elsewhere
    let signed_in = move || {
        state.page.track();
        request_context().has_credential()
    };

    view! {
        <header class="app-header">
            <div class="logo">
                <svg class="logo-icon" viewBox="0 0 24 24" fill="currentColor">
                    <path d="M1 21h22L12 2 1 21zm12-3h-2v-2h2v2zm0-4h-2v-4h2v4z"/>
                </svg>
                <div>
                    <div class="logo-text">"HAZARD WATCH"</div>
                    <div class="logo-subtitle">"Citizen hazard reporting"</div>
                </div>
            </div>

            <nav class="flex items-center gap-sm">
                {PAGES
                    .into_iter()
                    .map(|page| view! {
                        <button
                            class="btn nav-tab"
                            class:active=move || state.page.get() == page
                            on:click=move |_| state.page.set(page)
                        >
                            {page.label()}
                        </button>
                    })
                    .collect_view()}
            </nav>

            <div class="status-badge" class:nominal=signed_in>
                <span class="status-dot" class:nominal=signed_in></span>
                {move || if signed_in() { "SIGNED IN" } else { "GUEST" }}
            </div>
        </header>
    }
}
