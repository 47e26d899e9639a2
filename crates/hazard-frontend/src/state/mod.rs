//! # Application State
//!
//! Shell-level reactive state: the active page. Page state (the report form
//! controller, the verified reports store) lives in the page components so
//! it is torn down with them.

use std::sync::OnceLock;

use hazard_client::ClientConfig;
use hazard_client::config::{DEFAULT_API_URL, DEFAULT_TILE_URL};
use leptos::prelude::*;

/// Global application state
#[derive(Clone, Copy, Debug)]
pub struct AppState {
    pub page: RwSignal<Page>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            page: RwSignal::new(Page::default()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Page {
    #[default]
    Report,
    Map,
}

impl Page {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Report => "Report a Hazard",
            Self::Map => "Verified Hazards",
        }
    }
}

/// Build-time configuration; the browser has no process environment
pub fn client_config() -> &'static ClientConfig {
    static CONFIG: OnceLock<ClientConfig> = OnceLock::new();
    CONFIG.get_or_init(|| {
        let mut config = ClientConfig::from_env()
            .with_api_url(option_env!("HAZARD_API_URL").unwrap_or(DEFAULT_API_URL));
        config.tile_url = option_env!("HAZARD_TILE_URL")
            .unwrap_or(DEFAULT_TILE_URL)
            .to_string();
        config
    })
}

pub fn provide_app_state() {
    let state = AppState::new();
    provide_context(state);
}

pub fn use_app_state() -> AppState {
    expect_context::<AppState>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_page_is_default() {
        assert_eq!(Page::default(), Page::Report);
        assert_ne!(Page::Report.label(), Page::Map.label());
    }
}
