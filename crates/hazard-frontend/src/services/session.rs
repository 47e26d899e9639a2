//! # Session Credential
//!
//! Bearer token left in local storage by the sign-in flow.

use gloo_storage::{LocalStorage, Storage};
use hazard_client::{CredentialStore, RequestContext};

use crate::state::client_config;

pub const TOKEN_KEY: &str = "token";

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionCredential;

impl CredentialStore for SessionCredential {
    fn bearer_token(&self) -> Option<String> {
        // accept both JSON-encoded and raw values
        LocalStorage::get::<String>(TOKEN_KEY)
            .ok()
            .or_else(|| LocalStorage::raw().get_item(TOKEN_KEY).ok().flatten())
    }
}

/// Context for one request, read fresh so sign-in/out takes effect
pub fn request_context() -> RequestContext {
    RequestContext::from_store(client_config().api_url.as_str(), &SessionCredential)
}
