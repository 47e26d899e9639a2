//! # Request Context
//!
//! Explicit per-request dependencies for the reports API: the backend base
//! URL and the caller's bearer credential. The credential lives in session
//! storage owned by the login flow; this crate only reads it.

/// Source of the session's bearer token
pub trait CredentialStore {
    /// Current token, `None` when signed out
    fn bearer_token(&self) -> Option<String>;
}

/// Fixed credential, used by the CLI and tests
#[derive(Debug, Clone, Default)]
pub struct StaticCredential(pub Option<String>);

impl CredentialStore for StaticCredential {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Everything an outgoing backend request needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    base_url: String,
    credential: Option<String>,
}

impl RequestContext {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credential: None,
        }
    }

    /// Blank tokens are treated as absent
    #[must_use]
    pub fn with_credential(mut self, token: Option<String>) -> Self {
        self.credential = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Snapshot the store's current token
    pub fn from_store(base_url: impl Into<String>, store: &impl CredentialStore) -> Self {
        Self::new(base_url).with_credential(store.bearer_token())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Absolute URL for an API path such as `/reports/create`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `Authorization` header value, omitted when there is no credential
    pub fn authorization(&self) -> Option<String> {
        self.credential.as_ref().map(|token| format!("Bearer {token}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_paths() {
        let ctx = RequestContext::new("http://localhost:5000/");
        assert_eq!(ctx.endpoint("/reports/create"), "http://localhost:5000/reports/create");
        assert_eq!(ctx.endpoint("reports/verified"), "http://localhost:5000/reports/verified");
    }

    #[test]
    fn test_missing_credential_omits_header() {
        let ctx = RequestContext::from_store("http://localhost:5000", &StaticCredential(None));
        assert!(!ctx.has_credential());
        assert!(ctx.authorization().is_none());

        let ctx = RequestContext::new("http://localhost:5000").with_credential(Some("  ".into()));
        assert!(ctx.authorization().is_none());
    }

    #[test]
    fn test_bearer_header() {
        let store = StaticCredential(Some("abc.def".into()));
        let ctx = RequestContext::from_store("http://localhost:5000", &store);
        assert_eq!(ctx.authorization().as_deref(), Some("Bearer abc.def"));
    }
}
