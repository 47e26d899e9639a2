//! # Services Module
//!
//! Browser implementations of the client-core capabilities: HTTP transport,
//! device geolocation and the session credential.

pub mod api;
pub mod geolocation;
pub mod session;

pub use api::*;
pub use geolocation::*;
pub use session::*;
