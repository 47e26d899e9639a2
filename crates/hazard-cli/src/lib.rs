//! # Hazard CLI
//!
//! Terminal front end for the hazard reporting client core.
//!
//! ## Features
//!
//! - Submit a report from operator-supplied coordinates and an optional photo
//! - Interactive confirmation, skippable for scripts
//! - List verified hazards with priority and status

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod attachment;
pub mod location;
pub mod prompt;
pub mod render;

pub use attachment::load_attachment;
pub use location::FixedLocation;
pub use prompt::TerminalConfirmation;
