//! # UI Components Module
//!
//! Leptos components for the report form and the verified hazard map.

pub mod hazard_map;
pub mod header;
pub mod leaflet;
pub mod location_picker;
pub mod report_form;

pub use hazard_map::*;
pub use header::*;
pub use location_picker::*;
pub use report_form::*;
