//! St. Louis Fed data library: typed facades over FRED, ALFRED, GeoFRED
//! and FRASER, with input validation and record mapping.
//!
//! Errors are the [`stlouisfed_api::Error`] taxonomy throughout.

pub mod fraser;
pub mod fred;
pub mod geofred;
pub mod mapping;
pub mod validation;

pub use fraser::Fraser;
pub use fred::{Alfred, Fred};
pub use geofred::GeoFred;

pub use stlouisfed_api;
pub use stlouisfed_api::types;
pub use stlouisfed_api::Error;
