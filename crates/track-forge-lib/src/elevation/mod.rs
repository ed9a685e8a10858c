//! Elevation repair
//!
//! Two independent operations on point groups:
//!
//! - [`cleanse`]: fill points carrying [`crate::ELE_SENTINEL`] by
//!   interpolating between their nearest valid neighbours along the path
//! - [`correct_elevation`]: replace every elevation with values looked up
//!   from an [`ElevationService`], in bounded chunks, with cancellation
//!
//! Both edit points in place; recompute the node afterwards.

mod cleanse;
mod correction;
#[cfg(feature = "http")]
mod http;
mod service;

pub use cleanse::{CleanseReport, cleanse, cleanse_node};
pub use correction::{
    CorrectionFailure, CorrectionReport, CorrectionStatus, correct_elevation, correct_node,
};
#[cfg(feature = "http")]
pub use http::HttpElevationService;
pub use service::{ElevationService, format_lat_lng_collection, parse_height_response};
