//! Track Forge Library - Core engine for hierarchical GPS track data
//!
//! This library holds a track file as an owned tree and provides the operations
//! that edit it in place: statistics aggregation, point thinning, multi-file
//! merging and elevation repair (local interpolation or a remote service).
//!
//! # Architecture
//!
//! - **[`Point`]**: One GPS sample with optional elevation, time and quality fields
//! - **[`PointGroup`]**: Ordered points with cached [`Aggregates`] (segments, routes, waypoints)
//! - **[`Track`]**, **[`Route`]**, **[`TrackFile`]**: The containers above a group
//! - **[`TrackNode`]** / **[`Node`]** / **[`NodeMut`]**: Common capabilities and the closed variant set
//! - **[`thinning`]**, **[`merge`]**, **[`elevation`]**: The engines that rewrite the tree
//! - **[`format`]**: Loading and saving trees through the [`TrackFormat`] interface
//!
//! # Recompute contract
//!
//! Cached aggregates are never updated implicitly. After any edit of a point
//! sequence (thinning, repair, merge, manual edits) the caller must call
//! [`TrackNode::recompute`] on the edited node or one of its ancestors.

pub mod aggregates;
pub mod cancel;
pub mod config;
pub mod elevation;
mod file;
pub mod format;
mod group;
pub mod merge;
mod node;
mod point;
mod route;
pub mod thinning;
mod track;
pub mod utils;

// Public API exports
pub use aggregates::{Aggregates, Bounds};
pub use cancel::CancellationToken;
pub use config::{ElevationConfig, EngineConfig, ThinningConfig};
pub use file::{DEFAULT_CREATOR, Metadata, TrackFile};
pub use format::{GpxFormat, TrackFormat};
pub use group::{Color, GroupKind, PointGroup};
pub use merge::{MERGED_FILE_NAME, MergePolicy};
pub use node::{GroupSelection, Node, NodeKind, NodeMut, ObjectCount, TrackNode};
pub use point::{ELE_SENTINEL, Point};
pub use route::{Link, Route};
pub use track::Track;

/// Error types for the track engine
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    #[error("Invalid coordinate: lat {lat}, lon {lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("No valid elevation in a group of {points} points")]
    UnsolvableElevationGap { points: usize },

    #[error("Elevation response size mismatch: requested {expected}, received {actual}")]
    ElevationResponseSizeMismatch { expected: usize, actual: usize },

    #[error("Elevation request of {points} points is too large for the service")]
    ElevationRequestTooLarge { points: usize },

    #[error("Elevation service error: {0}")]
    ElevationService(String),

    #[error("Cancelled after {corrected} points")]
    Cancelled { corrected: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("GPX error: {0}")]
    Gpx(#[from] gpx::errors::GpxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TrackError>;
