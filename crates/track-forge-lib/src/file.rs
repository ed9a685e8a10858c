//! Track files: the root of the hierarchy

use crate::aggregates::{self, Aggregates};
use crate::{GroupKind, Link, NodeKind, PointGroup, Route, Track, TrackNode};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Creator written into files produced by this library
pub const DEFAULT_CREATOR: &str = "track-forge";

/// File-level metadata
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Metadata {
    pub name: Option<String>,
    pub description: Option<String>,
    pub creator: String,
    /// Recording time of the file
    pub time: Option<OffsetDateTime>,
    pub links: Vec<Link>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            name: None,
            description: None,
            creator: DEFAULT_CREATOR.to_string(),
            time: None,
            links: Vec::new(),
        }
    }
}

/// Root container: tracks, routes and one group of free waypoints
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackFile {
    pub metadata: Metadata,
    visible: bool,
    tracks: Vec<Track>,
    routes: Vec<Route>,
    waypoints: PointGroup,
    #[cfg_attr(feature = "serde", serde(skip, default))]
    aggregates: Aggregates,
}

impl Default for TrackFile {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl TrackFile {
    /// Create an empty, visible file
    pub fn new() -> Self {
        Self {
            metadata: Metadata::default(),
            visible: true,
            tracks: Vec::new(),
            routes: Vec::new(),
            waypoints: PointGroup::new(GroupKind::Waypoints),
            aggregates: Aggregates::default(),
        }
    }

    /// Create an empty file with a name
    pub fn named(name: impl Into<String>) -> Self {
        let mut file = Self::new();
        file.metadata.name = Some(name.into());
        file
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.metadata.name.as_deref()
    }

    #[inline]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Mutable access to the track list; recompute afterwards
    #[inline]
    pub fn tracks_mut(&mut self) -> &mut Vec<Track> {
        &mut self.tracks
    }

    #[inline]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Mutable access to the route list; recompute afterwards
    #[inline]
    pub fn routes_mut(&mut self) -> &mut Vec<Route> {
        &mut self.routes
    }

    /// Free waypoints (markers) of the file
    #[inline]
    pub fn waypoints(&self) -> &PointGroup {
        &self.waypoints
    }

    #[inline]
    pub fn waypoints_mut(&mut self) -> &mut PointGroup {
        &mut self.waypoints
    }

    /// Append a new empty route named after the file and return it
    pub fn add_route(&mut self) -> &mut Route {
        let mut route = Route::new();
        route.name = self.metadata.name.clone();
        self.routes.push(route);
        let last = self.routes.len() - 1;
        &mut self.routes[last]
    }

    /// Split borrow of all children at once
    pub(crate) fn parts_mut(&mut self) -> (&mut Vec<Track>, &mut Vec<Route>, &mut PointGroup) {
        (&mut self.tracks, &mut self.routes, &mut self.waypoints)
    }

    pub fn num_track_points(&self) -> usize {
        self.tracks.iter().map(|t| t.num_points()).sum()
    }

    pub fn num_route_points(&self) -> usize {
        self.routes.iter().map(|r| r.num_points()).sum()
    }

    pub fn num_waypoints(&self) -> usize {
        self.waypoints.len()
    }
}

impl TrackNode for TrackFile {
    fn kind(&self) -> NodeKind {
        NodeKind::TrackFile
    }

    fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Recompute every child, then reduce tracks and routes
    ///
    /// Free waypoints only contribute their bounding box: they are not a
    /// traversal path, so they add no length or time.
    fn recompute(&mut self) {
        self.waypoints.recompute();
        for route in &mut self.routes {
            route.recompute();
        }
        for track in &mut self.tracks {
            track.recompute();
        }

        let children = self
            .tracks
            .iter()
            .map(|t| t.aggregates())
            .chain(self.routes.iter().map(|r| r.aggregates()));
        let mut agg = aggregates::reduce(children);
        agg.include_bounds(self.waypoints.aggregates().bounds);
        self.aggregates = agg;

        // Without an explicit recording time, the file is dated by its first timed track point
        if self.metadata.time.is_none() {
            self.metadata.time = self.tracks.iter().find_map(|t| t.aggregates().start_time);
        }

        tracing::debug!(
            "Recomputed file {:?}: {} tracks, {} routes, {:.1} m",
            self.metadata.name,
            self.tracks.len(),
            self.routes.len(),
            self.aggregates.length_meters
        );
    }

    fn num_points(&self) -> usize {
        self.num_track_points() + self.num_route_points() + self.num_waypoints()
    }
}
