//! Point groups: the leaf container behind segments, routes and waypoint lists

use crate::aggregates::{self, Aggregates};
use crate::{NodeKind, Point, TrackNode};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Display color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::rgb(70, 130, 220)
    }
}

/// What a point group stands for inside its file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GroupKind {
    TrackSegment,
    Route,
    Waypoints,
}

/// An ordered sequence of points with cached statistics
///
/// The order of the points is the traversal order. The statistics are only
/// valid right after [`TrackNode::recompute`]; editing the points through
/// [`PointGroup::points_mut`] or [`PointGroup::push`] leaves them stale.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PointGroup {
    kind: GroupKind,
    pub name: Option<String>,
    pub color: Color,
    visible: bool,
    points: Vec<Point>,
    #[cfg_attr(feature = "serde", serde(skip, default))]
    aggregates: Aggregates,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl PointGroup {
    /// Create an empty, visible group
    pub fn new(kind: GroupKind) -> Self {
        Self {
            kind,
            name: None,
            color: Color::default(),
            visible: true,
            points: Vec::new(),
            aggregates: Aggregates::default(),
        }
    }

    /// Create a group holding the given points (statistics not yet computed)
    pub fn with_points(kind: GroupKind, points: Vec<Point>) -> Self {
        Self {
            points,
            ..Self::new(kind)
        }
    }

    #[inline]
    pub fn group_kind(&self) -> GroupKind {
        self.kind
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Mutable access to the point sequence; recompute afterwards
    #[inline]
    pub fn points_mut(&mut self) -> &mut Vec<Point> {
        &mut self.points
    }

    /// Append a point; recompute afterwards
    #[inline]
    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn start(&self) -> Option<&Point> {
        self.points.first()
    }

    #[inline]
    pub fn end(&self) -> Option<&Point> {
        self.points.last()
    }
}

impl TrackNode for PointGroup {
    fn kind(&self) -> NodeKind {
        NodeKind::PointGroup
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

    fn recompute(&mut self) {
        self.aggregates = aggregates::aggregate_points(&self.points);
        tracing::trace!(
            "Recomputed {:?} group: {} points, {:.1} m",
            self.kind,
            self.aggregates.num_points,
            self.aggregates.length_meters
        );
    }

    fn num_points(&self) -> usize {
        self.points.len()
    }
}
