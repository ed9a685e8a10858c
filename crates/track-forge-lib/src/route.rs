//! Routes: a single named point group with route metadata

use crate::{Aggregates, GroupKind, NodeKind, Point, PointGroup, TrackNode};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Hyperlink attached to a route or file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Link {
    pub href: String,
    pub text: Option<String>,
}

/// A planned route
///
/// For statistics a route behaves like a track with exactly one segment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Route {
    pub name: Option<String>,
    pub number: Option<u32>,
    pub description: Option<String>,
    pub links: Vec<Link>,
    group: PointGroup,
}

impl Default for Route {
    fn default() -> Self {
        Self::new()
    }
}

impl Route {
    pub fn new() -> Self {
        Self::with_points(Vec::new())
    }

    pub fn with_points(points: Vec<Point>) -> Self {
        Self {
            name: None,
            number: None,
            description: None,
            links: Vec::new(),
            group: PointGroup::with_points(GroupKind::Route, points),
        }
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        self.group.points()
    }

    #[inline]
    pub fn group(&self) -> &PointGroup {
        &self.group
    }

    /// Mutable access to the route's points; recompute afterwards
    #[inline]
    pub fn group_mut(&mut self) -> &mut PointGroup {
        &mut self.group
    }
}

impl TrackNode for Route {
    fn kind(&self) -> NodeKind {
        NodeKind::Route
    }

    fn aggregates(&self) -> &Aggregates {
        self.group.aggregates()
    }

    fn is_visible(&self) -> bool {
        self.group.is_visible()
    }

    fn set_visible(&mut self, visible: bool) {
        self.group.set_visible(visible);
    }

    fn recompute(&mut self) {
        self.group.recompute();
    }

    fn num_points(&self) -> usize {
        self.group.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_statistics_match_group() {
        let points = vec![
            Point::new(45.0, 7.0).unwrap().with_elevation(500.0),
            Point::new(45.01, 7.0).unwrap().with_elevation(550.0),
        ];
        let mut route = Route::with_points(points);
        route.name = Some("Col".to_string());
        route.recompute();

        assert_eq!(route.num_points(), 2);
        assert_eq!(route.aggregates(), route.group().aggregates());
        assert_eq!(route.aggregates().gross_rise_meters, 50.0);
        assert_eq!(route.group().group_kind(), GroupKind::Route);
    }

    #[test]
    fn test_route_visibility() {
        let mut route = Route::new();
        assert!(route.is_visible());
        route.set_visible(false);
        assert!(!route.group().is_visible());
    }
}
