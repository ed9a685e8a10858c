//! Common capabilities of every node and the closed set of node variants

use crate::{Aggregates, Bounds, GroupKind, PointGroup, Route, Track, TrackFile};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The fixed set of node types in a track hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NodeKind {
    TrackFile,
    Track,
    Route,
    PointGroup,
}

/// Capabilities shared by files, tracks, routes and point groups
pub trait TrackNode {
    fn kind(&self) -> NodeKind;

    /// Cached statistics, valid after the last [`TrackNode::recompute`]
    fn aggregates(&self) -> &Aggregates;

    fn bounds(&self) -> Option<Bounds> {
        self.aggregates().bounds
    }

    fn is_visible(&self) -> bool;

    fn set_visible(&mut self, visible: bool);

    /// Recompute the cached statistics of this node and everything below it
    fn recompute(&mut self);

    /// Number of points currently held below this node
    fn num_points(&self) -> usize;
}

/// Which point groups an operation walks over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupSelection {
    /// Track segments only
    TrackSegments,
    /// Track segments, route points and non-empty free waypoint lists
    All,
}

impl GroupSelection {
    fn includes(self, kind: GroupKind) -> bool {
        match self {
            GroupSelection::TrackSegments => kind == GroupKind::TrackSegment,
            GroupSelection::All => true,
        }
    }
}

/// Number of containers and points below a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObjectCount {
    /// Point groups: track segments, routes and a non-empty waypoint list
    pub items: usize,
    pub points: usize,
}

/// Shared reference to any node, for callers that branch on the node type
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    File(&'a TrackFile),
    Track(&'a Track),
    Route(&'a Route),
    Group(&'a PointGroup),
}

/// Exclusive reference to any node
#[derive(Debug)]
pub enum NodeMut<'a> {
    File(&'a mut TrackFile),
    Track(&'a mut Track),
    Route(&'a mut Route),
    Group(&'a mut PointGroup),
}

impl<'a> Node<'a> {
    pub fn as_track_node(&self) -> &'a dyn TrackNode {
        match *self {
            Node::File(f) => f,
            Node::Track(t) => t,
            Node::Route(r) => r,
            Node::Group(g) => g,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.as_track_node().kind()
    }

    /// Point groups below this node, in file order
    pub fn point_groups(&self, selection: GroupSelection) -> Vec<&'a PointGroup> {
        match *self {
            Node::File(file) => {
                let mut groups: Vec<&PointGroup> =
                    file.tracks().iter().flat_map(|t| t.segments()).collect();
                if selection == GroupSelection::All {
                    groups.extend(file.routes().iter().map(|r| r.group()));
                    if !file.waypoints().is_empty() {
                        groups.push(file.waypoints());
                    }
                }
                groups
            }
            Node::Track(track) => track.segments().iter().collect(),
            Node::Route(route) if selection == GroupSelection::All => vec![route.group()],
            Node::Route(_) => Vec::new(),
            Node::Group(group) if selection.includes(group.group_kind()) => vec![group],
            Node::Group(_) => Vec::new(),
        }
    }

    /// Count the containers and points below this node
    pub fn count_objects(&self) -> ObjectCount {
        let groups = self.point_groups(GroupSelection::All);
        let items = match *self {
            // A single group always counts as one item, even when empty
            Node::Route(_) | Node::Group(_) => 1,
            _ => groups.len(),
        };
        ObjectCount {
            items,
            points: self.as_track_node().num_points(),
        }
    }
}

impl<'a> NodeMut<'a> {
    pub fn as_track_node(&mut self) -> &mut dyn TrackNode {
        match self {
            NodeMut::File(f) => &mut **f,
            NodeMut::Track(t) => &mut **t,
            NodeMut::Route(r) => &mut **r,
            NodeMut::Group(g) => &mut **g,
        }
    }

    pub fn as_node(&self) -> Node<'_> {
        match self {
            NodeMut::File(f) => Node::File(f),
            NodeMut::Track(t) => Node::Track(t),
            NodeMut::Route(r) => Node::Route(r),
            NodeMut::Group(g) => Node::Group(g),
        }
    }

    /// Recompute the statistics of the node and everything below it
    pub fn recompute(&mut self) {
        self.as_track_node().recompute();
    }

    /// Mutable point groups below this node, in file order
    pub fn point_groups_mut(self, selection: GroupSelection) -> Vec<&'a mut PointGroup> {
        match self {
            NodeMut::File(file) => {
                let (tracks, routes, waypoints) = file.parts_mut();
                let mut groups: Vec<&mut PointGroup> = tracks
                    .iter_mut()
                    .flat_map(|t| t.segments_mut().iter_mut())
                    .collect();
                if selection == GroupSelection::All {
                    groups.extend(routes.iter_mut().map(|r| r.group_mut()));
                    if !waypoints.is_empty() {
                        groups.push(waypoints);
                    }
                }
                groups
            }
            NodeMut::Track(track) => track.segments_mut().iter_mut().collect(),
            NodeMut::Route(route) if selection == GroupSelection::All => vec![route.group_mut()],
            NodeMut::Route(_) => Vec::new(),
            NodeMut::Group(group) if selection.includes(group.group_kind()) => vec![group],
            NodeMut::Group(_) => Vec::new(),
        }
    }

    /// Remove the timestamp of every point below this node
    ///
    /// Returns the number of points that had a timestamp. Recompute afterwards.
    pub fn strip_timestamps(self) -> usize {
        let mut stripped = 0;
        for group in self.point_groups_mut(GroupSelection::All) {
            for point in group.points_mut() {
                if point.time.take().is_some() {
                    stripped += 1;
                }
            }
        }
        tracing::debug!("Removed {} timestamps", stripped);
        stripped
    }
}

impl<'a> From<&'a TrackFile> for Node<'a> {
    fn from(file: &'a TrackFile) -> Self {
        Node::File(file)
    }
}

impl<'a> From<&'a Track> for Node<'a> {
    fn from(track: &'a Track) -> Self {
        Node::Track(track)
    }
}

impl<'a> From<&'a Route> for Node<'a> {
    fn from(route: &'a Route) -> Self {
        Node::Route(route)
    }
}

impl<'a> From<&'a PointGroup> for Node<'a> {
    fn from(group: &'a PointGroup) -> Self {
        Node::Group(group)
    }
}

impl<'a> From<&'a mut TrackFile> for NodeMut<'a> {
    fn from(file: &'a mut TrackFile) -> Self {
        NodeMut::File(file)
    }
}

impl<'a> From<&'a mut Track> for NodeMut<'a> {
    fn from(track: &'a mut Track) -> Self {
        NodeMut::Track(track)
    }
}

impl<'a> From<&'a mut Route> for NodeMut<'a> {
    fn from(route: &'a mut Route) -> Self {
        NodeMut::Route(route)
    }
}

impl<'a> From<&'a mut PointGroup> for NodeMut<'a> {
    fn from(group: &'a mut PointGroup) -> Self {
        NodeMut::Group(group)
    }
}
