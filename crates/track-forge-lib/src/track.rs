//! Tracks: ordered lists of segments

use crate::aggregates::{self, Aggregates};
use crate::{Color, GroupKind, NodeKind, PointGroup, TrackNode};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A track made of segments, each segment being a [`PointGroup`]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Track {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Position of the track in its file (GPX `number`)
    pub number: Option<u32>,
    color: Color,
    visible: bool,
    segments: Vec<PointGroup>,
    #[cfg_attr(feature = "serde", serde(skip, default))]
    aggregates: Aggregates,
}

impl Default for Track {
    fn default() -> Self {
        Self::new()
    }
}

impl Track {
    /// Create an empty, visible track
    pub fn new() -> Self {
        Self {
            name: None,
            description: None,
            number: None,
            color: Color::default(),
            visible: true,
            segments: Vec::new(),
            aggregates: Aggregates::default(),
        }
    }

    /// Create a track from existing segments
    pub fn with_segments(segments: Vec<PointGroup>) -> Self {
        Self {
            segments,
            ..Self::new()
        }
    }

    #[inline]
    pub fn segments(&self) -> &[PointGroup] {
        &self.segments
    }

    /// Mutable access to the segment list; recompute afterwards
    #[inline]
    pub fn segments_mut(&mut self) -> &mut Vec<PointGroup> {
        &mut self.segments
    }

    /// Append a new empty segment in the track's color and return it
    pub fn add_segment(&mut self) -> &mut PointGroup {
        let mut segment = PointGroup::new(GroupKind::TrackSegment);
        segment.color = self.color;
        self.segments.push(segment);
        let last = self.segments.len() - 1;
        &mut self.segments[last]
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Set the color of the track and all of its segments
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        for segment in &mut self.segments {
            segment.color = color;
        }
    }
}

impl TrackNode for Track {
    fn kind(&self) -> NodeKind {
        NodeKind::Track
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
        for segment in &mut self.segments {
            segment.recompute();
        }
        self.aggregates = aggregates::reduce(self.segments.iter().map(|s| s.aggregates()));
    }

    fn num_points(&self) -> usize {
        self.segments.iter().map(|s| s.len()).sum()
    }
}
