//! Point thinning
//!
//! Removes points that lie closer than a minimum distance to the last retained
//! point, measured along the path. Recorders standing still produce clouds of
//! such points; removing them leaves the shape of the track intact.

use crate::{GroupSelection, NodeMut, Point, PointGroup};

/// Thin a point group in place and return the number of removed points
///
/// Passes are repeated until one removes nothing, so the result is a fixed
/// point: every retained point except the last is at least
/// `min_distance_meters` away from its predecessor. The first and the last
/// point are never removed and the order is preserved.
///
/// A threshold that is not a positive finite number, or a group of fewer than
/// three points, leaves the group untouched. Recompute afterwards.
pub fn thin(group: &mut PointGroup, min_distance_meters: f64) -> usize {
    #[cfg(feature = "profiling")]
    profiling::scope!("thinning::thin");

    if !min_distance_meters.is_finite() || min_distance_meters <= 0.0 {
        return 0;
    }

    let points = group.points_mut();
    let original = points.len();
    let mut passes = 0;

    while points.len() >= 3 {
        let keep = thinning_pass(points, min_distance_meters);
        let before = points.len();
        let mut flags = keep.into_iter();
        points.retain(|_| flags.next().unwrap_or(true));
        passes += 1;
        if points.len() == before {
            break;
        }
    }

    let removed = original - points.len();
    tracing::debug!(
        "Thinned {} of {} points in {} passes (min distance {} m)",
        removed,
        original,
        passes,
        min_distance_meters
    );
    removed
}

/// One sweep over the points; returns which points to keep
fn thinning_pass(points: &[Point], min_distance_meters: f64) -> Vec<bool> {
    let mut keep = vec![true; points.len()];
    let last = points.len().saturating_sub(1);
    // Path distance since the last retained point
    let mut accumulated = 0.0;

    for i in 1..last {
        accumulated += points[i - 1].distance_to(&points[i]);
        if accumulated < min_distance_meters {
            keep[i] = false;
        } else {
            accumulated = 0.0;
        }
    }

    keep
}

/// Thin every track segment below a node
///
/// A file or a track thins its track segments. A route or a single group is
/// thinned itself. Returns the total number of removed points.
pub fn thin_node(node: NodeMut<'_>, min_distance_meters: f64) -> usize {
    let groups = match node {
        NodeMut::Route(route) => vec![route.group_mut()],
        NodeMut::Group(group) => vec![group],
        other => other.point_groups_mut(GroupSelection::TrackSegments),
    };

    groups
        .into_iter()
        .map(|group| thin(group, min_distance_meters))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GroupKind, Track, TrackFile, TrackNode};

    /// Degrees of latitude per meter on the haversine sphere
    const DEG_PER_METER: f64 = 1.0 / 111_195.08;

    fn create_test_group(offsets_meters: &[f64]) -> PointGroup {
        let points = offsets_meters
            .iter()
            .map(|m| Point::new(45.0 + m * DEG_PER_METER, 7.0).unwrap())
            .collect();
        PointGroup::with_points(GroupKind::TrackSegment, points)
    }

    fn create_evenly_spaced_group(count: usize, spacing_meters: f64) -> PointGroup {
        let offsets: Vec<f64> = (0..count).map(|i| i as f64 * spacing_meters).collect();
        create_test_group(&offsets)
    }

    fn assert_spans_at_least(group: &PointGroup, min: f64) {
        let points = group.points();
        let last = points.len() - 1;
        for i in 1..last {
            let span = points[i - 1].distance_to(&points[i]);
            assert!(span >= min, "span {} before point {} is below {}", span, i, min);
        }
    }

    #[test]
    fn test_thin_keeps_every_third_point() {
        let mut group = create_evenly_spaced_group(11, 0.5);
        let first = group.start().cloned();
        let last = group.end().cloned();

        let removed = thin(&mut group, 1.2);

        assert_eq!(removed, 6);
        assert_eq!(group.len(), 5);
        assert_eq!(group.start().cloned(), first);
        assert_eq!(group.end().cloned(), last);
        assert_spans_at_least(&group, 1.2);
    }

    #[test]
    fn test_thin_is_idempotent() {
        let mut group = create_evenly_spaced_group(50, 0.3);
        thin(&mut group, 1.0);
        let after_first = group.clone();
        assert_eq!(thin(&mut group, 1.0), 0);
        assert_eq!(group, after_first);
    }

    #[test]
    fn test_thin_collapses_drift() {
        // Standing still: jitter between two spots 0.3 m apart, then moving off
        let mut offsets: Vec<f64> = (0..9).map(|i| if i % 2 == 0 { 0.0 } else { 0.3 }).collect();
        offsets.push(10.0);
        let mut group = create_test_group(&offsets);

        let removed = thin(&mut group, 1.0);

        assert_eq!(removed, 8);
        assert_eq!(group.len(), 2);
        assert_spans_at_least(&group, 1.0);
    }

    #[test]
    fn test_thin_noop_cases() {
        let mut group = create_evenly_spaced_group(10, 0.1);
        assert_eq!(thin(&mut group, 0.0), 0);
        assert_eq!(thin(&mut group, -5.0), 0);
        assert_eq!(thin(&mut group, f64::NAN), 0);
        assert_eq!(thin(&mut group, f64::INFINITY), 0);
        assert_eq!(group.len(), 10);

        let mut pair = create_evenly_spaced_group(2, 0.1);
        assert_eq!(thin(&mut pair, 100.0), 0);
        assert_eq!(pair.len(), 2);
    }

    #[test]
    fn test_thin_node_only_touches_track_segments() {
        let mut file = TrackFile::named("Thin");
        let mut track = Track::new();
        track.segments_mut().push(create_evenly_spaced_group(11, 0.5));
        track.segments_mut().push(create_evenly_spaced_group(11, 0.5));
        file.tracks_mut().push(track);
        let route_points = create_evenly_spaced_group(11, 0.5).points().to_vec();
        file.add_route().group_mut().points_mut().extend(route_points);

        let removed = thin_node(NodeMut::from(&mut file), 1.2);

        assert_eq!(removed, 12);
        assert_eq!(file.num_track_points(), 10);
        assert_eq!(file.num_route_points(), 11);

        let route = &mut file.routes_mut()[0];
        assert_eq!(thin_node(NodeMut::from(route), 1.2), 6);

        file.recompute();
        assert_eq!(file.aggregates().num_points, 15);
    }
}
