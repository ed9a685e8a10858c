//! Merging several track files into one
//!
//! Invisible files, tracks and segments contribute nothing to the output, not
//! even empty placeholders. Routes are not merged. The output is a fresh tree:
//! every point is a deep copy. Aggregates of the output are stale until the
//! caller recomputes it.

use crate::{GroupKind, PointGroup, Track, TrackFile, TrackNode, utils};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Name given to every merged file
pub const MERGED_FILE_NAME: &str = "Merged GPX";

/// How the tracks of the input files are flattened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MergePolicy {
    /// Every visible track becomes one output track, renumbered from 1
    IntoTracks,
    /// Every visible segment becomes a segment of one output track
    IntoMulti,
    /// Every visible point goes into one time-sorted segment of one output track
    IntoSingle,
}

/// Merge files under the given policy
///
/// Free waypoints of a visible file are copied when its waypoint group is
/// visible too. They are sorted by time for [`MergePolicy::IntoTracks`] and
/// [`MergePolicy::IntoSingle`], and kept in input order for
/// [`MergePolicy::IntoMulti`].
pub fn merge(files: &[TrackFile], policy: MergePolicy) -> TrackFile {
    #[cfg(feature = "profiling")]
    profiling::scope!("merge::merge");

    let mut merged = TrackFile::named(MERGED_FILE_NAME);
    let visible_files = || files.iter().filter(|f| f.is_visible());

    match policy {
        MergePolicy::IntoTracks => {
            let tracks = visible_files().flat_map(|f| f.tracks()).filter(|t| t.is_visible());
            for (index, track) in tracks.enumerate() {
                let mut copy = Track::with_segments(visible_segments(track).cloned().collect());
                copy.name = track.name.clone();
                copy.description = track.description.clone();
                copy.number = u32::try_from(index + 1).ok();
                copy.set_color(track.color());
                merged.tracks_mut().push(copy);
            }
        }
        MergePolicy::IntoMulti => {
            let segments: Vec<PointGroup> = visible_files()
                .flat_map(|f| f.tracks())
                .filter(|t| t.is_visible())
                .flat_map(visible_segments)
                .cloned()
                .collect();
            if !segments.is_empty() {
                merged.tracks_mut().push(Track::with_segments(segments));
            }
        }
        MergePolicy::IntoSingle => {
            let mut segment = PointGroup::new(GroupKind::TrackSegment);
            segment.points_mut().extend(
                visible_files()
                    .flat_map(|f| f.tracks())
                    .filter(|t| t.is_visible())
                    .flat_map(visible_segments)
                    .flat_map(|s| s.points())
                    .cloned(),
            );
            if !segment.is_empty() {
                utils::sort_by_time(segment.points_mut());
                merged.tracks_mut().push(Track::with_segments(vec![segment]));
            }
        }
    }

    for file in visible_files().filter(|f| f.waypoints().is_visible()) {
        merged
            .waypoints_mut()
            .points_mut()
            .extend(file.waypoints().points().iter().cloned());
    }
    if policy != MergePolicy::IntoMulti {
        utils::sort_by_time(merged.waypoints_mut().points_mut());
    }

    tracing::info!(
        "Merged {} files ({:?}): {} tracks, {} track points, {} waypoints",
        files.len(),
        policy,
        merged.tracks().len(),
        merged.num_track_points(),
        merged.num_waypoints()
    );

    merged
}

fn visible_segments(track: &Track) -> impl Iterator<Item = &PointGroup> {
    track.segments().iter().filter(|s| s.is_visible())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;
    use time::Duration;
    use time::macros::datetime;

    fn create_test_point(lat: f64, secs: Option<i64>) -> Point {
        let point = Point::new(lat, 8.0).unwrap().with_elevation(400.0);
        match secs {
            Some(secs) => point.with_time(datetime!(2024-03-10 10:00:00 UTC) + Duration::seconds(secs)),
            None => point,
        }
    }

    /// A file whose tracks have `segments[t]` segments of `points` points each,
    /// with timestamps starting at `start_secs`
    fn create_test_file(name: &str, segments: &[usize], points: usize, start_secs: i64) -> TrackFile {
        let mut file = TrackFile::named(name);
        let mut secs = start_secs;
        for (t, &segment_count) in segments.iter().enumerate() {
            let mut track = Track::new();
            track.name = Some(format!("{} track {}", name, t));
            for _ in 0..segment_count {
                let segment = track.add_segment();
                for _ in 0..points {
                    segment.push(create_test_point(46.0 + secs as f64 * 1e-5, Some(secs)));
                    secs += 10;
                }
            }
            file.tracks_mut().push(track);
        }
        file.waypoints_mut()
            .push(create_test_point(46.5, Some(start_secs + 5)).with_name(name));
        file
    }

    fn is_time_sorted(points: &[Point]) -> bool {
        points
            .iter()
            .filter_map(|p| p.time)
            .collect::<Vec<_>>()
            .windows(2)
            .all(|w| w[0] <= w[1])
    }

    #[test]
    fn test_into_tracks_preserves_structure() {
        let files = vec![
            create_test_file("a", &[2, 1], 3, 0),
            create_test_file("b", &[3], 4, 1000),
        ];
        let merged = merge(&files, MergePolicy::IntoTracks);

        assert_eq!(merged.name(), Some(MERGED_FILE_NAME));
        assert_eq!(merged.tracks().len(), 3);
        let sources: Vec<&Track> = files.iter().flat_map(|f| f.tracks()).collect();
        for (index, (out, src)) in merged.tracks().iter().zip(sources).enumerate() {
            assert_eq!(out.number, Some(index as u32 + 1));
            assert_eq!(out.name, src.name);
            assert_eq!(out.segments().len(), src.segments().len());
            assert_eq!(out.num_points(), src.num_points());
        }
        assert!(merged.routes().is_empty());
        assert_eq!(merged.num_waypoints(), 2);
    }

    #[test]
    fn test_invisible_nodes_contribute_nothing() {
        let mut hidden_file = create_test_file("hidden", &[1], 5, 0);
        hidden_file.set_visible(false);

        let mut partly_hidden = create_test_file("partly", &[2, 1], 2, 500);
        partly_hidden.tracks_mut()[1].set_visible(false);
        partly_hidden.tracks_mut()[0].segments_mut()[1].set_visible(false);
        partly_hidden.waypoints_mut().set_visible(false);

        let files = vec![hidden_file, partly_hidden];

        let tracks = merge(&files, MergePolicy::IntoTracks);
        assert_eq!(tracks.tracks().len(), 1);
        assert_eq!(tracks.tracks()[0].segments().len(), 1);
        assert_eq!(tracks.num_waypoints(), 0);

        let multi = merge(&files, MergePolicy::IntoMulti);
        assert_eq!(multi.tracks().len(), 1);
        assert_eq!(multi.num_track_points(), 2);

        let single = merge(&files, MergePolicy::IntoSingle);
        assert_eq!(single.num_track_points(), 2);
    }

    #[test]
    fn test_into_multi_keeps_segment_boundaries() {
        let files = vec![
            create_test_file("a", &[2, 1], 3, 0),
            create_test_file("b", &[3], 4, 1000),
        ];
        let merged = merge(&files, MergePolicy::IntoMulti);

        assert_eq!(merged.tracks().len(), 1);
        assert_eq!(merged.tracks()[0].segments().len(), 6);
        assert_eq!(merged.num_track_points(), 3 * 3 + 3 * 4);
    }

    #[test]
    fn test_into_single_is_time_sorted() {
        // Second file recorded earlier than the first
        let files = vec![
            create_test_file("late", &[1, 1], 5, 10_000),
            create_test_file("early", &[2], 5, 0),
        ];
        let merged = merge(&files, MergePolicy::IntoSingle);

        assert_eq!(merged.tracks().len(), 1);
        let segments = merged.tracks()[0].segments();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].len(), 20);
        assert!(is_time_sorted(segments[0].points()));
        assert_eq!(
            segments[0].start().and_then(|p| p.time),
            Some(datetime!(2024-03-10 10:00:00 UTC))
        );
    }

    #[test]
    fn test_waypoint_sorting_depends_on_policy() {
        let files = vec![
            create_test_file("late", &[1], 2, 10_000),
            create_test_file("early", &[1], 2, 0),
        ];
        let names = |file: &TrackFile| -> Vec<Option<String>> {
            file.waypoints().points().iter().map(|p| p.name.clone()).collect()
        };
        let early_first = vec![Some("early".to_string()), Some("late".to_string())];
        let input_order = vec![Some("late".to_string()), Some("early".to_string())];

        assert_eq!(names(&merge(&files, MergePolicy::IntoTracks)), early_first);
        assert_eq!(names(&merge(&files, MergePolicy::IntoSingle)), early_first);
        assert_eq!(names(&merge(&files, MergePolicy::IntoMulti)), input_order);
    }

    #[test]
    fn test_empty_inputs() {
        for policy in [MergePolicy::IntoTracks, MergePolicy::IntoMulti, MergePolicy::IntoSingle] {
            let merged = merge(&[], policy);
            assert_eq!(merged.name(), Some(MERGED_FILE_NAME));
            assert!(merged.tracks().is_empty());
            assert_eq!(merged.num_waypoints(), 0);
        }

        // A track without points yields no single-segment output
        let mut file = TrackFile::new();
        file.tracks_mut().push(Track::new());
        assert!(merge(std::slice::from_ref(&file), MergePolicy::IntoSingle).tracks().is_empty());
        assert!(merge(std::slice::from_ref(&file), MergePolicy::IntoMulti).tracks().is_empty());
        assert_eq!(merge(std::slice::from_ref(&file), MergePolicy::IntoTracks).tracks().len(), 1);
    }

    #[test]
    fn test_merge_is_deep_copy() {
        let files = vec![create_test_file("a", &[1], 3, 0)];
        let mut merged = merge(&files, MergePolicy::IntoTracks);
        merged.tracks_mut()[0].segments_mut()[0].points_mut().clear();
        assert_eq!(files[0].num_track_points(), 3);

        merged.recompute();
        assert_eq!(merged.aggregates().num_points, 0);
    }
}
