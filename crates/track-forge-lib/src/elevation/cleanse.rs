use crate::{GroupSelection, NodeMut, PointGroup, Result, TrackError};
use std::ops::AddAssign;

/// Outcome of a cleanse run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanseReport {
    /// Points that received an interpolated or copied elevation
    pub repaired: usize,
    /// Points still at the sentinel because a neighbour was missing
    pub unrepaired: usize,
    /// Points of groups without any valid elevation, left untouched
    pub unsolvable: usize,
}

impl CleanseReport {
    #[inline]
    pub fn is_unsolvable(&self) -> bool {
        self.unsolvable > 0
    }

    /// Turn an unsolvable outcome into [`TrackError::UnsolvableElevationGap`]
    pub fn check(self) -> Result<Self> {
        if self.is_unsolvable() {
            return Err(TrackError::UnsolvableElevationGap {
                points: self.unsolvable,
            });
        }
        Ok(self)
    }
}

impl AddAssign for CleanseReport {
    fn add_assign(&mut self, other: Self) {
        self.repaired += other.repaired;
        self.unrepaired += other.unrepaired;
        self.unsolvable += other.unsolvable;
    }
}

/// Fill missing elevations of a group
///
/// A missing start takes the first valid elevation found scanning forward, a
/// missing end the last one scanning backward. Every other missing elevation is
/// interpolated linearly over the path distance to the nearest valid point on
/// each side. Points are repaired front to back, so a repaired point serves as
/// the left neighbour of the next one.
///
/// A group without any valid elevation is left untouched and reported as
/// unsolvable. Recompute afterwards.
pub fn cleanse(group: &mut PointGroup) -> CleanseReport {
    #[cfg(feature = "profiling")]
    profiling::scope!("elevation::cleanse");

    let mut report = CleanseReport::default();
    let points = group.points_mut();
    if points.iter().all(|p| p.has_elevation()) {
        return report;
    }

    let first_valid = points.iter().find_map(|p| p.elevation());
    let last_valid = points.iter().rev().find_map(|p| p.elevation());
    let (Some(first_valid), Some(last_valid)) = (first_valid, last_valid) else {
        tracing::warn!(
            "No valid elevation in a group of {} points, nothing to interpolate from",
            points.len()
        );
        report.unsolvable = points.len();
        return report;
    };

    let last = points.len() - 1;
    if !points[0].has_elevation() {
        points[0].ele = first_valid;
        report.repaired += 1;
    }
    if !points[last].has_elevation() {
        points[last].ele = last_valid;
        report.repaired += 1;
    }

    for i in 1..last {
        if points[i].has_elevation() {
            continue;
        }

        let mut before = None;
        let mut dist_before = 0.0;
        for j in (0..i).rev() {
            dist_before += points[j].distance_to(&points[j + 1]);
            if let Some(ele) = points[j].elevation() {
                before = Some(ele);
                break;
            }
        }

        let mut after = None;
        let mut dist_after = 0.0;
        for j in i + 1..points.len() {
            dist_after += points[j - 1].distance_to(&points[j]);
            if let Some(ele) = points[j].elevation() {
                after = Some(ele);
                break;
            }
        }

        match (before, after) {
            (Some(before), Some(after)) => {
                let total = dist_before + dist_after;
                points[i].ele = if total > 0.0 {
                    before + dist_before / total * (after - before)
                } else {
                    before
                };
                report.repaired += 1;
            }
            _ => report.unrepaired += 1,
        }
    }

    tracing::debug!(
        "Cleansed {} elevations ({} left unrepaired)",
        report.repaired,
        report.unrepaired
    );
    report
}

/// Cleanse every point group below a node
///
/// Covers track segments, route points and free waypoints.
pub fn cleanse_node(node: NodeMut<'_>) -> CleanseReport {
    let mut report = CleanseReport::default();
    for group in node.point_groups_mut(GroupSelection::All) {
        report += cleanse(group);
    }
    report
}
