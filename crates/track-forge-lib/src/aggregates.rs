//! Cached statistics and the aggregation pass
//!
//! Groups compute their statistics directly from their points
//! ([`aggregate_points`]). Every container above a group reduces the cached
//! statistics of its children ([`reduce`]), so children have to be recomputed
//! before their parent is reduced. The `recompute` implementations on the node
//! types take care of that order; the reduction helpers read whatever the
//! children currently hold.

use crate::{Point, utils};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Speed below which an interval counts as stopped (km/h)
pub const STOP_SPEED_KMPH: f64 = 1.0;

/// Geographic bounding box in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    /// Degenerate bounds containing a single point
    pub fn from_point(point: &Point) -> Self {
        Self {
            min_lat: point.lat(),
            max_lat: point.lat(),
            min_lon: point.lon(),
            max_lon: point.lon(),
        }
    }

    /// Bounds of a set of points, `None` if empty
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Self> {
        let mut points = points.into_iter();
        let mut bounds = Self::from_point(points.next()?);
        for point in points {
            bounds.expand(point);
        }
        Some(bounds)
    }

    /// Grow to include a point
    #[inline]
    pub fn expand(&mut self, point: &Point) {
        self.min_lat = self.min_lat.min(point.lat());
        self.max_lat = self.max_lat.max(point.lat());
        self.min_lon = self.min_lon.min(point.lon());
        self.max_lon = self.max_lon.max(point.lon());
    }

    /// Smallest bounds containing both
    #[inline]
    pub fn union(self, other: Bounds) -> Self {
        Self {
            min_lat: self.min_lat.min(other.min_lat),
            max_lat: self.max_lat.max(other.max_lat),
            min_lon: self.min_lon.min(other.min_lon),
            max_lon: self.max_lon.max(other.max_lon),
        }
    }

    /// Center as `(lat, lon)`
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

fn union_bounds(a: Option<Bounds>, b: Option<Bounds>) -> Option<Bounds> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.union(b)),
        (a, b) => a.or(b),
    }
}

fn min_opt(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn max_opt(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

/// Cached trip statistics of a node
///
/// Sums and maxima are zero for empty input. Values that only exist when the
/// data has them (bounds, elevations, times) are `None` instead.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aggregates {
    pub num_points: usize,
    /// Sum of the distances between consecutive points
    pub length_meters: f64,
    /// Time between the first and the last timestamp
    pub duration_ms: i64,
    /// Part of the duration spent above [`STOP_SPEED_KMPH`]
    pub moving_ms: i64,
    pub max_speed_kmph: f64,
    pub ele_min: Option<f64>,
    pub ele_max: Option<f64>,
    pub ele_start: Option<f64>,
    pub ele_end: Option<f64>,
    pub gross_rise_meters: f64,
    pub gross_fall_meters: f64,
    pub rise_time_ms: i64,
    pub fall_time_ms: i64,
    pub bounds: Option<Bounds>,
    pub start_time: Option<OffsetDateTime>,
    pub end_time: Option<OffsetDateTime>,
}

impl Aggregates {
    /// Average speed over the moving time in km/h
    pub fn avg_moving_speed_kmph(&self) -> f64 {
        if self.moving_ms > 0 {
            self.length_meters / (self.moving_ms as f64 / 1000.0) * utils::MPS_TO_KMH
        } else {
            0.0
        }
    }

    /// Fold the additive, extremal and spatial values of a child into self
    fn accumulate(&mut self, child: &Aggregates) {
        self.num_points += child.num_points;
        self.length_meters += child.length_meters;
        self.duration_ms += child.duration_ms;
        self.moving_ms += child.moving_ms;
        self.max_speed_kmph = self.max_speed_kmph.max(child.max_speed_kmph);
        self.ele_min = min_opt(self.ele_min, child.ele_min);
        self.ele_max = max_opt(self.ele_max, child.ele_max);
        self.gross_rise_meters += child.gross_rise_meters;
        self.gross_fall_meters += child.gross_fall_meters;
        self.rise_time_ms += child.rise_time_ms;
        self.fall_time_ms += child.fall_time_ms;
        self.bounds = union_bounds(self.bounds, child.bounds);
    }

    /// Include extra bounds without touching any other value
    pub(crate) fn include_bounds(&mut self, bounds: Option<Bounds>) {
        self.bounds = union_bounds(self.bounds, bounds);
    }
}

/// Statistics of an ordered point sequence
pub fn aggregate_points(points: &[Point]) -> Aggregates {
    #[cfg(feature = "profiling")]
    profiling::scope!("aggregates::aggregate_points");

    let mut agg = Aggregates {
        num_points: points.len(),
        ..Default::default()
    };

    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return agg;
    };

    let mut prev: Option<&Point> = None;
    // Last point with a usable elevation, for rise/fall
    let mut prev_ele: Option<(f64, Option<OffsetDateTime>)> = None;

    for point in points {
        if let Some(prev) = prev {
            let dist = prev.distance_to(point);
            agg.length_meters += dist;

            if let Some(ms) = utils::elapsed_ms(prev.time, point.time).filter(|ms| *ms > 0) {
                let kmph = dist / (ms as f64 / 1000.0) * utils::MPS_TO_KMH;
                agg.max_speed_kmph = agg.max_speed_kmph.max(kmph);
                if kmph >= STOP_SPEED_KMPH {
                    agg.moving_ms += ms;
                }
            }
        }

        if let Some(ele) = point.elevation() {
            agg.ele_min = min_opt(agg.ele_min, Some(ele));
            agg.ele_max = max_opt(agg.ele_max, Some(ele));

            if let Some((last_ele, last_time)) = prev_ele {
                let delta = ele - last_ele;
                let ms = utils::elapsed_ms(last_time, point.time)
                    .filter(|ms| *ms > 0)
                    .unwrap_or(0);
                if delta > 0.0 {
                    agg.gross_rise_meters += delta;
                    agg.rise_time_ms += ms;
                } else if delta < 0.0 {
                    agg.gross_fall_meters -= delta;
                    agg.fall_time_ms += ms;
                }
            }
            prev_ele = Some((ele, point.time));
        }

        prev = Some(point);
    }

    agg.bounds = Bounds::from_points(points);
    agg.ele_start = first.elevation();
    agg.ele_end = last.elevation();
    agg.start_time = points.iter().find_map(|p| p.time);
    agg.end_time = points.iter().rev().find_map(|p| p.time);
    agg.duration_ms = utils::elapsed_ms(agg.start_time, agg.end_time)
        .unwrap_or(0)
        .max(0);

    agg
}

/// Reduce already-recomputed children into their parent's statistics
///
/// Sums for lengths, durations and rise/fall, max for speed, min/max for
/// bounds and elevation. Start time and start elevation come from the first
/// child that has one, end time and end elevation from the last, so empty
/// children never blank them out.
pub fn reduce<'a>(children: impl IntoIterator<Item = &'a Aggregates>) -> Aggregates {
    let mut agg = Aggregates::default();

    for child in children {
        agg.accumulate(child);
        agg.start_time = agg.start_time.or(child.start_time);
        agg.ele_start = agg.ele_start.or(child.ele_start);
        agg.end_time = child.end_time.or(agg.end_time);
        agg.ele_end = child.ele_end.or(agg.ele_end);
    }

    agg
}
