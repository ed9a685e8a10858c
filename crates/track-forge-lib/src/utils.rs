//! Utility functions for distances, timestamps and ordering

use crate::Point;
use geo::{Distance as _, Haversine};
use time::OffsetDateTime;

/// Meters per second to kilometers per hour
pub const MPS_TO_KMH: f64 = 3.6;

/// Check that a coordinate is finite and inside the WGS84 range
#[inline(always)]
pub fn is_valid_coordinate(lat: f64, lon: f64) -> bool {
    lat.is_finite()
        && lon.is_finite()
        && (-90.0..=90.0).contains(&lat)
        && (-180.0..=180.0).contains(&lon)
}

/// Haversine distance between two points in meters
#[inline(always)]
pub fn haversine_distance(p1: &Point, p2: &Point) -> f64 {
    Haversine.distance(p1.geo_point(), p2.geo_point())
}

/// Milliseconds from `from` to `to`, if both are present
///
/// Negative when the timestamps run backwards.
#[inline]
pub fn elapsed_ms(from: Option<OffsetDateTime>, to: Option<OffsetDateTime>) -> Option<i64> {
    let (from, to) = (from?, to?);
    Some((to - from).whole_milliseconds() as i64)
}

/// Stable sort of points by timestamp
///
/// Points without a timestamp stay in their slot; the timestamped points are
/// ordered among the remaining slots. The result is non-decreasing over the
/// timestamped points.
pub fn sort_by_time(points: &mut [Point]) {
    let slots: Vec<usize> = points
        .iter()
        .enumerate()
        .filter(|(_, p)| p.time.is_some())
        .map(|(i, _)| i)
        .collect();

    let mut timed: Vec<Point> = slots.iter().map(|&i| points[i].clone()).collect();
    timed.sort_by_key(|p| p.time);

    for (slot, point) in slots.into_iter().zip(timed) {
        points[slot] = point;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn create_test_point(lat: f64, lon: f64) -> Point {
        Point::new(lat, lon).unwrap()
    }

    #[test]
    fn test_is_valid_coordinate() {
        assert!(is_valid_coordinate(0.0, 0.0));
        assert!(is_valid_coordinate(90.0, -180.0));
        assert!(!is_valid_coordinate(90.0001, 0.0));
        assert!(!is_valid_coordinate(0.0, f64::INFINITY));
    }

    #[test]
    fn test_elapsed_ms() {
        let a = datetime!(2024-01-01 00:00:00 UTC);
        let b = datetime!(2024-01-01 00:00:02.5 UTC);
        assert_eq!(elapsed_ms(Some(a), Some(b)), Some(2500));
        assert_eq!(elapsed_ms(Some(b), Some(a)), Some(-2500));
        assert_eq!(elapsed_ms(None, Some(a)), None);
    }

    #[test]
    fn test_sort_by_time_keeps_untimed_slots() {
        let t1 = datetime!(2024-01-01 00:00:01 UTC);
        let t2 = datetime!(2024-01-01 00:00:02 UTC);
        let t3 = datetime!(2024-01-01 00:00:03 UTC);
        let mut points = vec![
            create_test_point(3.0, 0.0).with_time(t3),
            create_test_point(9.0, 0.0),
            create_test_point(1.0, 0.0).with_time(t1),
            create_test_point(2.0, 0.0).with_time(t2),
        ];

        sort_by_time(&mut points);

        assert_eq!(points[0].time, Some(t1));
        assert!(points[1].time.is_none());
        assert_eq!(points[1].lat(), 9.0);
        assert_eq!(points[2].time, Some(t2));
        assert_eq!(points[3].time, Some(t3));
    }

    #[test]
    fn test_sort_by_time_is_stable() {
        let t = datetime!(2024-01-01 00:00:00 UTC);
        let mut points = vec![
            create_test_point(1.0, 0.0).with_time(t),
            create_test_point(2.0, 0.0).with_time(t),
        ];
        sort_by_time(&mut points);
        assert_eq!(points[0].lat(), 1.0);
        assert_eq!(points[1].lat(), 2.0);
    }
}
