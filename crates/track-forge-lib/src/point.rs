//! Single GPS samples

use crate::{Result, TrackError, utils};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Elevation value reserved for "no elevation data" (SRTM void marker)
pub const ELE_SENTINEL: f64 = -32768.0;

/// One GPS sample
///
/// Latitude and longitude are fixed at construction and always inside
/// `[-90, 90]` / `[-180, 180]`. Everything else may be edited in place.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    lat: f64,
    lon: f64,
    /// Elevation in meters, or [`ELE_SENTINEL`] when unknown
    pub ele: f64,
    pub time: Option<OffsetDateTime>,
    /// Name (mostly used by free waypoints)
    pub name: Option<String>,
    pub description: Option<String>,
    /// Display symbol (mostly used by free waypoints)
    pub symbol: Option<String>,
    /// Number of satellites used for the fix
    pub sat: Option<u64>,
    pub hdop: Option<f64>,
    pub vdop: Option<f64>,
    pub pdop: Option<f64>,
    /// Extension attributes, ordered by key
    pub extensions: BTreeMap<String, String>,
}

impl Point {
    /// Create a point without elevation or time
    ///
    /// Fails with [`TrackError::InvalidCoordinate`] when the coordinate is out of range.
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if !utils::is_valid_coordinate(lat, lon) {
            return Err(TrackError::InvalidCoordinate { lat, lon });
        }
        Ok(Self {
            lat,
            lon,
            ele: ELE_SENTINEL,
            time: None,
            name: None,
            description: None,
            symbol: None,
            sat: None,
            hdop: None,
            vdop: None,
            pdop: None,
            extensions: BTreeMap::new(),
        })
    }

    pub fn with_elevation(mut self, ele: f64) -> Self {
        self.ele = ele;
        self
    }

    pub fn with_time(mut self, time: OffsetDateTime) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Whether the elevation holds real data (not the sentinel)
    #[inline]
    pub fn has_elevation(&self) -> bool {
        self.ele != ELE_SENTINEL && self.ele.is_finite()
    }

    /// Elevation in meters, `None` for the sentinel
    #[inline]
    pub fn elevation(&self) -> Option<f64> {
        self.has_elevation().then_some(self.ele)
    }

    /// Mark the elevation as unknown
    #[inline]
    pub fn clear_elevation(&mut self) {
        self.ele = ELE_SENTINEL;
    }

    /// Great-circle distance to another point in meters
    #[inline]
    pub fn distance_to(&self, other: &Point) -> f64 {
        utils::haversine_distance(self, other)
    }

    /// This point as a `geo` point (x = lon, y = lat)
    #[inline]
    pub fn geo_point(&self) -> geo::Point<f64> {
        geo::Point::new(self.lon, self.lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_point_creation() {
        let point = Point::new(51.5074, -0.1278).unwrap();
        assert_eq!(point.lat(), 51.5074);
        assert_eq!(point.lon(), -0.1278);
        assert!(!point.has_elevation());
        assert!(point.time.is_none());
    }

    #[test]
    fn test_invalid_coordinates_rejected() {
        assert!(matches!(
            Point::new(90.5, 0.0),
            Err(TrackError::InvalidCoordinate { .. })
        ));
        assert!(Point::new(0.0, -180.1).is_err());
        assert!(Point::new(f64::NAN, 0.0).is_err());
        assert!(Point::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn test_elevation_sentinel() {
        let mut point = Point::new(0.0, 0.0).unwrap().with_elevation(123.0);
        assert_eq!(point.elevation(), Some(123.0));

        point.clear_elevation();
        assert_eq!(point.ele, ELE_SENTINEL);
        assert_eq!(point.elevation(), None);

        // Zero is real data, not "missing"
        point.ele = 0.0;
        assert!(point.has_elevation());
    }

    #[test]
    fn test_builder_fields() {
        let t = datetime!(2024-05-01 10:00:00 UTC);
        let point = Point::new(1.0, 2.0)
            .unwrap()
            .with_time(t)
            .with_name("Summit");
        assert_eq!(point.time, Some(t));
        assert_eq!(point.name.as_deref(), Some("Summit"));
    }

    #[test]
    fn test_distance_to() {
        let a = Point::new(0.0, 0.0).unwrap();
        let b = Point::new(0.0, 1.0).unwrap();
        // One degree of longitude at the equator is roughly 111 km
        let d = a.distance_to(&b);
        assert!((d - 111_195.0).abs() < 200.0);
        assert_eq!(a.distance_to(&a), 0.0);
    }
}
