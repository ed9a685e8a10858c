use crate::{Result, TrackError};
use quick_xml::Reader;
use quick_xml::events::Event;

/// A source of elevation values
///
/// `lookup` receives `(lat, lon)` pairs and must return exactly one elevation
/// in meters per pair, in the same order. Any closure with the same signature
/// is a service, which keeps tests free of network access.
pub trait ElevationService {
    fn lookup(&self, coordinates: &[(f64, f64)]) -> Result<Vec<f64>>;
}

impl<F> ElevationService for F
where
    F: Fn(&[(f64, f64)]) -> Result<Vec<f64>>,
{
    fn lookup(&self, coordinates: &[(f64, f64)]) -> Result<Vec<f64>> {
        self(coordinates)
    }
}

/// Flatten coordinates into `lat,lon,lat,lon,...` with six decimals
pub fn format_lat_lng_collection(coordinates: &[(f64, f64)]) -> String {
    coordinates
        .iter()
        .map(|(lat, lon)| format!("{:.6},{:.6}", lat, lon))
        .collect::<Vec<_>>()
        .join(",")
}

/// Extract every `<height>` value of an elevation profile response, in order
pub fn parse_height_response(xml: &str) -> Result<Vec<f64>> {
    let mut reader = Reader::from_str(xml);
    let mut heights = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"height" => {
                let text = reader
                    .read_text(e.name())
                    .map_err(|e| TrackError::ElevationService(format!("Malformed response: {}", e)))?;
                let height = text.trim().parse::<f64>().map_err(|_| {
                    TrackError::ElevationService(format!("Invalid height value: {:?}", text))
                })?;
                heights.push(height);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(TrackError::ElevationService(format!(
                    "Malformed response: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(heights)
}
