//! Human readable statistics

use std::fmt::Write as _;
use track_forge_lib::{Aggregates, Node, TrackFile, TrackNode};

/// Format milliseconds as `H:MM:SS`
pub fn format_duration(ms: i64) -> String {
    let secs = ms.max(0) / 1000;
    format!("{}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
}

fn format_elevation(ele: Option<f64>) -> String {
    ele.map_or_else(|| "-".to_string(), |ele| format!("{:.0} m", ele))
}

/// Multi-line statistics of a recomputed file
pub fn summary(file: &TrackFile) -> String {
    let agg: &Aggregates = file.aggregates();
    let count = Node::from(file).count_objects();
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "{}", file.name().unwrap_or("(unnamed)"));
    let _ = writeln!(
        out,
        "  tracks {}, routes {}, waypoints {} ({} groups, {} points)",
        file.tracks().len(),
        file.routes().len(),
        file.num_waypoints(),
        count.items,
        count.points
    );
    let _ = writeln!(out, "  length     {:.2} km", agg.length_meters / 1000.0);
    let _ = writeln!(
        out,
        "  duration   {} (moving {})",
        format_duration(agg.duration_ms),
        format_duration(agg.moving_ms)
    );
    let _ = writeln!(
        out,
        "  speed      max {:.1} km/h, moving avg {:.1} km/h",
        agg.max_speed_kmph,
        agg.avg_moving_speed_kmph()
    );
    let _ = writeln!(
        out,
        "  elevation  {} .. {}, +{:.0} m / -{:.0} m",
        format_elevation(agg.ele_min),
        format_elevation(agg.ele_max),
        agg.gross_rise_meters,
        agg.gross_fall_meters
    );
    if let Some(bounds) = agg.bounds {
        let _ = writeln!(
            out,
            "  bounds     {:.5},{:.5} .. {:.5},{:.5}",
            bounds.min_lat, bounds.min_lon, bounds.max_lat, bounds.max_lon
        );
        let (lat, lon) = bounds.center();
        let _ = writeln!(out, "  center     {:.5},{:.5}", lat, lon);
    }
    out
}
