//! Loading and saving track files
//!
//! The engines only work on the in-memory tree. Formats plug in through
//! [`TrackFormat`]; [`GpxFormat`] is the reference implementation on top of
//! the `gpx` crate. Free waypoints, tracks and routes map one to one. Missing
//! elevations are read as [`ELE_SENTINEL`] and written as absent. Display
//! state (visibility, colors) is not part of the format.

use crate::{
    ELE_SENTINEL, Link, Metadata, Point, PointGroup, Result, Route, Track, TrackFile, TrackNode,
};
use rayon::prelude::*;
use std::io::{Read, Write};
use std::path::Path;
use time::OffsetDateTime;

/// A file format that can hold a track file
pub trait TrackFormat {
    /// Parse a tree from a reader; the returned tree is recomputed
    fn load<R: Read>(&self, reader: R) -> Result<TrackFile>;

    fn save<W: Write>(&self, file: &TrackFile, writer: W) -> Result<()>;
}

/// GPX 1.0/1.1 reader and GPX 1.1 writer
#[derive(Debug, Clone, Copy, Default)]
pub struct GpxFormat;

impl TrackFormat for GpxFormat {
    fn load<R: Read>(&self, reader: R) -> Result<TrackFile> {
        let gpx = gpx::read(reader)?;
        from_gpx(gpx)
    }

    fn save<W: Write>(&self, file: &TrackFile, writer: W) -> Result<()> {
        gpx::write(&to_gpx(file), writer)?;
        Ok(())
    }
}

/// Build a recomputed tree from parsed GPX data
pub fn from_gpx(gpx: gpx::Gpx) -> Result<TrackFile> {
    #[cfg(feature = "profiling")]
    profiling::scope!("format::from_gpx");

    let mut file = TrackFile::new();

    if let Some(metadata) = gpx.metadata {
        file.metadata = Metadata {
            name: metadata.name,
            description: metadata.description,
            time: metadata.time.map(OffsetDateTime::from),
            links: metadata.links.into_iter().map(link_from_gpx).collect(),
            ..Metadata::default()
        };
    }
    if let Some(creator) = gpx.creator {
        file.metadata.creator = creator;
    }

    for gpx_track in gpx.tracks {
        let mut track = Track::new();
        track.name = gpx_track.name;
        track.description = gpx_track.description;
        track.number = gpx_track.number;
        for gpx_segment in gpx_track.segments {
            let points = points_from_waypoints(gpx_segment.points)?;
            track.add_segment().points_mut().extend(points);
        }
        file.tracks_mut().push(track);
    }

    for gpx_route in gpx.routes {
        let mut route = Route::with_points(points_from_waypoints(gpx_route.points)?);
        route.name = gpx_route.name;
        route.description = gpx_route.description;
        route.number = gpx_route.number;
        route.links = gpx_route.links.into_iter().map(link_from_gpx).collect();
        file.routes_mut().push(route);
    }

    let waypoints = points_from_waypoints(gpx.waypoints)?;
    file.waypoints_mut().points_mut().extend(waypoints);

    file.recompute();
    Ok(file)
}

/// Convert a tree to GPX 1.1 data
pub fn to_gpx(file: &TrackFile) -> gpx::Gpx {
    #[cfg(feature = "profiling")]
    profiling::scope!("format::to_gpx");

    let metadata = gpx::Metadata {
        name: file.metadata.name.clone(),
        description: file.metadata.description.clone(),
        time: file.metadata.time.map(gpx::Time::from),
        links: file.metadata.links.iter().map(link_to_gpx).collect(),
        ..Default::default()
    };

    let tracks = file
        .tracks()
        .iter()
        .map(|track| {
            let mut gpx_track = gpx::Track::new();
            gpx_track.name = track.name.clone();
            gpx_track.description = track.description.clone();
            gpx_track.number = track.number;
            gpx_track.segments = track
                .segments()
                .iter()
                .map(|segment| gpx::TrackSegment {
                    points: waypoints_from_group(segment),
                })
                .collect();
            gpx_track
        })
        .collect();

    let routes = file
        .routes()
        .iter()
        .map(|route| {
            let mut gpx_route = gpx::Route::default();
            gpx_route.name = route.name.clone();
            gpx_route.description = route.description.clone();
            gpx_route.number = route.number;
            gpx_route.links = route.links.iter().map(link_to_gpx).collect();
            gpx_route.points = waypoints_from_group(route.group());
            gpx_route
        })
        .collect();

    gpx::Gpx {
        version: gpx::GpxVersion::Gpx11,
        creator: Some(file.metadata.creator.clone()),
        metadata: Some(metadata),
        waypoints: waypoints_from_group(file.waypoints()),
        tracks,
        routes,
        ..Default::default()
    }
}

/// Load one GPX file; an unnamed file is named after its file stem
pub fn load_file(path: impl AsRef<Path>) -> Result<TrackFile> {
    let path = path.as_ref();
    let reader = std::io::BufReader::new(std::fs::File::open(path)?);
    let mut file = GpxFormat.load(reader)?;
    if file.metadata.name.is_none() {
        file.metadata.name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned());
    }
    tracing::debug!(
        "Loaded {}: {} tracks, {} routes, {} waypoints",
        path.display(),
        file.tracks().len(),
        file.routes().len(),
        file.num_waypoints()
    );
    Ok(file)
}

/// Save one GPX file, replacing any existing file
pub fn save_file(file: &TrackFile, path: impl AsRef<Path>) -> Result<()> {
    let writer = std::io::BufWriter::new(std::fs::File::create(path.as_ref())?);
    GpxFormat.save(file, writer)
}

/// Load GPX files in parallel, keeping the input order
pub fn load_files<P: AsRef<Path> + Send + Sync>(paths: Vec<P>) -> Result<Vec<TrackFile>> {
    // Profile bulk file loading (IO + parsing + recompute)
    #[cfg(feature = "profiling")]
    profiling::scope!("format::load_files");

    paths.into_par_iter().map(load_file).collect()
}

fn points_from_waypoints(waypoints: Vec<gpx::Waypoint>) -> Result<Vec<Point>> {
    waypoints.into_iter().map(point_from_waypoint).collect()
}

fn point_from_waypoint(waypoint: gpx::Waypoint) -> Result<Point> {
    let coord = waypoint.point();
    let mut point = Point::new(coord.y(), coord.x())?;
    point.ele = waypoint.elevation.unwrap_or(ELE_SENTINEL);
    point.time = waypoint.time.map(OffsetDateTime::from);
    point.name = waypoint.name;
    point.description = waypoint.description;
    point.symbol = waypoint.symbol;
    point.sat = waypoint.sat;
    point.hdop = waypoint.hdop;
    point.vdop = waypoint.vdop;
    point.pdop = waypoint.pdop;
    Ok(point)
}

fn waypoints_from_group(group: &PointGroup) -> Vec<gpx::Waypoint> {
    group.points().iter().map(waypoint_from_point).collect()
}

fn waypoint_from_point(point: &Point) -> gpx::Waypoint {
    let mut waypoint = gpx::Waypoint::new(geo::Point::new(point.lon(), point.lat()));
    waypoint.elevation = point.elevation();
    waypoint.time = point.time.map(gpx::Time::from);
    waypoint.name = point.name.clone();
    waypoint.description = point.description.clone();
    waypoint.symbol = point.symbol.clone();
    waypoint.sat = point.sat;
    waypoint.hdop = point.hdop;
    waypoint.vdop = point.vdop;
    waypoint.pdop = point.pdop;
    waypoint
}

fn link_from_gpx(link: gpx::Link) -> Link {
    Link {
        href: link.href,
        text: link.text,
    }
}

fn link_to_gpx(link: &Link) -> gpx::Link {
    gpx::Link {
        href: link.href.clone(),
        text: link.text.clone(),
        type_: None,
    }
}
