use super::ElevationService;
use crate::{CancellationToken, ElevationConfig, GroupSelection, NodeMut, PointGroup, TrackError};

/// How a correction run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionStatus {
    Completed,
    /// Stopped at a chunk boundary; chunks before it keep their new values
    Cancelled,
}

/// Outcome of a correction run that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrectionReport {
    /// Points that received a looked-up elevation
    pub corrected: usize,
    /// Service requests that succeeded
    pub chunks: usize,
    pub status: CorrectionStatus,
}

impl CorrectionReport {
    fn new() -> Self {
        Self {
            corrected: 0,
            chunks: 0,
            status: CorrectionStatus::Completed,
        }
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.status == CorrectionStatus::Cancelled
    }

    /// Treat a cancelled run as [`TrackError::Cancelled`]
    pub fn ensure_completed(self) -> crate::Result<Self> {
        match self.status {
            CorrectionStatus::Completed => Ok(self),
            CorrectionStatus::Cancelled => Err(TrackError::Cancelled {
                corrected: self.corrected,
            }),
        }
    }
}

/// A correction run aborted by an error
///
/// Points corrected before the failing chunk keep their new elevations; the
/// failing chunk itself is untouched.
#[derive(Debug, thiserror::Error)]
#[error("Elevation correction aborted after {corrected} points: {error}")]
pub struct CorrectionFailure {
    pub corrected: usize,
    #[source]
    pub error: TrackError,
}

/// Replace the elevations of a group with values from a service
///
/// Points are sent in chunks of `config.chunk_size`, one blocking request at a
/// time. The token is checked before each chunk. A response whose length
/// differs from the request aborts with
/// [`TrackError::ElevationResponseSizeMismatch`]; any other service error
/// aborts as well. Recompute afterwards.
pub fn correct_elevation<S>(
    group: &mut PointGroup,
    service: &S,
    config: &ElevationConfig,
    cancel: &CancellationToken,
) -> Result<CorrectionReport, CorrectionFailure>
where
    S: ElevationService + ?Sized,
{
    #[cfg(feature = "profiling")]
    profiling::scope!("elevation::correct_elevation");

    config
        .validate()
        .map_err(|error| CorrectionFailure { corrected: 0, error })?;

    let mut report = CorrectionReport::new();
    let total = group.len();

    for start in (0..total).step_by(config.chunk_size) {
        if cancel.is_cancelled() {
            tracing::info!(
                "Elevation correction cancelled after {} of {} points",
                report.corrected,
                total
            );
            report.status = CorrectionStatus::Cancelled;
            return Ok(report);
        }

        let end = (start + config.chunk_size).min(total);
        let coordinates: Vec<(f64, f64)> = group.points()[start..end]
            .iter()
            .map(|p| (p.lat(), p.lon()))
            .collect();

        let fail = |error| CorrectionFailure {
            corrected: report.corrected,
            error,
        };
        let elevations = service.lookup(&coordinates).map_err(fail)?;
        if elevations.len() != coordinates.len() {
            tracing::warn!(
                "Elevation service returned {} values for {} points",
                elevations.len(),
                coordinates.len()
            );
            return Err(fail(TrackError::ElevationResponseSizeMismatch {
                expected: coordinates.len(),
                actual: elevations.len(),
            }));
        }

        for (point, ele) in group.points_mut()[start..end].iter_mut().zip(elevations) {
            point.ele = ele;
        }
        report.corrected += coordinates.len();
        report.chunks += 1;
        tracing::debug!(
            "Corrected chunk {} ({}/{} points)",
            report.chunks,
            report.corrected,
            total
        );
    }

    Ok(report)
}

/// Correct every point group below a node
///
/// Covers track segments, route points and free waypoints, in file order.
/// Counts in the report and in a failure span all groups.
pub fn correct_node<S>(
    node: NodeMut<'_>,
    service: &S,
    config: &ElevationConfig,
    cancel: &CancellationToken,
) -> Result<CorrectionReport, CorrectionFailure>
where
    S: ElevationService + ?Sized,
{
    let mut report = CorrectionReport::new();

    for group in node.point_groups_mut(GroupSelection::All) {
        match correct_elevation(group, service, config, cancel) {
            Ok(group_report) => {
                report.corrected += group_report.corrected;
                report.chunks += group_report.chunks;
                if group_report.is_cancelled() {
                    report.status = CorrectionStatus::Cancelled;
                    break;
                }
            }
            Err(failure) => {
                return Err(CorrectionFailure {
                    corrected: report.corrected + failure.corrected,
                    error: failure.error,
                });
            }
        }
    }

    tracing::info!(
        "Elevation correction {:?}: {} points in {} requests",
        report.status,
        report.corrected,
        report.chunks
    );
    Ok(report)
}
