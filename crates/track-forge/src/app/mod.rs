//! Application module
//!
//! Every command loads its inputs, runs one engine operation, recomputes the
//! statistics and then prints or saves the result.

mod report;
pub(crate) mod settings;

use crate::app::settings::{Command, Settings};
use std::path::{Path, PathBuf};
use track_forge_lib::config::EngineConfig;
use track_forge_lib::{NodeMut, TrackError, TrackFile, TrackNode, elevation, format, merge, thinning};

/// Error types for the command line application
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{}: {}", .path.display(), .source)]
    File {
        path: PathBuf,
        #[source]
        source: TrackError,
    },

    #[error(transparent)]
    Track(#[from] TrackError),

    #[error(transparent)]
    Correction(#[from] elevation::CorrectionFailure),
}

pub type Result<T> = std::result::Result<T, CliError>;

fn load(path: &Path) -> Result<TrackFile> {
    format::load_file(path).map_err(|source| CliError::File {
        path: path.to_path_buf(),
        source,
    })
}

/// Recompute and write a file
fn save(file: &mut TrackFile, path: &Path) -> Result<()> {
    file.recompute();
    format::save_file(file, path).map_err(|source| CliError::File {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        "Wrote {} ({} points, {:.2} km)",
        path.display(),
        file.num_points(),
        file.aggregates().length_meters / 1000.0
    );
    Ok(())
}

/// Run one command to completion
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn run(settings: Settings) -> Result<()> {
    match settings.command {
        Command::Info { files } => {
            for file in format::load_files(files)? {
                println!("{}", report::summary(&file));
            }
        }

        Command::Thin { io, min_distance } => {
            let config = EngineConfig::default().with_min_distance(min_distance);
            config.validate()?;
            let mut file = load(&io.input)?;
            let removed =
                thinning::thin_node(NodeMut::from(&mut file), config.thinning.min_distance_meters);
            tracing::info!("Removed {} points", removed);
            save(&mut file, &io.output)?;
        }

        Command::Merge {
            inputs,
            output,
            policy,
        } => {
            let files = format::load_files(inputs)?;
            let mut merged = merge::merge(&files, policy.into());
            save(&mut merged, &output)?;
        }

        Command::Cleanse { io, strict } => {
            let mut file = load(&io.input)?;
            let report = elevation::cleanse_node(NodeMut::from(&mut file));
            tracing::info!(
                "Repaired {} elevations, {} unrepaired",
                report.repaired,
                report.unrepaired
            );
            if strict {
                report.check()?;
            } else if report.is_unsolvable() {
                tracing::warn!(
                    "{} points have no elevation data to interpolate from",
                    report.unsolvable
                );
            }
            save(&mut file, &io.output)?;
        }

        #[cfg(feature = "http")]
        Command::Correct {
            io,
            service,
            cleanse,
        } => {
            let config = service.to_config();
            config.validate()?;
            let http = elevation::HttpElevationService::new(&config.elevation)?;
            let cancel = track_forge_lib::CancellationToken::new();

            let mut file = load(&io.input)?;
            let report =
                elevation::correct_node(NodeMut::from(&mut file), &http, &config.elevation, &cancel)?
                    .ensure_completed()?;
            tracing::info!(
                "Corrected {} elevations in {} requests",
                report.corrected,
                report.chunks
            );
            if cleanse {
                let cleansed = elevation::cleanse_node(NodeMut::from(&mut file));
                tracing::info!("Interpolated {} service voids", cleansed.repaired);
            }
            save(&mut file, &io.output)?;
        }

        Command::StripTimes { io } => {
            let mut file = load(&io.input)?;
            let stripped = NodeMut::from(&mut file).strip_timestamps();
            file.metadata.time = None;
            tracing::info!("Removed {} timestamps", stripped);
            save(&mut file, &io.output)?;
        }
    }

    Ok(())
}
