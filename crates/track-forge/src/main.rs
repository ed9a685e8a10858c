use std::process::ExitCode;
use track_forge::{Settings, run, setup_logging};

fn main() -> ExitCode {
    setup_logging();
    tracing::debug!("track-forge {}", env!("CARGO_PKG_VERSION"));

    let settings = Settings::from_cli();
    match run(settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
