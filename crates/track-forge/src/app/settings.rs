use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use track_forge_lib::MergePolicy;
#[cfg(feature = "http")]
use track_forge_lib::config::{DEFAULT_ELEVATION_ENDPOINT, EngineConfig};

/// Environment variable holding the elevation service API key
#[cfg(feature = "http")]
pub const ENV_ELEVATION_KEY: &str = "TRACK_FORGE_ELEVATION_KEY";
/// Environment variable overriding the elevation service endpoint
#[cfg(feature = "http")]
pub const ENV_ELEVATION_URL: &str = "TRACK_FORGE_ELEVATION_URL";

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Track Forge - Statistics, thinning, merging and elevation repair for GPX tracks
pub struct Settings {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print statistics of GPX files
    Info {
        /// GPX files to inspect
        #[clap(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },

    /// Remove track points closer than a minimum distance to their predecessor
    Thin {
        #[clap(flatten)]
        io: InputOutput,

        /// Minimum distance in meters between retained points
        #[clap(short = 'd', long, default_value = "0.2")]
        min_distance: f64,
    },

    /// Merge several GPX files into one
    Merge {
        /// GPX files to merge, in order
        #[clap(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Output GPX file
        #[clap(short, long, value_name = "FILE")]
        output: PathBuf,

        /// How tracks are flattened
        #[clap(short, long, value_enum, default_value = "tracks")]
        policy: PolicyArg,
    },

    /// Interpolate missing elevations from neighbouring points
    Cleanse {
        #[clap(flatten)]
        io: InputOutput,

        /// Fail when a group has no elevation data at all
        #[clap(long, default_value = "false")]
        strict: bool,
    },

    /// Replace elevations with values from an elevation service
    #[cfg(feature = "http")]
    Correct {
        #[clap(flatten)]
        io: InputOutput,

        #[clap(flatten)]
        service: ServiceArgs,

        /// Interpolate points the service had no data for
        #[clap(long, default_value = "false")]
        cleanse: bool,
    },

    /// Remove every timestamp
    StripTimes {
        #[clap(flatten)]
        io: InputOutput,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct InputOutput {
    /// GPX file to read
    #[clap(value_name = "FILE")]
    pub input: PathBuf,

    /// GPX file to write (may be the input file)
    #[clap(short, long, value_name = "FILE")]
    pub output: PathBuf,
}

#[cfg(feature = "http")]
#[derive(clap::Args, Debug, Clone)]
pub struct ServiceArgs {
    /// Elevation profile endpoint [env: TRACK_FORGE_ELEVATION_URL]
    #[clap(long)]
    pub endpoint: Option<String>,

    /// Elevation service API key [env: TRACK_FORGE_ELEVATION_KEY]
    #[clap(long)]
    pub api_key: Option<String>,

    /// Points per service request
    #[clap(long, default_value = "200")]
    pub chunk_size: usize,

    /// Request timeout in seconds
    #[clap(long, default_value = "30")]
    pub timeout: u64,
}

#[cfg(feature = "http")]
impl ServiceArgs {
    /// Build the engine configuration; flags win over environment variables
    pub fn to_config(&self) -> EngineConfig {
        let endpoint = self
            .endpoint
            .clone()
            .or_else(|| crate::cli::get_env(ENV_ELEVATION_URL))
            .unwrap_or_else(|| DEFAULT_ELEVATION_ENDPOINT.to_string());

        let mut config = EngineConfig::default()
            .with_endpoint(endpoint)
            .with_chunk_size(self.chunk_size)
            .with_timeout_secs(self.timeout);
        if let Some(key) = self
            .api_key
            .clone()
            .or_else(|| crate::cli::get_env(ENV_ELEVATION_KEY))
        {
            config = config.with_api_key(key);
        }
        config
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyArg {
    /// Keep every track
    Tracks,
    /// One track, one segment per input segment
    Multi,
    /// One track with one time-sorted segment
    Single,
}

impl From<PolicyArg> for MergePolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::Tracks => MergePolicy::IntoTracks,
            PolicyArg::Multi => MergePolicy::IntoMulti,
            PolicyArg::Single => MergePolicy::IntoSingle,
        }
    }
}

impl Settings {
    /// Parse the command line, exiting with usage on error
    pub fn from_cli() -> Self {
        match crate::cli::parse_args::<Settings>() {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }
}
