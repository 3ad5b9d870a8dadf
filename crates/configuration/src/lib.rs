use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
#[cfg(feature = "clap")]
pub mod cli;
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
#[cfg(feature = "clap")]
pub use cli::CliArgs;
pub use logging::init_logging;
pub use settings::{
    AnalysisSettings, ChartSettings, DumpLayout, LoggingSettings, OutputSettings, Settings,
    UnknownMerchantPolicy,
};

/// Prefix of the environment variables that override settings,
/// e.g. `DUMP_ANALYZER_ANALYSIS__SUCCESS_CODE=201`.
pub const ENV_PREFIX: &str = "DUMP_ANALYZER";

/// Loads the settings for a run.
///
/// Sources, lowest precedence first: the built-in defaults, the optional TOML
/// file at `path`, then `DUMP_ANALYZER_*` environment variables.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::new(
            &path.to_string_lossy(),
            config::FileFormat::Toml,
        ));
    }

    let config = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let settings = config.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}
