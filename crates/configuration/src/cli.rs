use clap::Parser;
use std::path::PathBuf;

/// Analyzes the event dump of a finished market simulation run.
///
/// Writes a per-merchant profit summary and inventory/price charts back into
/// the dump directory.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// The dump directory (holds the merchant mapping and the event documents).
    #[arg(long, short)]
    pub directory: PathBuf,

    /// An optional TOML file overriding the default settings.
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Hide the progress bar and the summary table.
    #[arg(long, short)]
    pub quiet: bool,
}
