use std::path::PathBuf;

use clap::Parser;

use super::RemediateArgs;

/// Remediates a single JP2 file.
#[derive(Debug, Parser)]
#[non_exhaustive]
pub struct FileArgs {
    /// Input file
    pub input: PathBuf,
    /// Output file [default: <stem>_modified_<stamp>.jp2 next to the input]
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[command(flatten)]
    pub remediate: RemediateArgs,
}
