use std::path::PathBuf;

use clap::Parser;

use super::RemediateArgs;

/// Remediates every JP2 file in a directory tree.
#[derive(Debug, Parser)]
#[non_exhaustive]
pub struct DirArgs {
    /// Input directory, searched recursively
    pub input_dir: PathBuf,
    /// Directory to write remediated files to, mirroring the input tree [default: next to each
    /// input file]
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// Extension of files to process, compared case-insensitively
    #[arg(long, default_value = "jp2")]
    pub extension: String,
    #[command(flatten)]
    pub remediate: RemediateArgs,
}
