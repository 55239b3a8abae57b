use std::path::PathBuf;

use clap::Parser;

use super::RemediateArgs;

/// Remediates every JP2 object in a bucket.
#[derive(Debug, Parser)]
#[non_exhaustive]
pub struct BucketArgs {
    /// Bucket to read objects from
    pub bucket: String,
    /// Only process keys starting with this prefix
    #[arg(long, default_value = "")]
    pub prefix: String,
    /// Bucket to upload remediated objects to [default: input bucket]
    #[arg(long)]
    pub output_bucket: Option<String>,
    /// Key prefix of uploaded objects
    #[arg(long, default_value = "")]
    pub output_prefix: String,
    /// Root directory of the object store; bucket `B` key `K` lives at `<DIR>/B/K`
    #[arg(long, value_name = "DIR")]
    pub store_root: PathBuf,
    /// Extension of objects to process, compared case-insensitively
    #[arg(long, default_value = "jp2")]
    pub extension: String,
    #[command(flatten)]
    pub remediate: RemediateArgs,
}
