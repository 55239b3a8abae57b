pub mod bucket;
pub mod dir;
pub mod file;
pub mod inspect;
#[cfg(test)]
pub mod tests;

pub use bucket::BucketArgs;
pub use dir::DirArgs;
pub use file::FileArgs;
pub use inspect::InspectArgs;

use jp2_remediator::ValidatorOptions;

use crate::output::{parse_stamp, Stamp};

#[derive(Debug, clap::Parser)]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub subcommand: Subcommands,
    #[command(flatten)]
    pub globals: GlobalArgs,
}

#[derive(Debug, clap::Args)]
#[non_exhaustive]
pub struct GlobalArgs {
    /// Print debug information; can be repeated.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
    /// Do not print logs to console.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, clap::Subcommand)]
pub enum Subcommands {
    /// Remediate a single JP2 file.
    #[command(short_flag = 'f')]
    File(FileArgs),
    /// Remediate every JP2 file in a directory tree.
    #[command(short_flag = 'd')]
    Dir(DirArgs),
    /// Remediate every JP2 object in a bucket of an object store.
    Bucket(BucketArgs),
    /// Print the TRC tags of a JP2 file without writing anything.
    #[command(short_flag = 'I')]
    Inspect(InspectArgs),
}

/// How `colr` and TRC tag signatures are located.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LocatorKind {
    /// Forward byte search over the whole file.
    #[default]
    Search,
    /// Walk the box tree and the ICC tag table.
    Boxes,
}

/// Options shared by the subcommands that write remediated files.
#[derive(Debug, Clone, clap::Args)]
#[non_exhaustive]
pub struct RemediateArgs {
    /// Signature lookup strategy
    #[arg(long, value_enum, default_value_t)]
    pub locator: LocatorKind,
    /// Date stamp used in output file names, in YYYYMMDD form [default: today, UTC]
    #[arg(long, value_parser = parse_stamp)]
    pub stamp: Option<Stamp>,
    #[command(flatten)]
    pub validator: ValidatorArgs,
}

/// Options of the structural conformance check.
#[derive(Debug, Clone, Default, clap::Args)]
#[non_exhaustive]
pub struct ValidatorArgs {
    /// Accept XML boxes terminated with NUL bytes in the conformance check
    #[arg(long)]
    pub null_xml: bool,
    /// Skip codestream marker checks in the conformance check
    #[arg(long)]
    pub no_packet_markers: bool,
}

impl ValidatorArgs {
    pub fn options(&self) -> ValidatorOptions {
        ValidatorOptions {
            null_xml: self.null_xml,
            packet_markers: !self.no_packet_markers,
            ..Default::default()
        }
    }
}
