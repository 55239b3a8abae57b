use std::path::PathBuf;

use clap::Parser;

use super::{LocatorKind, ValidatorArgs};

/// Prints the colour specification and TRC tags of a JP2 file.
#[derive(Debug, Parser)]
#[non_exhaustive]
pub struct InspectArgs {
    /// Input file
    pub input: PathBuf,
    /// Signature lookup strategy
    #[arg(long, value_enum, default_value_t)]
    pub locator: LocatorKind,
    #[command(flatten)]
    pub validator: ValidatorArgs,
}
