use crate::batch::{FileOutcome, Pipeline};
use crate::commands::file::*;
use crate::output::modified_path;
use crate::Result;

pub fn handle_file(args: FileArgs) -> Result<()> {
    let _guard = tracing::trace_span!("Handle file subcommand").entered();

    let pipeline = Pipeline::new(&args.remediate);
    let output = args
        .output
        .unwrap_or_else(|| modified_path(&args.input, pipeline.stamp()));

    if pipeline.process_file(&args.input, &output)? == FileOutcome::Unchanged {
        tracing::info!("No TRC tag needed patching, no file written");
    }
    Ok(())
}
