use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::batch::{has_extension, BatchSummary, Pipeline};
use crate::commands::dir::*;
use crate::output::{modified_file_name, modified_path, Stamp};
use crate::Result;

pub fn handle_dir(args: DirArgs) -> Result<()> {
    let _guard = tracing::trace_span!("Handle dir subcommand").entered();

    let pipeline = Pipeline::new(&args.remediate);
    process_dir(
        &pipeline,
        &args.input_dir,
        args.output_dir.as_deref(),
        &args.extension,
    )?
    .finish()?;
    Ok(())
}

/// Remediates every matching file below `input_dir`.
///
/// Files are collected before any output is written, so outputs placed inside the input tree
/// are not picked up again. Symbolic links are followed; entries that cannot be read count as
/// failed files.
pub fn process_dir(
    pipeline: &Pipeline,
    input_dir: &Path,
    output_dir: Option<&Path>,
    extension: &str,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary::default();
    let mut inputs = Vec::new();
    for entry in WalkDir::new(input_dir).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                let name = e
                    .path()
                    .map(|path| path.to_string_lossy().into_owned())
                    .unwrap_or_default();
                summary.record(&name, Err(e.into()));
                continue;
            }
        };
        let name = entry.file_name().to_string_lossy();
        if entry.file_type().is_file() && has_extension(&name, extension) {
            inputs.push(entry.into_path());
        }
    }
    tracing::debug!(count = inputs.len(), "Collected input files");

    for input in inputs {
        let output = output_path(&input, input_dir, output_dir, pipeline.stamp());
        let result = pipeline.process_file(&input, &output);
        summary.record(&input.to_string_lossy(), result);
    }
    Ok(summary)
}

fn output_path(
    input: &Path,
    input_dir: &Path,
    output_dir: Option<&Path>,
    stamp: &Stamp,
) -> PathBuf {
    let Some(output_dir) = output_dir else {
        return modified_path(input, stamp);
    };
    let relative = input.strip_prefix(input_dir).unwrap_or(input);
    let name = relative
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    let mut output = output_dir.to_owned();
    if let Some(parent) = relative.parent() {
        output.push(parent);
    }
    output.push(modified_file_name(&name, stamp));
    output
}
