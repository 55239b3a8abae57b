use std::collections::HashMap;
use std::path::Path;

use crate::batch::{has_extension, BatchSummary, FileOutcome, Pipeline};
use crate::commands::bucket::*;
use crate::output::modified_file_name;
use crate::store::{LocalObjectStore, RemoteObjectStore};
use crate::{Error, Result};

pub fn handle_bucket(args: BucketArgs) -> Result<()> {
    let _guard = tracing::trace_span!("Handle bucket subcommand").entered();

    let store = LocalObjectStore::new(&args.store_root);
    let pipeline = Pipeline::new(&args.remediate);
    let target = BucketTarget {
        bucket: &args.bucket,
        prefix: &args.prefix,
        output_bucket: args.output_bucket.as_deref().unwrap_or(&args.bucket),
        output_prefix: &args.output_prefix,
        extension: &args.extension,
    };
    process_bucket(&store, &pipeline, &target)?.finish()?;
    Ok(())
}

/// Where objects are read from and written to.
#[derive(Debug, Copy, Clone)]
pub struct BucketTarget<'a> {
    pub bucket: &'a str,
    pub prefix: &'a str,
    pub output_bucket: &'a str,
    pub output_prefix: &'a str,
    pub extension: &'a str,
}

impl BucketTarget<'_> {
    /// Key of an output object named `name`, placed under the output prefix.
    pub fn output_key(&self, name: &str) -> String {
        let prefix = self.output_prefix.trim_end_matches('/');
        if prefix.is_empty() {
            name.to_owned()
        } else {
            format!("{prefix}/{name}")
        }
    }
}

/// Downloads, remediates and uploads every matching object.
///
/// Each object is staged through the same local paths in one temporary directory.
pub fn process_bucket(
    store: &impl RemoteObjectStore,
    pipeline: &Pipeline,
    target: &BucketTarget<'_>,
) -> Result<BatchSummary> {
    let keys = store
        .list(target.bucket, target.prefix)
        .map_err(|source| Error::ObjectStore {
            bucket: target.bucket.to_owned(),
            key: String::new(),
            source,
        })?;
    let staging = tempfile::Builder::new()
        .prefix("jp2-remediator")
        .tempdir()
        .map_err(Error::Staging)?;
    let staged_input = staging.path().join("input.jp2");
    let staged_output = staging.path().join("output.jp2");

    let mut summary = BatchSummary::default();
    let mut uploads = HashMap::new();
    for key in keys.iter().filter(|key| has_extension(key, target.extension)) {
        let span = tracing::debug_span!("Process object", bucket = target.bucket, key = %key);
        let _guard = span.enter();
        let result = process_object(store, pipeline, target, key, &staged_input, &staged_output)
            .map(|(outcome, output_key)| {
                if let Some(output_key) = output_key {
                    record_upload(&mut uploads, output_key, key);
                }
                outcome
            });
        summary.record(key, result);
    }
    Ok(summary)
}

fn process_object(
    store: &impl RemoteObjectStore,
    pipeline: &Pipeline,
    target: &BucketTarget<'_>,
    key: &str,
    staged_input: &Path,
    staged_output: &Path,
) -> Result<(FileOutcome, Option<String>)> {
    store
        .download(target.bucket, key, staged_input)
        .map_err(|source| Error::ObjectStore {
            bucket: target.bucket.to_owned(),
            key: key.to_owned(),
            source,
        })?;

    let FileOutcome::Written(path) = pipeline.process_file(staged_input, staged_output)? else {
        return Ok((FileOutcome::Unchanged, None));
    };
    let name = key.rsplit('/').next().unwrap_or(key);
    let output_key = target.output_key(&modified_file_name(name, pipeline.stamp()));
    store
        .upload(&path, target.output_bucket, &output_key)
        .map_err(|source| Error::ObjectStore {
            bucket: target.output_bucket.to_owned(),
            key: output_key.clone(),
            source,
        })?;
    tracing::info!(
        bucket = target.output_bucket,
        key = %output_key,
        "Remediated object uploaded"
    );
    Ok((FileOutcome::Written(path), Some(output_key)))
}

/// Remembers which input produced `output_key`, returning the previous input if the key was
/// already uploaded in this batch.
fn record_upload(
    uploads: &mut HashMap<String, String>,
    output_key: String,
    key: &str,
) -> Option<String> {
    let previous = uploads.insert(output_key.clone(), key.to_owned());
    if let Some(previous) = &previous {
        tracing::warn!(
            key = %output_key,
            first = %previous,
            second = %key,
            "Output key uploaded twice in one batch, earlier object replaced"
        );
    }
    previous
}
