//! Per-file remediation pipeline and batch bookkeeping.

use std::path::{Path, PathBuf};

use jp2_remediator::{
    BoxTreeLocator, ConformanceCheck, OutputDecision, Remediation, Remediator, SearchLocator,
    SignatureLocator, StructuralValidator,
};
use tracing::Span;

use crate::commands::{LocatorKind, RemediateArgs};
use crate::output::{write_output, Stamp};
use crate::{Error, Result};

/// Locator chosen on the command line.
#[derive(Debug, Copy, Clone)]
pub enum Locator {
    Search(SearchLocator),
    BoxTree(BoxTreeLocator),
}

impl From<LocatorKind> for Locator {
    fn from(kind: LocatorKind) -> Self {
        match kind {
            LocatorKind::Search => Self::Search(SearchLocator),
            LocatorKind::Boxes => Self::BoxTree(BoxTreeLocator),
        }
    }
}

impl SignatureLocator for Locator {
    fn find(&self, buf: &[u8], signature: [u8; 4], start: usize) -> Option<usize> {
        match self {
            Self::Search(locator) => locator.find(buf, signature, start),
            Self::BoxTree(locator) => locator.find(buf, signature, start),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Written(PathBuf),
    Unchanged,
}

/// Counts of a batch run.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub written: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl BatchSummary {
    /// Records the result of one file, logging the error if it failed.
    pub fn record(&mut self, name: &str, result: Result<FileOutcome>) {
        self.processed += 1;
        match result {
            Ok(FileOutcome::Written(_)) => self.written += 1,
            Ok(FileOutcome::Unchanged) => self.unchanged += 1,
            Err(e) => {
                self.failed += 1;
                tracing::error!(file = name, "{e}");
            }
        }
    }

    /// Logs the counts, and fails if any file failed.
    pub fn finish(self) -> Result<Self> {
        tracing::info!(
            processed = self.processed,
            written = self.written,
            unchanged = self.unchanged,
            failed = self.failed,
            "Batch finished"
        );
        if self.failed > 0 {
            return Err(Error::FilesFailed {
                failed: self.failed,
                processed: self.processed,
            });
        }
        Ok(self)
    }
}

/// Read, check, remediate and write cycle of one file.
#[derive(Debug, Clone)]
pub struct Pipeline {
    remediator: Remediator<Locator>,
    validator: StructuralValidator,
    stamp: Stamp,
}

impl Pipeline {
    pub fn new(args: &RemediateArgs) -> Self {
        let validator = StructuralValidator::new(args.validator.options());
        Self {
            remediator: Remediator::with_locator(args.locator.into()),
            validator,
            stamp: args.stamp.clone().unwrap_or_else(Stamp::today),
        }
    }

    #[inline]
    pub fn stamp(&self) -> &Stamp {
        &self.stamp
    }

    /// Runs the conformance check for diagnostics, then remediates.
    pub fn remediate(&self, original: &[u8], span: &Span) -> Remediation {
        if self.validator.is_valid(original, span) {
            tracing::debug!(parent: span, "Structural conformance check passed");
        } else {
            tracing::warn!(parent: span, "Structural conformance check failed");
        }
        self.remediator.remediate(original, span)
    }

    /// Remediates `input`, writing to `output` only if some TRC tag was patched.
    pub fn process_file(&self, input: &Path, output: &Path) -> Result<FileOutcome> {
        let span = tracing::debug_span!("Process file", input = %input.display());
        let _guard = span.enter();

        let original = std::fs::read(input).map_err(|source| Error::ReadInput {
            path: input.to_owned(),
            source,
        })?;
        let remediation = self.remediate(&original, &span);

        match remediation.decision {
            OutputDecision::NoChange => Ok(FileOutcome::Unchanged),
            OutputDecision::Write(contents) => {
                write_output(input, output, &contents)?;
                tracing::info!(
                    parent: &span,
                    output = %output.display(),
                    "Remediated file written"
                );
                Ok(FileOutcome::Written(output.to_owned()))
            }
        }
    }
}

pub(crate) fn has_extension(name: &str, extension: &str) -> bool {
    let extension = extension.trim_start_matches('.');
    match name.rsplit_once('.') {
        Some((stem, ext)) => !stem.is_empty() && ext.eq_ignore_ascii_case(extension),
        None => false,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use jp2_remediator::fixture::{self, Curve};

    use super::*;
    use crate::commands::ValidatorArgs;
    use crate::output::parse_stamp;

    pub(crate) fn remediate_args() -> RemediateArgs {
        RemediateArgs {
            locator: LocatorKind::Search,
            stamp: Some(parse_stamp("20240315").unwrap()),
            validator: ValidatorArgs::default(),
        }
    }

    pub(crate) fn broken_jp2() -> Vec<u8> {
        fixture::jp2_file(
            2,
            &fixture::icc_profile(&[
                Curve::declared(b"rTRC", 16, 20),
                Curve::correct(b"gTRC", 16),
                Curve::correct(b"bTRC", 16),
            ]),
        )
    }

    pub(crate) fn correct_jp2() -> Vec<u8> {
        fixture::jp2_file(
            2,
            &fixture::icc_profile(&[
                Curve::correct(b"rTRC", 16),
                Curve::correct(b"gTRC", 16),
                Curve::correct(b"bTRC", 16),
            ]),
        )
    }

    #[test]
    fn extension_filter() {
        assert!(has_extension("a.jp2", "jp2"));
        assert!(has_extension("a.JP2", "jp2"));
        assert!(has_extension("dir/a.jp2", ".jp2"));
        assert!(!has_extension("a.jp2.txt", "jp2"));
        assert!(!has_extension(".jp2", "jp2"));
        assert!(!has_extension("jp2", "jp2"));
    }

    #[test]
    fn process_writes_only_when_patched() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(&remediate_args());

        let broken = dir.path().join("broken.jp2");
        std::fs::write(&broken, broken_jp2()).unwrap();
        let output = dir.path().join("broken_out.jp2");
        let outcome = pipeline.process_file(&broken, &output).unwrap();
        assert_eq!(outcome, FileOutcome::Written(output.clone()));
        let written = std::fs::read(&output).unwrap();
        assert_eq!(written.len(), broken_jp2().len());
        assert_ne!(written, broken_jp2());

        let correct = dir.path().join("correct.jp2");
        std::fs::write(&correct, correct_jp2()).unwrap();
        let output = dir.path().join("correct_out.jp2");
        let outcome = pipeline.process_file(&correct, &output).unwrap();
        assert_eq!(outcome, FileOutcome::Unchanged);
        assert!(!output.exists());
    }

    #[test]
    fn missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(&remediate_args());
        let input = dir.path().join("missing.jp2");
        let err = pipeline
            .process_file(&input, &dir.path().join("out.jp2"))
            .unwrap_err();
        assert!(matches!(err, Error::ReadInput { .. }));
    }

    #[test]
    fn summary_fails_after_counting() {
        let mut summary = BatchSummary::default();
        summary.record("a", Ok(FileOutcome::Unchanged));
        summary.record("b", Ok(FileOutcome::Written(PathBuf::from("b_out"))));
        assert_eq!(summary.finish().unwrap().written, 1);

        summary.record("c", Err(Error::OutputIsInput(PathBuf::from("c"))));
        assert_eq!(summary.processed, 3);
        assert!(matches!(
            summary.finish(),
            Err(Error::FilesFailed {
                failed: 1,
                processed: 3
            })
        ));
    }
}
