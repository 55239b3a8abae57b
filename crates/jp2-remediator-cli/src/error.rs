use std::path::PathBuf;

use crate::store::StoreError;

#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    ReadInput {
        path: PathBuf,
        source: std::io::Error,
    },
    WriteOutput {
        path: PathBuf,
        source: std::io::Error,
    },
    OutputIsInput(PathBuf),
    WalkDirectory(walkdir::Error),
    ObjectStore {
        bucket: String,
        key: String,
        source: StoreError,
    },
    Staging(std::io::Error),
    FilesFailed {
        failed: usize,
        processed: usize,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ReadInput { path, source } => {
                write!(f, "failed reading input file {}: {source}", path.display())
            }
            Error::WriteOutput { path, source } => {
                write!(f, "failed writing output file {}: {source}", path.display())
            }
            Error::OutputIsInput(path) => {
                write!(f, "refusing to overwrite input file {}", path.display())
            }
            Error::WalkDirectory(e) => write!(f, "failed walking input directory: {e}"),
            Error::ObjectStore {
                bucket,
                key,
                source,
            } => {
                if key.is_empty() {
                    write!(f, "object store error in bucket {bucket}: {source}")
                } else {
                    write!(f, "object store error on {bucket}/{key}: {source}")
                }
            }
            Error::Staging(e) => write!(f, "failed preparing staging directory: {e}"),
            Error::FilesFailed { failed, processed } => {
                write!(f, "{failed} of {processed} files could not be remediated")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ReadInput { source, .. } => Some(source),
            Error::WriteOutput { source, .. } => Some(source),
            Error::WalkDirectory(e) => Some(e),
            Error::ObjectStore { source, .. } => Some(&**source),
            Error::Staging(e) => Some(e),
            Error::OutputIsInput(_) | Error::FilesFailed { .. } => None,
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(e: walkdir::Error) -> Self {
        Self::WalkDirectory(e)
    }
}
