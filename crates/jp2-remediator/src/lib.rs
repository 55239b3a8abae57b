//! This crate repairs the ICC profile embedded in JPEG 2000 (JP2) files.
//!
//! Some encoders write tone reproduction curve (`rTRC`, `gTRC`, `bTRC`) tag entries whose size
//! field disagrees with the length of the `curv` segment they point to, which makes some readers
//! reject the image. [`Remediator`] finds those entries and rewrites the size fields in a working
//! copy of the file; the file length never changes.
//!
//! ```
//! use jp2_remediator::{OutputDecision, Remediator};
//!
//! let bytes = b"not a jp2 file";
//! let remediation = Remediator::new().remediate(bytes, &tracing::Span::none());
//! assert_eq!(remediation.decision, OutputDecision::NoChange);
//! ```

mod buffer;
mod colr;
mod locate;
mod remediate;
mod report;
mod trc;
mod validate;

#[cfg(feature = "__fixture")]
#[doc(hidden)]
pub mod fixture;

pub use buffer::ImageBuffer;
pub use colr::{derive_header_offset, ColourSpecBox, HeaderLookup, COLOUR_SPEC_SIGNATURE};
pub use locate::{BoxTreeLocator, SearchLocator, SignatureLocator};
pub use remediate::{Remediation, Remediator};
pub use report::{OutputDecision, PatchReport, PatchResult, TagOutcome};
pub use trc::{process_tag, CurveSegment, TrcChannel, TrcTagEntry, CURVE_SIGNATURE};
pub use validate::{ConformanceCheck, StructuralValidator, ValidationFormat, ValidatorOptions};
