use tracing::Span;

use crate::buffer::ImageBuffer;
use crate::colr::{derive_header_offset, COLOUR_SPEC_SIGNATURE};
use crate::locate::{SearchLocator, SignatureLocator};
use crate::report::{OutputDecision, PatchReport};
use crate::trc::{process_tag, TrcChannel};

/// Result of remediating one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remediation {
    pub report: PatchReport,
    pub decision: OutputDecision,
}

/// Runs the TRC size repair over whole files.
///
/// The locator decides how `colr` and TRC tag signatures are found; [`SearchLocator`] is the
/// default.
#[derive(Debug, Default, Clone)]
pub struct Remediator<L = SearchLocator> {
    locator: L,
}

impl Remediator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<L: SignatureLocator> Remediator<L> {
    pub fn with_locator(locator: L) -> Self {
        Self { locator }
    }

    #[inline]
    pub fn locator(&self) -> &L {
        &self.locator
    }

    /// Checks and repairs the TRC tags of a file.
    ///
    /// Events are emitted as children of `span`. This never fails; problems are recorded per tag
    /// in the returned report.
    pub fn remediate(&self, original: &[u8], span: &Span) -> Remediation {
        let mut buf = ImageBuffer::new(original);

        let colr_position = self.locator.find(buf.working(), COLOUR_SPEC_SIGNATURE, 0);
        let header = derive_header_offset(buf.working(), colr_position, span);

        let tags = TrcChannel::ALL
            .map(|channel| process_tag(&mut buf, channel, &header, &self.locator, span));
        debug_assert_eq!(buf.working().len(), original.len());

        let report = PatchReport { header, tags };
        let decision = OutputDecision::decide(original, buf.into_working());
        match &decision {
            OutputDecision::NoChange => {
                tracing::info!(parent: span, "No TRC tag needed patching");
            }
            OutputDecision::Write(_) => {
                tracing::info!(
                    parent: span,
                    patched = report.patched_count(),
                    "TRC tags patched"
                );
            }
        }

        Remediation { report, decision }
    }
}
