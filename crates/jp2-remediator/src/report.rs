use crate::colr::HeaderLookup;
use crate::trc::{CurveSegment, TrcChannel, TrcTagEntry};

/// Outcome of checking a single TRC tag.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PatchResult {
    /// Tag signature is not present in the file.
    NotFound,
    /// Fewer than 12 bytes follow the tag signature.
    EntryIncomplete,
    /// Profile header offset could not be derived.
    HeaderUnavailable,
    /// Fewer than 12 bytes are available at the curve position.
    CurveIncomplete,
    /// The curve length cannot be represented in the 4-byte size field.
    CurveTooLarge { point_count: u32 },
    SizeMatched,
    SizePatched { old: u32, new: u32 },
}

impl PatchResult {
    #[inline]
    pub fn is_patched(&self) -> bool {
        matches!(self, Self::SizePatched { .. })
    }

    /// Returns whether the tag was skipped without checking its size.
    #[inline]
    pub fn is_skipped(&self) -> bool {
        !matches!(self, Self::SizeMatched | Self::SizePatched { .. })
    }
}

impl std::fmt::Display for PatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::EntryIncomplete => write!(f, "tag entry incomplete"),
            Self::HeaderUnavailable => write!(f, "profile header unavailable"),
            Self::CurveIncomplete => write!(f, "curve segment incomplete"),
            Self::CurveTooLarge { point_count } => {
                write!(f, "curve of {point_count} points is too large")
            }
            Self::SizeMatched => write!(f, "size matches"),
            Self::SizePatched { old, new } => write!(f, "size patched from {old} to {new}"),
        }
    }
}

/// Everything learned about one TRC tag while checking it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagOutcome {
    pub channel: TrcChannel,
    /// Absolute offset of the tag signature.
    pub position: Option<usize>,
    pub entry: Option<TrcTagEntry>,
    pub curve: Option<CurveSegment>,
    pub result: PatchResult,
}

impl TagOutcome {
    pub(crate) fn new(channel: TrcChannel) -> Self {
        Self {
            channel,
            position: None,
            entry: None,
            curve: None,
            result: PatchResult::NotFound,
        }
    }

    pub(crate) fn finish(mut self, result: PatchResult) -> Self {
        self.result = result;
        self
    }
}

/// Per-file report of a remediation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    pub header: HeaderLookup,
    /// Outcomes in the order of [`TrcChannel::ALL`].
    pub tags: [TagOutcome; 3],
}

impl PatchReport {
    #[inline]
    pub fn tag(&self, channel: TrcChannel) -> &TagOutcome {
        &self.tags[channel.index()]
    }

    pub fn result(&self, channel: TrcChannel) -> PatchResult {
        self.tag(channel).result
    }

    pub fn patched_count(&self) -> usize {
        self.tags.iter().filter(|tag| tag.result.is_patched()).count()
    }
}

/// What to do with the working copy after all tags are processed.
#[derive(Clone, PartialEq, Eq)]
pub enum OutputDecision {
    /// Working copy is identical to the original; nothing should be written.
    NoChange,
    /// Working copy differs; it should be written to a new file.
    Write(Vec<u8>),
}

impl OutputDecision {
    /// Compares the working copy to the original.
    pub fn decide(original: &[u8], working: Vec<u8>) -> Self {
        if original == working.as_slice() {
            Self::NoChange
        } else {
            Self::Write(working)
        }
    }

    #[inline]
    pub fn is_no_change(&self) -> bool {
        matches!(self, Self::NoChange)
    }

    pub fn contents(&self) -> Option<&[u8]> {
        match self {
            Self::NoChange => None,
            Self::Write(contents) => Some(contents),
        }
    }
}

impl std::fmt::Debug for OutputDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoChange => write!(f, "NoChange"),
            Self::Write(contents) => write!(f, "Write({} bytes)", contents.len()),
        }
    }
}
