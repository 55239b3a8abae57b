//! Tone reproduction curve tags of the embedded ICC profile.

use tracing::Span;

use crate::buffer::ImageBuffer;
use crate::colr::HeaderLookup;
use crate::locate::SignatureLocator;
use crate::report::{PatchResult, TagOutcome};

/// Expected signature of a curve segment.
pub const CURVE_SIGNATURE: [u8; 4] = *b"curv";

/// Colour channel a TRC tag belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TrcChannel {
    Red,
    Green,
    Blue,
}

impl TrcChannel {
    pub const ALL: [Self; 3] = [Self::Red, Self::Green, Self::Blue];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn signature(self) -> [u8; 4] {
        match self {
            Self::Red => *b"rTRC",
            Self::Green => *b"gTRC",
            Self::Blue => *b"bTRC",
        }
    }

    #[inline]
    pub fn tag_name(self) -> &'static str {
        match self {
            Self::Red => "rTRC",
            Self::Green => "gTRC",
            Self::Blue => "bTRC",
        }
    }
}

impl std::fmt::Display for TrcChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag_name())
    }
}

/// Tag table entry of a TRC tag.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TrcTagEntry {
    pub signature: [u8; 4],
    /// Offset of the curve segment, relative to the profile header.
    pub offset: u32,
    pub declared_size: u32,
}

impl TrcTagEntry {
    pub const SIZE: usize = 12;
    /// Position of the size field relative to the start of the entry.
    pub const SIZE_FIELD_OFFSET: usize = 8;

    pub fn from_bytes(bytes: [u8; Self::SIZE]) -> Self {
        let [s0, s1, s2, s3, o0, o1, o2, o3, z0, z1, z2, z3] = bytes;
        Self {
            signature: [s0, s1, s2, s3],
            offset: u32::from_be_bytes([o0, o1, o2, o3]),
            declared_size: u32::from_be_bytes([z0, z1, z2, z3]),
        }
    }
}

/// Header of a `curv` segment.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CurveSegment {
    pub signature: [u8; 4],
    pub reserved: u32,
    pub point_count: u32,
}

impl CurveSegment {
    pub const HEADER_SIZE: usize = 12;

    pub fn from_bytes(bytes: [u8; Self::HEADER_SIZE]) -> Self {
        let [s0, s1, s2, s3, r0, r1, r2, r3, n0, n1, n2, n3] = bytes;
        Self {
            signature: [s0, s1, s2, s3],
            reserved: u32::from_be_bytes([r0, r1, r2, r3]),
            point_count: u32::from_be_bytes([n0, n1, n2, n3]),
        }
    }

    #[inline]
    pub fn has_curve_signature(&self) -> bool {
        self.signature == CURVE_SIGNATURE
    }

    /// Byte length of the whole segment: the header followed by `point_count` 16-bit samples.
    #[inline]
    pub fn expected_size(&self) -> u64 {
        self.point_count as u64 * 2 + Self::HEADER_SIZE as u64
    }
}

/// Checks the size field of one TRC tag, and rewrites it if it disagrees with its curve.
///
/// The curve position is derived from the entry offset and the profile header offset only;
/// a curve signature other than `curv` is logged but does not prevent patching.
pub fn process_tag(
    buf: &mut ImageBuffer<'_>,
    channel: TrcChannel,
    header: &HeaderLookup,
    locator: &impl SignatureLocator,
    span: &Span,
) -> TagOutcome {
    let tag = channel.tag_name();
    let mut outcome = TagOutcome::new(channel);

    let Some(position) = locator.find(buf.working(), channel.signature(), 0) else {
        tracing::info!(parent: span, tag, "TRC tag not found");
        return outcome.finish(PatchResult::NotFound);
    };
    outcome.position = Some(position);

    let Some(entry_bytes) = buf.window::<{ TrcTagEntry::SIZE }>(position) else {
        tracing::warn!(parent: span, tag, position, "TRC tag entry is truncated");
        return outcome.finish(PatchResult::EntryIncomplete);
    };
    let entry = TrcTagEntry::from_bytes(entry_bytes);
    outcome.entry = Some(entry);
    tracing::debug!(
        parent: span,
        tag,
        position,
        offset = entry.offset,
        declared_size = entry.declared_size,
        "TRC tag entry"
    );

    let Some(header_offset) = header.offset() else {
        tracing::warn!(parent: span, tag, reason = %header, "Profile header offset unavailable");
        return outcome.finish(PatchResult::HeaderUnavailable);
    };

    let curve = usize::try_from(entry.offset)
        .ok()
        .and_then(|offset| offset.checked_add(header_offset))
        .and_then(|curve_position| buf.window::<{ CurveSegment::HEADER_SIZE }>(curve_position));
    let Some(curve_bytes) = curve else {
        tracing::warn!(
            parent: span,
            tag,
            offset = entry.offset,
            header_offset,
            "Curve segment is truncated"
        );
        return outcome.finish(PatchResult::CurveIncomplete);
    };
    let curve = CurveSegment::from_bytes(curve_bytes);
    outcome.curve = Some(curve);

    if curve.has_curve_signature() {
        tracing::debug!(parent: span, tag, point_count = curve.point_count, "Curve segment");
    } else {
        tracing::warn!(
            parent: span,
            tag,
            signature = %curve.signature.escape_ascii(),
            point_count = curve.point_count,
            "Curve segment has unexpected signature"
        );
    }

    let Ok(expected_size) = u32::try_from(curve.expected_size()) else {
        tracing::warn!(
            parent: span,
            tag,
            point_count = curve.point_count,
            "Curve length does not fit in the size field"
        );
        return outcome.finish(PatchResult::CurveTooLarge {
            point_count: curve.point_count,
        });
    };

    if entry.declared_size == expected_size {
        tracing::debug!(parent: span, tag, size = expected_size, "TRC tag size matches");
        return outcome.finish(PatchResult::SizeMatched);
    }

    let size_field = position + TrcTagEntry::SIZE_FIELD_OFFSET;
    let written = buf.write_u32_be(size_field, expected_size);
    debug_assert!(written, "size field lies within the entry window");
    tracing::info!(
        parent: span,
        tag,
        old = entry.declared_size,
        new = expected_size,
        "Patched TRC tag size"
    );
    outcome.finish(PatchResult::SizePatched {
        old: entry.declared_size,
        new: expected_size,
    })
}
