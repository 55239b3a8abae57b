//! Colour specification box handling.

use tracing::Span;

/// Signature of the colour specification box.
pub const COLOUR_SPEC_SIGNATURE: [u8; 4] = *b"colr";

/// `colr` box located in a file, with its method byte.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ColourSpecBox {
    /// Absolute offset of the `colr` signature.
    pub position: usize,
    pub method: u8,
}

impl ColourSpecBox {
    /// Offset of the method byte relative to the signature.
    pub const METHOD_OFFSET: usize = 4;

    /// Offset of the embedded profile header relative to the method byte, by method.
    #[inline]
    fn profile_distance(method: u8) -> Option<usize> {
        match method {
            1 => Some(7),
            2 => Some(3),
            _ => None,
        }
    }

    /// Absolute offset of the embedded profile header, if the method is recognized.
    pub fn header_offset(&self) -> Option<usize> {
        let distance = Self::profile_distance(self.method)?;
        self.position
            .checked_add(Self::METHOD_OFFSET)?
            .checked_add(distance)
    }
}

/// Result of deriving the profile header offset of a file.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HeaderLookup {
    Found { colr: ColourSpecBox, offset: usize },
    ColourSpecAbsent,
    MethodUnreadable { position: usize },
    UnrecognizedMethod(ColourSpecBox),
}

impl HeaderLookup {
    /// Profile header offset, if available.
    #[inline]
    pub fn offset(&self) -> Option<usize> {
        match *self {
            Self::Found { offset, .. } => Some(offset),
            _ => None,
        }
    }

    #[inline]
    pub fn colour_spec(&self) -> Option<ColourSpecBox> {
        match *self {
            Self::Found { colr, .. } | Self::UnrecognizedMethod(colr) => Some(colr),
            _ => None,
        }
    }
}

impl std::fmt::Display for HeaderLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Found { colr, offset } => write!(
                f,
                "profile header at {offset} (colr at {}, method {})",
                colr.position, colr.method
            ),
            Self::ColourSpecAbsent => write!(f, "colr not found"),
            Self::MethodUnreadable { position } => {
                write!(f, "colr at {position} has no method byte")
            }
            Self::UnrecognizedMethod(colr) => write!(
                f,
                "colr at {} has unrecognized method {}",
                colr.position, colr.method
            ),
        }
    }
}

/// Derives the profile header offset from the `colr` signature position.
pub fn derive_header_offset(buf: &[u8], colr_position: Option<usize>, span: &Span) -> HeaderLookup {
    let Some(position) = colr_position else {
        tracing::warn!(parent: span, "colr not found");
        return HeaderLookup::ColourSpecAbsent;
    };

    let method = position
        .checked_add(ColourSpecBox::METHOD_OFFSET)
        .and_then(|idx| buf.get(idx))
        .copied();
    let Some(method) = method else {
        tracing::warn!(parent: span, position, "colr method byte is past the end of the file");
        return HeaderLookup::MethodUnreadable { position };
    };

    let colr = ColourSpecBox { position, method };
    match colr.header_offset() {
        Some(offset) => {
            tracing::debug!(parent: span, position, method, offset, "Profile header located");
            HeaderLookup::Found { colr, offset }
        }
        None => {
            tracing::warn!(parent: span, position, method, "Unrecognized colr method");
            HeaderLookup::UnrecognizedMethod(colr)
        }
    }
}
