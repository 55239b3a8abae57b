//! Strategies for finding four-byte signatures in a file.

use jp2_container::BoxType;

use crate::colr::ColourSpecBox;

/// Locates a four-byte signature in a buffer.
///
/// Implementations must be total: malformed input yields `None`, never a panic.
pub trait SignatureLocator {
    /// Returns the absolute offset of the first occurrence of `signature` at or after `start`.
    fn find(&self, buf: &[u8], signature: [u8; 4], start: usize) -> Option<usize>;
}

impl<T: SignatureLocator + ?Sized> SignatureLocator for &T {
    fn find(&self, buf: &[u8], signature: [u8; 4], start: usize) -> Option<usize> {
        (**self).find(buf, signature, start)
    }
}

/// Finds signatures by a plain forward byte search.
///
/// A signature that happens to occur in data preceding the intended structure (e.g. in
/// compressed image data) is matched first.
#[derive(Debug, Default, Copy, Clone)]
pub struct SearchLocator;

impl SignatureLocator for SearchLocator {
    fn find(&self, buf: &[u8], signature: [u8; 4], start: usize) -> Option<usize> {
        let haystack = buf.get(start..)?;
        memchr::memmem::find(haystack, &signature).map(|idx| idx + start)
    }
}

/// Finds signatures by walking declared box lengths and the ICC tag table.
///
/// Box types are matched against the box tree (descending into superboxes). Any other signature
/// is looked up in the tag table of the profile embedded in the first `colr` box.
#[derive(Debug, Default, Copy, Clone)]
pub struct BoxTreeLocator;

impl BoxTreeLocator {
    const TAG_COUNT_OFFSET: usize = 128;
    const TAG_ENTRY_SIZE: usize = 12;

    fn find_box(buf: &[u8], ty: BoxType, start: usize) -> Option<usize> {
        jp2_container::find_box_from(buf, ty, start)
            .ok()?
            .map(|raw_box| raw_box.type_offset())
    }

    fn find_tag(buf: &[u8], signature: [u8; 4], start: usize) -> Option<usize> {
        let colr_position = Self::find_box(buf, BoxType::COLOUR_SPEC, 0)?;
        let method = *buf.get(colr_position + ColourSpecBox::METHOD_OFFSET)?;
        let header = ColourSpecBox {
            position: colr_position,
            method,
        }
        .header_offset()?;

        let count_offset = header.checked_add(Self::TAG_COUNT_OFFSET)?;
        let count = buf.get(count_offset..count_offset.checked_add(4)?)?;
        let count = u32::from_be_bytes(count.try_into().ok()?) as usize;

        let table_start = count_offset + 4;
        (0..count)
            .map(|idx| table_start + idx * Self::TAG_ENTRY_SIZE)
            .map_while(|entry| buf.get(entry..entry + 4).map(|sig| (entry, sig)))
            .find(|&(entry, sig)| entry >= start && sig == signature)
            .map(|(entry, _)| entry)
    }
}

impl SignatureLocator for BoxTreeLocator {
    fn find(&self, buf: &[u8], signature: [u8; 4], start: usize) -> Option<usize> {
        let ty = BoxType(signature);
        if Self::is_box_type(ty) {
            Self::find_box(buf, ty, start)
        } else {
            Self::find_tag(buf, signature, start)
        }
    }
}

impl BoxTreeLocator {
    fn is_box_type(ty: BoxType) -> bool {
        [
            BoxType::SIGNATURE,
            BoxType::FILE_TYPE,
            BoxType::JP2_HEADER,
            BoxType::IMAGE_HEADER,
            BoxType::BITS_PER_COMPONENT,
            BoxType::COLOUR_SPEC,
            BoxType::PALETTE,
            BoxType::COMPONENT_MAPPING,
            BoxType::CHANNEL_DEFINITION,
            BoxType::RESOLUTION,
            BoxType::CAPTURE_RESOLUTION,
            BoxType::DISPLAY_RESOLUTION,
            BoxType::CODESTREAM,
            BoxType::INTELLECTUAL_PROPERTY,
            BoxType::XML,
            BoxType::UUID,
            BoxType::UUID_INFO,
        ]
        .contains(&ty)
    }
}
