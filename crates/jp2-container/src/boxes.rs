use crate::box_header::*;
use crate::error::{Error, Result};

/// A box located inside a buffer.
#[derive(Debug, Clone)]
pub struct RawBox<'buf> {
    header: BoxHeader,
    offset: usize,
    header_size: usize,
    payload: &'buf [u8],
}

impl<'buf> RawBox<'buf> {
    #[inline]
    pub fn box_type(&self) -> BoxType {
        self.header.box_type()
    }

    #[inline]
    pub fn header(&self) -> &BoxHeader {
        &self.header
    }

    /// Absolute offset of the first byte of the box header.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Absolute offset of the four-byte box type.
    #[inline]
    pub fn type_offset(&self) -> usize {
        self.offset + 4
    }

    /// Absolute offset of the first payload byte.
    #[inline]
    pub fn payload_offset(&self) -> usize {
        self.offset + self.header_size
    }

    #[inline]
    pub fn payload(&self) -> &'buf [u8] {
        self.payload
    }

    /// Returns an iterator over the boxes contained in this box.
    ///
    /// The payload is treated as a sequence of boxes regardless of the box type.
    pub fn children(&self) -> BoxIter<'buf> {
        BoxIter::with_base(self.payload, self.payload_offset())
    }
}

/// Iterator over a sequence of sibling boxes, following declared box lengths.
///
/// The iterator stops after the first error.
#[derive(Debug, Clone)]
pub struct BoxIter<'buf> {
    buf: &'buf [u8],
    base: usize,
    pos: usize,
    done: bool,
}

impl<'buf> BoxIter<'buf> {
    /// Creates an iterator over top-level boxes of a file.
    pub fn new(buf: &'buf [u8]) -> Self {
        Self::with_base(buf, 0)
    }

    fn with_base(buf: &'buf [u8], base: usize) -> Self {
        Self {
            buf,
            base,
            pos: 0,
            done: false,
        }
    }

    fn read_box(&mut self) -> Result<RawBox<'buf>> {
        let remaining = &self.buf[self.pos..];
        let offset = self.base + self.pos;
        let (header, header_size) = match BoxHeader::parse(remaining)? {
            HeaderParseResult::Done {
                header,
                header_size,
            } => (header, header_size),
            HeaderParseResult::NeedMoreData => return Err(Error::Truncated { offset }),
        };

        let available = remaining.len() - header_size;
        let payload_len = match header.payload_size() {
            None => available,
            Some(size) => match usize::try_from(size) {
                Ok(size) if size <= available => size,
                _ => return Err(Error::Truncated { offset }),
            },
        };

        let payload = &remaining[header_size..header_size + payload_len];
        self.pos += header_size + payload_len;
        tracing::trace!(
            ty = %header.box_type(),
            offset,
            payload_len,
            "Box found"
        );
        Ok(RawBox {
            header,
            offset,
            header_size,
            payload,
        })
    }
}

impl<'buf> Iterator for BoxIter<'buf> {
    type Item = Result<RawBox<'buf>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.pos >= self.buf.len() {
            return None;
        }

        let result = self.read_box();
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}

/// Finds the first box of the given type, descending into superboxes.
///
/// Boxes are visited in file order; a superbox is visited before its children.
pub fn find_box(buf: &[u8], ty: BoxType) -> Result<Option<RawBox<'_>>> {
    find_box_from(buf, ty, 0)
}

/// Like [`find_box`], but skips boxes whose type field starts before `start`.
pub fn find_box_from(buf: &[u8], ty: BoxType, start: usize) -> Result<Option<RawBox<'_>>> {
    fn search<'buf>(
        iter: BoxIter<'buf>,
        ty: BoxType,
        start: usize,
    ) -> Result<Option<RawBox<'buf>>> {
        for raw_box in iter {
            let raw_box = raw_box?;
            if raw_box.box_type() == ty && raw_box.type_offset() >= start {
                return Ok(Some(raw_box));
            }
            if raw_box.box_type().is_superbox() {
                if let Some(found) = search(raw_box.children(), ty, start)? {
                    return Ok(Some(found));
                }
            }
        }
        Ok(None)
    }

    search(BoxIter::new(buf), ty, start)
}
