/// Original file contents paired with a working copy that receives patches.
///
/// The working copy always has the same length as the original; the only mutation available is
/// an in-bounds overwrite of a big-endian `u32`.
#[derive(Debug)]
pub struct ImageBuffer<'a> {
    original: &'a [u8],
    working: Vec<u8>,
}

impl<'a> ImageBuffer<'a> {
    pub fn new(original: &'a [u8]) -> Self {
        Self {
            original,
            working: original.to_vec(),
        }
    }

    #[inline]
    pub fn original(&self) -> &'a [u8] {
        self.original
    }

    #[inline]
    pub fn working(&self) -> &[u8] {
        &self.working
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.original.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.original.is_empty()
    }

    /// Returns whether the working copy differs from the original.
    pub fn is_modified(&self) -> bool {
        self.working != self.original
    }

    /// Reads the `N` bytes at `offset` of the working copy, if all of them are available.
    pub fn window<const N: usize>(&self, offset: usize) -> Option<[u8; N]> {
        let end = offset.checked_add(N)?;
        let bytes = self.working.get(offset..end)?;
        bytes.try_into().ok()
    }

    /// Overwrites four bytes at `offset` with `value` in big-endian order.
    ///
    /// Returns `false` without touching the buffer if the range is out of bounds.
    pub fn write_u32_be(&mut self, offset: usize, value: u32) -> bool {
        let Some(end) = offset.checked_add(4) else {
            return false;
        };
        let Some(dst) = self.working.get_mut(offset..end) else {
            return false;
        };
        dst.copy_from_slice(&value.to_be_bytes());
        true
    }

    pub fn into_working(self) -> Vec<u8> {
        self.working
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_bounds() {
        let data = [1u8, 2, 3, 4, 5];
        let buf = ImageBuffer::new(&data);
        assert_eq!(buf.window::<4>(1), Some([2, 3, 4, 5]));
        assert_eq!(buf.window::<4>(2), None);
        assert_eq!(buf.window::<4>(usize::MAX), None);
    }

    #[test]
    fn write_keeps_length() {
        let data = [0u8; 6];
        let mut buf = ImageBuffer::new(&data);
        assert!(buf.write_u32_be(2, 0x0102_0304));
        assert!(!buf.write_u32_be(3, 0xffff_ffff));
        assert_eq!(buf.working(), &[0, 0, 1, 2, 3, 4]);
        assert_eq!(buf.len(), buf.working().len());
        assert!(buf.is_modified());
        assert_eq!(buf.original(), &[0; 6]);
    }

    #[test]
    fn unchanged_after_identical_write() {
        let data = [0, 0, 0, 14];
        let mut buf = ImageBuffer::new(&data);
        assert!(buf.write_u32_be(0, 14));
        assert!(!buf.is_modified());
    }
}
