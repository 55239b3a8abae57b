use crate::Error;

/// Box header used in JP2 files.
#[derive(Debug, Clone)]
pub struct BoxHeader {
    ty: BoxType,
    payload_size: Option<u64>,
}

pub enum HeaderParseResult {
    Done {
        header: BoxHeader,
        header_size: usize,
    },
    NeedMoreData,
}

impl BoxHeader {
    pub fn parse(buf: &[u8]) -> Result<HeaderParseResult, Error> {
        let (tbox, payload_size, header_size) = match *buf {
            [0, 0, 0, 1, t0, t1, t2, t3, s0, s1, s2, s3, s4, s5, s6, s7, ..] => {
                let xlbox = u64::from_be_bytes([s0, s1, s2, s3, s4, s5, s6, s7]);
                let tbox = BoxType([t0, t1, t2, t3]);
                let xlbox = xlbox.checked_sub(16).ok_or(Error::InvalidBox)?;
                (tbox, Some(xlbox), 16)
            }
            [0, 0, 0, 1, ..] => return Ok(HeaderParseResult::NeedMoreData),
            [s0, s1, s2, s3, t0, t1, t2, t3, ..] => {
                let lbox = u32::from_be_bytes([s0, s1, s2, s3]);
                let tbox = BoxType([t0, t1, t2, t3]);
                let lbox = if lbox == 0 {
                    None
                } else if let Some(lbox) = lbox.checked_sub(8) {
                    Some(lbox as u64)
                } else {
                    return Err(Error::InvalidBox);
                };
                (tbox, lbox, 8)
            }
            _ => return Ok(HeaderParseResult::NeedMoreData),
        };

        let header = Self {
            ty: tbox,
            payload_size,
        };
        Ok(HeaderParseResult::Done {
            header,
            header_size,
        })
    }
}

impl BoxHeader {
    #[inline]
    pub fn box_type(&self) -> BoxType {
        self.ty
    }

    /// Size of the box contents, excluding the header.
    ///
    /// `None` means the box extends to the end of its parent.
    #[inline]
    pub fn payload_size(&self) -> Option<u64> {
        self.payload_size
    }

    #[inline]
    pub fn extends_to_end(&self) -> bool {
        self.payload_size.is_none()
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct BoxType(pub [u8; 4]);

impl BoxType {
    pub const SIGNATURE: Self = Self(*b"jP  ");
    pub const FILE_TYPE: Self = Self(*b"ftyp");
    pub const JP2_HEADER: Self = Self(*b"jp2h");
    pub const IMAGE_HEADER: Self = Self(*b"ihdr");
    pub const BITS_PER_COMPONENT: Self = Self(*b"bpcc");
    pub const COLOUR_SPEC: Self = Self(*b"colr");
    pub const PALETTE: Self = Self(*b"pclr");
    pub const COMPONENT_MAPPING: Self = Self(*b"cmap");
    pub const CHANNEL_DEFINITION: Self = Self(*b"cdef");
    pub const RESOLUTION: Self = Self(*b"res ");
    pub const CAPTURE_RESOLUTION: Self = Self(*b"resc");
    pub const DISPLAY_RESOLUTION: Self = Self(*b"resd");
    pub const CODESTREAM: Self = Self(*b"jp2c");
    pub const INTELLECTUAL_PROPERTY: Self = Self(*b"jp2i");
    pub const XML: Self = Self(*b"xml ");
    pub const UUID: Self = Self(*b"uuid");
    pub const UUID_INFO: Self = Self(*b"uinf");

    /// Returns whether boxes of this type contain other boxes.
    #[inline]
    pub fn is_superbox(self) -> bool {
        matches!(self, Self::JP2_HEADER | Self::RESOLUTION | Self::UUID_INFO)
    }
}

impl std::fmt::Debug for BoxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BoxType(\"{}\")", self.0.escape_ascii())
    }
}

impl std::fmt::Display for BoxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.escape_ascii())
    }
}
