//! Builders for synthetic JP2 files, used by tests.

/// A `curv` tag to embed in a test profile.
#[derive(Debug, Copy, Clone)]
pub struct Curve {
    pub signature: [u8; 4],
    pub declared_size: u32,
    pub point_count: u32,
}

impl Curve {
    /// A curve whose declared size matches its data.
    pub fn correct(signature: &[u8; 4], point_count: u32) -> Self {
        Self {
            signature: *signature,
            declared_size: point_count * 2 + 12,
            point_count,
        }
    }

    pub fn declared(signature: &[u8; 4], point_count: u32, declared_size: u32) -> Self {
        Self {
            signature: *signature,
            declared_size,
            point_count,
        }
    }
}

pub fn make_box(ty: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 8);
    out.extend_from_slice(&(payload.len() as u32 + 8).to_be_bytes());
    out.extend_from_slice(ty);
    out.extend_from_slice(payload);
    out
}

/// Builds an RGB display profile with the given TRC tags.
pub fn icc_profile(curves: &[Curve]) -> Vec<u8> {
    let table_len = 4 + curves.len() * 12;
    let mut data = Vec::new();
    let mut entries = Vec::new();
    for curve in curves {
        let offset = 128 + table_len + data.len();
        entries.push((curve.signature, offset as u32, curve.declared_size));

        data.extend_from_slice(b"curv");
        data.extend_from_slice(&[0; 4]);
        data.extend_from_slice(&curve.point_count.to_be_bytes());
        for idx in 0..curve.point_count {
            let sample = (idx * 0xffff / curve.point_count.max(2).saturating_sub(1)) as u16;
            data.extend_from_slice(&sample.to_be_bytes());
        }
        while data.len() % 4 != 0 {
            data.push(0);
        }
    }

    let total_len = 128 + table_len + data.len();
    let mut profile = vec![0u8; 128];
    profile[0..4].copy_from_slice(&(total_len as u32).to_be_bytes());
    profile[8..12].copy_from_slice(&[2, 0x10, 0, 0]);
    profile[12..16].copy_from_slice(b"mntr");
    profile[16..20].copy_from_slice(b"RGB ");
    profile[20..24].copy_from_slice(b"XYZ ");
    profile[36..40].copy_from_slice(b"acsp");

    profile.extend_from_slice(&(curves.len() as u32).to_be_bytes());
    for (signature, offset, size) in entries {
        profile.extend_from_slice(&signature);
        profile.extend_from_slice(&offset.to_be_bytes());
        profile.extend_from_slice(&size.to_be_bytes());
    }
    profile.extend(data);
    profile
}

/// Builds a JP2 file whose `colr` box uses `method` and carries `profile`.
///
/// With method 1 the profile follows a four-byte enumerated colour space.
pub fn jp2_file(method: u8, profile: &[u8]) -> Vec<u8> {
    let mut colr = vec![method, 0, 0];
    if method == 1 {
        colr.extend_from_slice(&16u32.to_be_bytes());
    }
    colr.extend_from_slice(profile);

    let mut ihdr = Vec::with_capacity(14);
    ihdr.extend_from_slice(&1u32.to_be_bytes());
    ihdr.extend_from_slice(&1u32.to_be_bytes());
    ihdr.extend_from_slice(&3u16.to_be_bytes());
    ihdr.extend_from_slice(&[7, 7, 0, 0]);

    let mut jp2h = make_box(b"ihdr", &ihdr);
    jp2h.extend(make_box(b"colr", &colr));

    let mut buf = make_box(b"jP  ", &[0x0d, 0x0a, 0x87, 0x0a]);
    buf.extend(make_box(b"ftyp", b"jp2 \0\0\0\0jp2 "));
    buf.extend(make_box(b"jp2h", &jp2h));
    buf.extend(make_box(
        b"jp2c",
        &[0xff, 0x4f, 0xff, 0x51, 0x00, 0x02, 0xff, 0xd9],
    ));
    buf
}

/// Offset of the `rTRC` entry in [`scenario`].
pub const SCENARIO_TAG_POSITION: usize = 160;

/// 100 zero bytes, `colr` at 100 with method 1 (profile header at 111), an `rTRC` entry with
/// offset 20 and the given declared size, and a one-point curve at 131.
pub fn scenario(declared_size: u32) -> Vec<u8> {
    let mut buf = vec![0u8; 200];
    buf[100..104].copy_from_slice(b"colr");
    buf[104] = 1;
    buf[131..135].copy_from_slice(b"curv");
    buf[139..143].copy_from_slice(&1u32.to_be_bytes());

    let tag = SCENARIO_TAG_POSITION;
    buf[tag..tag + 4].copy_from_slice(b"rTRC");
    buf[tag + 4..tag + 8].copy_from_slice(&20u32.to_be_bytes());
    buf[tag + 8..tag + 12].copy_from_slice(&declared_size.to_be_bytes());
    buf
}
