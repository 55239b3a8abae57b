//! Structural conformance checks, used for diagnostics before remediation.

use jp2_container::{BoxIter, BoxType, RawBox};
use tracing::Span;

/// Gives a yes/no conformance verdict for a file.
pub trait ConformanceCheck {
    fn is_valid(&self, buf: &[u8], span: &Span) -> bool;
}

/// Kind of file the checker expects.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ValidationFormat {
    /// JP2 file with box structure.
    #[default]
    Jp2,
    /// Raw JPEG 2000 codestream.
    J2c,
}

/// Options of [`StructuralValidator`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ValidatorOptions {
    pub format: ValidationFormat,
    /// Report every failed check instead of only the first one.
    pub verbose: bool,
    /// Allow `xml ` boxes to carry trailing NUL bytes.
    pub null_xml: bool,
    /// Also check codestream start and end markers.
    pub packet_markers: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            format: ValidationFormat::Jp2,
            verbose: true,
            null_xml: false,
            packet_markers: true,
        }
    }
}

/// Checks the box layout required by JPEG 2000 Part 1 (Annex I).
#[derive(Debug, Clone, Default)]
pub struct StructuralValidator {
    options: ValidatorOptions,
}

const SIGNATURE_PAYLOAD: [u8; 4] = [0x0d, 0x0a, 0x87, 0x0a];
const BRAND_JP2: [u8; 4] = *b"jp2 ";
const IMAGE_HEADER_SIZE: usize = 14;
const MARKER_SOC: [u8; 2] = [0xff, 0x4f];
const MARKER_SIZ: [u8; 2] = [0xff, 0x51];
const MARKER_EOC: [u8; 2] = [0xff, 0xd9];

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Failure {
    BrokenBoxStructure,
    MissingSignature,
    BadSignature,
    MissingFileType,
    NotJp2Brand,
    MissingHeader,
    BadImageHeader,
    MissingColourSpec,
    MissingCodestream,
    BadXml,
    NoStartOfCodestream,
    NoEndOfCodestream,
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Self::BrokenBoxStructure => "box lengths are inconsistent",
            Self::MissingSignature => "first box is not a JP2 signature box",
            Self::BadSignature => "signature box has unexpected contents",
            Self::MissingFileType => "second box is not a file type box",
            Self::NotJp2Brand => "file type box does not list the jp2 brand",
            Self::MissingHeader => "no JP2 header box",
            Self::BadImageHeader => "first box in JP2 header is not a valid image header box",
            Self::MissingColourSpec => "no colour specification box in JP2 header",
            Self::MissingCodestream => "no contiguous codestream box",
            Self::BadXml => "XML box is not NUL-free UTF-8 text",
            Self::NoStartOfCodestream => "codestream does not start with SOC and SIZ markers",
            Self::NoEndOfCodestream => "codestream does not end with EOC marker",
        };
        f.write_str(msg)
    }
}

impl StructuralValidator {
    pub fn new(options: ValidatorOptions) -> Self {
        Self { options }
    }

    #[inline]
    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// Runs all checks and returns the failures, in the order they were found.
    fn failures(&self, buf: &[u8]) -> Vec<Failure> {
        match self.options.format {
            ValidationFormat::Jp2 => self.check_jp2(buf),
            ValidationFormat::J2c => self.check_codestream(buf, true),
        }
    }

    fn check_jp2(&self, buf: &[u8]) -> Vec<Failure> {
        let mut failures = Vec::new();

        let boxes = match BoxIter::new(buf).collect::<jp2_container::Result<Vec<_>>>() {
            Ok(boxes) => boxes,
            Err(_) => {
                failures.push(Failure::BrokenBoxStructure);
                return failures;
            }
        };

        match boxes.first() {
            Some(b) if b.box_type() == BoxType::SIGNATURE => {
                if b.payload() != SIGNATURE_PAYLOAD {
                    failures.push(Failure::BadSignature);
                }
            }
            _ => failures.push(Failure::MissingSignature),
        }

        match boxes.get(1) {
            Some(b) if b.box_type() == BoxType::FILE_TYPE => {
                if !lists_jp2_brand(b.payload()) {
                    failures.push(Failure::NotJp2Brand);
                }
            }
            _ => failures.push(Failure::MissingFileType),
        }

        match boxes.iter().find(|b| b.box_type() == BoxType::JP2_HEADER) {
            Some(header) => failures.extend(check_header_box(header)),
            None => failures.push(Failure::MissingHeader),
        }

        match boxes.iter().find(|b| b.box_type() == BoxType::CODESTREAM) {
            Some(codestream) => {
                if self.options.packet_markers {
                    failures.extend(self.check_codestream(codestream.payload(), false));
                }
            }
            None => failures.push(Failure::MissingCodestream),
        }

        for xml in boxes.iter().filter(|b| b.box_type() == BoxType::XML) {
            let mut text = xml.payload();
            if self.options.null_xml {
                while let [rest @ .., 0] = text {
                    text = rest;
                }
            }
            if text.contains(&0) || std::str::from_utf8(text).is_err() {
                failures.push(Failure::BadXml);
            }
        }

        failures
    }

    fn check_codestream(&self, codestream: &[u8], raw: bool) -> Vec<Failure> {
        let mut failures = Vec::new();
        let starts = codestream.len() >= 4
            && codestream[..2] == MARKER_SOC
            && codestream[2..4] == MARKER_SIZ;
        if !starts {
            failures.push(Failure::NoStartOfCodestream);
        }
        if (!raw || self.options.packet_markers) && !codestream.ends_with(&MARKER_EOC) {
            failures.push(Failure::NoEndOfCodestream);
        }
        failures
    }
}

fn lists_jp2_brand(ftyp: &[u8]) -> bool {
    // brand, minor version, then compatibility list
    if ftyp.len() < 8 {
        return false;
    }
    ftyp[..4] == BRAND_JP2 || ftyp[8..].chunks_exact(4).any(|cl| cl == BRAND_JP2)
}

fn check_header_box(header: &RawBox<'_>) -> Vec<Failure> {
    let mut failures = Vec::new();
    let Ok(children) = header.children().collect::<jp2_container::Result<Vec<_>>>() else {
        failures.push(Failure::BrokenBoxStructure);
        return failures;
    };

    match children.first() {
        Some(ihdr)
            if ihdr.box_type() == BoxType::IMAGE_HEADER
                && ihdr.payload().len() == IMAGE_HEADER_SIZE => {}
        _ => failures.push(Failure::BadImageHeader),
    }
    if !children.iter().any(|b| b.box_type() == BoxType::COLOUR_SPEC) {
        failures.push(Failure::MissingColourSpec);
    }
    failures
}

impl ConformanceCheck for StructuralValidator {
    fn is_valid(&self, buf: &[u8], span: &Span) -> bool {
        let failures = self.failures(buf);
        if self.options.verbose {
            for failure in &failures {
                tracing::debug!(parent: span, %failure, "Conformance check failed");
            }
        } else if let Some(failure) = failures.first() {
            tracing::debug!(parent: span, %failure, "Conformance check failed");
        }
        failures.is_empty()
    }
}
