//! Output naming and writing.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

const EXTENSION: &str = ".jp2";
const SECONDS_PER_DAY: u64 = 86_400;

/// `YYYYMMDD` date stamp appended to remediated file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp(String);

impl Stamp {
    /// Stamp of the current UTC date.
    pub fn today() -> Self {
        let days = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs() / SECONDS_PER_DAY)
            .unwrap_or(0);
        Self::from_unix_days(days as i64)
    }

    pub fn from_unix_days(days: i64) -> Self {
        let (year, month, day) = civil_from_days(days);
        Self(format!("{year:04}{month:02}{day:02}"))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Stamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn parse_stamp(s: &str) -> std::result::Result<Stamp, String> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(String::from("stamp should be eight digits (YYYYMMDD)"));
    }
    let month = s[4..6].parse::<u32>().map_err(|e| e.to_string())?;
    let day = s[6..8].parse::<u32>().map_err(|e| e.to_string())?;
    if !(1..=12).contains(&month) {
        return Err(format!("invalid month {month}"));
    }
    if !(1..=31).contains(&day) {
        return Err(format!("invalid day {day}"));
    }
    Ok(Stamp(s.to_owned()))
}

/// Converts days since 1970-01-01 to a proleptic Gregorian `(year, month, day)`.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

/// Name of the remediated copy of `name`: `<stem>_modified_<stamp>.jp2`.
///
/// A trailing `.jp2` (in any case) is replaced; other names get the suffix appended.
pub fn modified_file_name(name: &str, stamp: &Stamp) -> String {
    let split = name.len().saturating_sub(EXTENSION.len());
    let stem = match name.get(split..) {
        Some(ext) if ext.eq_ignore_ascii_case(EXTENSION) => &name[..split],
        _ => name,
    };
    format!("{stem}_modified_{stamp}{EXTENSION}")
}

/// Path of the remediated copy of `input`, in the same directory.
pub fn modified_path(input: &Path, stamp: &Stamp) -> PathBuf {
    let name = input
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    input.with_file_name(modified_file_name(&name, stamp))
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Writes remediated contents to `output`, creating parent directories.
///
/// Never overwrites `input`.
pub fn write_output(input: &Path, output: &Path, contents: &[u8]) -> Result<()> {
    if is_same_file(input, output) {
        return Err(Error::OutputIsInput(output.to_owned()));
    }
    let map_err = |source| Error::WriteOutput {
        path: output.to_owned(),
        source,
    };
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(map_err)?;
    }
    std::fs::write(output, contents).map_err(map_err)
}
