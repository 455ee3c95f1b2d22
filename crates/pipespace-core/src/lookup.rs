//! Standard pipe and flange outer diameters.
//!
//! The spacing engine never looks dimensions up itself; callers resolve
//! pipes through a [`DimensionLookup`] before building a row. The built-in
//! [`StandardDimensions`] covers ASME B36.10M pipe outer diameters and
//! ASME B16.5 flange outer diameters, rounded to whole millimetres for
//! flanges.
//!
//! Size codes are decimal inches (`"0.5"`, `"1.5"`, `"24"`); fractional
//! spellings such as `1-1/2` or `3/4"` are accepted too. Class codes are
//! the rating number, optionally prefixed (`"300"`, `"#300"`, `"CL300"`).

use log::trace;

/// Source of standard outer diameters.
///
/// Absence means the combination is not in the table; callers must treat
/// it as unresolved, never as zero.
pub trait DimensionLookup {
    /// Pipe outer diameter in millimetres for a nominal size code.
    fn pipe_outer_diameter(&self, size: &str) -> Option<f64>;

    /// Flange outer diameter in millimetres for a pressure class and size code.
    fn flange_outer_diameter(&self, class: &str, size: &str) -> Option<f64>;
}

/// ASME B36.10M outer diameters, keyed by NPS in inches.
const PIPE_OD: &[(f64, f64)] = &[
    (0.5, 21.3),
    (0.75, 26.7),
    (1.0, 33.4),
    (1.25, 42.2),
    (1.5, 48.3),
    (2.0, 60.3),
    (2.5, 73.0),
    (3.0, 88.9),
    (4.0, 114.3),
    (5.0, 141.3),
    (6.0, 168.3),
    (8.0, 219.1),
    (10.0, 273.0),
    (12.0, 323.8),
    (14.0, 355.6),
    (16.0, 406.4),
    (18.0, 457.0),
    (20.0, 508.0),
    (24.0, 610.0),
];

const CLASS_150: &[(f64, f64)] = &[
    (0.5, 89.0),
    (0.75, 98.0),
    (1.0, 108.0),
    (1.25, 117.0),
    (1.5, 127.0),
    (2.0, 152.0),
    (2.5, 178.0),
    (3.0, 190.0),
    (4.0, 229.0),
    (5.0, 254.0),
    (6.0, 279.0),
    (8.0, 343.0),
    (10.0, 406.0),
    (12.0, 483.0),
    (14.0, 533.0),
    (16.0, 597.0),
    (18.0, 635.0),
    (20.0, 699.0),
    (24.0, 813.0),
];

const CLASS_300: &[(f64, f64)] = &[
    (0.5, 95.0),
    (0.75, 117.0),
    (1.0, 124.0),
    (1.25, 133.0),
    (1.5, 156.0),
    (2.0, 165.0),
    (2.5, 190.0),
    (3.0, 210.0),
    (4.0, 254.0),
    (5.0, 279.0),
    (6.0, 318.0),
    (8.0, 381.0),
    (10.0, 444.0),
    (12.0, 521.0),
    (14.0, 584.0),
    (16.0, 648.0),
    (18.0, 711.0),
    (20.0, 775.0),
    (24.0, 914.0),
];

const CLASS_600: &[(f64, f64)] = &[
    (0.5, 95.0),
    (0.75, 117.0),
    (1.0, 124.0),
    (1.25, 133.0),
    (1.5, 156.0),
    (2.0, 165.0),
    (2.5, 190.0),
    (3.0, 210.0),
    (4.0, 273.0),
    (5.0, 330.0),
    (6.0, 356.0),
    (8.0, 419.0),
    (10.0, 508.0),
    (12.0, 559.0),
    (14.0, 603.0),
    (16.0, 686.0),
    (18.0, 743.0),
    (20.0, 813.0),
    (24.0, 940.0),
];

const CLASS_900: &[(f64, f64)] = &[
    (0.5, 121.0),
    (0.75, 130.0),
    (1.0, 149.0),
    (1.25, 159.0),
    (1.5, 178.0),
    (2.0, 216.0),
    (2.5, 244.0),
    (3.0, 241.0),
    (4.0, 292.0),
    (5.0, 349.0),
    (6.0, 381.0),
    (8.0, 470.0),
    (10.0, 546.0),
    (12.0, 610.0),
    (14.0, 641.0),
    (16.0, 705.0),
    (18.0, 787.0),
    (20.0, 857.0),
    (24.0, 1041.0),
];

const CLASS_1500: &[(f64, f64)] = &[
    (0.5, 121.0),
    (0.75, 130.0),
    (1.0, 149.0),
    (1.25, 159.0),
    (1.5, 178.0),
    (2.0, 216.0),
    (2.5, 244.0),
    (3.0, 267.0),
    (4.0, 311.0),
    (5.0, 375.0),
    (6.0, 394.0),
    (8.0, 483.0),
    (10.0, 584.0),
    (12.0, 673.0),
    (14.0, 749.0),
    (16.0, 826.0),
    (18.0, 914.0),
    (20.0, 984.0),
    (24.0, 1168.0),
];

// B16.5 stops at NPS 12 for class 2500.
const CLASS_2500: &[(f64, f64)] = &[
    (0.5, 133.0),
    (0.75, 140.0),
    (1.0, 159.0),
    (1.25, 184.0),
    (1.5, 203.0),
    (2.0, 235.0),
    (2.5, 267.0),
    (3.0, 305.0),
    (4.0, 356.0),
    (5.0, 419.0),
    (6.0, 483.0),
    (8.0, 552.0),
    (10.0, 673.0),
    (12.0, 762.0),
];

const FLANGE_OD: &[(u32, &[(f64, f64)])] = &[
    (150, CLASS_150),
    (300, CLASS_300),
    (600, CLASS_600),
    (900, CLASS_900),
    (1500, CLASS_1500),
    (2500, CLASS_2500),
];

/// Built-in ASME pipe and flange dimension table.
///
/// # Examples
///
/// ```
/// # use pipespace_core::lookup::{DimensionLookup, StandardDimensions};
/// let table = StandardDimensions;
/// assert_eq!(table.pipe_outer_diameter("6"), Some(168.3));
/// assert_eq!(table.flange_outer_diameter("300", "1-1/2"), Some(156.0));
/// assert_eq!(table.flange_outer_diameter("2500", "14"), None);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardDimensions;

impl StandardDimensions {
    /// Size codes known to the table, smallest first.
    pub fn sizes(&self) -> impl Iterator<Item = f64> + '_ {
        PIPE_OD.iter().map(|(nps, _)| *nps)
    }

    /// Pressure classes known to the table, lowest first.
    pub fn classes(&self) -> impl Iterator<Item = u32> + '_ {
        FLANGE_OD.iter().map(|(class, _)| *class)
    }
}

impl DimensionLookup for StandardDimensions {
    fn pipe_outer_diameter(&self, size: &str) -> Option<f64> {
        let nps = parse_size(size)?;
        let found = find(PIPE_OD, nps);
        trace!(size, found:?; "Pipe outer diameter lookup");
        found
    }

    fn flange_outer_diameter(&self, class: &str, size: &str) -> Option<f64> {
        let class = parse_class(class)?;
        let nps = parse_size(size)?;
        let found = FLANGE_OD
            .iter()
            .find(|(rating, _)| *rating == class)
            .and_then(|(_, table)| find(table, nps));
        trace!(class, size, found:?; "Flange outer diameter lookup");
        found
    }
}

fn find(table: &[(f64, f64)], nps: f64) -> Option<f64> {
    table
        .iter()
        .find(|(key, _)| (key - nps).abs() < 1e-6)
        .map(|(_, od)| *od)
}

/// Parses an NPS code: `"1.5"`, `"1-1/2"`, `"1 1/2"`, `"3/4"`, with an
/// optional trailing `"`.
pub fn parse_size(code: &str) -> Option<f64> {
    let code = code.trim().trim_end_matches('"').trim();
    if code.is_empty() {
        return None;
    }

    let (whole, fraction) = match code.split_once(['-', ' ']) {
        Some((whole, fraction)) => (Some(whole), fraction.trim()),
        None if code.contains('/') => (None, code),
        None => return code.parse::<f64>().ok().filter(|v| *v > 0.0),
    };

    let (num, den) = fraction.split_once('/')?;
    let num: f64 = num.trim().parse().ok()?;
    let den: f64 = den.trim().parse().ok()?;
    if den == 0.0 {
        return None;
    }
    let whole: f64 = match whole {
        Some(whole) => whole.trim().parse().ok()?,
        None => 0.0,
    };
    Some(whole + num / den).filter(|v| *v > 0.0)
}

/// Parses a pressure class code: `"300"`, `"#300"`, `"CL300"`, `"Class 300"`.
pub fn parse_class(code: &str) -> Option<u32> {
    let code = code.trim().to_ascii_lowercase();
    let digits = code
        .strip_prefix("class")
        .or_else(|| code.strip_prefix("cl"))
        .or_else(|| code.strip_prefix('#'))
        .unwrap_or(&code)
        .trim()
        .trim_end_matches('#');
    digits.parse().ok()
}
