//! Roll number generation and validation
//!
//! NITH roll numbers have the fixed shape `YY + DEPT + NNN`: a two-digit
//! enrollment year, a three-letter department code from a closed set, and a
//! zero-padded sequence number in 001-150. The portal partitions result
//! pages by the year prefix.

/// Department codes the portal serves results for
pub const DEPARTMENTS: &[&str] = &[
    "BEC", "BCS", "DCS", "DEC", "BPH", "BME", "BCH", "BMA", "BMS", "BCE", "BEE", "BAR",
];

/// Enrollment years with a result scheme on the portal
pub const YEARS: &[&str] = &["21", "22", "23", "24"];

/// Highest sequence number generated per department
pub const MAX_SEQ: u32 = 150;

/// Generate the full roll sequence for one year and department
///
/// Yields exactly 150 rolls, `001` through `150`, in ascending order.
/// Pure function: no validation, no I/O.
pub fn generate_rolls(year: &str, department: &str) -> Vec<String> {
    (1..=MAX_SEQ)
        .map(|n| format!("{year}{department}{n:03}"))
        .collect()
}

/// Check whether a year is in the supported set
pub fn is_valid_year(year: &str) -> bool {
    YEARS.contains(&year)
}

/// Check whether a department code is in the closed set
pub fn is_valid_department(dept: &str) -> bool {
    DEPARTMENTS.contains(&dept)
}

/// Validate a full 8-character roll number
///
/// Accepts only `YY` in the supported year set, `DEPT` in the closed
/// department set, and a numeric suffix in 1-150.
pub fn is_valid_roll(roll: &str) -> bool {
    if roll.len() != 8 || !roll.is_ascii() {
        return false;
    }
    let year = &roll[..2];
    let dept = &roll[2..5];
    let seq = &roll[5..];

    is_valid_year(year)
        && is_valid_department(dept)
        && seq
            .parse::<u32>()
            .map(|n| (1..=MAX_SEQ).contains(&n))
            .unwrap_or(false)
}

/// Extract the two-digit year prefix used to pick the portal endpoint
pub fn year_of(roll: &str) -> Option<&str> {
    roll.get(..2).filter(|y| y.chars().all(|c| c.is_ascii_digit()))
}
