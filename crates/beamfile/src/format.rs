//! Fixed-width text layout of a Guinea-PIG beam file line.

use shared::{AppError, AppResult};
use smear::ParticleRecord;

pub const FIELD_WIDTH: usize = 16;
pub const PRECISION: usize = 7;

/// Scientific notation with a signed, at least two digit exponent,
/// right-aligned to [`FIELD_WIDTH`] (`  4.5600000e+01`).
pub fn format_field(value: f64) -> String {
    let raw = format!("{:.*e}", PRECISION, value);
    let Some((mantissa, exponent)) = raw.split_once('e') else {
        return format!("{:>width$}", raw, width = FIELD_WIDTH);
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    let field = format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs());
    format!("{:>width$}", field, width = FIELD_WIDTH)
}

/// One newline-terminated line, columns E, x, y, z, x', y'.
pub fn format_record(record: &ParticleRecord) -> String {
    let mut line = String::with_capacity(FIELD_WIDTH * 6 + 1);
    for value in record.to_array() {
        line.push_str(&format_field(value));
    }
    line.push('\n');
    line
}

/// Parse a line written by [`format_record`].
pub fn parse_record(line: &str) -> AppResult<ParticleRecord> {
    let mut values = [0.0; 6];
    let mut fields = line.split_whitespace();
    for slot in values.iter_mut() {
        let field = fields
            .next()
            .ok_or_else(|| AppError::Message(format!("beam line has fewer than six fields: {line:?}")))?;
        *slot = field
            .parse()
            .map_err(|err| AppError::Message(format!("bad beam field {field:?}: {err}")))?;
    }
    if fields.next().is_some() {
        return Err(AppError::Message(format!("beam line has more than six fields: {line:?}")));
    }
    Ok(ParticleRecord::from_array(values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_matches_fixed_layout() {
        assert_eq!(format_field(45.6), "   4.5600000e+01");
        assert_eq!(format_field(-0.0012345678), "  -1.2345678e-03");
        assert_eq!(format_field(0.0), "   0.0000000e+00");
        assert_eq!(format_field(410.0), "   4.1000000e+02");
        assert_eq!(format_field(1.5e-120), "  1.5000000e-120");
        assert_eq!(format_field(1.0), "   1.0000000e+00");
    }

    #[test]
    fn rounds_to_seven_decimals() {
        assert_eq!(format_field(45.612345678), "   4.5612346e+01");
        assert_eq!(format_field(9.99999999), "   1.0000000e+01");
    }

    #[test]
    fn record_line_layout() {
        let record = ParticleRecord::from_array([45.6, 1.25, -0.5, 410.0, 0.0, -3.0e-2]);
        let line = format_record(&record);
        assert_eq!(line.len(), 6 * FIELD_WIDTH + 1);
        assert!(line.ends_with('\n'));
        assert_eq!(
            line,
            "   4.5600000e+01   1.2500000e+00  -5.0000000e-01   4.1000000e+02   0.0000000e+00  -3.0000000e-02\n"
        );
    }

    #[test]
    fn parse_reads_written_line() {
        let record = ParticleRecord::from_array([45.7, 0.3, -0.02, -120.0, 12.5, 0.0]);
        let parsed = parse_record(&format_record(&record)).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn parse_rejects_short_or_long_lines() {
        assert!(parse_record("1.0 2.0 3.0").is_err());
        assert!(parse_record("1 2 3 4 5 6 7").is_err());
        assert!(parse_record("1 2 3 4 5 x").is_err());
    }
}
