//! Byte-size parsing and formatting for free-text size labels.
//!
//! Indexers report sizes as free text ("15.2 GB", "6GiB", raw byte counts).
//! `parse_byte_size` folds all of those into a canonical byte count and never
//! fails; garbage input yields `0` so callers can treat it as "size unknown".

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;
const TIB: u64 = 1024 * GIB;

/// Parse a free-text size label into bytes.
///
/// Case-insensitive, tolerates a comma as the decimal separator, and treats
/// the "i" unit spellings (GiB, MiB, ...) the same as their plain
/// counterparts. A bare integer is taken as a raw byte count. Anything
/// unparseable yields `0`.
pub fn parse_byte_size(text: &str) -> u64 {
    let cleaned = text.trim().to_lowercase().replace(',', ".");
    if cleaned.is_empty() {
        return 0;
    }

    let split = cleaned
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit() && *c != '.')
        .map(|(i, _)| i)
        .unwrap_or(cleaned.len());

    let (number, unit) = cleaned.split_at(split);
    let value: f64 = match number.parse() {
        Ok(v) => v,
        Err(_) => return 0,
    };

    let multiplier = match unit.trim() {
        "" | "b" | "byte" | "bytes" => 1,
        "kb" | "kib" => KIB,
        "mb" | "mib" => MIB,
        "gb" | "gib" => GIB,
        "tb" | "tib" => TIB,
        _ => return 0,
    };

    (value * multiplier as f64).round() as u64
}

/// Format a byte count back into the human-readable form indexers use.
///
/// One decimal for KB and above, raw count below 1 KB.
pub fn format_byte_size(bytes: u64) -> String {
    if bytes >= TIB {
        format!("{:.1} TB", bytes as f64 / TIB as f64)
    } else if bytes >= GIB {
        format!("{:.1} GB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_units() {
        assert_eq!(parse_byte_size("1 KB"), 1024);
        assert_eq!(parse_byte_size("2MB"), 2 * 1024 * 1024);
        assert_eq!(parse_byte_size("15.2 GB"), (15.2 * GIB as f64).round() as u64);
        assert_eq!(parse_byte_size("1.5 TB"), (1.5 * TIB as f64).round() as u64);
    }

    #[test]
    fn test_parse_binary_spelling_matches_plain() {
        assert_eq!(parse_byte_size("6GiB"), parse_byte_size("6GB"));
        assert_eq!(parse_byte_size("512 MiB"), parse_byte_size("512 MB"));
        assert_eq!(parse_byte_size("3 KiB"), parse_byte_size("3 kb"));
    }

    #[test]
    fn test_parse_comma_decimal() {
        assert_eq!(parse_byte_size("1,5 GB"), parse_byte_size("1.5 GB"));
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(parse_byte_size("10 gb"), parse_byte_size("10 GB"));
        assert_eq!(parse_byte_size("10 Gb"), parse_byte_size("10 GB"));
    }

    #[test]
    fn test_parse_bare_integer_is_bytes() {
        assert_eq!(parse_byte_size("123456"), 123456);
        assert_eq!(parse_byte_size("  42  "), 42);
    }

    #[test]
    fn test_parse_unparseable_is_zero() {
        assert_eq!(parse_byte_size(""), 0);
        assert_eq!(parse_byte_size("unknown"), 0);
        assert_eq!(parse_byte_size("12 parsecs"), 0);
        assert_eq!(parse_byte_size("GB"), 0);
        assert_eq!(parse_byte_size("-5 GB"), 0);
    }

    #[test]
    fn test_format_picks_canonical_unit() {
        assert_eq!(format_byte_size(512), "512 B");
        assert_eq!(format_byte_size(2048), "2.0 KB");
        assert_eq!(format_byte_size(15 * GIB), "15.0 GB");
        assert_eq!(format_byte_size(2 * TIB), "2.0 TB");
    }

    #[test]
    fn test_round_trip_within_unit_precision() {
        for &bytes in &[
            1024,
            500 * MIB,
            8 * GIB,
            (15.2 * GIB as f64) as u64,
            3 * TIB,
        ] {
            let formatted = format_byte_size(bytes);
            let reparsed = parse_byte_size(&formatted);
            // One decimal of the unit the formatter chose.
            let unit = match bytes {
                b if b >= TIB => TIB,
                b if b >= GIB => GIB,
                b if b >= MIB => MIB,
                _ => KIB,
            };
            let tolerance = unit / 10;
            assert!(
                reparsed.abs_diff(bytes) <= tolerance,
                "{} -> {} -> {} (tolerance {})",
                bytes,
                formatted,
                reparsed,
                tolerance
            );
        }
    }
}
