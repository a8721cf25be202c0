//! Type-aware literal and field encoding.
//!
//! Converts one raw column value plus its resolved [`TypeTag`] into either a
//! SQL literal fragment or a CSV field. All rules are deterministic and
//! byte-oriented; no locale or allocation-per-branch tricks.

use crate::core::TypeTag;

/// Sentinel rendered for NULL in CSV mode. Never escaped.
pub const NULL_SENTINEL: &[u8] = b"\\N";

/// Prefix for binary literals in SQL mode.
const BLOB_PREFIX: &[u8] = b"0x";

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Append the SQL literal for one raw value to `out`.
pub fn sql_literal(out: &mut Vec<u8>, tag: TypeTag, value: Option<&[u8]>) {
    let Some(raw) = value else {
        out.extend_from_slice(b"NULL");
        return;
    };

    // The driver reports some boolean columns as varchar; literal true/false
    // values pass through unquoted.
    if tag == TypeTag::Varchar && (raw == b"true" || raw == b"false") {
        out.extend_from_slice(raw);
        return;
    }

    match tag {
        TypeTag::Integer | TypeTag::Double | TypeTag::Bool | TypeTag::Vector => {
            out.extend_from_slice(raw);
        }
        TypeTag::Float => {
            // NaN, +Inf and -Inf are not valid numeric literals; quote them.
            if starts_numeric(raw) {
                out.extend_from_slice(raw);
            } else {
                out.push(b'\'');
                out.extend_from_slice(raw);
                out.push(b'\'');
            }
        }
        TypeTag::Blob => {
            if raw.is_empty() {
                out.extend_from_slice(b"''");
            } else {
                out.extend_from_slice(BLOB_PREFIX);
                for &b in raw {
                    out.push(HEX_UPPER[(b >> 4) as usize]);
                    out.push(HEX_UPPER[(b & 0x0f) as usize]);
                }
            }
        }
        TypeTag::Bit => {
            out.extend_from_slice(b"_binary '");
            for &b in raw {
                if b == 0 {
                    out.extend_from_slice(b"\\0");
                } else {
                    out.push(b);
                }
            }
            out.push(b'\'');
        }
        TypeTag::Empty => {
            if raw == b"true" || raw == b"false" {
                out.extend_from_slice(raw);
            } else {
                push_quoted(out, raw);
            }
        }
        // Text, char, varchar, json and unrecognized types are all emitted
        // as escaped string literals.
        _ => push_quoted(out, raw),
    }
}

fn starts_numeric(raw: &[u8]) -> bool {
    match raw {
        [b'0'..=b'9', ..] => true,
        [b'-', b'0'..=b'9', ..] => true,
        _ => false,
    }
}

/// Append `'...'` with backslash and single quote escaped by
/// doubling-with-backslash.
fn push_quoted(out: &mut Vec<u8>, raw: &[u8]) {
    out.push(b'\'');
    for &b in raw {
        match b {
            b'\\' => out.extend_from_slice(b"\\\\"),
            b'\'' => out.extend_from_slice(b"\\'"),
            _ => out.push(b),
        }
    }
    out.push(b'\'');
}

/// Escape policy for CSV string fields.
///
/// The character set is compiled into a byte lookup table once per dump run
/// and reused for every field. A backslash is inserted before each
/// occurrence of a set member. Only single-byte characters participate; the
/// field delimiter is never part of the set (quoting handles it).
#[derive(Debug, Clone)]
pub struct CsvEscaper {
    table: [bool; 256],
}

impl CsvEscaper {
    /// Control and quote characters escaped by default.
    pub const DEFAULT_SET: &'static [char] =
        &['\0', '\u{8}', '\t', '\n', '\r', '\u{1a}', '\'', '"'];

    pub fn new(set: &[char]) -> Self {
        let mut table = [false; 256];
        for &c in set {
            if c.is_ascii() {
                table[c as usize] = true;
            }
        }
        Self { table }
    }

    fn escape(&self, raw: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(raw.len());
        for &b in raw {
            if self.table[b as usize] {
                out.push(b'\\');
            }
            out.push(b);
        }
        out
    }
}

impl Default for CsvEscaper {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SET)
    }
}

/// Produce the CSV field bytes for one raw value.
///
/// NULL renders as the fixed sentinel. Non-NULL values pass through in their
/// textual form for every tag (numeric, boolean, json and string types
/// alike; structural characters are handled by the CSV quoting layer). The
/// optional escaper applies to string-typed fields only, and a
/// backslash-doubling pass applies to every field. The one exception is a
/// field equal to the sentinel itself, which always passes through unchanged.
pub fn csv_field(tag: TypeTag, value: Option<&[u8]>, escaper: Option<&CsvEscaper>) -> Vec<u8> {
    let Some(raw) = value else {
        return NULL_SENTINEL.to_vec();
    };
    if raw == NULL_SENTINEL {
        return raw.to_vec();
    }

    let field = match escaper {
        Some(esc) if tag.is_string() => esc.escape(raw),
        _ => raw.to_vec(),
    };

    double_backslashes(&field)
}

fn double_backslashes(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    for &b in raw {
        if b == b'\\' {
            out.push(b'\\');
        }
        out.push(b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(tag: TypeTag, value: Option<&[u8]>) -> String {
        let mut out = Vec::new();
        sql_literal(&mut out, tag, value);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_null_literal() {
        for tag in [TypeTag::Integer, TypeTag::Blob, TypeTag::Varchar, TypeTag::Bit] {
            assert_eq!(literal(tag, None), "NULL");
        }
    }

    #[test]
    fn test_numeric_passthrough() {
        assert_eq!(literal(TypeTag::Integer, Some(b"42")), "42");
        assert_eq!(literal(TypeTag::Double, Some(b"3.25")), "3.25");
        assert_eq!(literal(TypeTag::Bool, Some(b"true")), "true");
    }

    #[test]
    fn test_float_special_tokens_quoted() {
        assert_eq!(literal(TypeTag::Float, Some(b"1.5")), "1.5");
        assert_eq!(literal(TypeTag::Float, Some(b"-1.5")), "-1.5");
        assert_eq!(literal(TypeTag::Float, Some(b"NaN")), "'NaN'");
        assert_eq!(literal(TypeTag::Float, Some(b"+Inf")), "'+Inf'");
        assert_eq!(literal(TypeTag::Float, Some(b"-Inf")), "'-Inf'");
    }

    #[test]
    fn test_blob_hex() {
        assert_eq!(literal(TypeTag::Blob, Some(b"")), "''");
        assert_eq!(literal(TypeTag::Blob, Some(&[0x00, 0xab, 0xff])), "0x00ABFF");
    }

    #[test]
    fn test_bit_literal() {
        assert_eq!(
            literal(TypeTag::Bit, Some(&[0x00, b'a', 0x00])),
            "_binary '\\0a\\0'"
        );
    }

    #[test]
    fn test_vector_passthrough() {
        assert_eq!(literal(TypeTag::Vector, Some(b"[1, 2, 3]")), "[1, 2, 3]");
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(literal(TypeTag::Varchar, Some(b"plain")), "'plain'");
        assert_eq!(literal(TypeTag::Text, Some(br"a\b")), r"'a\\b'");
        assert_eq!(literal(TypeTag::Char, Some(b"o'clock")), r"'o\'clock'");
        assert_eq!(literal(TypeTag::Other, Some(b"x")), "'x'");
    }

    #[test]
    fn test_varchar_boolean_special_case() {
        assert_eq!(literal(TypeTag::Varchar, Some(b"true")), "true");
        assert_eq!(literal(TypeTag::Varchar, Some(b"false")), "false");
        assert_eq!(literal(TypeTag::Varchar, Some(b"truey")), "'truey'");
    }

    #[test]
    fn test_empty_type_heuristic() {
        assert_eq!(literal(TypeTag::Empty, Some(b"true")), "true");
        assert_eq!(literal(TypeTag::Empty, Some(b"maybe")), "'maybe'");
        assert_eq!(
            literal(TypeTag::Empty, Some(b"550e8400-e29b-41d4-a716-446655440000")),
            "'550e8400-e29b-41d4-a716-446655440000'"
        );
    }

    /// Reversing the escape rule recovers the original bytes.
    #[test]
    fn test_string_literal_round_trip() {
        let cases: &[&[u8]] = &[
            b"simple",
            b"with 'quotes'",
            br"back\slash",
            b"\x00nul\x00",
            br"\'mixed\'",
        ];
        for &case in cases {
            let s = literal(TypeTag::Text, Some(case));
            let inner = &s[1..s.len() - 1];
            let mut decoded = Vec::new();
            let mut bytes = inner.bytes();
            while let Some(b) = bytes.next() {
                if b == b'\\' {
                    decoded.push(bytes.next().unwrap());
                } else {
                    decoded.push(b);
                }
            }
            assert_eq!(decoded, case, "round trip failed for {:?}", case);
        }
    }

    #[test]
    fn test_csv_null_sentinel() {
        assert_eq!(csv_field(TypeTag::Integer, None, None), b"\\N");
        // Escaping the sentinel is a no-op, even with an escaper configured.
        let esc = CsvEscaper::default();
        assert_eq!(csv_field(TypeTag::Text, None, Some(&esc)), b"\\N");
        assert_eq!(csv_field(TypeTag::Text, Some(b"\\N"), Some(&esc)), b"\\N");
    }

    #[test]
    fn test_csv_backslash_doubling() {
        assert_eq!(csv_field(TypeTag::Integer, Some(b"12"), None), b"12");
        assert_eq!(
            csv_field(TypeTag::Text, Some(br"a\b"), None),
            br"a\\b".to_vec()
        );
    }

    #[test]
    fn test_csv_escaper_applies_to_string_types_only() {
        let esc = CsvEscaper::default();
        assert_eq!(
            csv_field(TypeTag::Text, Some(b"a\nb"), Some(&esc)),
            b"a\\\\\nb".to_vec()
        );
        // Numeric fields skip the escaper.
        assert_eq!(csv_field(TypeTag::Integer, Some(b"1"), Some(&esc)), b"1");
    }

    #[test]
    fn test_csv_delimiter_not_escaped() {
        // A semicolon delimiter stays literal; the CSV writer quotes it.
        let esc = CsvEscaper::default();
        assert_eq!(
            csv_field(TypeTag::Varchar, Some(br"a\;b"), Some(&esc)),
            br"a\\;b".to_vec()
        );
    }
}
