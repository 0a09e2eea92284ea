//! Restricted printf for module diagnostics
//!
//! The module hands over a NUL-terminated format string and a pointer to its
//! packed variadic arguments. Supported conversions:
//!
//! - `%d` - signed 32-bit integer, 4 bytes
//! - `%u` - unsigned 32-bit integer, 4 bytes
//! - `%f` - 64-bit float, 8 bytes, cursor first aligned up to a multiple of 8
//! - `%%` - a literal percent sign
//!
//! Anything else is copied through verbatim and reported as a [`FormatIssue`]
//! without consuming an argument.

use crate::error::BridgeError;
use crate::memory::MemoryView;

/// Problem found while rendering a format string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatIssue {
    /// Conversion character the emitter does not support
    #[error("unsupported conversion '%{conversion}' at byte {position}")]
    UnsupportedConversion { position: usize, conversion: char },

    /// `%` as the last byte before the terminator
    #[error("dangling '%' at byte {position}")]
    DanglingPercent { position: usize },
}

/// Rendered diagnostic line
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Formatted {
    pub text: String,
    pub issues: Vec<FormatIssue>,
}

/// Render `format` against the packed argument buffer `args`
///
/// Both views normally run from their pointer to the end of linear memory.
/// Reading past either one is a contract violation.
pub fn format_packed(format: MemoryView<'_>, args: MemoryView<'_>) -> Result<Formatted, BridgeError> {
    let mut out: Vec<u8> = Vec::new();
    let mut issues = Vec::new();
    let mut cursor: u32 = 0;
    let mut i: u32 = 0;

    loop {
        let c = format.read_u8(i)?;
        match c {
            0 => break,
            b'%' => {
                let position = i as usize;
                i += 1;
                match format.read_u8(i)? {
                    b'd' => {
                        let value = args.read_i32(cursor)?;
                        out.extend_from_slice(value.to_string().as_bytes());
                        cursor += 4;
                    }
                    b'u' => {
                        let value = args.read_u32(cursor)?;
                        out.extend_from_slice(value.to_string().as_bytes());
                        cursor += 4;
                    }
                    b'f' => {
                        cursor = align8(cursor);
                        let value = args.read_f64(cursor)?;
                        out.extend_from_slice(value.to_string().as_bytes());
                        cursor += 8;
                    }
                    b'%' => out.push(b'%'),
                    0 => {
                        out.push(b'%');
                        issues.push(FormatIssue::DanglingPercent { position });
                        break;
                    }
                    other => {
                        out.push(b'%');
                        out.push(other);
                        issues.push(FormatIssue::UnsupportedConversion {
                            position,
                            conversion: other as char,
                        });
                    }
                }
            }
            literal => out.push(literal),
        }
        i += 1;
    }

    Ok(Formatted {
        text: String::from_utf8_lossy(&out).into_owned(),
        issues,
    })
}

/// Advance `cursor` to the next multiple of 8
fn align8(cursor: u32) -> u32 {
    cursor + (cursor.wrapping_neg() & 7)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Render a format string against raw argument bytes
    fn render(format: &str, args: &[u8]) -> Result<Formatted, BridgeError> {
        let mut fmt = format.as_bytes().to_vec();
        fmt.push(0);
        format_packed(MemoryView::new(&fmt), MemoryView::new(args))
    }

    #[test]
    fn test_mixed_conversions_with_float_padding() {
        let mut args = Vec::new();
        args.extend_from_slice(&7i32.to_le_bytes());
        args.extend_from_slice(&[0; 4]);
        args.extend_from_slice(&3.5f64.to_le_bytes());
        args.extend_from_slice(&42u32.to_le_bytes());

        let formatted = render("%d %f %u", &args).unwrap();
        assert_eq!(formatted.text, "7 3.5 42");
        assert!(formatted.issues.is_empty());
    }

    #[test]
    fn test_float_at_aligned_cursor_needs_no_padding() {
        let mut args = Vec::new();
        args.extend_from_slice(&0.25f64.to_le_bytes());
        args.extend_from_slice(&(-3i32).to_le_bytes());

        assert_eq!(render("x=%f n=%d", &args).unwrap().text, "x=0.25 n=-3");
    }

    #[test]
    fn test_integer_conversions_are_not_aligned() {
        let mut args = Vec::new();
        args.extend_from_slice(&1i32.to_le_bytes());
        args.extend_from_slice(&u32::MAX.to_le_bytes());
        args.extend_from_slice(&(-1i32).to_le_bytes());

        assert_eq!(render("%d,%u,%d", &args).unwrap().text, "1,4294967295,-1");
    }

    #[test]
    fn test_floats_use_shortest_representation() {
        let mut args = Vec::new();
        args.extend_from_slice(&1.0f64.to_le_bytes());
        args.extend_from_slice(&0.1f64.to_le_bytes());

        assert_eq!(render("%f %f", &args).unwrap().text, "1 0.1");
    }

    #[test]
    fn test_unsupported_conversion_is_reported_not_consumed() {
        let args = 5i32.to_le_bytes();
        let formatted = render("%x %d", &args).unwrap();
        assert_eq!(formatted.text, "%x 5");
        assert_eq!(
            formatted.issues,
            vec![FormatIssue::UnsupportedConversion {
                position: 0,
                conversion: 'x'
            }]
        );
    }

    #[test]
    fn test_dangling_percent_is_reported() {
        let formatted = render("100%", &[]).unwrap();
        assert_eq!(formatted.text, "100%");
        assert_eq!(
            formatted.issues,
            vec![FormatIssue::DanglingPercent { position: 3 }]
        );
    }

    #[test]
    fn test_double_percent_is_literal() {
        let formatted = render("50%% done", &[]).unwrap();
        assert_eq!(formatted.text, "50% done");
        assert!(formatted.issues.is_empty());
    }

    #[test]
    fn test_stops_at_first_nul() {
        let fmt = b"ab\0cd\0";
        let formatted = format_packed(MemoryView::new(fmt), MemoryView::new(&[])).unwrap();
        assert_eq!(formatted.text, "ab");
    }

    #[test]
    fn test_literal_utf8_survives() {
        assert_eq!(render("größe ✓", &[]).unwrap().text, "größe ✓");
    }

    #[test]
    fn test_unterminated_format_is_out_of_bounds() {
        let fmt = b"no terminator";
        let result = format_packed(MemoryView::new(fmt), MemoryView::new(&[]));
        assert!(matches!(result, Err(BridgeError::OutOfBounds { .. })));
    }

    #[test]
    fn test_missing_argument_bytes_are_out_of_bounds() {
        let args = 1i32.to_le_bytes();
        let result = render("%d %d", &args);
        assert!(matches!(
            result,
            Err(BridgeError::OutOfBounds { offset: 4, len: 4, .. })
        ));
    }

    #[test]
    fn test_align8() {
        assert_eq!(align8(0), 0);
        assert_eq!(align8(4), 8);
        assert_eq!(align8(8), 8);
        assert_eq!(align8(9), 16);
    }
}
