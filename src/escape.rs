//! Literal escape decoding for values such as `segment.padding.character`
//!
//! Handles `\t \n \r \b \f \\ \' \"`, `\uXXXX` and octal `\0`..`\377`.

use crate::{ColumnMetadataError, Result};

/// Decode backslash escape sequences into the characters they represent
pub fn unescape(raw: &str) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let Some(next) = chars.next() else {
            // Trailing backslash stays literal
            out.push('\\');
            break;
        };

        match next {
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000C}'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'u' => {
                // `\uuuu0041` is legal, extra u's are skipped
                while chars.peek() == Some(&'u') {
                    chars.next();
                }
                let digits: String = chars.by_ref().take(4).collect();
                let code = (digits.len() == 4)
                    .then(|| u32::from_str_radix(&digits, 16).ok())
                    .flatten()
                    .and_then(char::from_u32)
                    .ok_or_else(|| ColumnMetadataError::InvalidEscape {
                        raw: raw.to_string(),
                    })?;
                out.push(code);
            }
            '0'..='7' => {
                // Up to three octal digits, max \377
                let max_digits = if next <= '3' { 3 } else { 2 };
                let mut value = next.to_digit(8).unwrap_or(0);
                for _ in 1..max_digits {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(value).unwrap_or('\0'));
            }
            other => out.push(other),
        }
    }

    Ok(out)
}
