//! Escaping for string and character literals.

use std::fmt::Write;

fn push_unit(out: &mut String, unit: u16) {
    match unit {
        0x5c => out.push_str("\\\\"),
        0x22 => out.push_str("\\\""),
        0x27 => out.push_str("\\'"),
        0x0a => out.push_str("\\n"),
        0x0d => out.push_str("\\r"),
        0x09 => out.push_str("\\t"),
        0x20..=0x7e => out.push(unit as u8 as char),
        _ => {
            let _ = write!(out, "\\u{unit:04x}");
        }
    }
}

/// Escape `s` for use between double quotes. Characters outside printable
/// ASCII become `\uXXXX` per UTF-16 unit.
pub fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for unit in s.encode_utf16() {
        push_unit(&mut out, unit);
    }
    out
}

/// Escape a single UTF-16 unit for use between single quotes.
pub fn escape_char(unit: u16) -> String {
    let mut out = String::new();
    push_unit(&mut out, unit);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes() {
        assert_eq!(escape_string("plain"), "plain");
        assert_eq!(escape_string("a\"b\\c\n"), "a\\\"b\\\\c\\n");
        assert_eq!(escape_string("tab\there"), "tab\\there");
        assert_eq!(escape_string("é"), "\\u00e9");
        assert_eq!(escape_string("😀"), "\\ud83d\\ude00");
        assert_eq!(escape_char(0x27), "\\'");
        assert_eq!(escape_char(0x41), "A");
    }
}
