// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STEP literal encoding
//!
//! Reals always carry a decimal point and an upper-case exponent. Strings are
//! limited to printable ASCII: quotes and backslashes are doubled, everything
//! else goes through the `\X2\...\X0\` UTF-16 control directive.

use std::fmt::Write;

/// Format a real the way ISO-10303-21 expects (`0.`, `-0.1`, `1.E-05`)
///
/// The caller is responsible for rejecting non-finite values.
pub fn format_real(value: f64) -> String {
    // Normalise negative zero
    let value = if value == 0.0 { 0.0 } else { value };
    let repr = format!("{:?}", value);

    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            if mantissa.contains('.') {
                format!("{}E{}", mantissa, exponent)
            } else {
                format!("{}.E{}", mantissa, exponent)
            }
        }
        None => match repr.strip_suffix(".0") {
            Some(whole) => format!("{}.", whole),
            None => repr,
        },
    }
}

/// Encode string content (without the surrounding quotes)
pub fn encode_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut wide: Vec<u16> = Vec::new();

    for c in s.chars() {
        if c == ' ' || c.is_ascii_graphic() {
            flush_wide(&mut wide, &mut out);
            match c {
                '\'' => out.push_str("''"),
                '\\' => out.push_str("\\\\"),
                _ => out.push(c),
            }
        } else {
            let mut buf = [0u16; 2];
            wide.extend_from_slice(c.encode_utf16(&mut buf));
        }
    }
    flush_wide(&mut wide, &mut out);
    out
}

fn flush_wide(wide: &mut Vec<u16>, out: &mut String) {
    if wide.is_empty() {
        return;
    }
    out.push_str("\\X2\\");
    for unit in wide.drain(..) {
        // Writing to a String cannot fail
        let _ = write!(out, "{:04X}", unit);
    }
    out.push_str("\\X0\\");
}

/// Decode raw string content as found between the quotes of a STEP file
///
/// Unknown control directives are kept verbatim.
pub fn decode_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find(['\'', '\\']) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        if let Some(tail) = rest.strip_prefix("''") {
            out.push('\'');
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("\\\\") {
            out.push('\\');
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("\\X2\\") {
            match tail.find("\\X0\\") {
                Some(end) => {
                    out.push_str(&decode_utf16_hex(&tail[..end]));
                    rest = &tail[end + 4..];
                }
                None => {
                    out.push_str("\\X2\\");
                    rest = tail;
                }
            }
        } else if let Some(tail) = rest.strip_prefix("\\X\\") {
            match tail.get(..2).and_then(|h| u8::from_str_radix(h, 16).ok()) {
                Some(byte) => {
                    out.push(byte as char);
                    rest = &tail[2..];
                }
                None => {
                    out.push_str("\\X\\");
                    rest = tail;
                }
            }
        } else {
            // Lone quote or backslash
            let c = rest.chars().next().unwrap_or('\\');
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }
    out.push_str(rest);
    out
}

fn decode_utf16_hex(hex: &str) -> String {
    let units: Vec<u16> = hex
        .as_bytes()
        .chunks(4)
        .filter_map(|chunk| std::str::from_utf8(chunk).ok())
        .filter_map(|h| u16::from_str_radix(h, 16).ok())
        .collect();
    String::from_utf16_lossy(&units)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_real() {
        assert_eq!(format_real(0.0), "0.");
        assert_eq!(format_real(-0.0), "0.");
        assert_eq!(format_real(5.0), "5.");
        assert_eq!(format_real(-0.1), "-0.1");
        assert_eq!(format_real(0.95), "0.95");
        assert_eq!(format_real(1e-5), "1.E-5");
        assert_eq!(format_real(1.5e-7), "1.5E-7");
        assert_eq!(format_real(2e20), "2.E20");
    }

    #[test]
    fn test_encode_plain_and_escaped() {
        assert_eq!(encode_string("wall1"), "wall1");
        assert_eq!(encode_string("it's"), "it''s");
        assert_eq!(encode_string("a\\b"), "a\\\\b");
        assert_eq!(encode_string("Wall Contains window"), "Wall Contains window");
    }

    #[test]
    fn test_encode_non_ascii() {
        assert_eq!(encode_string("Wand\u{e4}"), "Wand\\X2\\00E4\\X0\\");
        assert_eq!(encode_string("\u{e9}\u{e8}x"), "\\X2\\00E900E8\\X0\\x");
    }

    #[test]
    fn test_decode_reverses_encode() {
        for s in ["plain", "it's", "back\\slash", "Gesch\u{f6}ss", "\u{1F6AA} door"] {
            assert_eq!(decode_string(&encode_string(s)), s);
        }
    }

    #[test]
    fn test_decode_latin1_directive() {
        assert_eq!(decode_string("caf\\X\\E9"), "caf\u{e9}");
    }
}
