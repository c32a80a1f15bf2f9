//! Text form of raw values, e.g. `[01, 05, ab]`

use crate::error::{GattParserError, Result};

fn check_radix(radix: u32) -> Result<()> {
    if (2..=36).contains(&radix) {
        Ok(())
    } else {
        Err(GattParserError::InvalidRawString(format!(
            "unsupported radix {}",
            radix
        )))
    }
}

fn to_digits(mut byte: u8, radix: u32) -> String {
    let mut digits = Vec::new();
    loop {
        let digit = u32::from(byte) % radix;
        digits.push(char::from_digit(digit, radix).unwrap_or('?'));
        byte = (u32::from(byte) / radix) as u8;
        if byte == 0 {
            break;
        }
    }
    while digits.len() < 2 {
        digits.push('0');
    }
    digits.iter().rev().collect()
}

/// Render bytes as a bracketed, comma separated list with each byte padded to two digits
pub fn format_raw(raw: &[u8], radix: u32) -> Result<String> {
    check_radix(radix)?;
    let bytes: Vec<String> = raw.iter().map(|b| to_digits(*b, radix)).collect();
    Ok(format!("[{}]", bytes.join(", ")))
}

/// Parse the output of [`format_raw`] back into bytes.
///
/// Negative numbers down to -128 are accepted and stored as their two's complement byte.
pub fn parse_raw(text: &str, radix: u32) -> Result<Vec<u8>> {
    check_radix(radix)?;
    let body = text.trim().trim_start_matches('[').trim_end_matches(']');
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    body.split(',')
        .map(|token| {
            let token = token.trim();
            match i32::from_str_radix(token, radix) {
                Ok(value) if (-128..=255).contains(&value) => Ok(value as u8),
                _ => Err(GattParserError::InvalidRawString(token.to_string())),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(&[0x01, 0x05, 0xab], 16, "[01, 05, ab]"; "hex")]
    #[test_case(&[0x01, 0xff], 10, "[01, 255]"; "decimal")]
    #[test_case(&[0x05], 2, "[101]"; "binary")]
    #[test_case(&[], 16, "[]"; "empty")]
    fn test_format_raw(raw: &[u8], radix: u32, expected: &str) {
        assert_eq!(format_raw(raw, radix).unwrap(), expected);
    }

    #[test]
    fn test_parse_raw() {
        assert_eq!(parse_raw("[01, 05, ab]", 16).unwrap(), vec![0x01, 0x05, 0xab]);
        assert_eq!(parse_raw(" [ 10 ,255 ] ", 10).unwrap(), vec![10, 255]);
        assert_eq!(parse_raw("[-1]", 10).unwrap(), vec![0xff]);
        assert!(parse_raw("[]", 16).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_raw() {
        assert!(parse_raw("[01, zz]", 16).is_err());
        assert!(parse_raw("[256]", 10).is_err());
        assert!(format_raw(&[1], 1).is_err());
        assert!(parse_raw("[1]", 37).is_err());
    }
}
