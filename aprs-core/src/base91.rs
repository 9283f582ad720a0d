//! Fixed-width base-91 integer codec.
//!
//! APRS packs integers into printable ASCII using radix 91 with the alphabet
//! `!` (0x21) through `{` (0x7B), most-significant digit first. Compressed
//! positions use width 4; Mic-E altitude uses width 3.

use crate::types::{AprsError, Result};

/// First character of the alphabet (`!`).
const ALPHABET_START: u8 = 0x21;

/// Last character of the alphabet (`{`).
const ALPHABET_END: u8 = 0x7B;

/// Encode `value` as `width` base-91 characters, zero padded.
///
/// Fails when `value` does not fit in `width` digits.
pub fn encode(value: u32, width: usize) -> Result<String> {
    let max = 91u64.pow(width as u32);
    if u64::from(value) >= max {
        return Err(AprsError::encode(
            "base-91 value",
            format!("{value} does not fit in {width} digits (max {})", max - 1),
        ));
    }

    let mut out = vec![ALPHABET_START; width];
    let mut rem = value;
    for slot in out.iter_mut().rev() {
        *slot = ALPHABET_START + (rem % 91) as u8;
        rem /= 91;
    }

    Ok(out.into_iter().map(char::from).collect())
}

/// Decode a base-91 string, most-significant digit first.
///
/// Every byte must be within the alphabet; a space (0x20) or any other
/// out-of-range byte fails rather than clamping.
pub fn decode(s: &str) -> Result<u32> {
    // The wire formats use at most 4 digits; 5 or more can overflow u32
    if s.len() > 4 {
        return Err(AprsError::parse(
            "base-91 field",
            format!("{s:?} is longer than 4 digits"),
        ));
    }
    let mut value: u32 = 0;
    for b in s.bytes() {
        if !(ALPHABET_START..=ALPHABET_END).contains(&b) {
            return Err(AprsError::parse(
                "base-91 field",
                format!("byte 0x{b:02X} out of range in {s:?}"),
            ));
        }
        value = value * 91 + u32::from(b - ALPHABET_START);
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_zero_padded() {
        assert_eq!(encode(0, 4).unwrap(), "!!!!");
        assert_eq!(encode(1, 4).unwrap(), "!!!\"");
        assert_eq!(encode(90, 4).unwrap(), "!!!{");
        assert_eq!(encode(91, 4).unwrap(), "!!\"!");
    }

    #[test]
    fn test_encode_max() {
        let max = 91u32.pow(4) - 1;
        assert_eq!(encode(max, 4).unwrap(), "{{{{");
        assert!(encode(max + 1, 4).is_err());
    }

    #[test]
    fn test_decode_known_values() {
        // "5L!!" is the compressed latitude for 49.5 degrees north:
        // (20*91^3 + 43*91^2 + 0*91 + 0) = 15427503 = (90 - 49.5) * 380926
        assert_eq!(decode("5L!!").unwrap(), 15_427_503);
        assert_eq!(decode("!!!!").unwrap(), 0);
        assert_eq!(decode("{{{{").unwrap(), 91u32.pow(4) - 1);
    }

    #[test]
    fn test_decode_rejects_space() {
        assert!(decode("5L! ").is_err());
        assert!(decode(" L!!").is_err());
    }

    #[test]
    fn test_decode_rejects_overlong_input() {
        assert!(decode("{{{{{").is_err());
        assert!(decode("!!!!!!!!").is_err());
        assert_eq!(decode("{{{{").unwrap(), 91u32.pow(4) - 1);
    }

    #[test]
    fn test_decode_rejects_out_of_range() {
        assert!(decode("5L!|").is_err()); // 0x7C, one past '{'
        assert!(decode("5L!\x1f").is_err());
    }

    #[test]
    fn test_round_trip() {
        for v in [0u32, 1, 90, 91, 8281, 90_000, 15_427_820, 91u32.pow(4) - 1] {
            assert_eq!(decode(&encode(v, 4).unwrap()).unwrap(), v, "v={v}");
        }
        for v in 0..91u32.pow(2) {
            assert_eq!(decode(&encode(v, 2).unwrap()).unwrap(), v);
        }
    }
}
