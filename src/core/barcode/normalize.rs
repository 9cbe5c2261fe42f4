//! Canonicalization of raw decoder digits.

use super::{ean13_check_digit, CanonicalBarcode, CANONICAL_LEN};
use crate::error::NormalizeError;

/// Canonicalize a raw digit string into a 13-digit code.
///
/// Scanners often append a trailing artifact digit, so the last digit is
/// dropped and the rest left-padded with zeros. A 13-digit input that already
/// carries a valid EAN-13 check digit is returned unchanged. For the EAN-13
/// family (second padded digit non-zero) the check digit is recomputed over
/// the last 12 digits; UPC-A codes keep the padded digits as they are.
pub fn normalize(raw: &str) -> Result<CanonicalBarcode, NormalizeError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NormalizeError::NotNumeric {
            data: raw.to_string(),
        });
    }

    let stripped = &raw[..raw.len() - 1];
    let padded = format!("{:0>width$}", stripped, width = CANONICAL_LEN);
    let ean_family = padded.as_bytes()[1] != b'0';

    if raw.len() == CANONICAL_LEN && ean_family {
        let expected = ean13_check_digit(&raw[..12]);
        if expected.map(|c| c as u8) == raw.as_bytes().last().copied() {
            return Ok(CanonicalBarcode::new_unchecked(raw.to_string()));
        }
    }

    let canonical = if ean_family {
        let payload = &padded[padded.len() - 12..];
        match ean13_check_digit(payload) {
            Some(check) => format!("{}{}", payload, check),
            None => padded,
        }
    } else {
        padded
    };

    if canonical.len() != CANONICAL_LEN {
        return Err(NormalizeError::WrongLength {
            len: canonical.len(),
        });
    }

    Ok(CanonicalBarcode::new_unchecked(canonical))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ean13_is_preserved() {
        let code = normalize("6901234567892").unwrap();
        assert_eq!(code.as_str(), "6901234567892");
    }

    #[test]
    fn upc_a_is_stripped_and_padded() {
        let code = normalize("012345678905").unwrap();
        assert_eq!(code.as_str(), "0001234567890");
    }

    #[test]
    fn thirteen_digits_with_bad_check_digit_is_recomputed() {
        // strip -> 690123456789, pad -> 0690123456789, last 12 + check
        let code = normalize("6901234567891").unwrap();
        assert_eq!(code.as_str(), "6901234567892");
    }

    #[test]
    fn trailing_artifact_is_dropped_before_recompute() {
        // 14 digits: the final 7 is an artifact
        let code = normalize("69012345678927").unwrap();
        assert_eq!(code.as_str(), "9012345678920");
    }

    #[test]
    fn short_input_pads_into_upc_family() {
        let code = normalize("5").unwrap();
        assert_eq!(code.as_str(), "0000000000000");
    }

    #[test]
    fn letters_are_not_numeric() {
        assert_eq!(
            normalize("abc123"),
            Err(NormalizeError::NotNumeric {
                data: "abc123".to_string()
            })
        );
    }

    #[test]
    fn empty_input_is_not_numeric() {
        assert!(matches!(
            normalize(""),
            Err(NormalizeError::NotNumeric { .. })
        ));
    }

    #[test]
    fn overlong_upc_family_is_rejected() {
        // stripped keeps 15 digits with a zero in second place
        let result = normalize("1000000000000000");
        assert_eq!(result, Err(NormalizeError::WrongLength { len: 15 }));
    }

    #[test]
    fn result_is_always_thirteen_digits() {
        for raw in ["1", "12", "12345678", "012345678905", "4006381333931", "90311017"] {
            let code = normalize(raw).unwrap();
            assert_eq!(code.as_str().len(), 13, "input {raw}");
            assert!(code.as_str().bytes().all(|b| b.is_ascii_digit()));
        }
    }
}
