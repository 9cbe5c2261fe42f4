//! EAN-13 check digit.

/// Compute the EAN-13 check digit for a 12-digit payload.
///
/// Digits at even indices count once, digits at odd indices count three
/// times. Returns `None` unless `payload` is exactly 12 ASCII digits.
pub fn ean13_check_digit(payload: &str) -> Option<char> {
    let bytes = payload.as_bytes();
    if bytes.len() != 12 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }

    let (odd_sum, even_sum) = bytes
        .iter()
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .fold((0, 0), |(odd, even), (i, d)| {
            if i % 2 == 0 {
                (odd + d, even)
            } else {
                (odd, even + d)
            }
        });

    let total = odd_sum + even_sum * 3;
    char::from_digit((10 - total % 10) % 10, 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_known_check_digit() {
        // 26 + 34*3 = 128
        assert_eq!(ean13_check_digit("690123456789"), Some('2'));
        assert_eq!(ean13_check_digit("123456789012"), Some('8'));
    }

    #[test]
    fn total_divisible_by_ten_gives_zero() {
        assert_eq!(ean13_check_digit("000000000000"), Some('0'));
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(ean13_check_digit("12345678901"), None);
        assert_eq!(ean13_check_digit("1234567890123"), None);
        assert_eq!(ean13_check_digit(""), None);
    }

    #[test]
    fn rejects_non_digits() {
        assert_eq!(ean13_check_digit("12345678901a"), None);
        assert_eq!(ean13_check_digit("１２３４５６７８９０１２"), None);
    }

    #[test]
    fn result_is_always_a_single_digit() {
        for seed in 0..200u64 {
            let payload = format!("{:012}", seed.wrapping_mul(7_919_777_123) % 1_000_000_000_000);
            let digit = ean13_check_digit(&payload).unwrap();
            assert!(digit.is_ascii_digit());
            assert_eq!(ean13_check_digit(&payload), Some(digit));
        }
    }
}
