//! National identity number checksum.
//!
//! A valid identity number is 13 ASCII digits. The first 12 digits are
//! weighted 13 down to 2, summed, and reduced mod 11; the last digit must equal
//! `(11 - sum % 11) % 10`.

/// Length of an identity number in digits.
pub const IDENTITY_NUMBER_LEN: usize = 13;

/// Number of leading digits that feed the weighted sum.
const PAYLOAD_LEN: usize = IDENTITY_NUMBER_LEN - 1;

/// Check digit for a 12-digit payload.
///
/// Returns `None` if `payload` is not exactly 12 ASCII digits.
pub fn check_digit(payload: &str) -> Option<u8> {
    let bytes = payload.as_bytes();
    if bytes.len() != PAYLOAD_LEN || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    Some(weighted_check(bytes))
}

/// Validate a 13-digit identity number against its check digit.
///
/// Any other shape (wrong length, non-ASCII-digit characters) is invalid.
pub fn is_valid_identity_number(id: &str) -> bool {
    let bytes = id.as_bytes();
    if bytes.len() != IDENTITY_NUMBER_LEN || !bytes.iter().all(u8::is_ascii_digit) {
        return false;
    }
    weighted_check(&bytes[..PAYLOAD_LEN]) == bytes[PAYLOAD_LEN] - b'0'
}

// Caller guarantees `digits` is PAYLOAD_LEN ASCII digits.
fn weighted_check(digits: &[u8]) -> u8 {
    let sum: u32 = digits
        .iter()
        .zip((2..=IDENTITY_NUMBER_LEN as u32).rev())
        .map(|(d, weight)| u32::from(d - b'0') * weight)
        .sum();
    ((11 - sum % 11) % 10) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Straightforward restatement of the checksum used as the oracle.
    fn reference_is_valid(id: &str) -> bool {
        let digits: Vec<u32> = id.chars().filter_map(|c| c.to_digit(10)).collect();
        if id.len() != 13 || digits.len() != 13 {
            return false;
        }
        let mut sum = 0;
        for (i, d) in digits.iter().take(12).enumerate() {
            sum += d * (13 - i as u32);
        }
        (11 - (sum % 11)) % 10 == digits[12]
    }

    #[test]
    fn test_known_valid_number() {
        // weighted sum is 352, 352 % 11 == 0, check digit (11 - 0) % 10 == 1
        assert!(is_valid_identity_number("1234567890121"));
        assert_eq!(check_digit("123456789012"), Some(1));
    }

    #[test]
    fn test_wrong_check_digit() {
        assert!(!is_valid_identity_number("1234567890122"));
        assert!(!is_valid_identity_number("1234567890120"));
    }

    #[test]
    fn test_check_digit_wraps_to_zero() {
        // sum % 11 == 1 gives (11 - 1) % 10 == 0
        assert_eq!(check_digit("110170020345"), Some(0));
        assert!(is_valid_identity_number("1101700203450"));
        assert!(!is_valid_identity_number("1101700203451"));
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert!(!is_valid_identity_number(""));
        assert!(!is_valid_identity_number("123"));
        assert!(!is_valid_identity_number("12345678901a1"));
        assert!(!is_valid_identity_number("12345678901210"));
        assert!(!is_valid_identity_number(" 234567890121"));
        assert!(!is_valid_identity_number("-234567890121"));
        // Thai and full-width digits are not ASCII digits
        assert!(!is_valid_identity_number("๑๒๓๔๕๖๗๘๙๐๑๒๑"));
        assert!(!is_valid_identity_number("１２３４５６７８９０１２１"));
    }

    #[test]
    fn test_check_digit_rejects_bad_payload() {
        assert_eq!(check_digit("12345678901"), None);
        assert_eq!(check_digit("1234567890123"), None);
        assert_eq!(check_digit("12345678901x"), None);
    }

    proptest! {
        #[test]
        fn prop_matches_reference(id in "[0-9]{13}") {
            prop_assert_eq!(is_valid_identity_number(&id), reference_is_valid(&id));
        }

        #[test]
        fn prop_generated_check_digit_validates(payload in "[0-9]{12}") {
            let digit = check_digit(&payload).unwrap();
            let id = format!("{}{}", payload, digit);
            prop_assert!(is_valid_identity_number(&id));
        }

        #[test]
        fn prop_wrong_length_never_valid(id in "[0-9]{0,12}|[0-9]{14,20}") {
            prop_assert!(!is_valid_identity_number(&id));
        }

        #[test]
        fn prop_arbitrary_input_never_panics(id in "\\PC{0,20}") {
            let _ = is_valid_identity_number(&id);
        }
    }
}
