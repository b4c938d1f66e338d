//! Checksum validators for card-like numbers

/// Luhn mod-10 check over the ASCII digits of `text`.
///
/// Separators (dashes, spaces) are ignored. Text with fewer than two digits
/// never validates.
pub fn luhn_valid(text: &str) -> bool {
    let digits: Vec<u32> = text.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() < 2 {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();

    sum % 10 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_valid_numbers() {
        assert!(luhn_valid("4012-8888-8888-1881"));
        assert!(luhn_valid("4111-1111-1111-1111"));
        assert!(luhn_valid("5555555555554444"));
        assert!(luhn_valid("4012 8888 8888 1881"));
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(!luhn_valid("4012-8888-8888-1882"));
        assert!(!luhn_valid("1234-5678-9012-3456"));
        assert!(!luhn_valid("4111111111111112"));
    }

    #[test]
    fn test_single_digit_change_breaks_checksum() {
        let base = "4012888888881881";
        for pos in 0..base.len() {
            let mut digits: Vec<char> = base.chars().collect();
            let d = digits[pos].to_digit(10).unwrap();
            digits[pos] = char::from_digit((d + 1) % 10, 10).unwrap();
            let mutated: String = digits.into_iter().collect();
            assert!(!luhn_valid(&mutated), "{} should fail", mutated);
        }
    }

    #[test]
    fn test_too_short() {
        assert!(!luhn_valid(""));
        assert!(!luhn_valid("0"));
        assert!(!luhn_valid("----"));
    }
}
