//! Weighted modulo-10 check digit.
//!
//! Weights cycle 3, 1, 3, 1, ... from the first digit. The weighted sum is
//! incremented by one and the check digit is `(10 - sum % 10) % 10`.

use tracing::trace;

use crate::{Result, TrackingError};

/// Weight cycle applied left to right.
const WEIGHTS: [u32; 2] = [3, 1];

/// Parse a digit string into its digit values.
///
/// Fails on the first non-digit character, reporting its character position.
pub(crate) fn parse_digits(input: &str) -> Result<Vec<u8>> {
    if input.is_empty() {
        return Err(TrackingError::Empty);
    }

    input
        .chars()
        .enumerate()
        .map(|(position, character)| {
            character
                .to_digit(10)
                .map(|d| d as u8)
                .ok_or(TrackingError::InvalidDigit {
                    position,
                    character,
                })
        })
        .collect()
}

/// Compute the check digit over already validated digits.
pub(crate) fn compute(digits: &[u8]) -> u8 {
    let sum: u32 = digits
        .iter()
        .zip(WEIGHTS.iter().cycle())
        .map(|(&d, &w)| u32::from(d) * w)
        .sum();

    let r = (sum + 1) % 10;
    let digit = if r == 0 { 0 } else { (10 - r) as u8 };
    trace!(sum, digit, "Computed check digit");
    digit
}

/// Compute the check digit for a tracking number prefix.
///
/// `prefix` holds every digit of the tracking number except the check digit.
/// Any non-digit character is rejected with [`TrackingError::InvalidDigit`].
pub fn check_digit(prefix: &str) -> Result<u8> {
    let digits = parse_digits(prefix)?;
    Ok(compute(&digits))
}

/// Compute the check digit for a prefix given as an integer.
///
/// Leading zeros cannot be represented here; use [`check_digit`] for
/// prefixes that carry them.
pub fn check_digit_of(prefix: u64) -> u8 {
    let digits: Vec<u8> = prefix
        .to_string()
        .bytes()
        .map(|b| b - b'0')
        .collect();
    compute(&digits)
}

/// Append the check digit to `prefix`, producing a full tracking number.
pub fn append_check_digit(prefix: &str) -> Result<String> {
    let digit = check_digit(prefix)?;
    Ok(format!("{prefix}{digit}"))
}

/// Returns `true` when the last digit of `number` is the correct check digit
/// for the digits before it.
///
/// Anything that is not at least two decimal digits is invalid.
pub fn is_valid(number: &str) -> bool {
    match parse_digits(number) {
        Ok(digits) if digits.len() >= 2 => {
            let (prefix, last) = digits.split_at(digits.len() - 1);
            compute(prefix) == last[0]
        }
        _ => false,
    }
}
