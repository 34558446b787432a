//! Parcel tracking numbers and their weighted modulo-10 check digit.
//!
//! The carrier appends one check digit to every tracking number. It is
//! computed from the preceding digits with alternating weights 3 and 1,
//! starting with weight 3 on the leftmost digit.

pub mod check_digit;
pub mod number;

// Re-exports for convenience
pub use check_digit::{append_check_digit, check_digit, check_digit_of, is_valid};
pub use number::TrackingNumber;

/// Errors produced while computing or validating check digits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackingError {
    #[error("Tracking number is empty")]
    Empty,

    #[error("Invalid character {character:?} at position {position}, expected a decimal digit")]
    InvalidDigit { position: usize, character: char },

    #[error("Tracking number too short: {len} digit(s), need at least 2")]
    TooShort { len: usize },

    #[error("Check digit mismatch: expected {expected}, found {found}")]
    CheckDigitMismatch { expected: u8, found: u8 },
}

/// Result type alias for tracking number operations.
pub type Result<T> = std::result::Result<T, TrackingError>;
