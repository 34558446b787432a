//! Validated tracking number type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::check_digit::{compute, parse_digits};
use crate::{Result, TrackingError};

/// A tracking number whose last digit is a correct check digit.
///
/// Serialized as a plain string; deserialization runs the same validation
/// as [`TrackingNumber::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackingNumber(String);

impl TrackingNumber {
    /// Parse and validate a full tracking number.
    ///
    /// Surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let digits = parse_digits(trimmed)?;
        if digits.len() < 2 {
            return Err(TrackingError::TooShort { len: digits.len() });
        }

        let (prefix, last) = digits.split_at(digits.len() - 1);
        let expected = compute(prefix);
        if expected != last[0] {
            return Err(TrackingError::CheckDigitMismatch {
                expected,
                found: last[0],
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Build a tracking number from its prefix by appending the check digit.
    pub fn from_prefix(prefix: &str) -> Result<Self> {
        let digits = parse_digits(prefix)?;
        let digit = compute(&digits);
        Ok(Self(format!("{prefix}{digit}")))
    }

    /// Every digit except the check digit.
    pub fn prefix(&self) -> &str {
        &self.0[..self.0.len() - 1]
    }

    /// The trailing check digit.
    pub fn check_digit(&self) -> u8 {
        self.0.as_bytes()[self.0.len() - 1] - b'0'
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TrackingNumber {
    type Err = TrackingError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for TrackingNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for TrackingNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TrackingNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let tn = TrackingNumber::parse("12345678904").unwrap();
        assert_eq!(tn.as_str(), "12345678904");
        assert_eq!(tn.prefix(), "1234567890");
        assert_eq!(tn.check_digit(), 4);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let tn = TrackingNumber::parse("  12345678904\n").unwrap();
        assert_eq!(tn.to_string(), "12345678904");
    }

    #[test]
    fn test_parse_mismatch() {
        let err = TrackingNumber::parse("12345678900").unwrap_err();
        assert_eq!(
            err,
            TrackingError::CheckDigitMismatch {
                expected: 4,
                found: 0
            }
        );
    }

    #[test]
    fn test_parse_too_short() {
        assert_eq!(
            TrackingNumber::parse("7").unwrap_err(),
            TrackingError::TooShort { len: 1 }
        );
    }

    #[test]
    fn test_parse_invalid_character() {
        assert!(matches!(
            TrackingNumber::parse("1234-5678904"),
            Err(TrackingError::InvalidDigit { position: 4, character: '-' })
        ));
    }

    #[test]
    fn test_from_prefix_round_trips_through_parse() {
        let tn = TrackingNumber::from_prefix("0000000000").unwrap();
        assert_eq!(tn.as_str(), "00000000009");
        assert_eq!("00000000009".parse::<TrackingNumber>().unwrap(), tn);
    }

    #[test]
    fn test_serde_as_plain_string() {
        let tn = TrackingNumber::from_prefix("1234567890").unwrap();
        let json = serde_json::to_string(&tn).unwrap();
        assert_eq!(json, "\"12345678904\"");

        let back: TrackingNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tn);
    }

    #[test]
    fn test_deserialize_rejects_bad_check_digit() {
        let result: std::result::Result<TrackingNumber, _> = serde_json::from_str("\"12345678901\"");
        assert!(result.is_err());
    }
}
