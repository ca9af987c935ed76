//! Station identifier types.

use std::fmt;

/// Error returned when parsing an invalid station identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station id: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// A rainfall gauge station identifier.
///
/// Station ids are opaque to this service; the only constraint is that they
/// consist of ASCII letters and digits, so they can be placed in the upstream
/// URL path without escaping.
///
/// # Examples
///
/// ```
/// use rainfall_server::domain::StationId;
///
/// let id = StationId::parse("E7050").unwrap();
/// assert_eq!(id.as_str(), "E7050");
///
/// // Punctuation is rejected
/// assert!(StationId::parse("E7050-x").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StationId(String);

impl StationId {
    /// Parse a station id, accepting only `[a-zA-Z0-9]*`.
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        if !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(InvalidStationId {
                reason: "must consist of alphanumeric characters only",
            });
        }

        Ok(StationId(s.to_string()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Upper bound on the number of readings requested from upstream.
///
/// Passed to upstream verbatim as `_limit`; no clamping is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReadingCountLimit(pub u32);

impl ReadingCountLimit {
    /// Limit used when the caller does not supply one.
    pub const DEFAULT: ReadingCountLimit = ReadingCountLimit(10);

    /// Use the given count, or the default when absent.
    pub fn or_default(count: Option<u32>) -> Self {
        count.map(ReadingCountLimit).unwrap_or_default()
    }
}

impl Default for ReadingCountLimit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ReadingCountLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Roundtrip: parse then as_str returns the original
        #[test]
        fn roundtrip(s in "[a-zA-Z0-9]{0,16}") {
            let id = StationId::parse(&s).unwrap();
            prop_assert_eq!(id.as_str(), s.as_str());
        }

        /// Any string containing a non-alphanumeric character is rejected
        #[test]
        fn non_alphanumeric_rejected(
            prefix in "[a-zA-Z0-9]{0,4}",
            bad in "[^a-zA-Z0-9]",
            suffix in "[a-zA-Z0-9]{0,4}",
        ) {
            let s = format!("{prefix}{bad}{suffix}");
            prop_assert!(StationId::parse(&s).is_err());
        }
    }
}
