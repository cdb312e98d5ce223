//! Dotted numeric versions and the "at least" comparison.
//!
//! Versions are compared component-wise after padding the shorter one with
//! zeros, so `21` equals `21.0` but is older than `21.0.1`.

use crate::error::{Result, SetupError};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A parsed dotted version such as `21.0.3` or `0.16.14`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    components: Vec<u64>,
}

impl Version {
    /// Parse a dot-delimited version string.
    ///
    /// Every segment must be a non-empty run of ASCII digits.
    pub fn parse(input: &str) -> Result<Self> {
        if input.is_empty() {
            return Err(malformed(input, "empty version string"));
        }

        let components = input
            .split('.')
            .map(|segment| {
                if segment.is_empty() {
                    return Err(malformed(input, "empty segment"));
                }
                if !segment.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(malformed(
                        input,
                        &format!("segment '{}' is not numeric", segment),
                    ));
                }
                segment
                    .parse::<u64>()
                    .map_err(|_| malformed(input, &format!("segment '{}' is too large", segment)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { components })
    }

    /// The numeric components, as written.
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// Zero-padded comparison against another version.
    pub fn compare(&self, other: &Version) -> Ordering {
        let len = self.components.len().max(other.components.len());
        for i in 0..len {
            let left = self.components.get(i).copied().unwrap_or(0);
            let right = other.components.get(i).copied().unwrap_or(0);
            match left.cmp(&right) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }

    /// Whether this version is equal to or newer than `required`.
    pub fn is_at_least(&self, required: &Version) -> bool {
        compare_at_least(self, required)
    }
}

/// Whether `installed` satisfies a minimum of `required`.
pub fn compare_at_least(installed: &Version, required: &Version) -> bool {
    installed.compare(required) != Ordering::Less
}

fn malformed(input: &str, reason: &str) -> SetupError {
    SetupError::MalformedVersion {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

impl FromStr for Version {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.components.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}
