// Copyright 2026 the Loupe Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::str::FromStr;

use kurbo::Size;

/// Explicit size a zoomed target should reach instead of fitting the viewport.
///
/// Consulted by [`crate::calculate_scale`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CustomSize {
    /// Scale each axis so the target renders at exactly this size, in pixels.
    Absolute(Size),
    /// Fit the viewport, but never render larger than this percentage of the
    /// image's natural resolution (`150.0` means 150%).
    Percent(f64),
}

impl CustomSize {
    /// Builds an absolute custom size from a width and height in pixels.
    #[must_use]
    pub fn absolute(width: f64, height: f64) -> Self {
        Self::Absolute(Size::new(width, height))
    }
}

/// Error returned when a percentage custom size cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseCustomSizeError {
    /// The input does not start with a number.
    #[error("custom size `{0}` is not a number")]
    NotANumber(alloc::string::String),
    /// The percentage is zero, negative, or not finite.
    #[error("custom size percentage must be positive and finite")]
    OutOfRange,
}

impl FromStr for CustomSize {
    type Err = ParseCustomSizeError;

    /// Parses a percentage such as `"150%"`. The `%` suffix is optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
        let percent: f64 = number
            .parse()
            .map_err(|_| ParseCustomSizeError::NotANumber(s.into()))?;
        if !percent.is_finite() || percent <= 0.0 {
            return Err(ParseCustomSizeError::OutOfRange);
        }
        Ok(Self::Percent(percent))
    }
}

impl fmt::Display for CustomSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute(size) => write!(f, "{}x{}", size.width, size.height),
            Self::Percent(percent) => write!(f, "{percent}%"),
        }
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use alloc::string::String;

    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::CustomSize;

    #[derive(Deserialize, Serialize)]
    #[serde(untagged)]
    enum Repr {
        Absolute { width: f64, height: f64 },
        Percent(String),
    }

    impl Serialize for CustomSize {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let repr = match *self {
                Self::Absolute(size) => Repr::Absolute {
                    width: size.width,
                    height: size.height,
                },
                Self::Percent(_) => Repr::Percent(alloc::format!("{self}")),
            };
            repr.serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for CustomSize {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            match Repr::deserialize(deserializer)? {
                Repr::Absolute { width, height } => Ok(Self::absolute(width, height)),
                Repr::Percent(s) => s.parse().map_err(D::Error::custom),
            }
        }
    }
}
