//! Elevator system types and stop counts shared between client and server.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::QuoteError;

/// Elevator system type. Every catalog record belongs to exactly one of these.
///
/// Parsing is case-insensitive, so `GEARLESS`, `Gearless` and `gearless` all
/// name the same category. The canonical text form is lowercase.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
    Hash,
    Eq,
    PartialEq,
)]
#[serde(rename_all = "lowercase")]
#[clap(rename_all = "lower")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Category {
    /// Traction elevator with a gearless machine.
    #[serde(alias = "GEARLESS", alias = "Gearless")]
    Gearless,
    /// Hydraulic (piston) elevator.
    #[serde(alias = "HYDRAULIC", alias = "Hydraulic")]
    Hydraulic,
}

impl Category {
    /// Parse a user supplied system type, ignoring case and surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, QuoteError> {
        raw.trim()
            .parse::<Self>()
            .map_err(|_| QuoteError::UnknownCategory(raw.to_string()))
    }
}

/// Number of stops an elevator serves, validated to the range accepted for quotes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialEq, PartialOrd, Ord)]
#[serde(try_from = "u32", into = "u32")]
pub struct StopCount(u32);

impl StopCount {
    /// Lowest stop count a quote may be built for.
    pub const MIN: u32 = 2;
    /// Highest stop count a quote may be built for.
    pub const MAX: u32 = 20;

    /// Validate `value` against [`Self::MIN`]..=[`Self::MAX`].
    pub fn new(value: u32) -> Result<Self, QuoteError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(QuoteError::StopCountOutOfRange {
                value,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    /// Raw stop count.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for StopCount {
    type Error = QuoteError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StopCount> for u32 {
    fn from(stops: StopCount) -> Self {
        stops.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_any_case() {
        assert_eq!(Category::parse("GEARLESS").unwrap(), Category::Gearless);
        assert_eq!(Category::parse(" Hydraulic ").unwrap(), Category::Hydraulic);
        assert!(matches!(
            Category::parse("escalator"),
            Err(QuoteError::UnknownCategory(_))
        ));
    }

    #[test]
    fn category_serde_is_lowercase_and_accepts_uppercase() {
        assert_eq!(serde_json::to_string(&Category::Hydraulic).unwrap(), "\"hydraulic\"");
        let parsed: Category = serde_json::from_str("\"GEARLESS\"").unwrap();
        assert_eq!(parsed, Category::Gearless);
        assert_eq!(Category::Gearless.to_string(), "gearless");
    }

    #[test]
    fn stop_count_bounds() {
        assert_eq!(StopCount::new(2).unwrap().get(), 2);
        assert_eq!(StopCount::new(20).unwrap().get(), 20);
        assert!(StopCount::new(1).is_err());
        assert!(StopCount::new(21).is_err());
        assert!(serde_json::from_str::<StopCount>("0").is_err());
        assert_eq!(serde_json::from_str::<StopCount>("7").unwrap().get(), 7);
    }
}
