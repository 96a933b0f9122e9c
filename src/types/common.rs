//! Common domain types for the Last.fm API.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Time range for chart methods (`user.gettopartists` and friends).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    /// All time
    #[default]
    #[serde(rename = "overall")]
    Overall,
    /// Last 7 days
    #[serde(rename = "7day")]
    SevenDays,
    /// Last month
    #[serde(rename = "1month")]
    OneMonth,
    /// Last 3 months
    #[serde(rename = "3month")]
    ThreeMonths,
    /// Last 6 months
    #[serde(rename = "6month")]
    SixMonths,
    /// Last 12 months
    #[serde(rename = "12month")]
    TwelveMonths,
}

impl Period {
    /// The value Last.fm expects in the `period` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Overall => "overall",
            Period::SevenDays => "7day",
            Period::OneMonth => "1month",
            Period::ThreeMonths => "3month",
            Period::SixMonths => "6month",
            Period::TwelveMonths => "12month",
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overall" => Ok(Period::Overall),
            "7day" => Ok(Period::SevenDays),
            "1month" => Ok(Period::OneMonth),
            "3month" => Ok(Period::ThreeMonths),
            "6month" => Ok(Period::SixMonths),
            "12month" => Ok(Period::TwelveMonths),
            _ => Err(format!("Invalid period: {}", s)),
        }
    }
}

/// Image size labels used in Last.fm `image` arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    Small,
    Medium,
    Large,
    Extralarge,
    Mega,
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_serde() {
        assert_eq!(
            serde_json::to_string(&Period::SevenDays).unwrap(),
            r#""7day""#
        );
        assert_eq!(
            serde_json::from_str::<Period>(r#""12month""#).unwrap(),
            Period::TwelveMonths
        );
    }

    #[test]
    fn test_period_from_str() {
        assert_eq!("overall".parse::<Period>().unwrap(), Period::Overall);
        assert_eq!("3month".parse::<Period>().unwrap(), Period::ThreeMonths);
        assert!("forever".parse::<Period>().is_err());
        assert_eq!(Period::default(), Period::Overall);
    }

    #[test]
    fn test_image_size_unknown() {
        assert_eq!(
            serde_json::from_str::<ImageSize>(r#""large""#).unwrap(),
            ImageSize::Large
        );
        assert_eq!(
            serde_json::from_str::<ImageSize>(r#""""#).unwrap(),
            ImageSize::Unknown
        );
    }
}
