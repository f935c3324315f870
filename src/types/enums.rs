//! Shared enum types that map directly to wire string values.
//!
//! The service and the stored collections use the display form
//! (`"Open Ended"`, `"Very High"`). The console also accepts the
//! `SCREAMING_SNAKE_CASE` names (`OPEN_ENDED`, `VERY_HIGH`), so both spellings
//! deserialize.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AdminError;

// ---------------------------------------------------------------------------
// Scheme Type
// ---------------------------------------------------------------------------

/// Whether a scheme accepts subscriptions continuously.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemeType {
    #[default]
    #[serde(rename = "Open Ended", alias = "OPEN_ENDED", alias = "OpenEnded")]
    OpenEnded,
    #[serde(rename = "Close Ended", alias = "CLOSE_ENDED", alias = "CloseEnded")]
    CloseEnded,
}

impl SchemeType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenEnded => "Open Ended",
            Self::CloseEnded => "Close Ended",
        }
    }
}

impl fmt::Display for SchemeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemeType {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "OPENENDED" => Ok(Self::OpenEnded),
            "CLOSEENDED" => Ok(Self::CloseEnded),
            _ => Err(AdminError::Validation(format!("unknown scheme type: {s}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Risk Level
// ---------------------------------------------------------------------------

/// Riskometer band of a scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(alias = "LOW")]
    Low,
    #[default]
    #[serde(alias = "MODERATE")]
    Moderate,
    #[serde(alias = "HIGH")]
    High,
    #[serde(rename = "Very High", alias = "VERY_HIGH", alias = "VeryHigh")]
    VeryHigh,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "LOW" => Ok(Self::Low),
            "MODERATE" => Ok(Self::Moderate),
            "HIGH" => Ok(Self::High),
            "VERYHIGH" => Ok(Self::VeryHigh),
            _ => Err(AdminError::Validation(format!("unknown risk level: {s}"))),
        }
    }
}

/// Uppercase and drop separators so `"Very High"`, `"VERY_HIGH"` and
/// `"very-high"` compare equal.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_form_is_the_wire_form() {
        let json = serde_json::to_string(&RiskLevel::VeryHigh).unwrap();
        assert_eq!(json, "\"Very High\"");
        let json = serde_json::to_string(&SchemeType::CloseEnded).unwrap();
        assert_eq!(json, "\"Close Ended\"");
    }

    #[test]
    fn screaming_names_deserialize() {
        let level: RiskLevel = serde_json::from_str("\"VERY_HIGH\"").unwrap();
        assert_eq!(level, RiskLevel::VeryHigh);
        let ty: SchemeType = serde_json::from_str("\"OPEN_ENDED\"").unwrap();
        assert_eq!(ty, SchemeType::OpenEnded);
    }

    #[test]
    fn from_str_ignores_case_and_separators() {
        assert_eq!("very-high".parse::<RiskLevel>().unwrap(), RiskLevel::VeryHigh);
        assert_eq!("close ended".parse::<SchemeType>().unwrap(), SchemeType::CloseEnded);
        assert!("extreme".parse::<RiskLevel>().is_err());
    }
}
