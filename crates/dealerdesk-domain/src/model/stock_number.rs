//! Stock number rule and per-class configuration types

use dealerdesk_types::{Error, VehicleClass};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default counter for used vehicles
pub const DEFAULT_USED_COUNTER: u64 = 1004;
/// Default counter for new vehicles
pub const DEFAULT_NEW_COUNTER: u64 = 2000;

/// How a stock number prefix or suffix is derived
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StockNumberRule {
    /// Contributes nothing
    #[default]
    None,
    /// First character of the first configured acquisition source, uppercased
    Source,
    /// Literal `BUY`
    Buyer,
    /// Administrator-supplied text, uppercased
    Custom {
        #[serde(rename = "customValue", default)]
        custom_value: String,
    },
}

impl StockNumberRule {
    pub fn custom(value: impl Into<String>) -> Self {
        StockNumberRule::Custom {
            custom_value: value.into(),
        }
    }
}

impl std::fmt::Display for StockNumberRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockNumberRule::None => write!(f, "none"),
            StockNumberRule::Source => write!(f, "source"),
            StockNumberRule::Buyer => write!(f, "buyer"),
            StockNumberRule::Custom { custom_value } => write!(f, "custom:{}", custom_value),
        }
    }
}

/// Parses `none`, `source`, `buyer` or `custom:<value>`.
impl FromStr for StockNumberRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((kind, value)) = s.split_once(':') {
            if kind.trim().eq_ignore_ascii_case("custom") {
                return Ok(StockNumberRule::custom(value));
            }
        }

        match s.trim().to_lowercase().as_str() {
            "none" | "" => Ok(StockNumberRule::None),
            "source" => Ok(StockNumberRule::Source),
            "buyer" => Ok(StockNumberRule::Buyer),
            "custom" => Ok(StockNumberRule::custom("")),
            other => Err(Error::InvalidInput(format!(
                "unknown stock number rule '{}' (expected none, source, buyer or custom:<value>)",
                other
            ))),
        }
    }
}

/// Prefix rule, suffix rule and current counter for one vehicle class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockNumberConfig {
    #[serde(default)]
    pub prefix_rule: StockNumberRule,
    #[serde(default)]
    pub suffix_rule: StockNumberRule,
    pub counter: u64,
}

impl StockNumberConfig {
    /// Default configuration for a vehicle class
    pub fn default_for(class: VehicleClass) -> Self {
        let counter = match class {
            VehicleClass::Used => DEFAULT_USED_COUNTER,
            VehicleClass::New => DEFAULT_NEW_COUNTER,
        };
        Self {
            prefix_rule: StockNumberRule::None,
            suffix_rule: StockNumberRule::None,
            counter,
        }
    }
}

fn default_used() -> StockNumberConfig {
    StockNumberConfig::default_for(VehicleClass::Used)
}

fn default_new() -> StockNumberConfig {
    StockNumberConfig::default_for(VehicleClass::New)
}

/// Both per-class configurations. Each class owns an independent counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockNumberSettings {
    #[serde(default = "default_used")]
    pub used: StockNumberConfig,
    #[serde(default = "default_new")]
    pub new: StockNumberConfig,
}

impl Default for StockNumberSettings {
    fn default() -> Self {
        Self {
            used: default_used(),
            new: default_new(),
        }
    }
}

impl StockNumberSettings {
    pub fn get(&self, class: VehicleClass) -> &StockNumberConfig {
        match class {
            VehicleClass::Used => &self.used,
            VehicleClass::New => &self.new,
        }
    }

    /// Replace the whole triple for one class
    pub fn replace(&mut self, class: VehicleClass, config: StockNumberConfig) {
        match class {
            VehicleClass::Used => self.used = config,
            VehicleClass::New => self.new = config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_serde_tagged() {
        let rule = StockNumberRule::custom("ab");
        let json = serde_json::to_string(&rule).unwrap();
        assert_eq!(json, r#"{"type":"custom","customValue":"ab"}"#);

        let parsed: StockNumberRule = serde_json::from_str(r#"{"type":"buyer"}"#).unwrap();
        assert_eq!(parsed, StockNumberRule::Buyer);
    }

    #[test]
    fn test_custom_without_value_is_empty() {
        let parsed: StockNumberRule = serde_json::from_str(r#"{"type":"custom"}"#).unwrap();
        assert_eq!(parsed, StockNumberRule::custom(""));
    }

    #[test]
    fn test_rule_from_str() {
        assert_eq!("source".parse::<StockNumberRule>().unwrap(), StockNumberRule::Source);
        assert_eq!("BUYER".parse::<StockNumberRule>().unwrap(), StockNumberRule::Buyer);
        assert_eq!(
            "custom:lot-a".parse::<StockNumberRule>().unwrap(),
            StockNumberRule::custom("lot-a")
        );
        // Only the first colon separates the keyword
        assert_eq!(
            "custom:a:b".parse::<StockNumberRule>().unwrap(),
            StockNumberRule::custom("a:b")
        );
        assert!("prefix".parse::<StockNumberRule>().is_err());
    }

    #[test]
    fn test_defaults_per_class() {
        let settings = StockNumberSettings::default();
        assert_eq!(settings.get(VehicleClass::Used).counter, 1004);
        assert_eq!(settings.get(VehicleClass::New).counter, 2000);
        assert_eq!(settings.used.prefix_rule, StockNumberRule::None);
    }

    #[test]
    fn test_missing_class_uses_default() {
        let settings: StockNumberSettings = serde_json::from_str(
            r#"{"used":{"prefixRule":{"type":"source"},"suffixRule":{"type":"none"},"counter":12}}"#,
        )
        .unwrap();
        assert_eq!(settings.used.counter, 12);
        assert_eq!(settings.new, StockNumberConfig::default_for(VehicleClass::New));
    }
}
