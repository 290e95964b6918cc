use serde::{Deserialize, Serialize};

use crate::decimal::CURRENCY_DP;
use crate::errors::{LoanError, Result};
use crate::status::StatusVocabulary;
use crate::types::RepaymentCycle;

/// tracker configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// ISO 4217 code applied to records that carry no currency
    pub default_currency: String,
    /// cycle used when a schedule form leaves the cycle blank
    pub default_cycle: RepaymentCycle,
    /// decimal places for amounts and percentages in views
    pub display_decimal_places: u32,
    /// status labels used by views
    pub status_vocabulary: StatusVocabulary,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            default_currency: "USD".to_string(),
            default_cycle: RepaymentCycle::Monthly,
            display_decimal_places: CURRENCY_DP,
            status_vocabulary: StatusVocabulary::Canonical,
        }
    }
}

impl TrackerConfig {
    /// weekly microloans in the given currency
    pub fn weekly(currency: &str) -> Self {
        Self {
            default_currency: currency.to_string(),
            default_cycle: RepaymentCycle::Weekly,
            ..Self::default()
        }
    }

    /// load from json, missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: TrackerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        let currency = &self.default_currency;
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(LoanError::InvalidConfiguration {
                message: format!("default_currency must be a 3-letter ISO code, got {:?}", currency),
            });
        }

        if self.default_cycle.days() == 0 {
            return Err(LoanError::InvalidConfiguration {
                message: "default_cycle must advance at least one day".to_string(),
            });
        }

        if self.display_decimal_places > 8 {
            return Err(LoanError::InvalidConfiguration {
                message: format!(
                    "display_decimal_places must be at most 8, got {}",
                    self.display_decimal_places
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = TrackerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_cycle.days(), 30);
        assert_eq!(config.display_decimal_places, 2);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = TrackerConfig::from_json_str(
            r#"{ "default_currency": "KES", "status_vocabulary": "Repayment" }"#,
        )
        .unwrap();
        assert_eq!(config.default_currency, "KES");
        assert_eq!(config.status_vocabulary, StatusVocabulary::Repayment);
        assert_eq!(config.default_cycle, RepaymentCycle::Monthly);
    }

    #[test]
    fn test_custom_cycle_json() {
        let config =
            TrackerConfig::from_json_str(r#"{ "default_cycle": { "Custom": 10 } }"#).unwrap();
        assert_eq!(config.default_cycle.days(), 10);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = TrackerConfig::from_json_str(r#"{ "default_currency": "dollars" }"#).unwrap_err();
        assert!(matches!(err, LoanError::InvalidConfiguration { .. }));

        let err =
            TrackerConfig::from_json_str(r#"{ "default_cycle": { "Custom": 0 } }"#).unwrap_err();
        assert!(matches!(err, LoanError::InvalidConfiguration { .. }));

        let err = TrackerConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, LoanError::MalformedRecord(_)));
    }

    #[test]
    fn test_weekly_preset() {
        let config = TrackerConfig::weekly("UGX");
        assert_eq!(config.default_cycle, RepaymentCycle::Weekly);
        assert!(config.validate().is_ok());
    }
}
