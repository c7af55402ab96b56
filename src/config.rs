use serde::{Deserialize, Serialize};

use crate::errors::{LoanError, Result};
use crate::types::PeriodType;

/// loan book configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    /// tenor unit assumed when a request omits `periodType`
    pub default_period_type: PeriodType,
    /// partial payment unit assumed when a request omits `interestPeriodType`
    pub default_interest_period_type: PeriodType,
    /// whole months past the tenor before an active loan is marked overdue
    pub overdue_grace_months: i64,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            default_period_type: PeriodType::Month,
            default_interest_period_type: PeriodType::Month,
            overdue_grace_months: 0,
        }
    }
}

impl BookConfig {
    /// load from a json document; missing keys take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: BookConfig = serde_json::from_str(json).map_err(|e| LoanError::InvalidConfiguration {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.overdue_grace_months < 0 {
            return Err(LoanError::InvalidConfiguration {
                message: format!(
                    "overdue_grace_months must not be negative, got {}",
                    self.overdue_grace_months
                ),
            });
        }
        Ok(())
    }

    pub fn with_overdue_grace_months(mut self, months: i64) -> Self {
        self.overdue_grace_months = months;
        self
    }

    pub fn with_default_period_type(mut self, period_type: PeriodType) -> Self {
        self.default_period_type = period_type;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BookConfig::default();
        assert_eq!(config.default_period_type, PeriodType::Month);
        assert_eq!(config.overdue_grace_months, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = BookConfig::from_json(r#"{ "default_period_type": "year", "overdue_grace_months": 2 }"#).unwrap();

        assert_eq!(config.default_period_type, PeriodType::Year);
        assert_eq!(config.default_interest_period_type, PeriodType::Month);
        assert_eq!(config.overdue_grace_months, 2);
    }

    #[test]
    fn test_from_json_rejects_negative_grace() {
        let err = BookConfig::from_json(r#"{ "overdue_grace_months": -1 }"#).unwrap_err();
        assert!(matches!(err, LoanError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        let err = BookConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, LoanError::InvalidConfiguration { .. }));
    }
}
