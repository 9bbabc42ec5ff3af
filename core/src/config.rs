//! Rule thresholds and their loader.
//!
//! The values are demonstration constants. They are configurable but
//! carry no derivation from any real model.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleThresholds {
    /// Rule 1 fires below this credit score.
    pub low_credit_score:            i64,
    /// Rule 1 fires above this income.
    pub low_credit_min_income:       i64,
    /// Rule 2 fires above this credit score.
    pub good_credit_score:           i64,
    /// Rule 2 fires below this income.
    pub good_credit_max_income:      i64,
    /// Rule 3 fires below this age.
    pub young_age:                   i64,
    /// Rule 3 fires above this credit score.
    pub young_high_credit_score:     i64,
    /// Rule 4 fires above this income.
    pub unemployed_min_income:       i64,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            low_credit_score:        20,
            low_credit_min_income:   1000,
            good_credit_score:       60,
            good_credit_max_income:  1000,
            young_age:               25,
            young_high_credit_score: 70,
            unemployed_min_income:   3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ThresholdsFile {
    thresholds: RuleThresholds,
}

#[derive(Debug, Clone, Default)]
pub struct RiskConfig {
    pub thresholds: RuleThresholds,
}

impl RiskConfig {
    /// Load from the data/ directory.
    /// In tests, use RiskConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/rules/thresholds.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let file: ThresholdsFile = serde_json::from_str(content)?;
        Ok(Self { thresholds: file.thresholds })
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self { thresholds: RuleThresholds::default() }
    }
}
