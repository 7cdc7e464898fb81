use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical risk derived from a single class probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower bounds of the High and Medium tiers; both bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high: 0.7,
            medium: 0.4,
        }
    }
}

impl RiskThresholds {
    pub fn validate(&self) -> std::result::Result<(), String> {
        let in_range = |v: f64| v.is_finite() && v > 0.0 && v <= 1.0;
        if !in_range(self.high) || !in_range(self.medium) || self.medium > self.high {
            return Err(format!(
                "risk thresholds must satisfy 0 < medium <= high <= 1 (medium={}, high={})",
                self.medium, self.high
            ));
        }
        Ok(())
    }

    pub fn classify(&self, probability: f64) -> RiskTier {
        if probability >= self.high {
            RiskTier::High
        } else if probability >= self.medium {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries_are_inclusive_on_lower_bound() {
        let t = RiskThresholds::default();
        assert_eq!(t.classify(0.7), RiskTier::High);
        assert_eq!(t.classify(1.0), RiskTier::High);
        assert_eq!(t.classify(0.6999), RiskTier::Medium);
        assert_eq!(t.classify(0.4), RiskTier::Medium);
        assert_eq!(t.classify(0.3999), RiskTier::Low);
        assert_eq!(t.classify(0.0), RiskTier::Low);
    }

    #[test]
    fn tiers_partition_unit_interval() {
        let t = RiskThresholds::default();
        for i in 0..=10_000 {
            let p = i as f64 / 10_000.0;
            let expected = if p >= 0.7 {
                RiskTier::High
            } else if p >= 0.4 {
                RiskTier::Medium
            } else {
                RiskTier::Low
            };
            assert_eq!(t.classify(p), expected, "p={p}");
        }
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let t = RiskThresholds {
            high: 0.3,
            medium: 0.5,
        };
        assert!(t.validate().is_err());
        assert!(RiskThresholds::default().validate().is_ok());
    }

    #[test]
    fn serializes_as_capitalized_names() {
        assert_eq!(serde_json::to_string(&RiskTier::High).unwrap(), "\"High\"");
        assert_eq!(RiskTier::Medium.to_string(), "Medium");
    }
}
