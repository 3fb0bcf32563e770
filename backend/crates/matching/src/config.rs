use roster_common::error::{RosterError, RosterResult};
use serde::{Deserialize, Serialize};

/// Number of sub-scores a pair can define (name, email, phone, address).
pub const SUBSCORE_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerWeights {
    pub name: f64,
    pub email: f64,
    pub phone: f64,
    pub address: f64,
}

impl Default for ScorerWeights {
    fn default() -> Self {
        Self {
            name: 0.40,
            email: 0.30,
            phone: 0.20,
            address: 0.10,
        }
    }
}

impl ScorerWeights {
    pub fn total(&self) -> f64 {
        self.name + self.email + self.phone + self.address
    }

    /// Scale the weights so they sum to 1. Callers validate first.
    pub fn normalized(&self) -> Self {
        let total = self.total();
        Self {
            name: self.name / total,
            email: self.email / total,
            phone: self.phone / total,
            address: self.address / total,
        }
    }

    fn validate(&self) -> RosterResult<()> {
        for (label, value) in [
            ("name", self.name),
            ("email", self.email),
            ("phone", self.phone),
            ("address", self.address),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(RosterError::Config(format!(
                    "weight for {label} must be a finite non-negative number, got {value}"
                )));
            }
        }
        if self.total() <= 0.0 {
            return Err(RosterError::Config(
                "at least one scorer weight must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub weights: ScorerWeights,
    /// Inclusive lower bound on the composite score of a reported pair.
    pub threshold: f64,
    /// Minimum number of sub-scores both records must define.
    pub min_defined_subscores: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            weights: ScorerWeights::default(),
            threshold: 0.80,
            min_defined_subscores: 2,
        }
    }
}

impl MatchingConfig {
    pub fn validate(&self) -> RosterResult<()> {
        self.weights.validate()?;
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(RosterError::Config(format!(
                "threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        if !(1..=SUBSCORE_COUNT).contains(&self.min_defined_subscores) {
            return Err(RosterError::Config(format!(
                "min_defined_subscores must be between 1 and {SUBSCORE_COUNT}, got {}",
                self.min_defined_subscores
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_valid() {
        let cfg = MatchingConfig::default();
        assert!(cfg.validate().is_ok());
        assert!((cfg.weights.total() - 1.0).abs() < 1e-9);
        assert!((cfg.threshold - 0.8).abs() < f64::EPSILON);
        assert_eq!(cfg.min_defined_subscores, 2);
    }

    #[test]
    fn weights_need_not_sum_to_one() {
        let cfg = MatchingConfig {
            weights: ScorerWeights {
                name: 4.0,
                email: 3.0,
                phone: 2.0,
                address: 1.0,
            },
            ..MatchingConfig::default()
        };
        assert!(cfg.validate().is_ok());
        let normalized = cfg.weights.normalized();
        assert!((normalized.name - 0.4).abs() < 1e-12);
        assert!((normalized.address - 0.1).abs() < 1e-12);
    }

    #[test]
    fn negative_weight_rejected() {
        let cfg = MatchingConfig {
            weights: ScorerWeights {
                phone: -0.2,
                ..ScorerWeights::default()
            },
            ..MatchingConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("phone"), "err={err}");
    }

    #[test]
    fn non_finite_weight_rejected() {
        let cfg = MatchingConfig {
            weights: ScorerWeights {
                name: f64::NAN,
                ..ScorerWeights::default()
            },
            ..MatchingConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(RosterError::Config(_))));
    }

    #[test]
    fn all_zero_weights_rejected() {
        let cfg = MatchingConfig {
            weights: ScorerWeights {
                name: 0.0,
                email: 0.0,
                phone: 0.0,
                address: 0.0,
            },
            ..MatchingConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(RosterError::Config(_))));
    }

    #[test]
    fn threshold_out_of_range_rejected() {
        for threshold in [-0.01, 1.01, f64::INFINITY] {
            let cfg = MatchingConfig {
                threshold,
                ..MatchingConfig::default()
            };
            assert!(cfg.validate().is_err(), "threshold={threshold}");
        }
        for threshold in [0.0, 1.0] {
            let cfg = MatchingConfig {
                threshold,
                ..MatchingConfig::default()
            };
            assert!(cfg.validate().is_ok(), "threshold={threshold}");
        }
    }

    #[test]
    fn min_defined_subscores_bounds() {
        for min in [0, SUBSCORE_COUNT + 1] {
            let cfg = MatchingConfig {
                min_defined_subscores: min,
                ..MatchingConfig::default()
            };
            assert!(cfg.validate().is_err(), "min={min}");
        }
    }

    #[test]
    fn partial_config_fills_defaults() {
        let cfg: MatchingConfig =
            serde_json::from_str(r#"{"threshold": 0.9, "weights": {"name": 0.5}}"#).unwrap();
        assert!((cfg.threshold - 0.9).abs() < f64::EPSILON);
        assert!((cfg.weights.name - 0.5).abs() < f64::EPSILON);
        assert!((cfg.weights.email - 0.3).abs() < f64::EPSILON);
        assert_eq!(cfg.min_defined_subscores, 2);
    }
}
