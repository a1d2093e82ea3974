use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::instance::Cost;

/// Policy configuration for one optimization run. Constructed once and passed
/// by reference into model assembly; there is no process-wide state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Weight of the normalized profit criterion (w1)
    pub profit_weight: f64,
    /// Weight of the normalized service-level criterion (w2)
    pub service_weight: f64,
    /// Weight of the normalized emissions criterion (w3), subtracted
    pub emission_weight: f64,
    /// Split of the service criterion between hospitals (rho) and
    /// clinics (1 - rho)
    pub service_split: f64,
    /// Fixed reference profit used as normalization denominator [IDR]
    pub profit_reference: f64,
    /// Fixed reference service level used as normalization denominator
    pub service_reference: f64,
    /// Fixed reference emissions used as normalization denominator [kg CO2e]
    pub emission_reference: f64,
    /// Shelf life of the product in periods. Stock held longer than this
    /// becomes eligible for discard.
    pub shelf_life: usize,
    /// Per-period cap on system-wide emissions [kg CO2e]
    pub emission_cap: f64,
    /// Monetary penalty per unit of emission [IDR/kg CO2e]
    pub emission_price: Cost,
    /// Fixed cost of operating a mobile unit in a period [IDR]
    pub mobile_fixed_cost: Cost,
    /// Fixed cost of operating a local center in a period [IDR]
    pub local_fixed_cost: Cost,
    /// Supply to a hospital in a period is bounded by this multiple of its
    /// demand
    pub hospital_supply_factor: f64,
    /// Supply to a clinic in a period is bounded by this multiple of its
    /// demand
    pub clinic_supply_factor: f64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A normalization denominator is zero (or not finite); the composite
    /// objective cannot be formed.
    #[error("reference value for {criterion} must be non-zero and finite, got {value}")]
    BadReference { criterion: &'static str, value: f64 },
    /// Objective weights must be non-negative
    #[error("objective weight {name} must be non-negative, got {value}")]
    NegativeWeight { name: &'static str, value: f64 },
    /// The hospital/clinic service split must lie in [0, 1]
    #[error("service split must lie in [0, 1], got {0}")]
    BadServiceSplit(f64),
    /// Shelf life of zero periods would force all stock to expire immediately
    #[error("shelf life must be at least one period")]
    ZeroShelfLife,
    /// A parameter table does not cover the full index space it is queried
    /// over. Missing entries are an error, never a silent default.
    #[error("parameter family {family} is missing entries: expected {expected} at depth {depth}, got {actual}")]
    MissingParameter {
        family: &'static str,
        depth: usize,
        expected: usize,
        actual: usize,
    },
}

impl Config {
    /// The policy values of the East Kalimantan case study.
    pub fn east_kalimantan() -> Config {
        Config {
            profit_weight: 0.5,
            service_weight: 0.3,
            emission_weight: 0.2,
            service_split: 0.8,
            profit_reference: 4_488_461_514.0,
            service_reference: 1.3185,
            emission_reference: 203.94,
            shelf_life: 25,
            emission_cap: 1000.0,
            emission_price: 250_000.0,
            mobile_fixed_cost: 500_000.0,
            local_fixed_cost: 750_000.0,
            hospital_supply_factor: 1.1,
            clinic_supply_factor: 1.6,
        }
    }

    /// Fail fast on configurations that would make the composite objective
    /// meaningless. Called before any model assembly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let references = [
            ("profit", self.profit_reference),
            ("service", self.service_reference),
            ("emissions", self.emission_reference),
        ];
        for (criterion, value) in references {
            if value == 0.0 || !value.is_finite() {
                return Err(ConfigError::BadReference { criterion, value });
            }
        }

        let weights = [
            ("w1", self.profit_weight),
            ("w2", self.service_weight),
            ("w3", self.emission_weight),
        ];
        for (name, value) in weights {
            if value < 0.0 || !value.is_finite() {
                return Err(ConfigError::NegativeWeight { name, value });
            }
        }

        if !(0.0..=1.0).contains(&self.service_split) {
            return Err(ConfigError::BadServiceSplit(self.service_split));
        }

        if self.shelf_life == 0 {
            return Err(ConfigError::ZeroShelfLife);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_study_config_is_valid() {
        assert!(Config::east_kalimantan().validate().is_ok());
    }

    #[test]
    fn zero_reference_is_rejected() {
        let mut config = Config::east_kalimantan();
        config.emission_reference = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BadReference {
                criterion: "emissions",
                ..
            })
        ));
    }

    #[test]
    fn service_split_outside_unit_interval_is_rejected() {
        let mut config = Config::east_kalimantan();
        config.service_split = 1.2;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BadServiceSplit(_))
        ));
    }

    #[test]
    fn zero_shelf_life_is_rejected() {
        let mut config = Config::east_kalimantan();
        config.shelf_life = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroShelfLife)));
    }
}
