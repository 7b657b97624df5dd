//! Population Derivation
//!
//! Converts densities and ratios into integral entity counts.

use crate::{DeploymentConfig, DeploymentError};
use common::types::{BoundingBox, Sector};
use common::utils::round_count;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Apartments per block and floor for each apartment along x:
/// two buildings, each two apartments deep
pub const APARTMENTS_PER_COLUMN: u64 = 4;

/// Entity counts of a deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PopulationCounts {
    /// Active home eNBs
    pub n_home_enbs: u32,
    /// Home UEs
    pub n_home_ues: u32,
    /// Macro UEs
    pub n_macro_ues: u32,
    /// Macro eNBs, three per site
    pub n_macro_enbs: u32,
}

/// Pure arithmetic over the configuration and the coverage area
pub struct PopulationDeriver;

impl PopulationDeriver {
    /// Active home eNBs over all apartments of all blocks
    pub fn home_enbs(config: &DeploymentConfig) -> Result<u32, DeploymentError> {
        let apartments = APARTMENTS_PER_COLUMN
            * u64::from(config.n_apartments_x)
            * u64::from(config.n_blocks)
            * u64::from(config.n_floors);
        count(
            "n_home_enbs",
            apartments as f64 * config.home_enb_deployment_ratio * config.home_enb_activation_ratio,
        )
    }

    /// Home UEs for the given number of home eNBs
    pub fn home_ues(config: &DeploymentConfig, n_home_enbs: u32) -> Result<u32, DeploymentError> {
        count("n_home_ues", f64::from(n_home_enbs) * config.home_ues_home_enb_ratio)
    }

    /// Macro UEs dropped over the coverage area
    pub fn macro_ues(config: &DeploymentConfig, area: &BoundingBox) -> Result<u32, DeploymentError> {
        count("n_macro_ues", area.footprint_area() * config.macro_ue_density)
    }

    /// Macro eNBs, three per site
    pub fn macro_enbs(config: &DeploymentConfig) -> Result<u32, DeploymentError> {
        config
            .n_macro_enb_sites
            .checked_mul(Sector::PER_SITE)
            .ok_or_else(|| DeploymentError::CountOutOfRange {
                quantity: "n_macro_enbs".to_string(),
                value: f64::from(config.n_macro_enb_sites) * f64::from(Sector::PER_SITE),
            })
    }

    /// Derive every count
    pub fn derive(config: &DeploymentConfig, area: &BoundingBox) -> Result<PopulationCounts, DeploymentError> {
        let n_home_enbs = Self::home_enbs(config)?;
        info!("n_home_enbs = {}", n_home_enbs);
        let n_home_ues = Self::home_ues(config, n_home_enbs)?;
        info!("n_home_ues = {}", n_home_ues);
        let n_macro_ues = Self::macro_ues(config, area)?;
        info!("n_macro_ues = {} (density={})", n_macro_ues, config.macro_ue_density);

        Ok(PopulationCounts {
            n_home_enbs,
            n_home_ues,
            n_macro_ues,
            n_macro_enbs: Self::macro_enbs(config)?,
        })
    }
}

fn count(quantity: &str, value: f64) -> Result<u32, DeploymentError> {
    round_count(value).ok_or_else(|| DeploymentError::CountOutOfRange {
        quantity: quantity.to_string(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_enb_rounding() {
        let config = DeploymentConfig {
            n_apartments_x: 10,
            n_blocks: 1,
            n_floors: 1,
            home_enb_deployment_ratio: 0.2,
            home_enb_activation_ratio: 0.5,
            ..Default::default()
        };
        assert_eq!(PopulationDeriver::home_enbs(&config).unwrap(), 4);
    }

    #[test]
    fn test_home_ues_follow_ratio() {
        let config = DeploymentConfig {
            home_ues_home_enb_ratio: 2.5,
            ..Default::default()
        };
        assert_eq!(PopulationDeriver::home_ues(&config, 3).unwrap(), 8);
        assert_eq!(PopulationDeriver::home_ues(&config, 0).unwrap(), 0);
    }

    #[test]
    fn test_macro_ues_from_density() {
        let config = DeploymentConfig::default();
        let area = BoundingBox::flat(0.0, 1000.0, 0.0, 1000.0, 1.5);
        assert_eq!(PopulationDeriver::macro_ues(&config, &area).unwrap(), 20);

        // 150 x 150 m at the default density rounds to zero
        let fallback = BoundingBox::flat(0.0, 150.0, 0.0, 150.0, 1.5);
        assert_eq!(PopulationDeriver::macro_ues(&config, &fallback).unwrap(), 0);
    }

    #[test]
    fn test_derive_defaults() {
        let config = DeploymentConfig::default();
        let area = crate::DeploymentAreaCalculator::macro_coverage(&config);
        let counts = PopulationDeriver::derive(&config, &area).unwrap();
        assert_eq!(counts.n_home_enbs, 4);
        assert_eq!(counts.n_home_ues, 4);
        assert_eq!(counts.n_macro_enbs, 9);
        // 1000 m x (433.01 + 500) m at 2e-5 UEs per square meter
        assert_eq!(counts.n_macro_ues, 19);
    }

    #[test]
    fn test_counts_beyond_u32_rejected() {
        // 100 km x 100 km at one UE per square meter: 1e10 macro UEs
        let config = DeploymentConfig {
            macro_ue_density: 1.0,
            ..Default::default()
        };
        let area = BoundingBox::flat(0.0, 100_000.0, 0.0, 100_000.0, 1.5);
        let err = PopulationDeriver::derive(&config, &area).unwrap_err();
        assert_eq!(
            err,
            DeploymentError::CountOutOfRange {
                quantity: "n_macro_ues".to_string(),
                value: 1e10,
            }
        );
        assert!(err.is_infeasible());

        let config = DeploymentConfig {
            n_blocks: u32::MAX,
            n_floors: 1000,
            ..Default::default()
        };
        assert!(matches!(
            PopulationDeriver::home_enbs(&config),
            Err(DeploymentError::CountOutOfRange { .. })
        ));

        let config = DeploymentConfig {
            n_macro_enb_sites: u32::MAX,
            ..Default::default()
        };
        assert!(PopulationDeriver::macro_enbs(&config).is_err());
    }
}
