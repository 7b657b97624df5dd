//! Deployment Configuration
//!
//! One immutable parameter set per generation run. Defaults follow the
//! 3GPP R4-092042 dual-stripe evaluation scenario.

use crate::DeploymentError;
use serde::{Deserialize, Serialize};

/// Parameters of a dual-stripe heterogeneous deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentConfig {
    /// Number of femtocell blocks
    pub n_blocks: u32,
    /// Number of apartments along the X axis in a femtocell block
    pub n_apartments_x: u32,
    /// Number of floors
    pub n_floors: u32,
    /// Number of three-sector macro sites
    pub n_macro_enb_sites: u32,
    /// (Minimum) number of sites along the X axis of the hex grid
    pub n_macro_enb_sites_x: u32,
    /// Minimum distance between two nearby macro sites [m]
    pub inter_site_distance: f64,
    /// How far the UE area extends outside the macro grid, as a fraction of the inter-site distance
    pub area_margin_factor: f64,
    /// Macro UEs per square meter
    pub macro_ue_density: f64,
    /// Fraction of apartments that own a HeNB
    pub home_enb_deployment_ratio: f64,
    /// Fraction of deployed HeNBs that are switched on
    pub home_enb_activation_ratio: f64,
    /// Average number of home UEs per HeNB
    pub home_ues_home_enb_ratio: f64,
    /// Antenna height of macro sites [m]
    pub site_height: f64,
    /// Distance of each sector antenna from its site center along the boresight [m]
    pub sector_offset: f64,
    /// Height of outdoor UEs and of the REM plane [m]
    pub ue_height: f64,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            n_blocks: 1,
            n_apartments_x: 10,
            n_floors: 1,
            n_macro_enb_sites: 3,
            n_macro_enb_sites_x: 1,
            inter_site_distance: 500.0,
            area_margin_factor: 0.5,
            macro_ue_density: 0.00002,
            home_enb_deployment_ratio: 0.2,
            home_enb_activation_ratio: 0.5,
            home_ues_home_enb_ratio: 1.0,
            site_height: 30.0,
            sector_offset: 0.0,
            ue_height: 1.5,
        }
    }
}

impl DeploymentConfig {
    /// Check the parameters before any geometry is computed
    pub fn validate(&self) -> Result<(), DeploymentError> {
        let reals = [
            ("inter_site_distance", self.inter_site_distance),
            ("area_margin_factor", self.area_margin_factor),
            ("macro_ue_density", self.macro_ue_density),
            ("home_enb_deployment_ratio", self.home_enb_deployment_ratio),
            ("home_enb_activation_ratio", self.home_enb_activation_ratio),
            ("home_ues_home_enb_ratio", self.home_ues_home_enb_ratio),
            ("site_height", self.site_height),
            ("sector_offset", self.sector_offset),
            ("ue_height", self.ue_height),
        ];
        for (name, value) in reals {
            if !value.is_finite() {
                return Err(invalid(format!("{} must be finite, got {}", name, value)));
            }
        }

        if self.inter_site_distance <= 0.0 {
            return Err(invalid(format!(
                "inter_site_distance must be positive, got {}",
                self.inter_site_distance
            )));
        }

        for (name, value) in [
            ("area_margin_factor", self.area_margin_factor),
            ("macro_ue_density", self.macro_ue_density),
            ("home_ues_home_enb_ratio", self.home_ues_home_enb_ratio),
            ("sector_offset", self.sector_offset),
        ] {
            if value < 0.0 {
                return Err(invalid(format!("{} must not be negative, got {}", name, value)));
            }
        }

        for (name, value) in [
            ("home_enb_deployment_ratio", self.home_enb_deployment_ratio),
            ("home_enb_activation_ratio", self.home_enb_activation_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!("{} must lie in [0, 1], got {}", name, value)));
            }
        }

        if self.n_apartments_x == 0 {
            return Err(invalid("n_apartments_x must be at least 1".to_string()));
        }
        if self.n_floors == 0 {
            return Err(invalid("n_floors must be at least 1".to_string()));
        }
        if self.n_macro_enb_sites > 0 && self.n_macro_enb_sites_x == 0 {
            return Err(invalid(
                "n_macro_enb_sites_x must be at least 1 when macro sites are requested".to_string(),
            ));
        }

        Ok(())
    }
}

fn invalid(reason: String) -> DeploymentError {
    DeploymentError::InvalidConfiguration(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = DeploymentConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_ratio_out_of_range() {
        let config = DeploymentConfig {
            home_enb_activation_ratio: 1.5,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, DeploymentError::InvalidConfiguration(ref m) if m.contains("home_enb_activation_ratio")));
    }

    #[test]
    fn test_rejects_non_positive_distance() {
        let config = DeploymentConfig {
            inter_site_distance: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = DeploymentConfig {
            inter_site_distance: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_degenerate_grid() {
        let config = DeploymentConfig {
            n_macro_enb_sites_x: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        // A zero-width grid is fine when there are no macro sites at all
        let config = DeploymentConfig {
            n_macro_enb_sites: 0,
            n_macro_enb_sites_x: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_buildings() {
        let config = DeploymentConfig {
            n_floors: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: DeploymentConfig = toml::from_str("n_blocks = 4\ninter_site_distance = 300.0\n").unwrap();
        assert_eq!(config.n_blocks, 4);
        assert_eq!(config.inter_site_distance, 300.0);
        assert_eq!(config.n_apartments_x, 10);
        assert_eq!(config.macro_ue_density, 0.00002);
    }
}
