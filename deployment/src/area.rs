//! Macro Coverage Area
//!
//! Derives the rectangle in which macro UEs are dropped, femtocell blocks
//! are packed and the REM is rendered.

use crate::hex_grid::lattice_position;
use crate::DeploymentConfig;
use common::types::BoundingBox;
use common::utils::hex_row_spacing;
use tracing::debug;

/// Side of the square used when no macro sites are requested [m]
pub const FALLBACK_AREA_SIDE: f64 = 150.0;

/// Computes the macro coverage box from the grid parameters
pub struct DeploymentAreaCalculator;

impl DeploymentAreaCalculator {
    /// Number of lattice rows occupied by `n_sites` sites
    pub fn grid_rows(n_sites: u32, grid_width: u32) -> u32 {
        if n_sites == 0 {
            return 0;
        }
        let (last_row, _) = lattice_position(n_sites - 1, grid_width);
        last_row + 1
    }

    /// Macro coverage box, lying flat at the UE height
    pub fn macro_coverage(config: &DeploymentConfig) -> BoundingBox {
        let z = config.ue_height;
        if config.n_macro_enb_sites == 0 {
            // Femtocell blocks still need somewhere to go
            debug!("No macro sites, using {} m fallback area", FALLBACK_AREA_SIDE);
            return BoundingBox::flat(0.0, FALLBACK_AREA_SIDE, 0.0, FALLBACK_AREA_SIDE, z);
        }

        let d = config.inter_site_distance;
        let margin = config.area_margin_factor * d;
        let n_rows = Self::grid_rows(config.n_macro_enb_sites, config.n_macro_enb_sites_x);
        debug!("n_macro_enb_sites_y = {}", n_rows);

        BoundingBox::flat(
            -margin,
            (f64::from(config.n_macro_enb_sites_x) + config.area_margin_factor) * d,
            -margin,
            f64::from(n_rows - 1) * hex_row_spacing(d) + margin,
            z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_area() {
        for (sites_x, d) in [(1, 500.0), (4, 10.0), (0, 1e6)] {
            let config = DeploymentConfig {
                n_macro_enb_sites: 0,
                n_macro_enb_sites_x: sites_x,
                inter_site_distance: d,
                ..Default::default()
            };
            let area = DeploymentAreaCalculator::macro_coverage(&config);
            assert_eq!(area, BoundingBox::flat(0.0, 150.0, 0.0, 150.0, 1.5));
        }
    }

    #[test]
    fn test_default_area() {
        // 3 sites, width 1: rows of 1 and 2 sites
        let config = DeploymentConfig::default();
        let area = DeploymentAreaCalculator::macro_coverage(&config);
        assert_eq!(area.x_min, -250.0);
        assert_eq!(area.x_max, 750.0);
        assert_eq!(area.y_min, -250.0);
        assert!((area.y_max - (500.0 * 0.75_f64.sqrt() + 250.0)).abs() < 1e-9);
        assert_eq!(area.z_min, 1.5);
        assert_eq!(area.z_max, 1.5);
    }

    #[test]
    fn test_grid_rows() {
        assert_eq!(DeploymentAreaCalculator::grid_rows(0, 1), 0);
        assert_eq!(DeploymentAreaCalculator::grid_rows(1, 1), 1);
        assert_eq!(DeploymentAreaCalculator::grid_rows(3, 1), 2);
        assert_eq!(DeploymentAreaCalculator::grid_rows(4, 1), 3);
        assert_eq!(DeploymentAreaCalculator::grid_rows(7, 2), 3);
    }

    #[test]
    fn test_area_contains_every_site() {
        let config = DeploymentConfig {
            n_macro_enb_sites: 7,
            n_macro_enb_sites_x: 2,
            ..Default::default()
        };
        let area = DeploymentAreaCalculator::macro_coverage(&config);
        let sites = crate::HexGridSitePlacer::new(&config).place(config.n_macro_enb_sites);
        for site in sites {
            let p = site.position;
            assert!(p.x > area.x_min && p.x < area.x_max);
            assert!(p.y > area.y_min && p.y < area.y_max);
        }
    }
}
