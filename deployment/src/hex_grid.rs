//! Hexagonal Macro Site Grid
//!
//! Macro sites sit on a triangular lattice built from "bi-rows": an even row
//! of `grid_width` sites followed by an odd row of `grid_width + 1` sites
//! shifted half an inter-site distance to the left. Every site hosts three
//! sectors.

use crate::DeploymentConfig;
use common::types::{Sector, Vector3};
use common::utils::hex_row_spacing;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Lattice coordinates of a site index on a grid of the given width
///
/// Returns `(row, column)`. Even rows hold `grid_width` sites, odd rows
/// `grid_width + 1`.
pub fn lattice_position(site_index: u32, grid_width: u32) -> (u32, u32) {
    let bi_row_len = 2 * grid_width + 1;
    let bi_row_index = site_index / bi_row_len;
    let bi_row_remainder = site_index % bi_row_len;

    let mut row = bi_row_index * 2;
    let mut column = bi_row_remainder;
    if bi_row_remainder >= grid_width {
        row += 1;
        column -= grid_width;
    }
    (row, column)
}

/// One sector antenna of a macro site
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectorPlacement {
    /// Sector of the site
    pub sector: Sector,
    /// Antenna boresight in degrees
    pub orientation_degrees: f64,
    /// Antenna position
    pub position: Vector3,
}

/// Three-sector macro site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Site index in placement order
    pub index: u32,
    /// Lattice row
    pub row: u32,
    /// Lattice column within the row
    pub column: u32,
    /// Site center
    pub position: Vector3,
    /// Sector antennas, in `Sector::ALL` order
    pub sectors: [SectorPlacement; 3],
}

/// Places macro sites on the hexagonal grid
#[derive(Debug, Clone)]
pub struct HexGridSitePlacer {
    inter_site_distance: f64,
    grid_width: u32,
    min_x: f64,
    min_y: f64,
    site_height: f64,
    sector_offset: f64,
}

impl HexGridSitePlacer {
    /// Create a placer from the deployment parameters
    ///
    /// The lattice origin is `(inter_site_distance / 2, 0)`, so odd rows
    /// start at `x = 0` and the grid spans `[0, grid_width * d]` along x.
    pub fn new(config: &DeploymentConfig) -> Self {
        Self {
            inter_site_distance: config.inter_site_distance,
            grid_width: config.n_macro_enb_sites_x,
            min_x: config.inter_site_distance / 2.0,
            min_y: 0.0,
            site_height: config.site_height,
            sector_offset: config.sector_offset,
        }
    }

    /// Position of the site with the given index
    pub fn site_position(&self, site_index: u32) -> (u32, u32, Vector3) {
        let d = self.inter_site_distance;
        let (row, column) = lattice_position(site_index, self.grid_width);

        let mut x = self.min_x + d * f64::from(column);
        if row % 2 == 1 {
            x -= d / 2.0;
        }
        let y = self.min_y + hex_row_spacing(d) * f64::from(row);

        (row, column, Vector3::new(x, y, self.site_height))
    }

    /// Place `n_sites` sites
    pub fn place(&self, n_sites: u32) -> Vec<Site> {
        let sites: Vec<Site> = (0..n_sites)
            .map(|index| {
                let (row, column, position) = self.site_position(index);
                trace!("Site {} at row {}, column {}: {}", index, row, column, position);
                Site {
                    index,
                    row,
                    column,
                    position,
                    sectors: Sector::ALL.map(|sector| self.sector_placement(position, sector)),
                }
            })
            .collect();

        debug!(
            "Placed {} macro sites ({} sectors) on a grid of width {}",
            sites.len(),
            sites.len() * Sector::ALL.len(),
            self.grid_width
        );
        sites
    }

    fn sector_placement(&self, site: Vector3, sector: Sector) -> SectorPlacement {
        let orientation = sector.orientation_degrees();
        let angle = orientation.to_radians();
        let position = Vector3::new(
            site.x + self.sector_offset * angle.cos(),
            site.y + self.sector_offset * angle.sin(),
            site.z,
        );
        SectorPlacement {
            sector,
            orientation_degrees: orientation,
            position,
        }
    }
}

impl Site {
    /// Iterate over the sector antennas of all sites in installation order
    pub fn all_sectors(sites: &[Site]) -> impl Iterator<Item = (&Site, &SectorPlacement)> {
        sites.iter().flat_map(|site| site.sectors.iter().map(move |s| (site, s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placer(grid_width: u32, d: f64) -> HexGridSitePlacer {
        HexGridSitePlacer::new(&DeploymentConfig {
            n_macro_enb_sites_x: grid_width,
            inter_site_distance: d,
            ..Default::default()
        })
    }

    #[test]
    fn test_lattice_position() {
        // Width 2: rows of 2, 3, 2, 3 ...
        assert_eq!(lattice_position(0, 2), (0, 0));
        assert_eq!(lattice_position(1, 2), (0, 1));
        assert_eq!(lattice_position(2, 2), (1, 0));
        assert_eq!(lattice_position(4, 2), (1, 2));
        assert_eq!(lattice_position(5, 2), (2, 0));
    }

    #[test]
    fn test_single_column_spacing() {
        let d = 500.0;
        let sites = placer(1, d).place(4);
        let row_spacing = d * 0.75_f64.sqrt();

        assert_eq!(sites[0].position.x, d / 2.0);
        assert_eq!(sites[0].position.y, 0.0);

        // Odd row is offset by d/2 relative to the even row
        assert_eq!(sites[1].row, 1);
        assert_eq!(sites[1].position.x, sites[0].position.x - d / 2.0);
        assert!((sites[1].position.y - row_spacing).abs() < 1e-9);
        assert_eq!(sites[2].position.x, sites[1].position.x + d);

        assert_eq!(sites[3].row, 2);
        assert_eq!(sites[3].position.x, sites[0].position.x);
        assert!((sites[3].position.y - 2.0 * row_spacing).abs() < 1e-9);
    }

    #[test]
    fn test_three_colocated_sectors_per_site() {
        let sites = placer(1, 500.0).place(3);
        assert_eq!(Site::all_sectors(&sites).count(), 9);
        for site in &sites {
            for (sector, placement) in Sector::ALL.iter().zip(site.sectors.iter()) {
                assert_eq!(placement.sector, *sector);
                assert_eq!(placement.position, site.position);
            }
            assert_eq!(site.position.z, 30.0);
        }
    }

    #[test]
    fn test_sector_offset_follows_boresight() {
        let placer = HexGridSitePlacer::new(&DeploymentConfig {
            sector_offset: 0.5,
            ..Default::default()
        });
        let site = &placer.place(1)[0];
        let alpha = site.sectors[0].position;
        assert!((alpha.x - (site.position.x + 0.5)).abs() < 1e-12);
        assert!((alpha.y - site.position.y).abs() < 1e-12);
        let beta = site.sectors[1].position;
        assert!(beta.x < site.position.x && beta.y > site.position.y);
    }

    #[test]
    fn test_no_sites() {
        assert!(placer(1, 500.0).place(0).is_empty());
    }
}
