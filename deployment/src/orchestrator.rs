//! Deployment Orchestrator
//!
//! Sequences area calculation, site placement, block allocation and
//! population derivation into one immutable layout.

use crate::area::DeploymentAreaCalculator;
use crate::femtocell::{BuildingDescriptor, FemtocellBlock, FemtocellBlockAllocator};
use crate::hex_grid::{HexGridSitePlacer, Site};
use crate::population::{PopulationCounts, PopulationDeriver};
use crate::random::{RandomSource, SeededRandomSource};
use crate::terminals::{TerminalLayout, TerminalPlacer};
use crate::{DeploymentConfig, DeploymentError};
use common::types::BoundingBox;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Complete geometry of one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentLayout {
    /// Area for macro UE drops and REM rendering
    pub macro_coverage: BoundingBox,
    /// Macro sites in placement order
    pub sites: Vec<Site>,
    /// Femtocell blocks in placement order
    pub blocks: Vec<FemtocellBlock>,
    /// Derived entity counts
    pub counts: PopulationCounts,
}

impl DeploymentLayout {
    /// Buildings of every block, in installation order
    pub fn buildings(&self) -> impl Iterator<Item = &BuildingDescriptor> {
        self.blocks.iter().flat_map(|block| block.buildings.iter())
    }
}

/// Layout plus terminal positions, tagged with the run that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub seed: u64,
    pub run: u32,
    pub config: DeploymentConfig,
    pub layout: DeploymentLayout,
    pub terminals: TerminalLayout,
}

/// Runs the generation steps in dependency order
pub struct DeploymentOrchestrator {
    config: DeploymentConfig,
}

impl DeploymentOrchestrator {
    /// Create an orchestrator; the configuration is validated here, once
    pub fn new(config: DeploymentConfig) -> Result<Self, DeploymentError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration of this orchestrator
    pub fn config(&self) -> &DeploymentConfig {
        &self.config
    }

    /// Area, then sites, then blocks, then population
    pub fn generate<R: RandomSource>(&self, random: &mut R) -> Result<DeploymentLayout, DeploymentError> {
        let config = &self.config;

        let macro_coverage = DeploymentAreaCalculator::macro_coverage(config);
        info!("Macro coverage area: {}", macro_coverage);

        let sites = HexGridSitePlacer::new(config).place(config.n_macro_enb_sites);

        let mut allocator =
            FemtocellBlockAllocator::new(macro_coverage, config.n_apartments_x, config.n_floors, &mut *random);
        allocator.create_n(config.n_blocks)?;
        let blocks = allocator.into_blocks();

        let counts = PopulationDeriver::derive(config, &macro_coverage)?;

        Ok(DeploymentLayout {
            macro_coverage,
            sites,
            blocks,
            counts,
        })
    }

    /// Generate the layout and place every terminal in it
    pub fn generate_with_terminals<R: RandomSource>(
        &self,
        random: &mut R,
    ) -> Result<(DeploymentLayout, TerminalLayout), DeploymentError> {
        let layout = self.generate(random)?;
        let terminals = TerminalPlacer::new(&layout.blocks, layout.macro_coverage).place(&layout.counts, random)?;
        Ok((layout, terminals))
    }

    /// Full scenario for a `(seed, run)` pair
    pub fn run(&self, seed: u64, run: u32) -> Result<Scenario, DeploymentError> {
        info!("Generating deployment for seed={}, run={}", seed, run);
        let mut random = SeededRandomSource::new(seed, run);
        let (layout, terminals) = self.generate_with_terminals(&mut random)?;
        Ok(Scenario {
            seed,
            run,
            config: self.config.clone(),
            layout,
            terminals,
        })
    }
}
