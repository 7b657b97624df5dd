//! Heterogeneous Network Deployment Generator
//!
//! This crate computes the geometry of a dual-stripe deployment: macro site
//! positions on a hexagonal grid, non-overlapping femtocell apartment blocks,
//! the entity counts derived from densities and ratios, and the random
//! terminal positions handed to the simulator installers.

pub mod config;
pub mod random;
pub mod area;
pub mod hex_grid;
pub mod femtocell;
pub mod population;
pub mod terminals;
pub mod rem;
pub mod orchestrator;

use thiserror::Error;

pub use config::DeploymentConfig;
pub use random::{RandomSource, RandomStream, SeededRandomSource};
pub use area::DeploymentAreaCalculator;
pub use hex_grid::{HexGridSitePlacer, Site, SectorPlacement};
pub use femtocell::{FemtocellBlock, FemtocellBlockAllocator, BuildingDescriptor};
pub use population::{PopulationCounts, PopulationDeriver};
pub use terminals::{TerminalLayout, TerminalPlacer, RoomLocation};
pub use rem::{RemConfig, RemSettings};
pub use orchestrator::{DeploymentLayout, DeploymentOrchestrator, Scenario};

/// Errors raised while generating a deployment
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeploymentError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error(
        "Too many failed attempts to position apartment block {block} ({attempts} candidates rejected): \
         too many blocks or too small an area?"
    )]
    BlockPlacementExhausted {
        /// Zero-based index of the block that could not be placed
        block: u32,
        /// Number of rejected candidates
        attempts: u32,
    },

    #[error("Apartment block of {block_x} x {block_y} m does not fit in area {area_x} x {area_y} m")]
    BlockLargerThanArea {
        block_x: f64,
        block_y: f64,
        area_x: f64,
        area_y: f64,
    },

    #[error("No rooms available to host home eNBs")]
    NoRoomsAvailable,

    #[error("Derived {quantity} = {value} does not fit in a 32-bit count")]
    CountOutOfRange {
        quantity: String,
        value: f64,
    },
}

impl DeploymentError {
    /// Whether the error means the requested geometry cannot be realized
    pub fn is_infeasible(&self) -> bool {
        matches!(
            self,
            DeploymentError::BlockPlacementExhausted { .. }
                | DeploymentError::BlockLargerThanArea { .. }
                | DeploymentError::NoRoomsAvailable
                | DeploymentError::CountOutOfRange { .. }
        )
    }
}
