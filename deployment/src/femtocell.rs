//! Femtocell Block Allocation
//!
//! Packs dual-stripe apartment blocks into the deployment area by rejection
//! sampling. A block is a pair of apartment buildings separated by a 10 m
//! street; its bounding box keeps a 10 m margin around both buildings.

use crate::random::{RandomSource, RandomStream};
use crate::DeploymentError;
use common::types::BoundingBox;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

/// Consecutive rejected candidates after which a block placement is abandoned
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 100;

/// Side of an apartment [m]
pub const APARTMENT_SIDE: f64 = 10.0;

/// Margin between a block's bounding box and its buildings [m]
pub const BLOCK_MARGIN: f64 = 10.0;

/// Street width between the two buildings of a block [m]
pub const STREET_WIDTH: f64 = 10.0;

/// Height of one floor [m]
pub const FLOOR_HEIGHT: f64 = 3.0;

/// Apartments along y in each building
pub const APARTMENTS_Y: u32 = 2;

/// Buildings per block
pub const BUILDINGS_PER_BLOCK: usize = 2;

/// Building usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildingType {
    Residential,
    Office,
    Commercial,
}

/// External wall material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExternalWallsType {
    Wood,
    ConcreteWithWindows,
    ConcreteWithoutWindows,
    StoneBlocks,
}

/// Apartment building handed to the building installer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingDescriptor {
    /// Building boundaries, ground at z = 0
    pub bounds: BoundingBox,
    /// Rooms along x
    pub n_rooms_x: u32,
    /// Rooms along y
    pub n_rooms_y: u32,
    /// Number of floors
    pub n_floors: u32,
    /// Building usage
    pub building_type: BuildingType,
    /// External wall material
    pub external_walls: ExternalWallsType,
}

impl BuildingDescriptor {
    /// Total number of rooms (apartments)
    pub fn room_count(&self) -> u32 {
        self.n_rooms_x * self.n_rooms_y * self.n_floors
    }

    /// Bounds of a room; indices are zero-based
    pub fn room_bounds(&self, room_x: u32, room_y: u32, floor: u32) -> BoundingBox {
        let dx = self.bounds.width() / f64::from(self.n_rooms_x);
        let dy = self.bounds.depth() / f64::from(self.n_rooms_y);
        let dz = self.bounds.height() / f64::from(self.n_floors);
        let x_min = self.bounds.x_min + dx * f64::from(room_x);
        let y_min = self.bounds.y_min + dy * f64::from(room_y);
        let z_min = self.bounds.z_min + dz * f64::from(floor);
        BoundingBox::new(x_min, x_min + dx, y_min, y_min + dy, z_min, z_min + dz)
    }
}

/// Accepted apartment block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FemtocellBlock {
    /// Block index in placement order
    pub index: u32,
    /// Block footprint, including the construction margin
    pub bounds: BoundingBox,
    /// The two buildings of the block
    pub buildings: [BuildingDescriptor; BUILDINGS_PER_BLOCK],
}

/// Rejection-sampling allocator of non-overlapping blocks
pub struct FemtocellBlockAllocator<R: RandomSource> {
    area: BoundingBox,
    n_apartments_x: u32,
    n_floors: u32,
    x_size: f64,
    y_size: f64,
    previous_blocks: Vec<FemtocellBlock>,
    rejected_candidates: u64,
    random: R,
}

impl<R: RandomSource> FemtocellBlockAllocator<R> {
    /// Create an allocator over `area` for blocks of `n_apartments_x` apartments per row
    pub fn new(area: BoundingBox, n_apartments_x: u32, n_floors: u32, random: R) -> Self {
        let x_size = f64::from(n_apartments_x) * APARTMENT_SIDE + 2.0 * BLOCK_MARGIN;
        let y_size = 2.0 * f64::from(APARTMENTS_Y) * APARTMENT_SIDE + STREET_WIDTH + 2.0 * BLOCK_MARGIN;
        debug!("Block allocator over {} with block size {} x {}", area, x_size, y_size);
        Self {
            area,
            n_apartments_x,
            n_floors,
            x_size,
            y_size,
            previous_blocks: Vec::new(),
            rejected_candidates: 0,
            random,
        }
    }

    /// Block size along x and y
    pub fn block_size(&self) -> (f64, f64) {
        (self.x_size, self.y_size)
    }

    /// Blocks accepted so far
    pub fn blocks(&self) -> &[FemtocellBlock] {
        &self.previous_blocks
    }

    /// Total number of rejected candidates over the allocator's lifetime
    pub fn rejected_candidates(&self) -> u64 {
        self.rejected_candidates
    }

    /// Consume the allocator, returning the accepted blocks
    pub fn into_blocks(self) -> Vec<FemtocellBlock> {
        self.previous_blocks
    }

    /// Place `n` blocks, one after the other
    ///
    /// Returns the blocks created by this call. The first failure aborts the
    /// whole call; blocks placed before it stay recorded.
    pub fn create_n(&mut self, n: u32) -> Result<&[FemtocellBlock], DeploymentError> {
        let start = self.previous_blocks.len();
        for _ in 0..n {
            self.create_one()?;
        }
        info!("Allocated {} non overlapping apartment blocks", n);
        Ok(&self.previous_blocks[start..])
    }

    /// Place one block that overlaps none of the previous ones
    pub fn create_one(&mut self) -> Result<&FemtocellBlock, DeploymentError> {
        if self.x_size > self.area.width() || self.y_size > self.area.depth() {
            return Err(DeploymentError::BlockLargerThanArea {
                block_x: self.x_size,
                block_y: self.y_size,
                area_x: self.area.width(),
                area_y: self.area.depth(),
            });
        }

        let index = self.previous_blocks.len() as u32;
        for attempt in 0..MAX_PLACEMENT_ATTEMPTS {
            let candidate = self.draw_candidate();
            if self.overlaps_with_any_previous(&candidate) {
                trace!("Block {} candidate {} rejected: {}", index, attempt, candidate);
                self.rejected_candidates += 1;
                continue;
            }

            debug!("Allocated non overlapping block {}: {}", index, candidate);
            let block = FemtocellBlock {
                index,
                bounds: candidate,
                buildings: self.buildings_in(&candidate),
            };
            self.previous_blocks.push(block);
            return Ok(&self.previous_blocks[self.previous_blocks.len() - 1]);
        }

        Err(DeploymentError::BlockPlacementExhausted {
            block: index,
            attempts: MAX_PLACEMENT_ATTEMPTS,
        })
    }

    fn draw_candidate(&mut self) -> BoundingBox {
        let x_min = self
            .random
            .next_uniform(RandomStream::BlockX, self.area.x_min, self.area.x_max - self.x_size);
        let y_min = self
            .random
            .next_uniform(RandomStream::BlockY, self.area.y_min, self.area.y_max - self.y_size);
        BoundingBox::flat(x_min, x_min + self.x_size, y_min, y_min + self.y_size, 0.0)
    }

    fn overlaps_with_any_previous(&self, candidate: &BoundingBox) -> bool {
        self.previous_blocks
            .iter()
            .any(|block| block.bounds.overlaps(candidate))
    }

    /// The two buildings of a block, stacked along y inside the margin
    fn buildings_in(&self, block: &BoundingBox) -> [BuildingDescriptor; BUILDINGS_PER_BLOCK] {
        let length_x = APARTMENT_SIDE * f64::from(self.n_apartments_x);
        let length_y = APARTMENT_SIDE * f64::from(APARTMENTS_Y);
        let height = FLOOR_HEIGHT * f64::from(self.n_floors);
        let x_min = block.x_min + BLOCK_MARGIN;
        let y_min = block.y_min + BLOCK_MARGIN;

        std::array::from_fn(|i| {
            let y = y_min + (length_y + STREET_WIDTH) * i as f64;
            BuildingDescriptor {
                bounds: BoundingBox::new(x_min, x_min + length_x, y, y + length_y, 0.0, height),
                n_rooms_x: self.n_apartments_x,
                n_rooms_y: APARTMENTS_Y,
                n_floors: self.n_floors,
                building_type: BuildingType::Residential,
                external_walls: ExternalWallsType::ConcreteWithWindows,
            }
        })
    }
}
