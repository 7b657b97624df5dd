//! Terminal Placement
//!
//! Drops home eNBs into random apartments, co-locates home UEs with their
//! home eNB and scatters macro UEs over the coverage area.

use crate::femtocell::FemtocellBlock;
use crate::population::PopulationCounts;
use crate::random::{RandomSource, RandomStream};
use crate::DeploymentError;
use common::types::{BoundingBox, Vector3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Apartment inside a femtocell block; indices are zero-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomLocation {
    /// Block index
    pub block: u32,
    /// Building within the block (0 or 1)
    pub building: u32,
    /// Floor
    pub floor: u32,
    /// Room column
    pub room_x: u32,
    /// Room row
    pub room_y: u32,
}

/// Indoor home eNB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeEnbPlacement {
    pub room: RoomLocation,
    pub position: Vector3,
}

/// Home UE sharing the apartment of its home eNB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeUePlacement {
    pub room: RoomLocation,
    pub position: Vector3,
    /// Index of the serving home eNB in `TerminalLayout::home_enbs`
    pub home_enb: u32,
}

/// Positions of every terminal and femtocell of a deployment
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TerminalLayout {
    pub home_enbs: Vec<HomeEnbPlacement>,
    pub home_ues: Vec<HomeUePlacement>,
    pub macro_ues: Vec<Vector3>,
}

/// Places terminals over a set of blocks and a coverage area
pub struct TerminalPlacer<'a> {
    blocks: &'a [FemtocellBlock],
    area: BoundingBox,
}

impl<'a> TerminalPlacer<'a> {
    /// Create a placer
    pub fn new(blocks: &'a [FemtocellBlock], area: BoundingBox) -> Self {
        Self { blocks, area }
    }

    /// Every apartment, in block, building, floor, column, row order
    pub fn all_rooms(&self) -> Vec<RoomLocation> {
        let mut rooms = Vec::new();
        for block in self.blocks {
            for (building_index, building) in block.buildings.iter().enumerate() {
                for floor in 0..building.n_floors {
                    for room_x in 0..building.n_rooms_x {
                        for room_y in 0..building.n_rooms_y {
                            rooms.push(RoomLocation {
                                block: block.index,
                                building: building_index as u32,
                                floor,
                                room_x,
                                room_y,
                            });
                        }
                    }
                }
            }
        }
        rooms
    }

    /// Bounds of an apartment
    pub fn room_bounds(&self, room: &RoomLocation) -> Option<BoundingBox> {
        let block = self.blocks.iter().find(|b| b.index == room.block)?;
        let building = block.buildings.get(room.building as usize)?;
        Some(building.room_bounds(room.room_x, room.room_y, room.floor))
    }

    /// Place home eNBs, home UEs and macro UEs, in that order
    pub fn place<R: RandomSource>(
        &self,
        counts: &PopulationCounts,
        random: &mut R,
    ) -> Result<TerminalLayout, DeploymentError> {
        let home_enbs = self.place_home_enbs(counts.n_home_enbs, random)?;
        let home_ues = self.place_home_ues(&home_enbs, counts.n_home_ues, random)?;
        let macro_ues = self.place_macro_ues(counts.n_macro_ues, random);

        info!(
            "Placed {} home eNBs, {} home UEs and {} macro UEs",
            home_enbs.len(),
            home_ues.len(),
            macro_ues.len()
        );
        Ok(TerminalLayout {
            home_enbs,
            home_ues,
            macro_ues,
        })
    }

    /// Draw rooms without replacement, starting over once every room is taken
    pub fn place_home_enbs<R: RandomSource>(
        &self,
        n: u32,
        random: &mut R,
    ) -> Result<Vec<HomeEnbPlacement>, DeploymentError> {
        let rooms = self.all_rooms();
        if n > 0 && rooms.is_empty() {
            return Err(DeploymentError::NoRoomsAvailable);
        }

        let mut free_rooms: Vec<RoomLocation> = Vec::new();
        let mut placements = Vec::with_capacity(n as usize);
        for _ in 0..n {
            if free_rooms.is_empty() {
                free_rooms = rooms.clone();
            }
            let index = random.next_index(RandomStream::HomeEnbRoom, free_rooms.len());
            let room = free_rooms.swap_remove(index);
            let position = self.position_in_room(&room, RandomStream::HomeEnbPosition, random)?;
            debug!("Home eNB {} in {:?} at {}", placements.len(), room, position);
            placements.push(HomeEnbPlacement { room, position });
        }
        Ok(placements)
    }

    /// UE `i` shares the room of home eNB `i mod n_home_enbs`
    pub fn place_home_ues<R: RandomSource>(
        &self,
        home_enbs: &[HomeEnbPlacement],
        n: u32,
        random: &mut R,
    ) -> Result<Vec<HomeUePlacement>, DeploymentError> {
        if n > 0 && home_enbs.is_empty() {
            return Err(DeploymentError::NoRoomsAvailable);
        }

        (0..n)
            .map(|i| {
                let home_enb = i % home_enbs.len() as u32;
                let room = home_enbs[home_enb as usize].room;
                let position = self.position_in_room(&room, RandomStream::HomeUePosition, random)?;
                Ok(HomeUePlacement {
                    room,
                    position,
                    home_enb,
                })
            })
            .collect()
    }

    /// Macro UEs uniformly over the coverage box
    pub fn place_macro_ues<R: RandomSource>(&self, n: u32, random: &mut R) -> Vec<Vector3> {
        (0..n)
            .map(|_| {
                let x = random.next_uniform(RandomStream::MacroUeX, self.area.x_min, self.area.x_max);
                let y = random.next_uniform(RandomStream::MacroUeY, self.area.y_min, self.area.y_max);
                let z = random.next_uniform(RandomStream::MacroUeZ, self.area.z_min, self.area.z_max);
                Vector3::new(x, y, z)
            })
            .collect()
    }

    fn position_in_room<R: RandomSource>(
        &self,
        room: &RoomLocation,
        stream: RandomStream,
        random: &mut R,
    ) -> Result<Vector3, DeploymentError> {
        let bounds = self.room_bounds(room).ok_or(DeploymentError::NoRoomsAvailable)?;
        let x = random.next_uniform(stream, bounds.x_min, bounds.x_max);
        let y = random.next_uniform(stream, bounds.y_min, bounds.y_max);
        let z = random.next_uniform(stream, bounds.z_min, bounds.z_max);
        Ok(Vector3::new(x, y, z))
    }
}
