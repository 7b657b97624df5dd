//! Entity Installer Interface
//!
//! The simulator materializes nodes and buildings; the generator only tells
//! it how many of each and where they go.

use crate::InterfaceError;
use common::types::{BuildingId, CellId, Imsi, NodeId, Vector3};
use deployment::{BuildingDescriptor, Scenario, Site};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Role of a created node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeRole {
    /// Sector of a macro site
    MacroEnb,
    /// Indoor femtocell
    HomeEnb,
    /// UE living in an apartment
    HomeUe,
    /// Outdoor UE
    MacroUe,
}

/// Entity creation and placement primitives of the simulator
pub trait EntityInstaller {
    /// Create `count` nodes
    fn create_nodes(&mut self, role: NodeRole, count: u32) -> Result<Vec<NodeId>, InterfaceError>;

    /// Install a building
    fn install_building(&mut self, building: &BuildingDescriptor) -> Result<BuildingId, InterfaceError>;

    /// Give a node a constant position
    fn set_position(&mut self, node: NodeId, position: Vector3) -> Result<(), InterfaceError>;
}

/// Installed base station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstalledEnb {
    pub node: NodeId,
    pub cell_id: CellId,
    pub position: Vector3,
}

/// Installed UE and the cell it attaches to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstalledUe {
    pub node: NodeId,
    pub imsi: Imsi,
    pub position: Vector3,
    /// Serving cell, if any cell exists
    pub serving_cell: Option<CellId>,
}

/// Everything installed for one scenario
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InstalledScenario {
    pub buildings: Vec<BuildingId>,
    pub macro_enbs: Vec<InstalledEnb>,
    pub home_enbs: Vec<InstalledEnb>,
    pub home_ues: Vec<InstalledUe>,
    pub macro_ues: Vec<InstalledUe>,
}

impl InstalledScenario {
    /// All base stations, macro sectors first
    pub fn enbs(&self) -> impl Iterator<Item = &InstalledEnb> {
        self.macro_enbs.iter().chain(self.home_enbs.iter())
    }

    /// All UEs, home UEs first
    pub fn ues(&self) -> impl Iterator<Item = &InstalledUe> {
        self.home_ues.iter().chain(self.macro_ues.iter())
    }
}

/// Materialize a scenario through an installer
///
/// Buildings go first, then macro sectors, home eNBs, home UEs and macro
/// UEs. Cell ids follow eNB installation order and IMSIs follow UE
/// installation order, both starting at 1. Home UEs attach to their home
/// eNB; macro UEs attach to the nearest macro sector.
pub fn install_layout<I: EntityInstaller>(
    scenario: &Scenario,
    installer: &mut I,
) -> Result<InstalledScenario, InterfaceError> {
    let layout = &scenario.layout;
    let terminals = &scenario.terminals;
    let counts = &layout.counts;

    if terminals.home_enbs.len() != counts.n_home_enbs as usize
        || terminals.home_ues.len() != counts.n_home_ues as usize
        || terminals.macro_ues.len() != counts.n_macro_ues as usize
    {
        return Err(InterfaceError::InstallationFailed(
            "terminal placements do not match the derived counts".to_string(),
        ));
    }

    let n_enbs = u64::from(counts.n_macro_enbs) + u64::from(counts.n_home_enbs);
    if n_enbs > u64::from(u16::MAX) {
        return Err(InterfaceError::InstallationFailed(format!(
            "{} eNBs exceed the {} available cell ids",
            n_enbs,
            u16::MAX
        )));
    }

    let mut installed = InstalledScenario::default();
    for building in layout.buildings() {
        installed.buildings.push(installer.install_building(building)?);
    }
    debug!("Installed {} buildings", installed.buildings.len());

    let macro_positions: Vec<Vector3> = Site::all_sectors(&layout.sites)
        .map(|(_, sector)| sector.position)
        .collect();
    let nodes = installer.create_nodes(NodeRole::MacroEnb, counts.n_macro_enbs)?;
    for (node, position) in nodes.into_iter().zip(macro_positions) {
        installer.set_position(node, position)?;
        let cell_id = cell_id_at(installed.macro_enbs.len())?;
        installed.macro_enbs.push(InstalledEnb { node, cell_id, position });
    }

    let nodes = installer.create_nodes(NodeRole::HomeEnb, counts.n_home_enbs)?;
    for (node, placement) in nodes.into_iter().zip(&terminals.home_enbs) {
        installer.set_position(node, placement.position)?;
        let cell_id = cell_id_at(installed.macro_enbs.len() + installed.home_enbs.len())?;
        installed.home_enbs.push(InstalledEnb {
            node,
            cell_id,
            position: placement.position,
        });
    }

    let mut next_imsi: u64 = 1;
    let nodes = installer.create_nodes(NodeRole::HomeUe, counts.n_home_ues)?;
    for (node, placement) in nodes.into_iter().zip(&terminals.home_ues) {
        installer.set_position(node, placement.position)?;
        let serving_cell = installed
            .home_enbs
            .get(placement.home_enb as usize)
            .map(|enb| enb.cell_id);
        installed.home_ues.push(InstalledUe {
            node,
            imsi: Imsi(next_imsi),
            position: placement.position,
            serving_cell,
        });
        next_imsi += 1;
    }

    let nodes = installer.create_nodes(NodeRole::MacroUe, counts.n_macro_ues)?;
    for (node, position) in nodes.into_iter().zip(&terminals.macro_ues) {
        installer.set_position(node, *position)?;
        let serving_cell = closest_cell(&installed.macro_enbs, position);
        installed.macro_ues.push(InstalledUe {
            node,
            imsi: Imsi(next_imsi),
            position: *position,
            serving_cell,
        });
        next_imsi += 1;
    }

    info!(
        "Installed {} macro eNBs, {} home eNBs, {} home UEs, {} macro UEs",
        installed.macro_enbs.len(),
        installed.home_enbs.len(),
        installed.home_ues.len(),
        installed.macro_ues.len()
    );
    Ok(installed)
}

/// Cell id of the eNB installed at zero-based `index`
fn cell_id_at(index: usize) -> Result<CellId, InterfaceError> {
    index
        .checked_add(1)
        .and_then(|id| u16::try_from(id).ok())
        .map(CellId)
        .ok_or_else(|| InterfaceError::InstallationFailed(format!("no cell id left for eNB {}", index)))
}

/// Cell of the eNB closest to `position`
pub fn closest_cell(enbs: &[InstalledEnb], position: &Vector3) -> Option<CellId> {
    enbs.iter()
        .map(|enb| (enb.cell_id, squared_distance(&enb.position, position)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(cell_id, _)| cell_id)
}

fn squared_distance(a: &Vector3, b: &Vector3) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    dx * dx + dy * dy + dz * dz
}

/// Node recorded by [`RecordingInstaller`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedNode {
    pub id: NodeId,
    pub role: NodeRole,
    pub position: Option<Vector3>,
}

/// In-memory installer keeping every created entity
///
/// Stands in for the simulator when only the layout is wanted.
#[derive(Debug, Default)]
pub struct RecordingInstaller {
    nodes: Vec<RecordedNode>,
    buildings: Vec<BuildingDescriptor>,
}

impl RecordingInstaller {
    /// Create an empty installer
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded nodes in creation order
    pub fn nodes(&self) -> &[RecordedNode] {
        &self.nodes
    }

    /// Recorded buildings in installation order
    pub fn buildings(&self) -> &[BuildingDescriptor] {
        &self.buildings
    }

    /// Number of recorded nodes with a given role
    pub fn count(&self, role: NodeRole) -> usize {
        self.nodes.iter().filter(|n| n.role == role).count()
    }
}

impl EntityInstaller for RecordingInstaller {
    fn create_nodes(&mut self, role: NodeRole, count: u32) -> Result<Vec<NodeId>, InterfaceError> {
        let first = self.nodes.len() as u32;
        let ids: Vec<NodeId> = (first..first + count).map(NodeId).collect();
        self.nodes.extend(ids.iter().map(|&id| RecordedNode { id, role, position: None }));
        Ok(ids)
    }

    fn install_building(&mut self, building: &BuildingDescriptor) -> Result<BuildingId, InterfaceError> {
        self.buildings.push(building.clone());
        Ok(BuildingId(self.buildings.len() as u32 - 1))
    }

    fn set_position(&mut self, node: NodeId, position: Vector3) -> Result<(), InterfaceError> {
        let recorded = self
            .nodes
            .get_mut(node.value() as usize)
            .ok_or(InterfaceError::UnknownNode(node))?;
        recorded.position = Some(position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deployment::{DeploymentConfig, DeploymentOrchestrator};

    fn scenario(config: DeploymentConfig) -> Scenario {
        DeploymentOrchestrator::new(config).unwrap().run(1, 1).unwrap()
    }

    #[test]
    fn test_install_default_scenario() {
        let scenario = scenario(DeploymentConfig::default());
        let mut installer = RecordingInstaller::new();
        let installed = install_layout(&scenario, &mut installer).unwrap();

        assert_eq!(installer.buildings().len(), 2);
        assert_eq!(installer.count(NodeRole::MacroEnb), 9);
        assert_eq!(installer.count(NodeRole::HomeEnb), 4);
        assert_eq!(installer.count(NodeRole::HomeUe), 4);
        assert!(installer.nodes().iter().all(|n| n.position.is_some()));

        // Cell ids: macro sectors 1..=9, then home eNBs
        assert_eq!(installed.macro_enbs[0].cell_id, CellId(1));
        assert_eq!(installed.home_enbs[0].cell_id, CellId(10));
        // IMSIs: home UEs first
        assert_eq!(installed.home_ues[0].imsi, Imsi(1));
        assert_eq!(installed.enbs().count(), 13);
    }

    #[test]
    fn test_home_ues_attach_to_their_home_enb() {
        let scenario = scenario(DeploymentConfig {
            home_ues_home_enb_ratio: 2.0,
            ..Default::default()
        });
        let installed = install_layout(&scenario, &mut RecordingInstaller::new()).unwrap();
        for (ue, placement) in installed.home_ues.iter().zip(&scenario.terminals.home_ues) {
            let enb = &installed.home_enbs[placement.home_enb as usize];
            assert_eq!(ue.serving_cell, Some(enb.cell_id));
        }
    }

    #[test]
    fn test_macro_ues_attach_to_closest_sector() {
        let scenario = scenario(DeploymentConfig {
            macro_ue_density: 0.0001,
            ..Default::default()
        });
        let installed = install_layout(&scenario, &mut RecordingInstaller::new()).unwrap();
        assert!(!installed.macro_ues.is_empty());
        for ue in &installed.macro_ues {
            let serving = ue.serving_cell.unwrap();
            let enb = installed.macro_enbs.iter().find(|e| e.cell_id == serving).unwrap();
            let best = squared_distance(&enb.position, &ue.position);
            for other in &installed.macro_enbs {
                assert!(best <= squared_distance(&other.position, &ue.position));
            }
        }
    }

    #[test]
    fn test_no_macro_cells() {
        let enbs: Vec<InstalledEnb> = Vec::new();
        assert_eq!(closest_cell(&enbs, &Vector3::default()), None);
    }

    #[test]
    fn test_unknown_node() {
        let mut installer = RecordingInstaller::new();
        let err = installer.set_position(NodeId(3), Vector3::default()).unwrap_err();
        assert!(matches!(err, InterfaceError::UnknownNode(NodeId(3))));
    }

    #[test]
    fn test_cell_id_space_exhausted() {
        // 21846 sites give 65538 macro sectors, past the last 16-bit cell id
        let scenario = scenario(DeploymentConfig {
            n_macro_enb_sites: 21846,
            n_macro_enb_sites_x: 150,
            macro_ue_density: 0.0,
            ..Default::default()
        });
        assert_eq!(scenario.layout.counts.n_macro_enbs, 65538);

        let mut installer = RecordingInstaller::new();
        let err = install_layout(&scenario, &mut installer).unwrap_err();
        assert!(matches!(err, InterfaceError::InstallationFailed(_)));
        assert!(installer.nodes().is_empty());
        assert!(installer.buildings().is_empty());
    }

    #[test]
    fn test_cell_ids() {
        assert_eq!(cell_id_at(0).unwrap(), CellId(1));
        assert_eq!(cell_id_at(65534).unwrap(), CellId(u16::MAX));
        assert!(cell_id_at(65535).is_err());
    }

    #[test]
    fn test_mismatched_terminals_rejected() {
        let mut scenario = scenario(DeploymentConfig::default());
        scenario.terminals.home_enbs.pop();
        let err = install_layout(&scenario, &mut RecordingInstaller::new()).unwrap_err();
        assert!(matches!(err, InterfaceError::InstallationFailed(_)));
    }
}
