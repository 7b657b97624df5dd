//! Gnuplot Export
//!
//! Writes buildings, eNBs and UEs as gnuplot `set object` / `set label`
//! commands so a REM can be overlaid with the deployment.

use crate::installer::InstalledScenario;
use crate::InterfaceError;
use deployment::BuildingDescriptor;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default file names, relative to the output directory
pub const BUILDINGS_FILE: &str = "buildings.txt";
pub const ENBS_FILE: &str = "enbs.txt";
pub const UES_FILE: &str = "ues.txt";

/// One `set object` rectangle per building, numbered from 1
pub fn write_buildings<'a, W, I>(writer: &mut W, buildings: I) -> Result<(), InterfaceError>
where
    W: Write,
    I: IntoIterator<Item = &'a BuildingDescriptor>,
{
    for (index, building) in buildings.into_iter().enumerate() {
        let b = &building.bounds;
        writeln!(
            writer,
            "set object {} rect from {},{} to {},{} front fs empty ",
            index + 1,
            b.x_min,
            b.y_min,
            b.x_max,
            b.y_max
        )?;
    }
    Ok(())
}

/// One white label per eNB, carrying its cell id
pub fn write_enbs<W: Write>(writer: &mut W, installed: &InstalledScenario) -> Result<(), InterfaceError> {
    for enb in installed.enbs() {
        writeln!(
            writer,
            "set label \"{}\" at {},{} left font \"Helvetica,4\" textcolor rgb \"white\" front  point pt 2 ps 0.3 lc rgb \"white\" offset 0,0",
            enb.cell_id.0, enb.position.x, enb.position.y
        )?;
    }
    Ok(())
}

/// One grey label per UE, carrying its IMSI
pub fn write_ues<W: Write>(writer: &mut W, installed: &InstalledScenario) -> Result<(), InterfaceError> {
    for ue in installed.ues() {
        writeln!(
            writer,
            "set label \"{}\" at {},{} left font \"Helvetica,4\" textcolor rgb \"grey\" front point pt 1 ps 0.3 lc rgb \"grey\" offset 0,0",
            ue.imsi.0, ue.position.x, ue.position.y
        )?;
    }
    Ok(())
}

/// Write the three gnuplot files into `dir`, returning their paths
pub fn export_all<'a, I>(
    dir: &Path,
    buildings: I,
    installed: &InstalledScenario,
) -> Result<Vec<PathBuf>, InterfaceError>
where
    I: IntoIterator<Item = &'a BuildingDescriptor>,
{
    std::fs::create_dir_all(dir)?;

    let buildings_path = dir.join(BUILDINGS_FILE);
    let mut writer = BufWriter::new(File::create(&buildings_path)?);
    write_buildings(&mut writer, buildings)?;
    writer.flush()?;
    debug!("Wrote {}", buildings_path.display());

    let enbs_path = dir.join(ENBS_FILE);
    let mut writer = BufWriter::new(File::create(&enbs_path)?);
    write_enbs(&mut writer, installed)?;
    writer.flush()?;
    debug!("Wrote {}", enbs_path.display());

    let ues_path = dir.join(UES_FILE);
    let mut writer = BufWriter::new(File::create(&ues_path)?);
    write_ues(&mut writer, installed)?;
    writer.flush()?;
    debug!("Wrote {}", ues_path.display());

    info!("Gnuplot files written to {}", dir.display());
    Ok(vec![buildings_path, enbs_path, ues_path])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installer::{InstalledEnb, InstalledUe};
    use common::types::{CellId, Imsi, NodeId, Vector3};
    use deployment::{DeploymentConfig, DeploymentOrchestrator};

    #[test]
    fn test_building_lines() {
        let scenario = DeploymentOrchestrator::new(DeploymentConfig::default())
            .unwrap()
            .run(1, 1)
            .unwrap();
        let mut out = Vec::new();
        write_buildings(&mut out, scenario.layout.buildings()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("set object 1 rect from "));
        assert!(lines[1].starts_with("set object 2 rect from "));
        assert!(lines[0].ends_with(" front fs empty "));
    }

    #[test]
    fn test_label_lines() {
        let installed = InstalledScenario {
            macro_enbs: vec![InstalledEnb {
                node: NodeId(0),
                cell_id: CellId(1),
                position: Vector3::new(250.0, 0.0, 30.0),
            }],
            home_ues: vec![InstalledUe {
                node: NodeId(1),
                imsi: Imsi(1),
                position: Vector3::new(12.5, 40.0, 1.5),
                serving_cell: None,
            }],
            ..Default::default()
        };

        let mut out = Vec::new();
        write_enbs(&mut out, &installed).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "set label \"1\" at 250,0 left font \"Helvetica,4\" textcolor rgb \"white\" front  point pt 2 ps 0.3 lc rgb \"white\" offset 0,0\n"
        );

        let mut out = Vec::new();
        write_ues(&mut out, &installed).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "set label \"1\" at 12.5,40 left font \"Helvetica,4\" textcolor rgb \"grey\" front point pt 1 ps 0.3 lc rgb \"grey\" offset 0,0\n"
        );
    }

    #[test]
    fn test_export_all() {
        let dir = tempfile::tempdir().unwrap();
        let installed = InstalledScenario::default();
        let paths = export_all(dir.path(), std::iter::empty::<&BuildingDescriptor>(), &installed).unwrap();

        assert_eq!(paths.len(), 3);
        for path in paths {
            assert!(path.exists());
            assert_eq!(std::fs::read_to_string(path).unwrap(), "");
        }
    }
}
