//! Dual-Stripe Deployment Generator
//!
//! Builds a macro hex grid with dual-stripe femtocell blocks, places every
//! terminal and writes the layout for the simulator and for plotting.

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, EnvFilter};

use config::ScenarioConfig;
use deployment::{DeploymentOrchestrator, RemSettings};
use interfaces::gnuplot;
use interfaces::installer::{install_layout, RecordingInstaller};

/// Dual-stripe heterogeneous network deployment generator
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML, or YAML with a .yml/.yaml extension)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Number of femtocell blocks
    #[arg(long)]
    n_blocks: Option<u32>,

    /// Number of apartments along the X axis in a femtocell block
    #[arg(long)]
    n_apartments_x: Option<u32>,

    /// Number of floors
    #[arg(long)]
    n_floors: Option<u32>,

    /// Number of three-sector macro sites
    #[arg(long)]
    n_macro_enb_sites: Option<u32>,

    /// (Minimum) number of sites along the X axis
    #[arg(long)]
    n_macro_enb_sites_x: Option<u32>,

    /// Inter-site distance in meters
    #[arg(long)]
    inter_site_distance: Option<f64>,

    /// Area margin as a fraction of the inter-site distance
    #[arg(long)]
    area_margin_factor: Option<f64>,

    /// Macro UEs per square meter
    #[arg(long)]
    macro_ue_density: Option<f64>,

    /// Fraction of apartments with a home eNB
    #[arg(long)]
    home_enb_deployment_ratio: Option<f64>,

    /// Fraction of deployed home eNBs that are active
    #[arg(long)]
    home_enb_activation_ratio: Option<f64>,

    /// Home UEs per home eNB
    #[arg(long)]
    home_ues_home_enb_ratio: Option<f64>,

    /// Sector antenna offset from the site center in meters
    #[arg(long)]
    sector_offset: Option<f64>,

    /// Global seed
    #[arg(long)]
    seed: Option<u64>,

    /// Run number
    #[arg(long)]
    run: Option<u32>,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Skip the gnuplot files
    #[arg(long)]
    no_gnuplot: bool,

    /// Write the REM window (rem.json)
    #[arg(long)]
    generate_rem: bool,

    /// REM resolution along x
    #[arg(long)]
    rem_x_resolution: Option<u32>,

    /// REM resolution along y
    #[arg(long)]
    rem_y_resolution: Option<u32>,

    /// Data channel resource block for the REM
    #[arg(long)]
    rem_rb_id: Option<u32>,
}

/// REM window file name
const REM_FILE: &str = "rem.json";

/// Command-line flags take precedence over the file
fn apply_overrides(config: &mut ScenarioConfig, args: &Args) {
    let d = &mut config.deployment;
    if let Some(v) = args.n_blocks {
        d.n_blocks = v;
    }
    if let Some(v) = args.n_apartments_x {
        d.n_apartments_x = v;
    }
    if let Some(v) = args.n_floors {
        d.n_floors = v;
    }
    if let Some(v) = args.n_macro_enb_sites {
        d.n_macro_enb_sites = v;
    }
    if let Some(v) = args.n_macro_enb_sites_x {
        d.n_macro_enb_sites_x = v;
    }
    if let Some(v) = args.inter_site_distance {
        d.inter_site_distance = v;
    }
    if let Some(v) = args.area_margin_factor {
        d.area_margin_factor = v;
    }
    if let Some(v) = args.macro_ue_density {
        d.macro_ue_density = v;
    }
    if let Some(v) = args.home_enb_deployment_ratio {
        d.home_enb_deployment_ratio = v;
    }
    if let Some(v) = args.home_enb_activation_ratio {
        d.home_enb_activation_ratio = v;
    }
    if let Some(v) = args.home_ues_home_enb_ratio {
        d.home_ues_home_enb_ratio = v;
    }
    if let Some(v) = args.sector_offset {
        d.sector_offset = v;
    }

    if let Some(seed) = args.seed {
        config.random.seed = seed;
    }
    if let Some(run) = args.run {
        config.random.run = run;
    }

    if let Some(dir) = &args.output_dir {
        config.output.dir = dir.clone();
    }
    if args.no_gnuplot {
        config.output.gnuplot = false;
    }
    if args.generate_rem {
        config.output.generate_rem = true;
    }
    if let Some(v) = args.rem_x_resolution {
        config.rem.x_resolution = v;
    }
    if let Some(v) = args.rem_y_resolution {
        config.rem.y_resolution = v;
    }
    if args.rem_rb_id.is_some() {
        config.rem.rb_id = args.rem_rb_id;
    }

    if let Some(level) = &args.log_level {
        config.log.level = level.clone();
    }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(
        File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
    );
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    info!("Wrote {}", path.display());
    Ok(())
}

/// Channel rendered by the REM
fn rem_channel(rem: &RemSettings) -> String {
    match rem.rb_id {
        Some(rb) if rem.uses_data_channel() => format!("data, resource block {}", rb),
        _ => "control, averaged over all resource blocks".to_string(),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ScenarioConfig::from_file(path)
            .with_context(|| format!("cannot load configuration {}", path.display()))?,
        None => ScenarioConfig::default(),
    };
    apply_overrides(&mut config, &args);

    // Initialize logging
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .init();

    info!("Starting dual-stripe deployment generator");
    if let Some(path) = &args.config {
        info!("Configuration file: {}", path.display());
    }
    info!("Deployment configuration:");
    info!("  Blocks: {}", config.deployment.n_blocks);
    info!("  Apartments along X: {}", config.deployment.n_apartments_x);
    info!("  Floors: {}", config.deployment.n_floors);
    info!(
        "  Macro sites: {} ({} along X)",
        config.deployment.n_macro_enb_sites, config.deployment.n_macro_enb_sites_x
    );
    info!("  Inter-site distance: {} m", config.deployment.inter_site_distance);
    info!("  Seed: {}, run: {}", config.random.seed, config.random.run);

    let orchestrator = DeploymentOrchestrator::new(config.deployment.clone())
        .context("invalid deployment configuration")?;

    let scenario = match orchestrator.run(config.random.seed, config.random.run) {
        Ok(scenario) => scenario,
        Err(e) => {
            error!("Deployment generation failed: {}", e);
            return Err(e).context("deployment generation failed");
        }
    };

    let mut installer = RecordingInstaller::new();
    let installed = install_layout(&scenario, &mut installer).context("layout installation failed")?;

    let dir = &config.output.dir;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create output directory {}", dir.display()))?;

    if let Some(name) = &config.output.layout_file {
        write_json(&dir.join(name), &scenario)?;
    }

    if config.output.gnuplot {
        gnuplot::export_all(dir, scenario.layout.buildings(), &installed)
            .context("gnuplot export failed")?;
    }

    if config.output.generate_rem {
        let rem = RemSettings::from_layout(&scenario.layout, &config.rem);
        info!(
            "REM window: x [{}, {}], y [{}, {}], {} points",
            rem.x_min,
            rem.x_max,
            rem.y_min,
            rem.y_max,
            rem.sample_count()
        );
        info!("REM channel: {}", rem_channel(&rem));
        let mut points = rem.sample_points();
        if let (Some(first), Some(last)) = (points.next(), points.last()) {
            debug!("REM samples from {} to {}", first, last);
        }
        write_json(&dir.join(REM_FILE), &rem)?;
    }

    let counts = scenario.layout.counts;
    info!("Deployment summary:");
    info!("  Macro eNBs: {}", counts.n_macro_enbs);
    info!("  Femtocell blocks: {}", scenario.layout.blocks.len());
    info!("  Home eNBs: {}", counts.n_home_enbs);
    info!("  Home UEs: {}", counts.n_home_ues);
    info!("  Macro UEs: {}", counts.n_macro_ues);
    info!("  Installed nodes: {}", installer.nodes().len());

    Ok(())
}
