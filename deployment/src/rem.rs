//! Radio Environment Map Window
//!
//! The REM itself is rendered by the simulator; this module only derives the
//! sampling window from the macro coverage area.

use crate::orchestrator::DeploymentLayout;
use common::types::{BoundingBox, Vector3};
use serde::{Deserialize, Serialize};

/// User-facing REM options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemConfig {
    /// Number of sampling steps along x
    pub x_resolution: u32,
    /// Number of sampling steps along y
    pub y_resolution: u32,
    /// Data channel resource block to render; `None` averages the control channel
    pub rb_id: Option<u32>,
    /// Output file for the rendered map
    pub output_file: String,
}

impl Default for RemConfig {
    fn default() -> Self {
        Self {
            x_resolution: 100,
            y_resolution: 100,
            rb_id: None,
            output_file: "dual-stripe.rem".to_string(),
        }
    }
}

/// REM window handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemSettings {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    /// Height of the sampling plane
    pub z: f64,
    pub x_resolution: u32,
    pub y_resolution: u32,
    /// Render the data channel of this resource block instead of the control channel
    pub rb_id: Option<u32>,
    pub output_file: String,
}

impl RemSettings {
    /// Window covering the macro coverage area at the UE height
    pub fn from_area(area: &BoundingBox, config: &RemConfig) -> Self {
        Self {
            x_min: area.x_min,
            x_max: area.x_max,
            y_min: area.y_min,
            y_max: area.y_max,
            z: area.z_min,
            x_resolution: config.x_resolution.max(1),
            y_resolution: config.y_resolution.max(1),
            rb_id: config.rb_id,
            output_file: config.output_file.clone(),
        }
    }

    /// Window for a generated layout
    pub fn from_layout(layout: &DeploymentLayout, config: &RemConfig) -> Self {
        Self::from_area(&layout.macro_coverage, config)
    }

    /// Whether the data channel is rendered
    pub fn uses_data_channel(&self) -> bool {
        self.rb_id.is_some()
    }

    /// Sampling points, row by row from `y_min`, both bounds included
    pub fn sample_points(&self) -> impl Iterator<Item = Vector3> + '_ {
        let x_step = (self.x_max - self.x_min) / f64::from(self.x_resolution);
        let y_step = (self.y_max - self.y_min) / f64::from(self.y_resolution);
        (0..=self.y_resolution).flat_map(move |j| {
            (0..=self.x_resolution).map(move |i| {
                Vector3::new(
                    self.x_min + x_step * f64::from(i),
                    self.y_min + y_step * f64::from(j),
                    self.z,
                )
            })
        })
    }

    /// Number of sampling points
    pub fn sample_count(&self) -> u64 {
        (u64::from(self.x_resolution) + 1) * (u64::from(self.y_resolution) + 1)
    }
}
