//! Simulator Installation Interfaces Library
//! 
//! This crate hands a generated deployment to the simulator's entity
//! installers and exports it in formats other tools can plot.

pub mod installer;
pub mod gnuplot;

use common::types::NodeId;
use thiserror::Error;

/// Interface errors
#[derive(Error, Debug)]
pub enum InterfaceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    
    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeId),
    
    #[error("Installation failed: {0}")]
    InstallationFailed(String),
}
