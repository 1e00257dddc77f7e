//! Force-directed layout of the funding network.

pub mod config;
mod forces;
pub mod simulation;
pub mod snapshot;

pub use config::LayoutConfig;
pub use simulation::{LayoutPhase, Simulation, SimulationEdge, SimulationNode};
pub use snapshot::{Layout, Snapshot, SubscriptionId, create_layout};
