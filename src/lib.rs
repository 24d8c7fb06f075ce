pub mod aig;
pub mod config;
pub mod fec;
pub mod fraig;
pub mod optimize;
pub mod sat;
pub mod sim;
pub mod strash;

#[cfg(test)]
mod testing;

// Re-exporting symbols and modules.
pub use aig::walk;
pub use aig::{Aig, AigEdge, AigError, AigNode, AigStats, NodeId, NodeKind, Result};
pub use config::FraigConfig;
pub use fec::FecGroups;
pub use fraig::FraigReport;
pub use sat::{SatLit, SatOracle, SatVar, VarisatOracle};
