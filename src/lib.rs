//! Functionally reduced AND-inverter graphs (FRAIGs) for combinational equivalence checking.
//!
//! Signals are built as [`FraigHandle`]s in a shared [`Fraig`]: structurally identical gates
//! are hash-consed as they are built, random simulation splits the nodes into candidate
//! classes, and an incremental SAT solver proves (or disproves with a counterexample)
//! the candidate equivalences.

pub mod aig;
pub mod cnf;
pub mod config;
pub mod dfs;
pub mod equiv;
pub mod expr;
pub mod miter;
pub mod network;
mod ops;
pub mod pathash;
pub mod sat;
pub mod sim;
pub mod stats;
pub mod strash;
pub mod sweep;

// Re-exporting symbols and modules.
pub use aig::{
    FaninId, Fraig, FraigError, FraigHandle, FraigNode, NodeId, NodeKind, NodeStatus, Result,
};
pub use config::FraigConfig;
pub use equiv::EquivResult;
pub use expr::Expr;
pub use miter::{Miter, MiterReport};
pub use network::{GateKind, NetworkBuilder};
pub use sat::{SatResult, SatSolver, VarisatSolver};
pub use stats::{FraigStats, SatStat};
pub use sweep::SweepReport;
