//! Tinyhouse tablebase
//!
//! Exhaustive retrograde solving of every position reachable from a start
//! position, a compact binary file format for the results, and key-based
//! probing of a loaded table.

pub mod codec;
pub mod error;
pub mod graph;
pub mod probe;
pub mod retro;

pub use codec::{read, read_from, sort_records, write, write_to};
pub use error::{Result, TablebaseError};
pub use graph::{Graph, Node, NodeId, Status};
pub use probe::Tablebase;
pub use retro::{label, solve, Solution, SolveStats, TbRecord, Wdl};
