//! Hierarchical netlist connectivity.
//!
//! `hnet` models a design as a tree of instances of library cells. Each
//! instance owns the nets declared inside it and the pins that connect its
//! cell's ports to nets in its parent. A hierarchical pin continues into the
//! instance through a terminal (term), so a signal can cross any number of
//! hierarchy boundaries.
//!
//! The [`Network`] trait is the adapter between this model and whatever stores
//! the design. Implementors supply cheap primitive queries and get everything
//! else (path lookup, pattern matching, hierarchical connectivity, and driver
//! discovery) for free. [`MemNetwork`] is a complete in-memory implementation.
//!
//! Connectivity is resolved by walking the graph of nets joined through terms.
//! That graph may contain cycles; every traversal keeps a visited set and
//! terminates. Driver sets are memoized in a [`DriverCache`] that every
//! structural edit clears.
#![warn(missing_docs)]

pub mod check;
pub mod config;
mod connectivity;
mod direction;
pub mod drivers;
pub mod edit;
pub mod error;
mod find;
pub mod hier;
pub mod hpin;
pub mod id;
pub mod mem;
pub mod network;
pub mod path;
pub mod port;
pub mod visit;

pub use check::{check_drivers, Cause, DriverIssue, Severity};
pub use config::NetworkConfig;
pub use direction::{LogicValue, PortDirection};
pub use drivers::DriverCache;
pub use edit::{NetworkEdit, NetworkReader};
pub use error::{Error, Result};
pub use hpin::{HierDrvrLoad, HierTraversal, Side};
pub use id::{CellId, Id, InstanceId, LibraryId, NetId, PinId, PortId, TermId, VertexId};
pub use mem::MemNetwork;
pub use network::Network;
pub use path::PathSyntax;
pub use port::PortKind;
pub use visit::{par_visit, FnVisitor, PinCollector, Visitor};

#[cfg(test)]
pub(crate) mod tests;
