//! Structural edits.
//!
//! Every edit takes `&mut self`, validates all of its arguments before
//! touching the store, and clears the [driver cache](crate::DriverCache) when it
//! succeeds. A failed edit leaves the store exactly as it was.

use crate::error::Result;
use crate::network::Network;
use crate::{
    CellId, InstanceId, LibraryId, LogicValue, NetId, PinId, PortDirection, PortId, TermId,
};

/// A network whose instance-level structure can be changed.
pub trait NetworkEdit: Network {
    /// Makes an instance of `cell` named `name` under `parent`.
    ///
    /// With no parent, makes the top instance; fails if one already exists.
    fn make_instance(
        &mut self,
        cell: CellId,
        name: &str,
        parent: Option<InstanceId>,
    ) -> Result<InstanceId>;

    /// Makes the pin of `instance` for the bit port `port`, optionally on `net`.
    ///
    /// `net` must be declared in the instance's parent.
    fn make_pin(&mut self, instance: InstanceId, port: PortId, net: Option<NetId>)
        -> Result<PinId>;

    /// Continues a hierarchical pin into `net`, which must be declared inside
    /// the pin's instance.
    fn make_term(&mut self, pin: PinId, net: NetId) -> Result<TermId>;

    /// Declares a net named `name` inside `parent`.
    fn make_net(&mut self, name: &str, parent: InstanceId) -> Result<NetId>;

    /// Connects the pin of `instance` for `port` to `net`, making the pin if needed.
    fn connect(&mut self, instance: InstanceId, port: PortId, net: NetId) -> Result<PinId>;

    /// Disconnects a pin from its net. Unconnected pins are left alone.
    fn disconnect(&mut self, pin: PinId) -> Result<()>;

    /// Deletes an instance and everything below it.
    fn delete_instance(&mut self, instance: InstanceId) -> Result<()>;

    /// Deletes a net. Its pins are disconnected, not deleted.
    ///
    /// Fails while any term still connects the net to a hierarchical pin.
    fn delete_net(&mut self, net: NetId) -> Result<()>;

    /// Deletes a pin, severing its term.
    fn delete_pin(&mut self, pin: PinId) -> Result<()>;

    /// Moves every pin and term of `net` onto `into` and deletes `net`.
    fn merge_into(&mut self, net: NetId, into: NetId) -> Result<()>;

    /// The net that `net` was merged into, following chains of merges.
    fn merged_into(&self, net: NetId) -> Option<NetId>;

    /// Swaps the cell of a leaf instance, re-binding its pins by port name.
    fn replace_cell(&mut self, instance: InstanceId, cell: CellId) -> Result<()>;
}

/// The operations a netlist reader needs to populate a network.
pub trait NetworkReader: NetworkEdit {
    /// Makes a library.
    fn make_library(&mut self, name: &str) -> Result<LibraryId>;

    /// Makes a cell in `library`.
    fn make_cell(&mut self, library: LibraryId, name: &str, is_leaf: bool) -> Result<CellId>;

    /// Makes a scalar port on `cell`.
    fn make_port(&mut self, cell: CellId, name: &str) -> Result<PortId>;

    /// Makes a bus port `name[from:to]` on `cell` along with one bit port per index.
    fn make_bus_port(&mut self, cell: CellId, name: &str, from: i32, to: i32) -> Result<PortId>;

    /// Groups existing scalar ports of `cell` into a bundle port.
    fn make_bundle_port(&mut self, cell: CellId, name: &str, members: &[PortId])
        -> Result<PortId>;

    /// Sets the direction of a port. Setting a bus's direction sets its bits too.
    fn set_direction(&mut self, port: PortId, direction: PortDirection) -> Result<()>;

    /// Ties a net to a logic constant.
    fn add_constant_net(&mut self, net: NetId, value: LogicValue) -> Result<()>;

    /// Chooses the default library. Only the first call has any effect.
    ///
    /// Returns `true` if `library` became the default.
    fn set_default_library(&mut self, library: LibraryId) -> Result<bool>;
}
