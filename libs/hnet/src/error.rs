//! Errors returned by structural edits.

use arcstr::ArcStr;
use thiserror::Error;

use crate::{InstanceId, NetId, PinId, PortId};

/// A rejected structural edit.
///
/// Whenever an edit returns one of these, the network is exactly as it was
/// before the call.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum Error {
    /// A handle does not refer to a live entity.
    #[error("{kind} `{handle}` does not exist")]
    Missing {
        /// The kind of entity (e.g. `net`).
        kind: &'static str,
        /// The displayed handle.
        handle: String,
    },
    /// An entity with the same name already exists in the same scope.
    #[error("duplicate {kind} name `{name}` in {scope}")]
    DuplicateName {
        /// The kind of entity being created.
        kind: &'static str,
        /// The conflicting name.
        name: ArcStr,
        /// A description of the enclosing scope.
        scope: String,
    },
    /// A second top instance was requested.
    #[error("the design already has a top instance `{0}`")]
    TopExists(InstanceId),
    /// Pins can only be made for scalar and bus bit ports.
    #[error("port `{0}` is a bus or bundle; pins must use scalar or bus bit ports")]
    NotBitPort(PortId),
    /// The port does not belong to the instance's cell.
    #[error("port `{port}` does not belong to the cell of instance `{instance}`")]
    ForeignPort {
        /// The port.
        port: PortId,
        /// The instance.
        instance: InstanceId,
    },
    /// The instance already has a pin for this port.
    #[error("instance `{instance}` already has pin `{pin}` for this port")]
    PinExists {
        /// The instance.
        instance: InstanceId,
        /// The existing pin.
        pin: PinId,
    },
    /// The pin already has a terminal.
    #[error("pin `{0}` already has a terminal")]
    TermExists(PinId),
    /// A pin or terminal would join entities at incompatible hierarchy levels.
    #[error("net `{net}` is not at the hierarchy level required to connect to pin `{pin}`")]
    LevelMismatch {
        /// The net.
        net: NetId,
        /// The pin (or the pin that would be made).
        pin: String,
    },
    /// A net is still referenced by terminals.
    #[error("net `{net}` is still referenced by {terms} terminal(s)")]
    NetHasTerms {
        /// The net.
        net: NetId,
        /// The number of live terminals.
        terms: usize,
    },
    /// Only nets declared in the same instance can be merged.
    #[error("cannot merge net `{net}` into `{into}`: they are declared in different instances")]
    MergeLevels {
        /// The net being merged away.
        net: NetId,
        /// The surviving net.
        into: NetId,
    },
    /// A net cannot be merged into itself.
    #[error("cannot merge net `{0}` into itself")]
    MergeSelf(NetId),
    /// A replacement cell does not provide the ports the instance uses.
    #[error("cell `{cell}` has no port named `{port}`")]
    CellMismatch {
        /// The replacement cell name.
        cell: ArcStr,
        /// The missing port name.
        port: ArcStr,
    },
    /// A bundle member does not belong to the bundle's cell or is not scalar.
    #[error("port `{0}` cannot be a bundle member")]
    NotMember(PortId),
    /// The operation does not apply to this kind of entity.
    #[error("{0}")]
    Unsupported(&'static str),
}

impl Error {
    pub(crate) fn missing<T: crate::id::Kind>(handle: crate::id::Id<T>) -> Self {
        Self::Missing {
            kind: kind_name(T::PREFIX),
            handle: handle.to_string(),
        }
    }
}

fn kind_name(prefix: &'static str) -> &'static str {
    match prefix {
        "lib" => "library",
        "inst" => "instance",
        other => other,
    }
}

/// A result type returning [`Error`] on failure.
pub type Result<T> = std::result::Result<T, Error>;
