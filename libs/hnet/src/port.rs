//! Port kinds and bus bit naming.

use serde::{Deserialize, Serialize};

use crate::PortId;

/// The shape of a port.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum PortKind {
    /// A single-bit port.
    Scalar,
    /// A bus `name[from:to]`. Its members are bus bit ports.
    Bus {
        /// The first index.
        from: i32,
        /// The last index.
        to: i32,
    },
    /// One bit of a bus. Always a member of exactly one bus.
    BusBit {
        /// The bus this bit belongs to.
        bus: PortId,
        /// The index of this bit within the bus.
        index: i32,
    },
    /// A named group of scalar ports.
    Bundle,
}

impl PortKind {
    /// Returns `true` if pins can be made for ports of this kind.
    #[inline]
    pub fn is_bit(&self) -> bool {
        matches!(self, Self::Scalar | Self::BusBit { .. })
    }

    /// Returns `true` if ports of this kind have members.
    #[inline]
    pub fn has_members(&self) -> bool {
        matches!(self, Self::Bus { .. } | Self::Bundle)
    }
}

/// Returns `true` if `index` lies between `from` and `to`, in either order.
///
/// # Examples
///
/// ```
/// use hnet::port::index_in_range;
/// assert!(index_in_range(3, 0, 3));
/// assert!(index_in_range(1, 3, 0));
/// assert!(!index_in_range(4, 3, 0));
/// ```
pub fn index_in_range(index: i32, from: i32, to: i32) -> bool {
    if from <= to {
        from <= index && index <= to
    } else {
        to <= index && index <= from
    }
}

/// The name of bit `index` of the bus named `bus`.
pub fn bus_bit_name(bus: &str, index: i32) -> String {
    format!("{bus}[{index}]")
}

/// Splits a bus bit name such as `D[3]` into its bus name and index.
///
/// # Examples
///
/// ```
/// use hnet::port::parse_bus_bit;
/// assert_eq!(parse_bus_bit("D[3]"), Some(("D", 3)));
/// assert_eq!(parse_bus_bit("D"), None);
/// assert_eq!(parse_bus_bit("D[x]"), None);
/// ```
pub fn parse_bus_bit(name: &str) -> Option<(&str, i32)> {
    let inner = name.strip_suffix(']')?;
    let open = inner.rfind('[')?;
    let index = inner[open + 1..].parse().ok()?;
    Some((&inner[..open], index))
}
