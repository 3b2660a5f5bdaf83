//! Opaque, typed entity handles.
//!
//! Handles are plain integers tagged with the kind of entity they refer to,
//! so a [`PinId`] can never be passed where a [`NetId`] is expected.
//! Equality is identity: two handles are equal only if they were issued for
//! the same entity.

use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A kind of network entity.
pub trait Kind {
    /// Prefix used when displaying handles of this kind.
    const PREFIX: &'static str;
}

macro_rules! kinds {
    ($($(#[$meta:meta])* $kind:ident => $alias:ident, $prefix:literal;)*) => {
        $(
            $(#[$meta])*
            #[derive(Debug)]
            pub enum $kind {}

            impl Kind for $kind {
                const PREFIX: &'static str = $prefix;
            }

            $(#[$meta])*
            pub type $alias = Id<$kind>;
        )*
    };
}

kinds! {
    /// A library of cells.
    Libraries => LibraryId, "lib";
    /// A cell (design master).
    Cells => CellId, "cell";
    /// A port of a cell.
    Ports => PortId, "port";
    /// An instance in the design hierarchy.
    Instances => InstanceId, "inst";
    /// A pin connecting a port of an instance.
    Pins => PinId, "pin";
    /// A terminal joining a net to a pin of its parent instance.
    Terms => TermId, "term";
    /// A net at one level of hierarchy.
    Nets => NetId, "net";
}

/// A typed handle.
pub struct Id<T>(u64, PhantomData<fn() -> T>);

impl<T> Id<T> {
    /// Constructs a handle from a raw integer.
    ///
    /// Backing stores that keep their own integer identifiers use this to hand
    /// out handles; the raw value must be stable for the entity's lifetime.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw, PhantomData)
    }

    /// The raw integer behind this handle.
    #[inline]
    pub const fn raw(&self) -> u64 {
        self.0
    }

    pub(crate) fn new() -> Self {
        Self::from_raw(0)
    }

    pub(crate) fn alloc(&mut self) -> Self {
        *self = Self::from_raw(self.0 + 1);
        *self
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T> Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T: Kind> Display for Id<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", T::PREFIX, self.0)
    }
}

impl<T: Kind> Debug for Id<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u64::deserialize(deserializer).map(Self::from_raw)
    }
}

/// The identifier of the timing graph vertex built for a pin.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct VertexId(pub u32);

impl Display for VertexId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "vertex{}", self.0)
    }
}
