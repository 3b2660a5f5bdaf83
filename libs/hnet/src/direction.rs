//! Port directions and logic constants.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Port directions.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Default, Serialize, Deserialize)]
pub enum PortDirection {
    /// Input.
    Input,
    /// Output.
    Output,
    /// Output that may be driven to high impedance.
    Tristate,
    /// Input and output.
    Bidirect,
    /// A port internal to a cell, such as a register state pin.
    Internal,
    /// A ground supply.
    Ground,
    /// A power supply.
    Power,
    /// Direction not known.
    #[default]
    Unknown,
}

impl PortDirection {
    /// Returns `true` if signals can flow into a port of this direction.
    ///
    /// # Examples
    ///
    /// ```
    /// use hnet::PortDirection;
    /// assert!(PortDirection::Input.is_any_input());
    /// assert!(PortDirection::Bidirect.is_any_input());
    /// assert!(!PortDirection::Tristate.is_any_input());
    /// ```
    #[inline]
    pub fn is_any_input(&self) -> bool {
        matches!(self, Self::Input | Self::Bidirect)
    }

    /// Returns `true` if a port of this direction can source a signal.
    ///
    /// # Examples
    ///
    /// ```
    /// use hnet::PortDirection;
    /// assert!(PortDirection::Output.is_any_output());
    /// assert!(PortDirection::Tristate.is_any_output());
    /// assert!(!PortDirection::Input.is_any_output());
    /// ```
    #[inline]
    pub fn is_any_output(&self) -> bool {
        matches!(self, Self::Output | Self::Tristate | Self::Bidirect)
    }

    /// Returns `true` for power and ground ports.
    #[inline]
    pub fn is_power_ground(&self) -> bool {
        matches!(self, Self::Ground | Self::Power)
    }
}

impl Display for PortDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
            Self::Tristate => write!(f, "tristate"),
            Self::Bidirect => write!(f, "bidirect"),
            Self::Internal => write!(f, "internal"),
            Self::Ground => write!(f, "ground"),
            Self::Power => write!(f, "power"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A logic constant a net can be tied to.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum LogicValue {
    /// Logic zero.
    Zero,
    /// Logic one.
    One,
}

impl Display for LogicValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Zero => write!(f, "0"),
            Self::One => write!(f, "1"),
        }
    }
}
