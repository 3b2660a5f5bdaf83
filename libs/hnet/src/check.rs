//! Driver checks over a whole design.
//!
//! Looks for nets with several drivers, nets that are read but never driven,
//! and nets that connect nothing.

use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use tracing::{span, Level};

use crate::hier;
use crate::network::Network;
use crate::NetId;

/// How serious an issue is.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Severity {
    /// Worth knowing about; often intended.
    Info,
    /// Probably a mistake.
    Warning,
}

/// The kind of driver issue found on a net.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Cause {
    /// More than one leaf pin drives the net.
    ///
    /// Tristate buses do this on purpose.
    MultipleDrivers,
    /// The net is read but nothing drives it.
    NoDrivers,
    /// The net connects no leaf pins and no top-level ports.
    Floating,
    /// The net is driven but nothing reads it.
    Unloaded,
}

impl Cause {
    /// The severity issues with this cause are reported at.
    pub fn severity(&self) -> Severity {
        match self {
            Self::MultipleDrivers | Self::Unloaded => Severity::Info,
            Self::NoDrivers | Self::Floating => Severity::Warning,
        }
    }
}

impl Display for Cause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MultipleDrivers => write!(f, "multiple drivers on the same net"),
            Self::NoDrivers => write!(f, "net is read from, but has no drivers"),
            Self::Floating => write!(f, "floating net"),
            Self::Unloaded => write!(f, "net is driven but never read"),
        }
    }
}

/// An issue found on one hierarchically connected net.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct DriverIssue {
    cause: Cause,
    severity: Severity,
    net: NetId,
    name: String,
}

impl DriverIssue {
    fn new_and_log(cause: Cause, net: NetId, name: String) -> Self {
        let issue = Self {
            cause,
            severity: cause.severity(),
            net,
            name,
        };
        match issue.severity {
            Severity::Info => tracing::event!(Level::INFO, issue = ?issue.cause, "{}", issue),
            Severity::Warning => tracing::event!(Level::WARN, issue = ?issue.cause, "{}", issue),
        }
        issue
    }

    /// The underlying cause of this issue.
    #[inline]
    pub fn cause(&self) -> Cause {
        self.cause
    }

    /// The severity of this issue.
    #[inline]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The highest net of the connected group the issue was found on.
    #[inline]
    pub fn net(&self) -> NetId {
        self.net
    }
}

impl Display for DriverIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.cause, self.name)
    }
}

/// Checks the drivers and loads of every net in the design.
///
/// Each hierarchically connected group of nets is checked once and reported
/// under its [highest connected net](Network::highest_connected_net).
pub fn check_drivers<N: Network + ?Sized>(network: &N) -> Vec<DriverIssue> {
    let _guard = span!(Level::INFO, "checking net drivers").entered();
    let Some(top) = network.top_instance() else {
        return Vec::new();
    };

    let mut issues = Vec::new();
    let mut seen = HashSet::new();
    for inst in std::iter::once(top).chain(hier::descendants(network, top)) {
        for net in network.instance_nets(inst) {
            if seen.contains(&net) {
                continue;
            }
            let group = network.connected_nets(net);
            seen.extend(group.iter().copied());
            let highest = network.highest_connected_net(net);
            check_group(network, highest, &mut issues);
        }
    }
    issues
}

fn check_group<N: Network + ?Sized>(network: &N, net: NetId, issues: &mut Vec<DriverIssue>) {
    let pins = network.connected_pins(net);
    let drivers = pins.iter().filter(|&&pin| network.is_driver(pin)).count();
    let loads = pins.iter().filter(|&&pin| network.is_load(pin)).count();
    let mut report =
        |cause| issues.push(DriverIssue::new_and_log(cause, net, network.net_path_name(net)));

    if drivers > 1 {
        report(Cause::MultipleDrivers);
    }
    if loads > 0 && drivers == 0 {
        report(Cause::NoDrivers);
    }
    if loads == 0 && drivers == 0 {
        report(Cause::Floating);
    }
    if drivers > 0 && loads == 0 {
        report(Cause::Unloaded);
    }
}
