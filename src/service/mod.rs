//! Routing services that contribute to the unified Quagga configuration.
//!
//! Every service is described by a static [`ServiceDescriptor`] and exposes
//! two hooks through [`ProtocolModule`]: a per-interface fragment and a
//! per-router fragment. Only services depending on the master service
//! ([`MASTER`], zebra) are asked for fragments.

pub mod babel;
pub mod bgp;
pub mod ospf;
pub mod registry;
pub mod rip;
pub mod xpimd;
pub mod zebra;

use crate::error::ConfigError;
use crate::spec::{Interface, Link, Node};

pub use registry::ServiceRegistry;

/// Name of the master service that owns interface addressing.
pub const MASTER: &str = "zebra";

/// Group shared by every Quagga service.
pub const GROUP: &str = "Quagga";

/// Immutable capability record of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub name: &'static str,
    pub group: &'static str,
    /// Services that must be active for this one to work.
    pub depends: &'static [&'static str],
    pub ipv4_routing: bool,
    pub ipv6_routing: bool,
    pub start_index: u32,
    pub startup: &'static [&'static str],
    pub shutdown: &'static [&'static str],
    pub validate: &'static [&'static str],
    pub dirs: &'static [&'static str],
    pub configs: &'static [&'static str],
    /// The generated configuration is only a starting point.
    pub custom_needed: bool,
    pub meta: &'static str,
}

/// Defaults shared by the protocol daemons; concrete services override
/// name, commands and family flags with struct update syntax.
pub const QUAGGA_DAEMON: ServiceDescriptor = ServiceDescriptor {
    name: "QuaggaDaemon",
    group: GROUP,
    depends: &[MASTER],
    ipv4_routing: false,
    ipv6_routing: false,
    start_index: 40,
    startup: &[],
    shutdown: &[],
    validate: &[],
    dirs: &[],
    configs: &[],
    custom_needed: false,
    meta: "The config file for this service can be found in the Zebra service.",
};

impl ServiceDescriptor {
    pub fn depends_on(&self, name: &str) -> bool {
        self.depends.contains(&name)
    }
}

/// Contract implemented by every service in the registry.
pub trait ProtocolModule: Send + Sync {
    fn descriptor(&self) -> &ServiceDescriptor;

    /// Lines added to this interface's block in Quagga.conf. `link` is the
    /// link the interface attaches to, if any.
    fn interface_fragment(
        &self,
        _node: &Node,
        _ifc: &Interface,
        _link: Option<&Link>,
    ) -> Result<String, ConfigError> {
        Ok(String::new())
    }

    /// Router block appended after all interface blocks.
    fn router_fragment(&self, _node: &Node) -> Result<String, ConfigError> {
        Ok(String::new())
    }

    fn name(&self) -> &'static str {
        self.descriptor().name
    }
}

/// Every built-in service, in catalog order.
pub fn builtin() -> Vec<Box<dyn ProtocolModule>> {
    vec![
        Box::new(zebra::Zebra),
        Box::new(ospf::Ospfv2),
        Box::new(ospf::Ospfv3),
        Box::new(ospf::Ospfv3Mdr),
        Box::new(bgp::Bgp),
        Box::new(rip::Rip),
        Box::new(rip::Ripng),
        Box::new(babel::Babel),
        Box::new(xpimd::Xpimd),
        Box::new(zebra::Vtysh),
    ]
}
