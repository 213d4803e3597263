//! PIM multicast routing based on XORP.

use crate::error::ConfigError;
use crate::service::{ProtocolModule, QUAGGA_DAEMON, ServiceDescriptor};
use crate::spec::{Interface, Link, Node};

pub struct Xpimd;

const XPIMD: ServiceDescriptor = ServiceDescriptor {
    name: "Xpimd",
    startup: &["sh quaggaboot.sh xpimd"],
    shutdown: &["killall xpimd"],
    validate: &["pidof xpimd"],
    ipv4_routing: true,
    ..QUAGGA_DAEMON
};

const FALLBACK_IFNAME: &str = "eth0";

impl ProtocolModule for Xpimd {
    fn descriptor(&self) -> &ServiceDescriptor {
        &XPIMD
    }

    fn interface_fragment(
        &self,
        _node: &Node,
        _ifc: &Interface,
        _link: Option<&Link>,
    ) -> Result<String, ConfigError> {
        Ok("  ip mfea\n  ip igmp\n  ip pim\n".to_string())
    }

    fn router_fragment(&self, node: &Node) -> Result<String, ConfigError> {
        // BSR and RP candidate: first interface that is not loopback.
        let ifname = node
            .interfaces()
            .iter()
            .map(|ifc| ifc.name.as_str())
            .find(|name| *name != "lo")
            .unwrap_or(FALLBACK_IFNAME);

        let mut cfg = String::from("router mfea\n!\n");
        cfg.push_str("router pim\n");
        cfg.push_str("  !ip pim rp-address 10.0.0.1\n");
        cfg.push_str(&format!("  ip pim bsr-candidate {}\n", ifname));
        cfg.push_str(&format!("  ip pim rp-candidate {}\n", ifname));
        cfg.push_str("  !ip pim spt-threshold interval 10 bytes 80000\n");
        Ok(cfg)
    }
}
