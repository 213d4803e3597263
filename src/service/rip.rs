//! RIP and RIPng: global redistribution only, no per-interface settings.

use crate::error::ConfigError;
use crate::service::{ProtocolModule, QUAGGA_DAEMON, ServiceDescriptor};
use crate::spec::Node;

/// RIP: IPv4 routing for wired networks.
pub struct Rip;

const RIP: ServiceDescriptor = ServiceDescriptor {
    name: "RIP",
    startup: &["sh quaggaboot.sh ripd"],
    shutdown: &["killall ripd"],
    validate: &["pidof ripd"],
    ipv4_routing: true,
    ..QUAGGA_DAEMON
};

const RIP_ROUTER: &str = "\
router rip
  redistribute static
  redistribute connected
  redistribute ospf
  network 0.0.0.0/0
!
";

impl ProtocolModule for Rip {
    fn descriptor(&self) -> &ServiceDescriptor {
        &RIP
    }

    fn router_fragment(&self, _node: &Node) -> Result<String, ConfigError> {
        Ok(RIP_ROUTER.to_string())
    }
}

/// RIPng: IPv6 routing for wired networks.
pub struct Ripng;

const RIPNG: ServiceDescriptor = ServiceDescriptor {
    name: "RIPNG",
    startup: &["sh quaggaboot.sh ripngd"],
    shutdown: &["killall ripngd"],
    validate: &["pidof ripngd"],
    ipv6_routing: true,
    ..QUAGGA_DAEMON
};

const RIPNG_ROUTER: &str = "\
router ripng
  redistribute static
  redistribute connected
  redistribute ospf6
  network ::/0
!
";

impl ProtocolModule for Ripng {
    fn descriptor(&self) -> &ServiceDescriptor {
        &RIPNG
    }

    fn router_fragment(&self, _node: &Node) -> Result<String, ConfigError> {
        Ok(RIPNG_ROUTER.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::node_from;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn rip_contributes_static_router_block_only() {
        let node = node_from(json!({
            "id": 1,
            "interfaces": [{ "name": "eth0", "addrs": ["10.0.0.1/24"] }]
        }));
        let ifc = &node.interfaces()[0];

        assert_eq!(Rip.interface_fragment(&node, ifc, None).expect("ifc"), "");
        let cfg = Rip.router_fragment(&node).expect("router");
        assert!(cfg.starts_with("router rip\n"));
        assert!(cfg.contains("  network 0.0.0.0/0\n"));
    }

    #[test]
    fn ripng_redistributes_into_ipv6() {
        let node = node_from(json!({ "id": 1, "interfaces": [{ "name": "eth0" }] }));
        let cfg = Ripng.router_fragment(&node).expect("router");
        assert!(cfg.starts_with("router ripng\n"));
        assert!(cfg.contains("  redistribute ospf6\n  network ::/0\n!\n"));
    }
}
