//! OSPFv2, OSPFv3 and OSPFv3 MANET designated router services.
//!
//! None of them writes its own config file; they add MTU guards to the
//! interface blocks and a router block to Quagga.conf.

use crate::addr;
use crate::error::ConfigError;
use crate::service::{ProtocolModule, QUAGGA_DAEMON, ServiceDescriptor};
use crate::spec::node::DEFAULT_MTU;
use crate::spec::{Interface, Link, Node};

/// OSPFv2: IPv4 routing for wired networks.
pub struct Ospfv2;

const OSPFV2: ServiceDescriptor = ServiceDescriptor {
    name: "OSPFv2",
    startup: &["sh quaggaboot.sh ospfd"],
    shutdown: &["killall ospfd"],
    validate: &["pidof ospfd"],
    ipv4_routing: true,
    ..QUAGGA_DAEMON
};

impl Ospfv2 {
    /// `ip ospf mtu-ignore` when this interface's MTU disagrees with the
    /// default or with any peer on its link. A non-default MTU alone is
    /// enough: tunnelled interfaces know nothing of the far side.
    fn mtu_check(ifc: &Interface, link: Option<&Link>) -> &'static str {
        if ifc.mtu != DEFAULT_MTU {
            return "  ip ospf mtu-ignore\n";
        }
        match link {
            Some(link) if link.peers.iter().any(|p| p.mtu != ifc.mtu) => {
                "  ip ospf mtu-ignore\n"
            }
            _ => "",
        }
    }
}

impl ProtocolModule for Ospfv2 {
    fn descriptor(&self) -> &ServiceDescriptor {
        &OSPFV2
    }

    fn interface_fragment(
        &self,
        _node: &Node,
        ifc: &Interface,
        link: Option<&Link>,
    ) -> Result<String, ConfigError> {
        Ok(Self::mtu_check(ifc, link).to_string())
    }

    fn router_fragment(&self, node: &Node) -> Result<String, ConfigError> {
        let mut cfg = String::from("router ospf\n");
        cfg.push_str(&format!("  router-id {}\n", addr::router_id(node)));
        for ifc in node.routed_interfaces() {
            for a in ifc.addrs.iter().filter(|a| a.contains('.')) {
                cfg.push_str(&format!("  network {} area 0\n", addr::ipv4_network(a)?));
            }
        }
        cfg.push_str("!\n");
        Ok(cfg)
    }
}

/// OSPFv3: IPv6 routing for wired networks.
pub struct Ospfv3;

const OSPFV3: ServiceDescriptor = ServiceDescriptor {
    name: "OSPFv3",
    startup: &["sh quaggaboot.sh ospf6d"],
    shutdown: &["killall ospf6d"],
    validate: &["pidof ospf6d"],
    ipv4_routing: true,
    ipv6_routing: true,
    ..QUAGGA_DAEMON
};

impl Ospfv3 {
    /// Smallest MTU among this interface and its link peers.
    fn min_mtu(ifc: &Interface, link: Option<&Link>) -> u32 {
        link.into_iter()
            .flat_map(|l| l.peers.iter())
            .map(|p| p.mtu)
            .fold(ifc.mtu, u32::min)
    }

    fn mtu_check(ifc: &Interface, link: Option<&Link>) -> String {
        let min = Self::min_mtu(ifc, link);
        if min < ifc.mtu {
            format!("  ipv6 ospf6 ifmtu {}\n", min)
        } else {
            String::new()
        }
    }

    fn router_block(node: &Node) -> String {
        let mut cfg = String::from("router ospf6\n");
        cfg.push_str(&format!("  router-id {}\n", addr::router_id(node)));
        for ifc in node.routed_interfaces() {
            cfg.push_str(&format!("  interface {} area 0.0.0.0\n", ifc.name));
        }
        cfg.push_str("!\n");
        cfg
    }
}

impl ProtocolModule for Ospfv3 {
    fn descriptor(&self) -> &ServiceDescriptor {
        &OSPFV3
    }

    fn interface_fragment(
        &self,
        _node: &Node,
        ifc: &Interface,
        link: Option<&Link>,
    ) -> Result<String, ConfigError> {
        Ok(Self::mtu_check(ifc, link))
    }

    fn router_fragment(&self, node: &Node) -> Result<String, ConfigError> {
        Ok(Self::router_block(node))
    }
}

/// OSPFv3 MANET designated routers: IPv6 routing for wireless networks.
pub struct Ospfv3Mdr;

const OSPFV3_MDR: ServiceDescriptor = ServiceDescriptor {
    name: "OSPFv3MDR",
    ..OSPFV3
};

const MDR_WIRELESS: &str = "\
  ipv6 ospf6 hello-interval 2
  ipv6 ospf6 dead-interval 6
  ipv6 ospf6 retransmit-interval 5
  ipv6 ospf6 network manet-designated-router
  ipv6 ospf6 diffhellos
  ipv6 ospf6 adjacencyconnectivity uniconnected
  ipv6 ospf6 lsafullness mincostlsa
";

impl ProtocolModule for Ospfv3Mdr {
    fn descriptor(&self) -> &ServiceDescriptor {
        &OSPFV3_MDR
    }

    fn interface_fragment(
        &self,
        _node: &Node,
        ifc: &Interface,
        link: Option<&Link>,
    ) -> Result<String, ConfigError> {
        let mut cfg = Ospfv3::mtu_check(ifc, link);
        cfg.push_str("  ipv6 ospf6 instance-id 65\n");
        if link.is_some_and(Link::is_wireless) {
            cfg.push_str(MDR_WIRELESS);
        }
        Ok(cfg)
    }

    fn router_fragment(&self, node: &Node) -> Result<String, ConfigError> {
        Ok(Ospfv3::router_block(node))
    }
}
