//! BGP: interdomain routing. Peers are configured by hand, so the generated
//! block is a template with the node id as AS number.

use crate::addr;
use crate::error::ConfigError;
use crate::service::{ProtocolModule, QUAGGA_DAEMON, ServiceDescriptor};
use crate::spec::Node;

pub struct Bgp;

const BGP: ServiceDescriptor = ServiceDescriptor {
    name: "BGP",
    startup: &["sh quaggaboot.sh bgpd"],
    shutdown: &["killall bgpd"],
    validate: &["pidof bgpd"],
    custom_needed: true,
    ipv4_routing: true,
    ipv6_routing: true,
    ..QUAGGA_DAEMON
};

impl ProtocolModule for Bgp {
    fn descriptor(&self) -> &ServiceDescriptor {
        &BGP
    }

    fn router_fragment(&self, node: &Node) -> Result<String, ConfigError> {
        let mut cfg = String::from("!\n! BGP configuration\n!\n");
        cfg.push_str("! You should configure the AS number below,\n");
        cfg.push_str("! along with this router's peers.\n!\n");
        cfg.push_str(&format!("router bgp {}\n", node.id));
        cfg.push_str(&format!("  bgp router-id {}\n", addr::router_id(node)));
        cfg.push_str("  redistribute connected\n");
        cfg.push_str("! neighbor 1.2.3.4 remote-as 555\n!\n");
        Ok(cfg)
    }
}
