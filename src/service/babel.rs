//! Babel: loop-avoiding distance-vector routing with link-type dependent
//! interface settings.

use crate::error::ConfigError;
use crate::service::{ProtocolModule, QUAGGA_DAEMON, ServiceDescriptor};
use crate::spec::{Interface, Link, LinkType, Node};

pub struct Babel;

const BABEL: ServiceDescriptor = ServiceDescriptor {
    name: "Babel",
    startup: &["sh quaggaboot.sh babeld"],
    shutdown: &["killall babeld"],
    validate: &["pidof babeld"],
    ipv6_routing: true,
    ..QUAGGA_DAEMON
};

impl ProtocolModule for Babel {
    fn descriptor(&self) -> &ServiceDescriptor {
        &BABEL
    }

    fn interface_fragment(
        &self,
        _node: &Node,
        _ifc: &Interface,
        link: Option<&Link>,
    ) -> Result<String, ConfigError> {
        let kind = link.map(|l| l.kind).unwrap_or_default();
        let cfg = match kind {
            LinkType::Wireless => "  babel wireless\n  no babel split-horizon\n",
            LinkType::Wired => "  babel wired\n  babel split-horizon\n",
        };
        Ok(cfg.to_string())
    }

    fn router_fragment(&self, node: &Node) -> Result<String, ConfigError> {
        let mut cfg = String::from("router babel\n");
        for ifc in node.routed_interfaces() {
            cfg.push_str(&format!("  network {}\n", ifc.name));
        }
        cfg.push_str("  redistribute static\n  redistribute connected\n");
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::node_from;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::wired("wired", "  babel wired\n  babel split-horizon\n")]
    #[case::wireless("wireless", "  babel wireless\n  no babel split-horizon\n")]
    fn interface_mode_follows_link_type(#[case] kind: &str, #[case] expected: &str) {
        let node = node_from(json!({
            "id": 1,
            "interfaces": [{ "name": "eth0", "link": "net" }],
            "links": [{ "name": "net", "kind": kind }]
        }));
        let ifc = &node.interfaces()[0];
        let cfg = Babel
            .interface_fragment(&node, ifc, node.link_of(ifc))
            .expect("fragment");
        assert_eq!(cfg, expected);
    }

    #[test]
    fn unlinked_interface_is_treated_as_wired() {
        let node = node_from(json!({ "id": 1, "interfaces": [{ "name": "eth0" }] }));
        let ifc = &node.interfaces()[0];
        let cfg = Babel.interface_fragment(&node, ifc, None).expect("fragment");
        assert_eq!(cfg, "  babel wired\n  babel split-horizon\n");
    }

    #[test]
    fn router_block_names_routed_interfaces() {
        let node = node_from(json!({
            "id": 1,
            "interfaces": [
                { "name": "ctrl0", "control": true },
                { "name": "eth0" },
                { "name": "eth1" }
            ]
        }));
        assert_eq!(
            Babel.router_fragment(&node).expect("router"),
            "router babel\n  network eth0\n  network eth1\n  redistribute static\n  redistribute connected\n"
        );
    }
}
