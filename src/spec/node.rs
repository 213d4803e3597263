//! Node description (node.json): interfaces, their addresses and the links
//! they attach to.
//!
//! JSON shape:
//! {
//!   "id": 1,
//!   "name": "n1",
//!   "services": ["zebra", "OSPFv2", "vtysh"],   // optional, active-set order
//!   "interfaces": [
//!     {
//!       "name": "eth0",
//!       "addrs": ["10.0.0.1/24", "2001::1/64"],
//!       "mtu": 1500,                             // optional
//!       "control": false,                        // optional
//!       "link": "lan1"                           // optional
//!     }
//!   ],
//!   "links": [
//!     {
//!       "name": "lan1",
//!       "kind": "wireless",                      // wired | wireless
//!       "peers": [{ "node": "n2", "interface": "eth0", "mtu": 1500 }]
//!     }
//!   ]
//! }
//!
//! The raw shapes are deserialized first, then validated into a [`Node`] that
//! the composer treats as a read-only snapshot.

use crate::Result;
use crate::diagnostics;

use anyhow::{Context, bail};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;

pub const DEFAULT_MTU: u32 = 1500;

/// Services enabled when node.json does not list any.
pub const DEFAULT_SERVICES: &[&str] = &["zebra", "OSPFv2", "OSPFv3", "vtysh"];

#[derive(Debug, Clone, Deserialize)]
pub struct NodeSpec {
    pub id: u32,

    #[serde(default)]
    pub name: String,

    #[serde(default = "default_services")]
    pub services: Vec<String>,

    #[serde(default)]
    pub interfaces: Vec<RawInterface>,

    #[serde(default)]
    pub links: Vec<RawLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawInterface {
    pub name: String,

    #[serde(default)]
    pub addrs: Vec<String>,

    #[serde(default = "default_mtu")]
    pub mtu: u32,

    #[serde(default)]
    pub control: bool,

    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawLink {
    pub name: String,

    #[serde(default)]
    pub kind: LinkType,

    #[serde(default)]
    pub peers: Vec<Peer>,
}

/// Link class. Wireless covers WLAN and EMANE networks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    #[default]
    Wired,
    Wireless,
}

/// An interface of another node attached to the same link.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Peer {
    #[serde(default)]
    pub node: String,

    pub interface: String,

    #[serde(default = "default_mtu")]
    pub mtu: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    pub name: String,
    pub addrs: Vec<String>,
    pub mtu: u32,
    pub control: bool,
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub name: String,
    pub kind: LinkType,
    pub peers: Vec<Peer>,
}

impl Link {
    pub fn is_wireless(&self) -> bool {
        self.kind == LinkType::Wireless
    }
}

/// Validated node snapshot.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: u32,
    pub name: String,
    pub services: Vec<String>,
    interfaces: Vec<Interface>,
    links: BTreeMap<String, Link>,
}

impl Node {
    /// Interfaces in declared order.
    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    pub fn link_of(&self, ifc: &Interface) -> Option<&Link> {
        ifc.link.as_ref().and_then(|name| self.links.get(name))
    }

    /// Non-control interfaces in declared order.
    pub fn routed_interfaces(&self) -> impl Iterator<Item = &Interface> {
        self.interfaces.iter().filter(|ifc| !ifc.control)
    }
}

impl NodeSpec {
    /// Read and parse node.json from disk.
    pub fn load(path: &str) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| diagnostics::error_message(format!("read node file {}", path)))?;
        let spec: NodeSpec = serde_json::from_str(&text)
            .with_context(|| diagnostics::error_message(format!("parse node file {}", path)))?;
        Ok(spec)
    }

    /// Validate the raw node and build a [`Node`]:
    /// - at least one interface, names non-empty and unique
    /// - link names unique
    /// - every interface link reference names a declared link
    /// - MTUs non-zero
    pub fn validate_and_build(&self) -> Result<Node> {
        // 1) Links first so interfaces can be checked against them.
        let mut links: BTreeMap<String, Link> = BTreeMap::new();
        for raw in &self.links {
            if raw.name.trim().is_empty() {
                bail!(
                    "{}",
                    diagnostics::error_message(format!("node {} has a link with no name", self.id))
                );
            }
            if links.contains_key(&raw.name) {
                bail!(
                    "{}",
                    diagnostics::error_message(format!(
                        "duplicate link name in node {}: {}",
                        self.id, raw.name
                    ))
                );
            }
            for peer in &raw.peers {
                if peer.mtu == 0 {
                    bail!(
                        "{}",
                        diagnostics::error_message(format!(
                            "link {} peer {}:{} has a zero mtu",
                            raw.name, peer.node, peer.interface
                        ))
                    );
                }
            }
            links.insert(
                raw.name.clone(),
                Link {
                    name: raw.name.clone(),
                    kind: raw.kind,
                    peers: raw.peers.clone(),
                },
            );
        }

        // 2) Interfaces, in declared order.
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut interfaces = Vec::with_capacity(self.interfaces.len());
        for raw in &self.interfaces {
            let name = raw.name.trim();
            if name.is_empty() {
                bail!(
                    "{}",
                    diagnostics::error_message(format!(
                        "node {} has an interface with no name",
                        self.id
                    ))
                );
            }
            if !seen.insert(name) {
                bail!(
                    "{}",
                    diagnostics::error_message(format!(
                        "duplicate interface name in node {}: {}",
                        self.id, name
                    ))
                );
            }
            if raw.mtu == 0 {
                bail!(
                    "{}",
                    diagnostics::error_message(format!("interface {} has a zero mtu", name))
                );
            }
            if let Some(link) = &raw.link {
                if !links.contains_key(link) {
                    bail!(
                        "{}",
                        diagnostics::error_message(format!(
                            "interface {} references unknown link {}",
                            name, link
                        ))
                    );
                }
            }
            interfaces.push(Interface {
                name: name.to_string(),
                addrs: raw.addrs.iter().map(|a| a.trim().to_string()).collect(),
                mtu: raw.mtu,
                control: raw.control,
                link: raw.link.clone(),
            });
        }

        if interfaces.is_empty() {
            bail!(
                "{}",
                diagnostics::error_message(format!("node {} has no interfaces", self.id))
            );
        }

        let name = if self.name.trim().is_empty() {
            format!("n{}", self.id)
        } else {
            self.name.trim().to_string()
        };

        Ok(Node {
            id: self.id,
            name,
            services: self.services.clone(),
            interfaces,
            links,
        })
    }
}

fn default_mtu() -> u32 {
    DEFAULT_MTU
}

fn default_services() -> Vec<String> {
    DEFAULT_SERVICES.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn build(value: serde_json::Value) -> Result<Node> {
        let spec: NodeSpec = serde_json::from_value(value)?;
        spec.validate_and_build()
    }

    #[test]
    fn defaults_fill_optional_fields() {
        let node = build(json!({
            "id": 7,
            "interfaces": [{ "name": "eth0", "addrs": ["10.0.0.1/24"] }]
        }))
        .expect("valid node");

        assert_eq!(node.name, "n7");
        assert_eq!(node.services, DEFAULT_SERVICES);
        let ifc = &node.interfaces()[0];
        assert_eq!(ifc.mtu, DEFAULT_MTU);
        assert!(!ifc.control);
        assert!(node.link_of(ifc).is_none());
    }

    #[test]
    fn link_reference_resolves_with_kind() {
        let node = build(json!({
            "id": 1,
            "interfaces": [{ "name": "wlan0", "link": "wlan1" }],
            "links": [{
                "name": "wlan1",
                "kind": "wireless",
                "peers": [{ "node": "n2", "interface": "eth0", "mtu": 1400 }]
            }]
        }))
        .expect("valid node");

        let link = node.link_of(&node.interfaces()[0]).expect("link");
        assert_eq!(link.name, "wlan1");
        assert!(link.is_wireless());
        assert_eq!(link.peers[0].mtu, 1400);
    }

    #[test]
    fn routed_interfaces_skip_control() {
        let node = build(json!({
            "id": 1,
            "interfaces": [
                { "name": "ctrl0", "control": true },
                { "name": "eth0" }
            ]
        }))
        .expect("valid node");

        let names: Vec<&str> = node.routed_interfaces().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["eth0"]);
    }

    #[rstest]
    #[case::no_interfaces(json!({ "id": 1 }), "no interfaces")]
    #[case::duplicate_interface(
        json!({ "id": 1, "interfaces": [{ "name": "eth0" }, { "name": "eth0" }] }),
        "duplicate interface"
    )]
    #[case::unknown_link(
        json!({ "id": 1, "interfaces": [{ "name": "eth0", "link": "nope" }] }),
        "unknown link"
    )]
    #[case::duplicate_link(
        json!({
            "id": 1,
            "interfaces": [{ "name": "eth0" }],
            "links": [{ "name": "l" }, { "name": "l" }]
        }),
        "duplicate link"
    )]
    #[case::zero_mtu(
        json!({ "id": 1, "interfaces": [{ "name": "eth0", "mtu": 0 }] }),
        "zero mtu"
    )]
    fn invalid_nodes_are_rejected(#[case] value: serde_json::Value, #[case] needle: &str) {
        let err = build(value).expect_err("node should be rejected");
        assert!(
            err.to_string().contains(needle),
            "expected '{needle}' in '{err}'"
        );
    }
}
