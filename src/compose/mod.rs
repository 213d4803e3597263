//! Composition of the unified Quagga.conf for one node.
//!
//! Layout of the document:
//! - one block per interface, in node order:
//!   `interface <name>`, address statements and service fragments, then `!`
//!   (control interfaces get their addresses only, and no terminator)
//! - one router block per active zebra-dependent service, in active-set order
//!
//! Addresses are emitted per family, and only for families some active
//! service routes. Fragments from services that route IPv6 follow the IPv6
//! addresses, all other fragments follow the IPv4 addresses.

pub mod files;

pub use files::{ConfigFile, generate_config};

use crate::addr::{self, AddrFamily, AddrStatement};
use crate::error::ConfigError;
use crate::service::{MASTER, ProtocolModule};
use crate::spec::{Interface, Node};

/// Compose Quagga.conf for `node` from the active services.
///
/// Deterministic for a given node snapshot and service order. Any malformed
/// address or failing service hook fails the whole document.
pub fn compose(node: &Node, services: &[&dyn ProtocolModule]) -> Result<String, ConfigError> {
    let routing: Vec<&dyn ProtocolModule> = services
        .iter()
        .copied()
        .filter(|svc| svc.descriptor().depends_on(MASTER))
        .collect();

    let mut cfg = String::new();
    for ifc in node.interfaces() {
        cfg.push_str(&format!("interface {}\n", ifc.name));
        let stmts = classify_all(ifc)?;

        // Control interfaces are addressed but never routed.
        if ifc.control {
            push_addrs(&mut cfg, &stmts, None);
            continue;
        }

        let link = node.link_of(ifc);
        let mut cfg_v4 = String::new();
        let mut cfg_v6 = String::new();
        let mut want_v4 = false;
        let mut want_v6 = false;

        for svc in &routing {
            let desc = svc.descriptor();
            let fragment = svc
                .interface_fragment(node, ifc, link)
                .map_err(|e| module_error(desc.name, e))?;
            if desc.ipv4_routing {
                want_v4 = true;
            }
            if desc.ipv6_routing {
                want_v6 = true;
                cfg_v6.push_str(&fragment);
            } else {
                cfg_v4.push_str(&fragment);
            }
        }

        tracing::debug!(
            node = %node.name,
            interface = %ifc.name,
            link = link.map_or("-", |l| l.name.as_str()),
            want_v4,
            want_v6,
            "composed interface block"
        );

        if want_v4 {
            push_addrs(&mut cfg, &stmts, Some(AddrFamily::Ipv4));
            cfg.push_str(&cfg_v4);
        }
        if want_v6 {
            push_addrs(&mut cfg, &stmts, Some(AddrFamily::Ipv6));
            cfg.push_str(&cfg_v6);
        }
        cfg.push_str("!\n");
    }

    for svc in &routing {
        let block = svc
            .router_fragment(node)
            .map_err(|e| module_error(svc.name(), e))?;
        cfg.push_str(&block);
    }

    tracing::info!(
        node = %node.name,
        interfaces = node.interfaces().len(),
        services = routing.len(),
        bytes = cfg.len(),
        "composed Quagga.conf"
    );
    Ok(cfg)
}

fn classify_all(ifc: &Interface) -> Result<Vec<AddrStatement<'_>>, ConfigError> {
    ifc.addrs.iter().map(|a| addr::classify(a)).collect()
}

/// Append one indented statement per address, optionally of one family only.
fn push_addrs(cfg: &mut String, stmts: &[AddrStatement<'_>], family: Option<AddrFamily>) {
    for stmt in stmts {
        if family.is_none_or(|f| f == stmt.family) {
            cfg.push_str(&format!("  {}\n", stmt));
        }
    }
}

fn module_error(module: &str, source: ConfigError) -> ConfigError {
    ConfigError::Module {
        module: module.to_string(),
        source: Box::new(source),
    }
}
