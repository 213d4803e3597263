//! Interface address helpers: family classification, router-id selection and
//! IPv4 network prefixes.
//!
//! Addresses arrive as they appear in node.json, e.g. "10.0.0.1/24" or
//! "2001:db8::1/64". Classification is purely textual: a "." makes it IPv4,
//! otherwise a ":" makes it IPv6.

use crate::error::ConfigError;
use crate::spec::Node;

use std::fmt;
use std::net::Ipv4Addr;

/// Returned by [`router_id`] when the node has no routed IPv4 address.
pub const UNSPECIFIED_ROUTER_ID: &str = "0.0.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrFamily {
    Ipv4,
    Ipv6,
}

/// A family-tagged zebra address statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddrStatement<'a> {
    pub family: AddrFamily,
    pub addr: &'a str,
}

impl fmt::Display for AddrStatement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.family {
            AddrFamily::Ipv4 => write!(f, "ip address {}", self.addr),
            AddrFamily::Ipv6 => write!(f, "ipv6 address {}", self.addr),
        }
    }
}

/// Map an address string to its zebra statement.
pub fn classify(addr: &str) -> Result<AddrStatement<'_>, ConfigError> {
    let family = if addr.contains('.') {
        AddrFamily::Ipv4
    } else if addr.contains(':') {
        AddrFamily::Ipv6
    } else {
        return Err(ConfigError::invalid_address(addr));
    };
    Ok(AddrStatement { family, addr })
}

/// First IPv4 address of the node's routed interfaces, prefix stripped.
pub fn router_id(node: &Node) -> String {
    node.routed_interfaces()
        .flat_map(|ifc| ifc.addrs.iter())
        .find(|a| a.contains('.'))
        .map(|a| host_part(a).to_string())
        .unwrap_or_else(|| UNSPECIFIED_ROUTER_ID.to_string())
}

/// Network prefix of an IPv4 interface address: "10.0.0.7/24" => "10.0.0.0/24".
///
/// A missing prefix length means a host route (/32).
pub fn ipv4_network(addr: &str) -> Result<String, ConfigError> {
    let (host, len) = match addr.split_once('/') {
        Some((host, len)) => {
            let len: u32 = len
                .parse()
                .map_err(|_| ConfigError::invalid_address(addr))?;
            (host, len)
        }
        None => (addr, 32),
    };
    if len > 32 {
        return Err(ConfigError::invalid_address(addr));
    }
    let ip: Ipv4Addr = host.parse().map_err(|_| ConfigError::invalid_address(addr))?;
    let mask = u32::MAX.checked_shl(32 - len).unwrap_or(0);
    let network = Ipv4Addr::from(u32::from(ip) & mask);
    Ok(format!("{}/{}", network, len))
}

fn host_part(addr: &str) -> &str {
    addr.split('/').next().unwrap_or(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::node_from;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::ipv4("10.0.0.1/24", AddrFamily::Ipv4, "ip address 10.0.0.1/24")]
    #[case::ipv6("2001:db8::1/64", AddrFamily::Ipv6, "ipv6 address 2001:db8::1/64")]
    #[case::mapped("::ffff:10.0.0.1/96", AddrFamily::Ipv4, "ip address ::ffff:10.0.0.1/96")]
    fn classify_tags_family(
        #[case] addr: &str,
        #[case] family: AddrFamily,
        #[case] line: &str,
    ) {
        let stmt = classify(addr).expect("classifies");
        assert_eq!(stmt.family, family);
        assert_eq!(stmt.to_string(), line);
    }

    #[rstest]
    #[case("not-an-address")]
    #[case("")]
    fn classify_rejects_malformed(#[case] addr: &str) {
        let err = classify(addr).expect_err("should fail");
        assert!(matches!(err, ConfigError::InvalidAddress { addr: ref a } if a == addr));
        assert!(err.to_string().contains("invalid address"));
    }

    #[test]
    fn router_id_skips_control_and_ipv6_only_interfaces() {
        let node = node_from(json!({
            "id": 1,
            "interfaces": [
                { "name": "A", "control": true, "addrs": ["172.16.0.1/24"] },
                { "name": "B", "addrs": ["2001:db8::2/64"] },
                { "name": "C", "addrs": ["10.0.0.5/24"] }
            ]
        }));
        assert_eq!(router_id(&node), "10.0.0.5");
    }

    #[test]
    fn router_id_takes_first_address_in_order() {
        let node = node_from(json!({
            "id": 1,
            "interfaces": [
                { "name": "eth0", "addrs": ["2001::1/64", "10.0.1.1/24", "10.0.2.1/24"] },
                { "name": "eth1", "addrs": ["10.0.3.1/24"] }
            ]
        }));
        assert_eq!(router_id(&node), "10.0.1.1");
    }

    #[test]
    fn router_id_falls_back_without_ipv4() {
        let node = node_from(json!({
            "id": 1,
            "interfaces": [
                { "name": "ctrl0", "control": true, "addrs": ["172.16.0.1/24"] },
                { "name": "eth0", "addrs": ["2001::1/64"] }
            ]
        }));
        assert_eq!(router_id(&node), UNSPECIFIED_ROUTER_ID);
    }

    #[rstest]
    #[case("10.0.0.7/24", "10.0.0.0/24")]
    #[case("192.168.5.130/25", "192.168.5.128/25")]
    #[case("10.1.2.3", "10.1.2.3/32")]
    #[case("10.1.2.3/0", "0.0.0.0/0")]
    fn ipv4_network_masks_host_bits(#[case] addr: &str, #[case] expected: &str) {
        assert_eq!(ipv4_network(addr).expect("valid prefix"), expected);
    }

    #[rstest]
    #[case("10.0.0.1/33")]
    #[case("10.0.0/24")]
    #[case("10.0.0.1/x")]
    fn ipv4_network_rejects_malformed(#[case] addr: &str) {
        assert!(ipv4_network(addr).is_err());
    }
}
