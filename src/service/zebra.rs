//! The master service (zebra) and the apply step (vtysh).
//!
//! Zebra owns the three generated files; the protocol daemons only feed
//! fragments into its Quagga.conf. Vtysh runs `vtysh -b` once every daemon
//! has come up.

use crate::service::{GROUP, MASTER, ProtocolModule, ServiceDescriptor};

pub const QUAGGA_CONF: &str = "/usr/local/etc/quagga/Quagga.conf";
pub const BOOT_SCRIPT: &str = "quaggaboot.sh";
pub const VTYSH_CONF: &str = "/usr/local/etc/quagga/vtysh.conf";

pub const VTYSH: &str = "vtysh";

const ZEBRA: ServiceDescriptor = ServiceDescriptor {
    name: MASTER,
    group: GROUP,
    depends: &[VTYSH],
    ipv4_routing: false,
    ipv6_routing: false,
    start_index: 35,
    startup: &["sh quaggaboot.sh zebra"],
    shutdown: &["killall zebra"],
    validate: &["pidof zebra"],
    dirs: &["/usr/local/etc/quagga", "/var/run/quagga"],
    configs: &[QUAGGA_CONF, BOOT_SCRIPT, VTYSH_CONF],
    custom_needed: false,
    meta: "",
};

const VTYSH_SERVICE: ServiceDescriptor = ServiceDescriptor {
    name: VTYSH,
    group: GROUP,
    depends: &[],
    ipv4_routing: false,
    ipv6_routing: false,
    start_index: 45,
    startup: &["sh quaggaboot.sh vtysh"],
    shutdown: &[],
    validate: &[],
    dirs: &[],
    configs: &[],
    custom_needed: false,
    meta: "",
};

pub struct Zebra;

impl ProtocolModule for Zebra {
    fn descriptor(&self) -> &ServiceDescriptor {
        &ZEBRA
    }
}

pub struct Vtysh;

impl ProtocolModule for Vtysh {
    fn descriptor(&self) -> &ServiceDescriptor {
        &VTYSH_SERVICE
    }
}

/// Contents of vtysh.conf: a single integrated Quagga.conf for all daemons.
pub fn vtysh_conf() -> String {
    "service integrated-vtysh-config\n".to_string()
}
