//! Scanning of a composed Quagga.conf for the daemons it configures.
//!
//! The boot script's apply step greps the same patterns out of the document
//! at run time; the router-name table and the PIM patterns below are also
//! substituted into the script so both sides agree on the wait set.
//! Matching is per line, like grep.

use crate::Result;
use crate::service::MASTER;

use regex::Regex;

/// Router block names whose daemon is `<name>d`, in wait order.
pub const ROUTER_DAEMONS: &[&str] = &["rip", "ripng", "ospf6", "ospf", "bgp", "babel"];

pub const PIM_DAEMON: &str = "xpimd";

/// Extended regex matching a `router pim` or `router pim6` line.
pub const PIM_ROUTER_PATTERN: &str = r"^[[:space:]]*router[[:space:]]+pim6?[[:space:]]*$";

/// Extended regex matching a `router pim6` line.
pub const PIM6_ROUTER_PATTERN: &str = r"^[[:space:]]*router[[:space:]]+pim6[[:space:]]*$";

/// Readiness file a daemon creates in the state directory once it is up.
pub fn vty_file(daemon: &str) -> String {
    format!("{}.vty", daemon)
}

/// Readiness files the apply step waits for: zebra's, then one per router
/// block found in the document.
pub fn wait_set(document: &str) -> Result<Vec<String>> {
    let mut files = vec![vty_file(MASTER)];
    for router in ROUTER_DAEMONS {
        let re = Regex::new(&format!(r"^router {}\b", regex::escape(router)))?;
        if any_line(&re, document) {
            files.push(vty_file(&format!("{}d", router)));
        }
    }
    if any_line(&Regex::new(PIM_ROUTER_PATTERN)?, document) {
        files.push(vty_file(PIM_DAEMON));
    }
    Ok(files)
}

/// Extra command line flags for `daemon` given the document.
pub fn daemon_flags(daemon: &str, document: &str) -> Result<Vec<&'static str>> {
    let mut flags = Vec::new();
    if daemon == PIM_DAEMON && any_line(&Regex::new(PIM6_ROUTER_PATTERN)?, document) {
        flags.push("-6");
    }
    Ok(flags)
}

fn any_line(re: &Regex, document: &str) -> bool {
    document.lines().any(|line| re.is_match(line))
}
