//! Startup plan: what the lifecycle manager needs to run the active services
//! (commands, start order, dependencies, readiness files), as JSON.

use crate::Result;
use crate::error::ConfigError;
use crate::render::{daemon_flags, wait_set};
use crate::service::ProtocolModule;
use crate::service::zebra::BOOT_SCRIPT;
use crate::spec::Node;

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ServicePlan {
    pub name: String,
    pub group: String,
    pub start_index: u32,
    pub depends: Vec<String>,
    pub ipv4_routing: bool,
    pub ipv6_routing: bool,
    /// Argument passed to the boot script, if started through it.
    pub boot_target: Option<String>,
    /// Extra daemon flags the boot script will add for this document.
    pub flags: Vec<String>,
    pub startup: Vec<String>,
    pub shutdown: Vec<String>,
    pub validate: Vec<String>,
    pub dirs: Vec<String>,
    pub configs: Vec<String>,
    pub custom_needed: bool,
    /// Operator note carried by the service, empty if none.
    pub meta: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartupPlan {
    pub node: String,
    /// Active services by start index; ties keep selection order.
    pub services: Vec<ServicePlan>,
    /// Readiness files the vtysh apply step waits for.
    pub wait_set: Vec<String>,
}

impl StartupPlan {
    /// Build the plan for the active services of `node`, given the composed
    /// Quagga.conf. Every dependency of an active service must be active.
    pub fn build(node: &Node, services: &[&dyn ProtocolModule], document: &str) -> Result<Self> {
        for svc in services {
            for dep in svc.descriptor().depends {
                if !services.iter().any(|s| s.name() == *dep) {
                    return Err(ConfigError::MissingDependency {
                        service: svc.name().to_string(),
                        dependency: dep.to_string(),
                    }
                    .into());
                }
            }
        }

        let mut plans = Vec::with_capacity(services.len());
        for svc in services {
            let d = svc.descriptor();
            let boot_target = boot_target(d.startup);
            let flags = match boot_target {
                Some(target) => daemon_flags(target, document)?,
                None => Vec::new(),
            };
            plans.push(ServicePlan {
                name: d.name.to_string(),
                group: d.group.to_string(),
                start_index: d.start_index,
                depends: to_strings(d.depends),
                ipv4_routing: d.ipv4_routing,
                ipv6_routing: d.ipv6_routing,
                boot_target: boot_target.map(str::to_string),
                flags: to_strings(&flags),
                startup: to_strings(d.startup),
                shutdown: to_strings(d.shutdown),
                validate: to_strings(d.validate),
                dirs: to_strings(d.dirs),
                configs: to_strings(d.configs),
                custom_needed: d.custom_needed,
                meta: d.meta.to_string(),
            });
        }
        // Stable: equal start indices keep selection order.
        plans.sort_by_key(|p| p.start_index);

        Ok(StartupPlan {
            node: node.name.clone(),
            services: plans,
            wait_set: wait_set(document)?,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// "sh quaggaboot.sh ospfd" => Some("ospfd").
fn boot_target(startup: &[&'static str]) -> Option<&'static str> {
    startup.iter().copied().find_map(|cmd| {
        cmd.strip_prefix("sh ")
            .and_then(|rest| rest.strip_prefix(BOOT_SCRIPT))
            .map(str::trim)
            .filter(|target| !target.is_empty())
    })
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
