//! The files zebra generates for a node, and dispatch by file name.

use crate::compose::compose;
use crate::error::ConfigError;
use crate::render;
use crate::service::ProtocolModule;
use crate::service::zebra::{self, BOOT_SCRIPT, QUAGGA_CONF, VTYSH_CONF};
use crate::spec::{Node, SessionSpec};

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFile {
    QuaggaConf,
    BootScript,
    VtyshConf,
}

impl ConfigFile {
    pub const ALL: [ConfigFile; 3] = [Self::QuaggaConf, Self::BootScript, Self::VtyshConf];

    /// Name as listed in zebra's config files.
    pub fn name(self) -> &'static str {
        match self {
            Self::QuaggaConf => QUAGGA_CONF,
            Self::BootScript => BOOT_SCRIPT,
            Self::VtyshConf => VTYSH_CONF,
        }
    }

    /// Base name used when writing into an output directory.
    pub fn file_name(self) -> &'static str {
        let name = self.name();
        Path::new(name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(name)
    }

    /// Resolve a requested name. Anything zebra does not generate is a
    /// caller error.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| ConfigError::UnknownTarget {
                name: name.to_string(),
            })
    }
}

/// Generate the contents of one of zebra's files.
pub fn generate_config(
    node: &Node,
    file: ConfigFile,
    services: &[&dyn ProtocolModule],
    session: &SessionSpec,
) -> Result<String, ConfigError> {
    match file {
        ConfigFile::QuaggaConf => compose(node, services),
        ConfigFile::BootScript => Ok(render::synthesize(&session.boot_params(QUAGGA_CONF))),
        ConfigFile::VtyshConf => Ok(zebra::vtysh_conf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::ServiceRegistry;
    use crate::spec::node_from;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(QUAGGA_CONF, ConfigFile::QuaggaConf, "Quagga.conf")]
    #[case(BOOT_SCRIPT, ConfigFile::BootScript, "quaggaboot.sh")]
    #[case(VTYSH_CONF, ConfigFile::VtyshConf, "vtysh.conf")]
    fn known_names_resolve(
        #[case] name: &str,
        #[case] file: ConfigFile,
        #[case] base: &str,
    ) {
        let resolved = ConfigFile::from_name(name).expect("known file");
        assert_eq!(resolved, file);
        assert_eq!(resolved.file_name(), base);
    }

    #[rstest]
    #[case("Quagga.conf")]
    #[case("/etc/quagga/zebra.conf")]
    fn unknown_names_are_rejected(#[case] name: &str) {
        let err = ConfigFile::from_name(name).expect_err("unknown file");
        assert!(matches!(err, ConfigError::UnknownTarget { .. }));
    }

    #[test]
    fn every_file_is_generated() {
        let node = node_from(json!({
            "id": 1,
            "interfaces": [{ "name": "eth0", "addrs": ["10.0.0.1/24"] }]
        }));
        let registry = ServiceRegistry::builtin().expect("builtin registry");
        let active = registry.select(&["zebra", "RIP", "vtysh"]).expect("select");
        let session = SessionSpec::default();

        let conf = generate_config(&node, ConfigFile::QuaggaConf, &active, &session)
            .expect("Quagga.conf");
        assert!(conf.contains("router rip\n"));

        let boot = generate_config(&node, ConfigFile::BootScript, &active, &session)
            .expect("quaggaboot.sh");
        assert!(boot.starts_with("#!/bin/sh\n"));
        assert!(boot.contains(&format!("QUAGGA_CONF={}\n", QUAGGA_CONF)));

        let vtysh = generate_config(&node, ConfigFile::VtyshConf, &active, &session)
            .expect("vtysh.conf");
        assert_eq!(vtysh, "service integrated-vtysh-config\n");
    }
}
