//! Session-level overrides (session.json) for the boot script.
//!
//! All keys are optional. The two search-path keys only take effect as a
//! pair; a lone override falls back to both defaults.

use crate::Result;
use crate::diagnostics;
use crate::render::{BootParams, Identity, SearchPaths, WaitPolicy};

use anyhow::Context;
use serde::Deserialize;
use std::fs;

pub const DEFAULT_BIN_SEARCH: &[&str] = &["/usr/local/bin", "/usr/bin", "/usr/lib/quagga"];
pub const DEFAULT_SBIN_SEARCH: &[&str] = &["/usr/local/sbin", "/usr/sbin", "/usr/lib/quagga"];
pub const DEFAULT_STATE_DIR: &str = "/var/run/quagga";
pub const DEFAULT_USER: &str = "root";

#[cfg(target_os = "freebsd")]
pub const DEFAULT_GROUP: &str = "wheel";
#[cfg(not(target_os = "freebsd"))]
pub const DEFAULT_GROUP: &str = "root";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionSpec {
    #[serde(default)]
    pub quagga_bin_search: Option<String>,

    #[serde(default)]
    pub quagga_sbin_search: Option<String>,

    #[serde(default)]
    pub quagga_state_dir: Option<String>,

    #[serde(default)]
    pub quagga_user: Option<String>,

    #[serde(default)]
    pub quagga_group: Option<String>,

    #[serde(default)]
    pub wait_attempts: Option<u32>,

    #[serde(default)]
    pub wait_interval_ms: Option<u64>,
}

impl SessionSpec {
    pub fn load(path: &str) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| diagnostics::error_message(format!("read session file {}", path)))?;
        let spec: SessionSpec = serde_json::from_str(&text)
            .with_context(|| diagnostics::error_message(format!("parse session file {}", path)))?;
        Ok(spec)
    }

    pub fn search_paths(&self) -> SearchPaths {
        match (&self.quagga_bin_search, &self.quagga_sbin_search) {
            (Some(bin), Some(sbin)) => SearchPaths {
                bin: split_path_list(bin),
                sbin: split_path_list(sbin),
            },
            (bin, sbin) => {
                if bin.is_some() || sbin.is_some() {
                    diagnostics::warn(
                        "quagga_bin_search and quagga_sbin_search must be set together; \
                         using default search paths",
                    );
                }
                SearchPaths::default()
            }
        }
    }

    /// Resolve every boot script parameter, falling back to defaults.
    pub fn boot_params(&self, conf_path: &str) -> BootParams {
        let defaults = WaitPolicy::default();
        BootParams {
            conf_path: conf_path.to_string(),
            search: self.search_paths(),
            state_dir: self
                .quagga_state_dir
                .clone()
                .unwrap_or_else(|| DEFAULT_STATE_DIR.to_string()),
            identity: Identity {
                user: self
                    .quagga_user
                    .clone()
                    .unwrap_or_else(|| DEFAULT_USER.to_string()),
                group: self
                    .quagga_group
                    .clone()
                    .unwrap_or_else(|| DEFAULT_GROUP.to_string()),
            },
            wait: WaitPolicy {
                attempts: self.wait_attempts.unwrap_or(defaults.attempts).max(1),
                interval_ms: self.wait_interval_ms.unwrap_or(defaults.interval_ms),
            },
        }
    }
}

/// Split a whitespace-separated path list, tolerating the surrounding double
/// quotes that shell-style values carry.
fn split_path_list(raw: &str) -> Vec<String> {
    raw.trim()
        .trim_matches('"')
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn session(value: serde_json::Value) -> SessionSpec {
        serde_json::from_value(value).expect("valid session")
    }

    #[test]
    fn empty_session_uses_defaults() {
        let params = SessionSpec::default().boot_params("/etc/q/Quagga.conf");

        assert_eq!(params.search, SearchPaths::default());
        assert_eq!(params.state_dir, DEFAULT_STATE_DIR);
        assert_eq!(params.identity.user, DEFAULT_USER);
        assert_eq!(params.identity.group, DEFAULT_GROUP);
        assert_eq!(params.wait, WaitPolicy::default());
    }

    #[test]
    fn paired_search_overrides_apply() {
        let s = session(json!({
            "quagga_bin_search": "\"/opt/q/bin /bin\"",
            "quagga_sbin_search": "/opt/q/sbin"
        }));

        let paths = s.search_paths();
        assert_eq!(paths.bin, vec!["/opt/q/bin", "/bin"]);
        assert_eq!(paths.sbin, vec!["/opt/q/sbin"]);
    }

    #[test]
    fn lone_search_override_falls_back_to_defaults() {
        let s = session(json!({ "quagga_sbin_search": "/opt/q/sbin" }));
        assert_eq!(s.search_paths(), SearchPaths::default());
    }

    #[test]
    fn wait_attempts_never_drop_below_one() {
        let s = session(json!({ "wait_attempts": 0, "wait_interval_ms": 250 }));
        let params = s.boot_params("/q.conf");
        assert_eq!(params.wait.attempts, 1);
        assert_eq!(params.wait.interval_ms, 250);
    }
}
