//! Domain errors raised while composing configuration for a node.
//!
//! Every variant is fatal to the node being generated: a partially emitted
//! `Quagga.conf` is worse than none, so callers never skip and continue.

use thiserror::Error;

/// Errors arising from configuration composition and service selection.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An interface address is neither IPv4- nor IPv6-shaped.
    #[error("invalid address: {addr}")]
    InvalidAddress {
        /// The offending address string.
        addr: String,
    },

    /// A config file was requested that no service generates.
    #[error("unknown config file requested: {name}")]
    UnknownTarget {
        /// Requested file name.
        name: String,
    },

    /// A service name was selected that the registry does not know.
    #[error("service '{name}' not found in registry")]
    UnknownService {
        /// Name that was looked up.
        name: String,
    },

    /// A service with the same name was registered twice.
    #[error("service '{name}' is already registered")]
    DuplicateService {
        /// Name of the rejected service.
        name: String,
    },

    /// An active service depends on a service that is not active.
    #[error("service '{service}' requires '{dependency}', which is not selected")]
    MissingDependency {
        /// The dependent service.
        service: String,
        /// The absent dependency.
        dependency: String,
    },

    /// A service's fragment hook failed.
    #[error("service '{module}' failed to generate its configuration")]
    Module {
        /// Name of the failing service.
        module: String,
        /// Underlying failure.
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    pub fn invalid_address(addr: impl Into<String>) -> Self {
        Self::InvalidAddress { addr: addr.into() }
    }
}
