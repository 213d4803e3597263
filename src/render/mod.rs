//! Rendering of the boot script and scanning of composed documents.

pub mod boot;
pub mod waitset;

pub use boot::{BootParams, Identity, SearchPaths, WaitPolicy, synthesize};
pub use waitset::{daemon_flags, wait_set};
