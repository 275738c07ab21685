//! Wire structures for the JSON documents exchanged with plugins
//!
//! Provides:
//! - The current-version result layout
//! - Single plugin and plugin list configuration layouts

pub mod current;
pub mod net_conf;

pub use current::{CurrentResult, NetworkDns, NetworkInterface, NetworkIpConfig, NetworkRoute};
pub use net_conf::{Ipam, NetConf, NetConfList};
