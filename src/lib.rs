//! cnikit - CNI network configuration and result handling
//!
//! Provides what a container runtime needs around a plugin call:
//! - Loading `.conf` / `.conflist` files and finding a network by name
//! - Promoting a single plugin definition into a plugin list
//! - Translating plugin results between the current JSON layout and a
//!   typed in-memory model
//!
//! Plugin execution itself is left to the caller.

pub mod addr;
pub mod conf;
pub mod constants;
pub mod error;
pub mod result;
pub mod schema;
pub mod types;

pub use conf::{
    ConfFormat, NetworkConfig, NetworkConfigList, conf_files, conf_from_bytes, conf_from_file,
    conflist_from_bytes, conflist_from_file, load_conf,
};
pub use constants::{CURRENT_VERSION, DEFAULT_CONF_DIR, DEFAULT_CONF_EXTENSIONS};
pub use error::{Error, NotFoundCause, Result};
pub use result::{CniResult, Dns, Interface, IpConfig, IpVersion, Route, decode, encode};
