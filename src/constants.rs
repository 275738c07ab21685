//! Protocol versions and discovery defaults

/// Wire schema version produced by this crate
pub const CURRENT_VERSION: &str = "1.0.0";

/// Versions whose result layout matches the current wire schema
pub const SUPPORTED_VERSIONS: &[&str] = &["0.3.0", "0.3.1", "0.4.0", "1.0.0"];

/// Conventional location of network configuration files
pub const DEFAULT_CONF_DIR: &str = "/etc/cni/net.d";

/// Extensions recognized when scanning a configuration directory
pub const DEFAULT_CONF_EXTENSIONS: &[&str] = &[".conf", ".conflist", ".json"];

/// Whether `version` is one this crate can translate results for
pub fn is_supported_version(version: &str) -> bool {
    SUPPORTED_VERSIONS.contains(&version)
}
