//! Network configuration loading
//!
//! Parses single plugin (`.conf`) and plugin list (`.conflist`) documents,
//! keeping the exact bytes each object was read from, and promotes a single
//! plugin into a one-element list.

pub mod dir;

pub use dir::{ConfFormat, conf_files, load_conf};

use crate::error::{Error, Result};
use crate::schema::{self, Parsed};
use crate::types::{NetConf, NetConfList};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::debug;

/// A single plugin definition and the bytes it was parsed from
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkConfig {
    network: NetConf,
    bytes: Vec<u8>,
}

/// An ordered plugin chain and the bytes it was parsed from
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkConfigList {
    name: String,
    cni_version: Option<String>,
    disable_check: bool,
    plugins: Vec<NetworkConfig>,
    bytes: Vec<u8>,
}

/// Parse a single plugin definition
pub fn conf_from_bytes(bytes: &[u8]) -> Result<NetworkConfig> {
    let Parsed { value: network, .. } =
        schema::parse_bytes::<NetConf>(bytes).map_err(|e| Error::ConfigParse(e.to_string()))?;

    if network.plugin_type.is_empty() {
        return Err(Error::ConfigValidation("missing 'type'".into()));
    }

    Ok(NetworkConfig {
        network,
        bytes: owned_copy(bytes)?,
    })
}

/// Read and parse a single plugin definition file
pub fn conf_from_file(path: &Path) -> Result<NetworkConfig> {
    let bytes = fs::read(path).map_err(|e| Error::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config = conf_from_bytes(&bytes)?;
    debug!("Loaded plugin config {} from {}", config.network.plugin_type, path.display());
    Ok(config)
}

/// Parse a plugin list
///
/// The list needs a name and at least one plugin, and every plugin must be a
/// valid single definition on its own.
pub fn conflist_from_bytes(bytes: &[u8]) -> Result<NetworkConfigList> {
    let Parsed { value: list, .. } = schema::parse_bytes::<NetConfList>(bytes)
        .map_err(|e| Error::ConfigParse(format!("configuration list: {}", e)))?;

    let name = match list.name {
        Some(name) if !name.is_empty() => name,
        _ => return Err(Error::ConfigValidation("missing 'name'".into())),
    };
    let raw_plugins = list
        .plugins
        .ok_or_else(|| Error::ConfigValidation("no 'plugins' key".into()))?;
    if raw_plugins.is_empty() {
        return Err(Error::ConfigValidation("no plugins in list".into()));
    }

    let mut plugins = Vec::new();
    plugins.try_reserve_exact(raw_plugins.len())?;
    for (i, raw) in raw_plugins.iter().enumerate() {
        let plugin_bytes = serde_json::to_vec(raw).map_err(|e| Error::Serialization(e.to_string()))?;
        let plugin = conf_from_bytes(&plugin_bytes).map_err(|e| {
            Error::ConfigValidation(format!("failed to parse plugin {} of '{}': {}", i, name, e))
        })?;
        plugins.push(plugin);
    }

    Ok(NetworkConfigList {
        name,
        cni_version: list.cni_version,
        disable_check: list.disable_check,
        plugins,
        bytes: owned_copy(bytes)?,
    })
}

/// Read and parse a plugin list file
pub fn conflist_from_file(path: &Path) -> Result<NetworkConfigList> {
    let bytes = fs::read(path).map_err(|e| Error::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let list = conflist_from_bytes(&bytes)?;
    debug!(
        "Loaded network {} ({} plugins) from {}",
        list.name,
        list.plugins.len(),
        path.display()
    );
    Ok(list)
}

fn owned_copy(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut copy = Vec::new();
    copy.try_reserve_exact(bytes.len())?;
    copy.extend_from_slice(bytes);
    Ok(copy)
}

impl NetworkConfig {
    /// Parsed plugin definition
    pub fn network(&self) -> &NetConf {
        &self.network
    }

    /// Bytes the definition was parsed from
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn name(&self) -> Option<&str> {
        self.network.name.as_deref()
    }

    pub fn cni_version(&self) -> Option<&str> {
        self.network.cni_version.as_deref()
    }

    pub fn plugin_type(&self) -> &str {
        &self.network.plugin_type
    }

    pub fn into_parts(self) -> (NetConf, Vec<u8>) {
        (self.network, self.bytes)
    }

    /// Wrap this definition as the only plugin of a new list
    ///
    /// Name and version are hoisted to the list. The list gets its own
    /// freshly built document embedding this config's bytes verbatim; `self`
    /// is left as it was. Fails only with `OutOfMemory`.
    pub fn promote(&self) -> Result<NetworkConfigList> {
        let name = self.name().unwrap_or_default().to_string();
        let cni_version = self.network.cni_version.clone();

        let mut head = String::from("{");
        if let Some(version) = &cni_version {
            head.push_str(&format!("\"cniVersion\":{},", Value::from(version.as_str())));
        }
        head.push_str(&format!("\"name\":{},\"plugins\":[", Value::from(name.as_str())));
        const TAIL: &[u8] = b"]}";

        let mut bytes = Vec::new();
        bytes.try_reserve_exact(head.len() + self.bytes.len() + TAIL.len())?;
        bytes.extend_from_slice(head.as_bytes());
        bytes.extend_from_slice(&self.bytes);
        bytes.extend_from_slice(TAIL);

        let mut plugins = Vec::new();
        plugins.try_reserve_exact(1)?;
        plugins.push(NetworkConfig {
            network: self.network.clone(),
            bytes: owned_copy(&self.bytes)?,
        });

        Ok(NetworkConfigList {
            name,
            cni_version,
            disable_check: false,
            plugins,
            bytes,
        })
    }

    /// New config with extra top-level keys set, e.g. `runtimeConfig`
    ///
    /// Existing keys are overwritten; the result is re-validated.
    pub fn inject<'a, I>(&self, values: I) -> Result<NetworkConfig>
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        let mut doc: Map<String, Value> = serde_json::from_slice(&self.bytes)
            .map_err(|e| Error::ConfigParse(e.to_string()))?;

        for (key, value) in values {
            if key.is_empty() {
                return Err(Error::InvalidArgument("injected key is empty".into()));
            }
            doc.insert(key.to_string(), value);
        }

        let bytes = serde_json::to_vec(&doc).map_err(|e| Error::Serialization(e.to_string()))?;
        conf_from_bytes(&bytes)
    }
}

impl NetworkConfigList {
    /// Promote a single plugin definition
    pub fn from_conf(conf: &NetworkConfig) -> Result<Self> {
        conf.promote()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cni_version(&self) -> Option<&str> {
        self.cni_version.as_deref()
    }

    pub fn disable_check(&self) -> bool {
        self.disable_check
    }

    pub fn plugins(&self) -> &[NetworkConfig] {
        &self.plugins
    }

    /// Bytes the list was parsed from (or built from, when promoted)
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}
