//! Plugin configuration layouts (`.conf` and `.conflist`)

use crate::schema::WireObject;
use crate::types::NetworkDns;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One plugin definition
///
/// Plugin-specific keys (`bridge`, `isGateway`, `master`, ...) land in
/// `extra` and are serialized back in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetConf {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cni_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub plugin_type: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub capabilities: BTreeMap<String, bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipam: Option<Ipam>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<NetworkDns>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_config: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_result: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WireObject for NetConf {}

/// IPAM section; everything past `type` belongs to the IPAM plugin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ipam {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub ipam_type: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Plugin list document
///
/// Plugins stay as raw JSON values here; each one is re-read as a `NetConf`
/// so it keeps its own byte-faithful copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetConfList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cni_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disable_check: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Vec<Value>>,
}

impl WireObject for NetConfList {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bridge_conf() {
        let json = r#"{
            "cniVersion": "0.4.0",
            "name": "mynet",
            "type": "bridge",
            "bridge": "cni0",
            "isGateway": true,
            "ipam": {"type": "host-local", "subnet": "10.22.0.0/16"}
        }"#;

        let conf: NetConf = serde_json::from_str(json).unwrap();
        assert_eq!(conf.name.as_deref(), Some("mynet"));
        assert_eq!(conf.plugin_type, "bridge");
        assert_eq!(conf.extra["bridge"], "cni0");
        assert_eq!(conf.extra["isGateway"], true);

        let ipam = conf.ipam.unwrap();
        assert_eq!(ipam.ipam_type, "host-local");
        assert_eq!(ipam.extra["subnet"], "10.22.0.0/16");
    }

    #[test]
    fn test_parse_conflist_metadata() {
        let json = r#"{
            "cniVersion": "1.0.0",
            "name": "dbnet",
            "disableCheck": true,
            "plugins": [{"type": "bridge"}, {"type": "portmap"}]
        }"#;

        let list: NetConfList = serde_json::from_str(json).unwrap();
        assert_eq!(list.name.as_deref(), Some("dbnet"));
        assert!(list.disable_check);
        assert_eq!(list.plugins.unwrap().len(), 2);
    }

    #[test]
    fn test_conflist_without_plugins_key() {
        let list: NetConfList = serde_json::from_str(r#"{"name":"x"}"#).unwrap();
        assert!(list.plugins.is_none());
    }
}
