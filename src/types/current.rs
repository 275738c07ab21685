//! Current-version result layout

use crate::schema::WireObject;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Result document as a plugin prints it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentResult {
    pub cni_version: String,

    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<NetworkInterface>,

    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub ips: Vec<NetworkIpConfig>,

    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<NetworkRoute>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<NetworkDns>,

    /// Keys outside the schema, carried through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WireObject for CurrentResult {
    fn unknown_fields(&self) -> Vec<&str> {
        self.extra.keys().map(String::as_str).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkInterface {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sandbox: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkIpConfig {
    /// CIDR; optional on the wire so a missing value fails conversion, not parsing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkRoute {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dst: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gw: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkDns {
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub nameservers: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub search: Vec<String>,

    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// Read an explicit `null` list the same as an absent one
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;

    #[test]
    fn test_parse_minimal_result() {
        let json = r#"{"cniVersion":"1.0.0","dns":{}}"#;
        let parsed = schema::parse::<CurrentResult>(json).unwrap();

        assert_eq!(parsed.value.cni_version, "1.0.0");
        assert!(parsed.value.interfaces.is_empty());
        assert!(parsed.value.dns.is_some());
        assert!(parsed.notice.is_none());
    }

    #[test]
    fn test_parse_reports_unknown_fields() {
        let json = r#"{"cniVersion":"1.0.0","dns":{},"bogus":1}"#;
        let parsed = schema::parse::<CurrentResult>(json).unwrap();

        assert_eq!(parsed.notice.as_deref(), Some("unknown fields: bogus"));
        assert_eq!(parsed.value.extra["bogus"], 1);
    }

    #[test]
    fn test_serialize_omits_empty_collections() {
        let result = CurrentResult {
            cni_version: "1.0.0".into(),
            dns: Some(NetworkDns::default()),
            ..Default::default()
        };
        let text = schema::serialize(&result).unwrap();
        assert_eq!(text, r#"{"cniVersion":"1.0.0","dns":{}}"#);
    }

    #[test]
    fn test_parse_null_lists_as_empty() {
        let json = r#"{"cniVersion":"1.0.0","interfaces":null,"ips":null,"routes":null,
            "dns":{"nameservers":null,"search":null,"options":null}}"#;
        let parsed = schema::parse::<CurrentResult>(json).unwrap();

        assert!(parsed.value.interfaces.is_empty());
        assert!(parsed.value.ips.is_empty());
        assert!(parsed.value.routes.is_empty());
        let dns = parsed.value.dns.unwrap();
        assert!(dns.nameservers.is_empty());
        assert!(dns.search.is_empty());
        assert!(dns.options.is_empty());
        assert!(parsed.notice.is_none());
    }

    #[test]
    fn test_parse_rejects_missing_version() {
        assert!(schema::parse::<CurrentResult>(r#"{"dns":{}}"#).is_err());
    }
}
