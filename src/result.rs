//! Canonical plugin result model
//!
//! A `CniResult` is what a runtime programs into the namespace and hands to
//! the next plugin in the chain. It only exists fully converted: there is no
//! partially filled result value.
//!
//! Conversion to and from the wire layout lives in [`current`].

pub mod current;

pub use current::{decode, encode};

use crate::error::{Error, Result};
use ipnet::IpNet;
use std::fmt;
use std::net::IpAddr;

/// Result of a plugin invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CniResult {
    pub cni_version: String,
    pub interfaces: Vec<Interface>,
    pub ips: Vec<IpConfig>,
    pub routes: Vec<Route>,
    pub dns: Dns,
}

/// Interface created or configured by a plugin
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Interface {
    pub name: String,
    /// Hardware address
    pub mac: Option<String>,
    /// Network namespace path the interface lives in
    pub sandbox: Option<String>,
}

/// IP family of an `IpConfig`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpVersion {
    V4,
    V6,
}

impl IpVersion {
    /// Family of an address
    pub fn of(addr: &IpAddr) -> Self {
        match addr {
            IpAddr::V4(_) => IpVersion::V4,
            IpAddr::V6(_) => IpVersion::V6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IpVersion::V4 => "4",
            IpVersion::V6 => "6",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "4" => Ok(IpVersion::V4),
            "6" => Ok(IpVersion::V6),
            other => Err(Error::InvalidArgument(format!(
                "invalid IP version '{}', expected \"4\" or \"6\"",
                other
            ))),
        }
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address assigned to an interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpConfig {
    pub address: IpNet,
    pub gateway: Option<IpAddr>,
    pub version: IpVersion,
    /// Index into `CniResult::interfaces`; not checked against the list
    pub interface: Option<i32>,
}

impl IpConfig {
    /// Address with its family derived from the address itself
    pub fn new(address: IpNet) -> Self {
        Self {
            version: IpVersion::of(&address.addr()),
            address,
            gateway: None,
            interface: None,
        }
    }

    pub fn with_gateway(mut self, gateway: IpAddr) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn with_interface(mut self, index: i32) -> Self {
        self.interface = Some(index);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub dst: IpNet,
    pub gw: Option<IpAddr>,
}

/// Resolver settings; list order is kept and duplicates are allowed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dns {
    pub nameservers: Vec<String>,
    pub domain: Option<String>,
    pub search: Vec<String>,
    pub options: Vec<String>,
}

impl CniResult {
    /// Empty result for a version, with default DNS
    pub fn new(cni_version: impl Into<String>) -> Self {
        Self {
            cni_version: cni_version.into(),
            interfaces: Vec::new(),
            ips: Vec::new(),
            routes: Vec::new(),
            dns: Dns::default(),
        }
    }

    /// Decode a result document from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| Error::Parse(format!("result is not valid UTF-8: {}", e)))?;
        decode(text)
    }

    /// Encode into the current wire layout
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        encode(self).map(String::into_bytes)
    }
}

impl fmt::Display for CniResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cniVersion {}: {} interfaces, ",
            self.cni_version,
            self.interfaces.len()
        )?;
        let ips: Vec<String> = self.ips.iter().map(|ip| ip.address.to_string()).collect();
        write!(f, "ips [{}], {} routes", ips.join(", "), self.routes.len())?;
        if !self.dns.nameservers.is_empty() {
            write!(f, ", nameservers [{}]", self.dns.nameservers.join(", "))?;
        }
        Ok(())
    }
}
