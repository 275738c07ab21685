//! Conversion between `CniResult` and the current wire layout
//!
//! Decoding takes the DNS lists out of the wire object rather than copying
//! them, so the wire object is left with empty DNS lists. Encoding copies
//! every string and leaves the source result untouched.

use super::{CniResult, Dns, Interface, IpConfig, IpVersion, Route};
use crate::addr;
use crate::error::{Error, Result};
use crate::schema::{self, Parsed};
use crate::types::{CurrentResult, NetworkDns, NetworkInterface, NetworkIpConfig, NetworkRoute};
use tracing::error;

/// Decode a current-version result document
pub fn decode(json: &str) -> Result<CniResult> {
    let Parsed { mut value, notice } = schema::parse::<CurrentResult>(json).map_err(|e| {
        error!("Parse result failed: {}", e);
        Error::Parse(e.to_string())
    })?;

    CniResult::from_wire(&mut value).map_err(|err| match notice {
        Some(notice) => with_parse_notice(err, &notice),
        None => err,
    })
}

/// Encode a result into a current-version document
pub fn encode(result: &CniResult) -> Result<String> {
    let wire = result.to_wire()?;
    schema::serialize(&wire).map_err(|e| Error::Serialization(e.to_string()))
}

/// Keep the parser's notice in front of a conversion failure
fn with_parse_notice(err: Error, notice: &str) -> Error {
    match err {
        Error::Conversion { what, reason } => Error::Conversion {
            what,
            reason: format!("parse err: {}, convert err: {}", notice, reason),
        },
        other => other,
    }
}

/// Convert every element or none
///
/// The destination is only reserved for a non-empty source. The first
/// failing element aborts the whole array and drops what was built.
fn convert_all<S, T>(field: &str, src: &[S], convert: impl Fn(&S) -> Result<T>) -> Result<Vec<T>> {
    let mut out = Vec::new();
    if src.is_empty() {
        return Ok(out);
    }
    out.try_reserve_exact(src.len())?;

    for (i, item) in src.iter().enumerate() {
        match convert(item) {
            Ok(value) => out.push(value),
            Err(Error::OutOfMemory) => return Err(Error::OutOfMemory),
            Err(e) => {
                error!("Convert {}[{}] failed: {}", field, i, e);
                return Err(Error::conversion(format!("{}[{}]", field, i), e));
            }
        }
    }
    Ok(out)
}

/// Owned copy of a string list in fresh storage
fn dup_strings(src: &[String]) -> Result<Vec<String>> {
    let mut out = Vec::new();
    if src.is_empty() {
        return Ok(out);
    }
    out.try_reserve_exact(src.len())?;
    for s in src {
        let mut copy = String::new();
        copy.try_reserve_exact(s.len())?;
        copy.push_str(s);
        out.push(copy);
    }
    Ok(out)
}

impl CniResult {
    /// Build a result from a parsed wire object
    ///
    /// Interfaces, addresses and routes are copied; the DNS lists are moved
    /// out of `wire`. A wire object without a DNS section is rejected.
    pub fn from_wire(wire: &mut CurrentResult) -> Result<Self> {
        let cni_version = wire.cni_version.clone();
        let interfaces = convert_all("interfaces", &wire.interfaces, Interface::from_wire)?;
        let ips = convert_all("ips", &wire.ips, IpConfig::from_wire)?;
        let routes = convert_all("routes", &wire.routes, Route::from_wire)?;

        let dns = match wire.dns.as_mut() {
            Some(dns) => Dns::take_from_wire(dns),
            None => {
                error!("Empty dns argument");
                return Err(Error::conversion("dns", "empty dns argument"));
            }
        };

        Ok(Self {
            cni_version,
            interfaces,
            ips,
            routes,
            dns,
        })
    }

    /// Build the wire object for this result without modifying it
    pub fn to_wire(&self) -> Result<CurrentResult> {
        Ok(CurrentResult {
            cni_version: self.cni_version.clone(),
            interfaces: convert_all("interfaces", &self.interfaces, Interface::to_wire)?,
            ips: convert_all("ips", &self.ips, IpConfig::to_wire)?,
            routes: convert_all("routes", &self.routes, Route::to_wire)?,
            dns: Some(self.dns.to_wire()?),
            extra: Default::default(),
        })
    }
}

impl TryFrom<CurrentResult> for CniResult {
    type Error = Error;

    fn try_from(mut wire: CurrentResult) -> Result<Self> {
        CniResult::from_wire(&mut wire)
    }
}

impl Interface {
    fn from_wire(src: &NetworkInterface) -> Result<Self> {
        Ok(Self {
            name: src.name.clone(),
            mac: src.mac.clone(),
            sandbox: src.sandbox.clone(),
        })
    }

    fn to_wire(&self) -> Result<NetworkInterface> {
        Ok(NetworkInterface {
            name: self.name.clone(),
            mac: self.mac.clone(),
            sandbox: self.sandbox.clone(),
        })
    }
}

impl IpConfig {
    fn from_wire(src: &NetworkIpConfig) -> Result<Self> {
        let address = src
            .address
            .as_deref()
            .ok_or(Error::MissingField { field: "address" })
            .and_then(addr::parse_cidr)?;
        // Only tried once the address is good; a bad gateway drops it
        let gateway = src.gateway.as_deref().map(addr::parse_ip).transpose()?;
        let version = match src.version.as_deref() {
            Some(v) => IpVersion::parse(v)?,
            None => IpVersion::of(&address.addr()),
        };

        Ok(Self {
            address,
            gateway,
            version,
            interface: src.interface,
        })
    }

    fn to_wire(&self) -> Result<NetworkIpConfig> {
        Ok(NetworkIpConfig {
            address: Some(addr::format_ipnet(&self.address)),
            gateway: self.gateway.as_ref().map(addr::format_ip),
            version: Some(self.version.as_str().to_string()),
            interface: self.interface,
        })
    }
}

impl Route {
    fn from_wire(src: &NetworkRoute) -> Result<Self> {
        let dst = src
            .dst
            .as_deref()
            .ok_or(Error::MissingField { field: "dst" })
            .and_then(addr::parse_cidr)?;
        let gw = src.gw.as_deref().map(addr::parse_ip).transpose()?;
        Ok(Self { dst, gw })
    }

    fn to_wire(&self) -> Result<NetworkRoute> {
        Ok(NetworkRoute {
            dst: Some(addr::format_ipnet(&self.dst)),
            gw: self.gw.as_ref().map(addr::format_ip),
        })
    }
}

impl Dns {
    /// Move the resolver lists out of a wire DNS section, leaving it empty
    pub fn take_from_wire(src: &mut NetworkDns) -> Self {
        Self {
            nameservers: std::mem::take(&mut src.nameservers),
            domain: src.domain.take(),
            search: std::mem::take(&mut src.search),
            options: std::mem::take(&mut src.options),
        }
    }

    /// Copy into a new wire DNS section
    pub fn to_wire(&self) -> Result<NetworkDns> {
        Ok(NetworkDns {
            nameservers: dup_strings(&self.nameservers)?,
            domain: self.domain.clone(),
            search: dup_strings(&self.search)?,
            options: dup_strings(&self.options)?,
        })
    }
}
