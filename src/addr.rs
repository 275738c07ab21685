//! IP address and CIDR conversion
//!
//! Provides:
//! - CIDR text to `IpNet` and back
//! - IP text to `IpAddr` and back
//! - Binary (4 or 16 octet) forms of addresses

use crate::error::{Error, Result};
use ipnet::IpNet;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Parse CIDR notation, keeping the host part of the address
///
/// `10.0.0.5/24` stays `10.0.0.5/24`; it is not truncated to the network.
pub fn parse_cidr(s: &str) -> Result<IpNet> {
    s.trim()
        .parse::<IpNet>()
        .map_err(|e| Error::InvalidAddress(format!("invalid CIDR address {}: {}", s, e)))
}

/// Format an `IpNet` as CIDR text
pub fn format_ipnet(net: &IpNet) -> String {
    net.to_string()
}

/// Parse a bare IP address
pub fn parse_ip(s: &str) -> Result<IpAddr> {
    s.trim()
        .parse::<IpAddr>()
        .map_err(|e| Error::InvalidAddress(format!("invalid IP address {}: {}", s, e)))
}

/// Format an IP address as text
pub fn format_ip(ip: &IpAddr) -> String {
    ip.to_string()
}

/// Binary form of an address: 4 octets for IPv4, 16 for IPv6
pub fn ip_octets(ip: &IpAddr) -> Vec<u8> {
    match ip {
        IpAddr::V4(v4) => v4.octets().to_vec(),
        IpAddr::V6(v6) => v6.octets().to_vec(),
    }
}

/// Rebuild an address from its binary form
pub fn ip_from_octets(bytes: &[u8]) -> Result<IpAddr> {
    match bytes.len() {
        4 => {
            let mut octets = [0u8; 4];
            octets.copy_from_slice(bytes);
            Ok(IpAddr::V4(Ipv4Addr::from(octets)))
        }
        16 => {
            let mut octets = [0u8; 16];
            octets.copy_from_slice(bytes);
            Ok(IpAddr::V6(Ipv6Addr::from(octets)))
        }
        n => Err(Error::InvalidAddress(format!(
            "invalid IP length {}, expected 4 or 16 bytes",
            n
        ))),
    }
}

/// Rebuild an `IpNet` from address octets and a mask width
pub fn ipnet_from_octets(bytes: &[u8], prefix_len: u8) -> Result<IpNet> {
    let ip = ip_from_octets(bytes)?;
    IpNet::new(ip, prefix_len)
        .map_err(|e| Error::InvalidAddress(format!("invalid prefix length {}: {}", prefix_len, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cidr_keeps_host_bits() {
        let net = parse_cidr("10.1.2.3/24").unwrap();
        assert_eq!(net.addr(), IpAddr::V4(Ipv4Addr::new(10, 1, 2, 3)));
        assert_eq!(net.prefix_len(), 24);
        assert_eq!(format_ipnet(&net), "10.1.2.3/24");
    }

    #[test]
    fn test_parse_cidr_v6() {
        let net = parse_cidr("fd00::5/64").unwrap();
        assert_eq!(net.prefix_len(), 64);
        assert_eq!(ip_octets(&net.addr()).len(), 16);
    }

    #[test]
    fn test_parse_cidr_rejects_garbage() {
        assert!(parse_cidr("10.0.0.1").is_err());
        assert!(parse_cidr("10.0.0.1/33").is_err());
        assert!(parse_cidr("not-an-ip/8").is_err());
    }

    #[test]
    fn test_parse_ip() {
        let ip = parse_ip("192.168.1.1").unwrap();
        assert_eq!(ip_octets(&ip), vec![192, 168, 1, 1]);
        assert_eq!(format_ip(&ip), "192.168.1.1");
        assert!(parse_ip("192.168.1").is_err());
    }

    #[test]
    fn test_octets_round_trip() {
        let ip = ip_from_octets(&[10, 0, 0, 1]).unwrap();
        assert_eq!(ip, IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)));

        let net = ipnet_from_octets(&[10, 0, 0, 1], 8).unwrap();
        assert_eq!(net.to_string(), "10.0.0.1/8");

        assert!(ip_from_octets(&[1, 2, 3]).is_err());
        assert!(ipnet_from_octets(&[10, 0, 0, 1], 40).is_err());
    }
}
