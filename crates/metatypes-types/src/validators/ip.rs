//! IP addresses: validation, range membership and client address resolution

use crate::contract::{DataType, TypeMeta};
use crate::enums::fixed_enum;
use crate::string::{parse_constrained, StringConstraints};
use crate::value::Value;
use log::{debug, warn};
use metatypes_diagnostics::{describe_value, DataTypeError, Result, DT0011, DT0107};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};

fixed_enum! {
    pub enum IpFamily ("IpFamily") {
        V4 = "IPv4" => "IPv4",
        V6 = "IPv6" => "IPv6",
    }
}

impl IpFamily {
    pub fn of(address: &IpAddr) -> Self {
        match address {
            IpAddr::V4(_) => Self::V4,
            IpAddr::V6(_) => Self::V6,
        }
    }
}

/// Parse an address, accepting IPv6 in square brackets
pub fn parse_ip(raw: &str) -> Option<IpAddr> {
    let raw = raw.trim();
    let raw = raw
        .strip_prefix('[')
        .and_then(|r| r.strip_suffix(']'))
        .unwrap_or(raw);
    raw.parse().ok()
}

pub fn is_ipv4(raw: &str) -> bool {
    matches!(parse_ip(raw), Some(IpAddr::V4(_)))
}

pub fn is_ipv6(raw: &str) -> bool {
    matches!(parse_ip(raw), Some(IpAddr::V6(_)))
}

/// Full eight-group notation: `2001:800::1` -> `2001:0800:0000:0000:0000:0000:0000:0001`
pub fn expand_ipv6(raw: &str) -> Option<String> {
    match parse_ip(raw)? {
        IpAddr::V6(ip) => Some(
            ip.segments()
                .iter()
                .map(|s| format!("{:04x}", s))
                .collect::<Vec<_>>()
                .join(":"),
        ),
        IpAddr::V4(_) => None,
    }
}

/// Normalized address string; empty input stays empty
pub fn cast(value: &Value) -> Result<Value> {
    let cast = crate::string::cast(value)?;
    let Value::String(s) = &cast else {
        return Ok(cast);
    };
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(Value::string(""));
    }
    parse_ip(trimmed)
        .map(|ip| Value::String(ip.to_string()))
        .ok_or_else(|| {
            DataTypeError::casting(
                DT0011,
                format!("{} is not a valid IP address", describe_value(s, false)),
            )
        })
}

fn ipv4_prefix_mask(bits: u32) -> u32 {
    u32::MAX.checked_shl(32 - bits).unwrap_or(0)
}

fn ipv6_prefix_mask(bits: u32) -> u128 {
    u128::MAX.checked_shl(128 - bits).unwrap_or(0)
}

/// Inclusive bounds of an IPv4 range given as wildcard, CIDR, start-end
/// or a single address
pub fn ipv4_range_bounds(range: &str) -> Option<(u32, u32)> {
    let range = range.trim();
    let parse = |s: &str| s.trim().parse::<Ipv4Addr>().ok().map(u32::from);

    if let Some((start, end)) = range.split_once('-') {
        let (start, end) = (parse(start)?, parse(end)?);
        return Some((start.min(end), start.max(end)));
    }

    if let Some((base, mask)) = range.split_once('/') {
        let base = parse(base)?;
        let mask = match mask.trim().parse::<u32>() {
            Ok(bits) if bits <= 32 => ipv4_prefix_mask(bits),
            Ok(_) => return None,
            Err(_) => parse(mask)?,
        };
        let start = base & mask;
        return Some((start, start | !mask));
    }

    if range.contains('*') {
        let mut octets: Vec<&str> = range.split('.').collect();
        if octets.len() < 4 && octets.last() == Some(&"*") {
            octets.resize(4, "*");
        }
        let pattern = octets.join(".");
        let lower = parse(&pattern.replace('*', "0"))?;
        let upper = parse(&pattern.replace('*', "255"))?;
        return Some((lower, upper));
    }

    let single = parse(range)?;
    Some((single, single))
}

/// Inclusive bounds of an IPv6 CIDR range; a bare address is a `/128`
pub fn ipv6_range_bounds(range: &str) -> Option<(u128, u128)> {
    let (base, bits) = match range.trim().split_once('/') {
        Some((base, bits)) => (base, bits.trim().parse::<u32>().ok().filter(|b| *b <= 128)?),
        None => (range, 128),
    };
    let IpAddr::V6(base) = parse_ip(base)? else {
        return None;
    };
    let mask = ipv6_prefix_mask(bits);
    let start = u128::from(base) & mask;
    Some((start, start | !mask))
}

pub fn is_ipv4_in_range(ip: &str, range: &str) -> bool {
    let Some(IpAddr::V4(ip)) = parse_ip(ip) else {
        return false;
    };
    let ip = u32::from(ip);
    ipv4_range_bounds(range).is_some_and(|(start, end)| (start..=end).contains(&ip))
}

pub fn is_ipv6_in_range(ip: &str, range: &str) -> bool {
    let Some(IpAddr::V6(ip)) = parse_ip(ip) else {
        return false;
    };
    let ip = u128::from(ip);
    ipv6_range_bounds(range).is_some_and(|(start, end)| (start..=end).contains(&ip))
}

/// Range membership for either family. Invalid input is never in range.
pub fn is_ip_in_range(ip: &str, range: &str) -> bool {
    match parse_ip(ip) {
        Some(IpAddr::V4(_)) => is_ipv4_in_range(ip, range),
        Some(IpAddr::V6(_)) => is_ipv6_in_range(ip, range),
        None => false,
    }
}

fn is_trusted(ip: &str, trusted_proxies: &[&str]) -> bool {
    trusted_proxies.iter().any(|range| is_ip_in_range(ip, range))
}

/// Client address of a request.
///
/// `X-Forwarded-For` is only consulted when the direct peer is one of the
/// `trusted_proxies` (addresses or ranges). The header is walked from the
/// nearest hop outwards, skipping further trusted proxies; the first
/// remaining entry must be a valid address. Otherwise the peer address is
/// returned unchanged.
pub fn find_ip_address(peer: &str, forwarded_for: Option<&str>, trusted_proxies: &[&str]) -> String {
    let Some(header) = forwarded_for.filter(|h| !h.trim().is_empty()) else {
        return peer.to_string();
    };
    if !is_trusted(peer, trusted_proxies) {
        warn!("Ignoring X-Forwarded-For from untrusted peer {}", peer);
        return peer.to_string();
    }

    let hops: Vec<&str> = header.split(',').map(str::trim).collect();
    let candidate = hops
        .iter()
        .rev()
        .find(|hop| !is_trusted(hop, trusted_proxies))
        .or_else(|| hops.first());

    match candidate.and_then(|hop| parse_ip(hop)) {
        Some(ip) => {
            debug!("Resolved client address {} via proxy {}", ip, peer);
            ip.to_string()
        }
        None => {
            warn!("Invalid X-Forwarded-For entry from proxy {}", peer);
            peer.to_string()
        }
    }
}

/// IP address string, optionally restricted to one family
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IpAddressDataType {
    #[serde(flatten)]
    pub meta: TypeMeta,
    #[serde(flatten)]
    pub constraints: StringConstraints,
    pub ip_family: Option<IpFamily>,
}

impl IpAddressDataType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_family(mut self, family: IpFamily) -> Self {
        self.ip_family = Some(family);
        self
    }
}

impl DataType for IpAddressDataType {
    crate::data_type_basics!("IPAddress");

    fn cast(&self, value: &Value) -> Result<Value> {
        cast(value)
    }

    fn parse(&self, value: &Value) -> Result<Value> {
        let parsed = parse_constrained(self, &self.constraints, value)?;
        if let (Some(family), Some(ip)) = (self.ip_family, parsed.as_str().and_then(parse_ip)) {
            if IpFamily::of(&ip) != family {
                let err = DataTypeError::validation(
                    DT0107,
                    format!(
                        "{} is not an {} address",
                        describe_value(&ip.to_string(), self.is_sensitive()),
                        family
                    ),
                );
                return Err(self.to_validation_error(err));
            }
        }
        Ok(parsed)
    }

    fn validation_description(&self) -> String {
        match self.ip_family {
            Some(family) => format!("{} address", family),
            None => "IPv4 or IPv6 address".to_string(),
        }
    }

    fn check_configuration(&self) -> Result<()> {
        self.constraints.check_configuration()
    }
}
