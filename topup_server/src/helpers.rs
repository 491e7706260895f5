use std::{net::IpAddr, str::FromStr};

use actix_web::HttpRequest;
use log::{debug, trace};
use regex::Regex;

/// Get the remote IP address from the request. It uses 3 sources to determine the IP address, in decreasing order
/// of preference:
/// 1. The `X-Forwarded-For` header, iif `use_x_forwarded_for` is set to true in the configuration.
/// 2. The `Forwarded` header, iif `use_forwarded` is set to true in the configuration.
/// 3. The peer address from the connection info.
pub fn get_remote_ip(req: &HttpRequest, use_x_forwarded_for: bool, use_forwarded: bool) -> Option<IpAddr> {
    let mut result = None;
    if use_x_forwarded_for {
        trace!("Checking X-Forwarded-For header");
        result = req.headers().get("X-Forwarded-For").and_then(|v| v.to_str().ok()).and_then(parse_x_forwarded_for);
        if let Some(ip) = result {
            debug!("Using X-Forwarded-For header for remote address: {ip}");
        }
    }
    if use_forwarded && result.is_none() {
        trace!("Checking Forwarded header");
        result = req.headers().get("Forwarded").and_then(|v| v.to_str().ok()).and_then(parse_forwarded);
        if let Some(ip) = result {
            debug!("Using Forwarded header for remote address: {ip}");
        }
    }
    result.or_else(|| {
        let peer_addr = req.peer_addr().map(|a| a.ip());
        trace!("Using Peer address for remote address: {:?}", peer_addr);
        peer_addr
    })
}

/// The first (client) entry of an `X-Forwarded-For` list.
pub fn parse_x_forwarded_for(value: &str) -> Option<IpAddr> {
    value.split(',').next().and_then(|s| IpAddr::from_str(s.trim()).ok())
}

/// The first `for=` entry of a `Forwarded` header (RFC 7239). Quoted and bracketed IPv6 values are accepted.
pub fn parse_forwarded(value: &str) -> Option<IpAddr> {
    let re = Regex::new(r#"(?i)for=(?P<ip>[^;,]+)"#).ok()?;
    let ip = re.captures(value)?.name("ip")?.as_str();
    let ip = ip.trim().trim_matches('"').trim_start_matches('[');
    // Strip an optional port, e.g. `[2001:db8::1]:4711` or `192.0.2.60:8080`
    let ip = match ip.split_once(']') {
        Some((v6, _)) => v6,
        None if ip.matches(':').count() == 1 => ip.split(':').next().unwrap_or(ip),
        None => ip,
    };
    IpAddr::from_str(ip).ok()
}
