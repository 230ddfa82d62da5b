//! Client identification utilities
//!
//! Extracts the request metadata recorded with audited actions
//! (download log rows): client IP and User-Agent.

use axum::http::{HeaderMap, header};
use std::net::{AddrParseError, IpAddr};

/// Longest User-Agent kept for audit rows
pub const MAX_USER_AGENT_LEN: usize = 512;

/// Client metadata captured for audit trails
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    /// Client IP address (forwarded by a trusted proxy, or the direct peer)
    pub ip: Option<IpAddr>,
    /// User-Agent header, truncated to [`MAX_USER_AGENT_LEN`] bytes
    pub user_agent: Option<String>,
}

impl ClientInfo {
    pub fn new(ip: Option<IpAddr>, user_agent: Option<String>) -> Self {
        Self { ip, user_agent }
    }
}

/// Reverse proxies whose forwarding headers are believed.
///
/// Empty by default: X-Forwarded-For and X-Real-IP are ignored and the
/// socket peer is recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustedProxies(Vec<IpAddr>);

impl TrustedProxies {
    pub fn new(proxies: Vec<IpAddr>) -> Self {
        Self(proxies)
    }

    /// Comma-separated addresses, e.g. `10.0.0.2, 10.0.0.3`
    pub fn parse(list: &str) -> Result<Self, AddrParseError> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<IpAddr>, _>>()
            .map(Self)
    }

    pub fn contains(&self, ip: &IpAddr) -> bool {
        self.0.contains(ip)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Extract client metadata from request headers
///
/// Audit logging never rejects a request with a
/// missing User-Agent; the field is simply absent.
pub fn extract_client_info(
    headers: &HeaderMap,
    direct_ip: Option<IpAddr>,
    proxies: &TrustedProxies,
) -> ClientInfo {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|ua| truncate_utf8(ua, MAX_USER_AGENT_LEN).to_string());

    ClientInfo::new(extract_client_ip(headers, direct_ip, proxies), user_agent)
}

/// Extract client IP address
///
/// Forwarding headers count only when the direct peer is a trusted proxy.
/// X-Forwarded-For is walked right to left, skipping trusted hops; the first
/// other address is the client. X-Real-IP is the fallback, then the peer.
pub fn extract_client_ip(
    headers: &HeaderMap,
    direct_ip: Option<IpAddr>,
    proxies: &TrustedProxies,
) -> Option<IpAddr> {
    let peer = direct_ip?;
    if !proxies.contains(&peer) {
        return Some(peer);
    }

    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|xff| {
            let hops: Vec<IpAddr> = xff
                .split(',')
                .map_while(|hop| hop.trim().parse::<IpAddr>().ok())
                .collect();
            hops.iter()
                .rev()
                .find(|ip| !proxies.contains(ip))
                .or(hops.first())
                .copied()
        });

    forwarded
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .and_then(|ip| ip.trim().parse::<IpAddr>().ok())
        })
        .or(Some(peer))
}

fn truncate_utf8(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    fn proxy() -> TrustedProxies {
        TrustedProxies::new(vec![ip("10.0.0.2")])
    }

    #[test]
    fn test_extract_client_info() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_static("Mozilla/5.0 Test Browser"),
        );
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7"));

        let info = extract_client_info(&headers, Some(ip("10.0.0.2")), &proxy());
        assert_eq!(info.user_agent.as_deref(), Some("Mozilla/5.0 Test Browser"));
        assert_eq!(info.ip, Some(ip("203.0.113.7")));
    }

    #[test]
    fn test_missing_user_agent_is_not_an_error() {
        let direct = ip("127.0.0.1");
        let info = extract_client_info(&HeaderMap::new(), Some(direct), &TrustedProxies::default());
        assert_eq!(info.user_agent, None);
        assert_eq!(info.ip, Some(direct));
    }

    #[test]
    fn test_user_agent_truncated() {
        let long = "a".repeat(MAX_USER_AGENT_LEN + 100);
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_str(&long).unwrap());

        let info = extract_client_info(&headers, None, &TrustedProxies::default());
        assert_eq!(info.user_agent.unwrap().len(), MAX_USER_AGENT_LEN);
    }

    #[test]
    fn test_forwarded_headers_ignored_from_untrusted_peer() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("1.2.3.4"));
        headers.insert("x-real-ip", HeaderValue::from_static("5.6.7.8"));

        let peer = ip("198.51.100.20");
        assert_eq!(extract_client_ip(&headers, Some(peer), &proxy()), Some(peer));
        assert_eq!(
            extract_client_ip(&headers, Some(peer), &TrustedProxies::default()),
            Some(peer)
        );
    }

    #[test]
    fn test_xff_rightmost_untrusted_hop() {
        let mut headers = HeaderMap::new();
        // Client-supplied prefix, then what the proxy appended
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("6.6.6.6, 192.168.1.1, 10.0.0.2"),
        );

        let ip_seen = extract_client_ip(&headers, Some(ip("10.0.0.2")), &proxy());
        assert_eq!(ip_seen, Some(ip("192.168.1.1")));
    }

    #[test]
    fn test_x_real_ip_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("203.0.113.50"));

        let ip_seen = extract_client_ip(&headers, Some(ip("10.0.0.2")), &proxy());
        assert_eq!(ip_seen, Some(ip("203.0.113.50")));
    }

    #[test]
    fn test_garbage_xff_falls_back_to_peer() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("not-an-ip"));
        let direct = ip("10.0.0.2");

        assert_eq!(extract_client_ip(&headers, Some(direct), &proxy()), Some(direct));
    }

    #[test]
    fn test_trusted_proxies_parse() {
        let parsed = TrustedProxies::parse("10.0.0.2, ::1,").unwrap();
        assert!(parsed.contains(&ip("10.0.0.2")));
        assert!(parsed.contains(&ip("::1")));
        assert!(TrustedProxies::parse("").unwrap().is_empty());
        assert!(TrustedProxies::parse("10.0.0.300").is_err());
    }
}
