//! Endpoint URL templating from a base domain

use crate::types::ProbeName;
use std::collections::BTreeMap;
use url::form_urlencoded;

const CALLBACK_QUERY: &str = "ip/?callback=?";

/// Build the default probe endpoint map for a base domain.
///
/// A blank `domain` falls back to the built-in default; a blank `lookup_domain`
/// falls back to `domain`.
pub fn default_endpoints(domain: &str, lookup_domain: &str, packet_size: usize) -> BTreeMap<ProbeName, String> {
    let domain = match domain.trim() {
        "" => crate::defaults::DEFAULT_DOMAIN,
        d => d,
    };
    let lookup = match lookup_domain.trim() {
        "" => domain,
        l => l,
    };

    let mut endpoints = BTreeMap::new();
    endpoints.insert(ProbeName::Ipv4Dns, basic_url("ipv4", domain));
    endpoints.insert(ProbeName::Ipv6Dns, basic_url("ipv6", domain));
    endpoints.insert(ProbeName::DualStack, basic_url("ds", domain));
    endpoints.insert(ProbeName::DualStackMtu, mtu_url("ds", domain, packet_size));
    endpoints.insert(ProbeName::Ipv6Mtu, mtu_url("mtu1280", domain, packet_size));
    endpoints.insert(ProbeName::DnsV6Resolver, basic_url("ds.v6ns", domain));
    endpoints.insert(ProbeName::AsnV4, asn_url("ipv4", lookup));
    endpoints.insert(ProbeName::AsnV6, asn_url("ipv6", lookup));
    endpoints
}

fn basic_url(prefix: &str, domain: &str) -> String {
    format!("https://{}.{}/{}", prefix, domain, CALLBACK_QUERY)
}

fn mtu_url(prefix: &str, domain: &str, packet_size: usize) -> String {
    format!(
        "{}&size={}&fill={}",
        basic_url(prefix, domain),
        packet_size,
        fill_payload(packet_size)
    )
}

fn asn_url(prefix: &str, lookup_domain: &str) -> String {
    format!("https://{}.lookup.{}/{}&asn=1", prefix, lookup_domain, CALLBACK_QUERY)
}

/// `packet_size` repetitions of `x`, query-encoded
pub fn fill_payload(packet_size: usize) -> String {
    let fill = "x".repeat(packet_size);
    form_urlencoded::byte_serialize(fill.as_bytes()).collect()
}
