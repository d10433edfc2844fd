//! Probe catalog

use crate::models::ProbeDefinition;
use crate::types::ProbeName;
use std::collections::BTreeMap;

struct CatalogEntry {
    name: ProbeName,
    description: &'static str,
    category: &'static str,
    requires_ipv6: bool,
    large_payload: bool,
}

const ENTRIES: [CatalogEntry; 8] = [
    CatalogEntry { name: ProbeName::Ipv4Dns, description: "A-only hostname reachability", category: "connectivity", requires_ipv6: false, large_payload: false },
    CatalogEntry { name: ProbeName::Ipv6Dns, description: "AAAA-only hostname reachability", category: "connectivity", requires_ipv6: true, large_payload: false },
    CatalogEntry { name: ProbeName::DualStack, description: "Dual-stack hostname reachability", category: "connectivity", requires_ipv6: false, large_payload: false },
    CatalogEntry { name: ProbeName::DualStackMtu, description: "Dual-stack large-payload reachability", category: "mtu", requires_ipv6: false, large_payload: true },
    CatalogEntry { name: ProbeName::Ipv6Mtu, description: "IPv6 large-payload reachability", category: "mtu", requires_ipv6: true, large_payload: true },
    CatalogEntry { name: ProbeName::DnsV6Resolver, description: "Resolver reachability to IPv6-only auth", category: "dns", requires_ipv6: false, large_payload: false },
    CatalogEntry { name: ProbeName::AsnV4, description: "ASN lookup over IPv4", category: "metadata", requires_ipv6: false, large_payload: false },
    CatalogEntry { name: ProbeName::AsnV6, description: "ASN lookup over IPv6", category: "metadata", requires_ipv6: true, large_payload: false },
];

/// Describe every probe with the URL it would hit
pub fn catalog(endpoints: &BTreeMap<ProbeName, String>, packet_size: usize) -> Vec<ProbeDefinition> {
    ENTRIES
        .iter()
        .map(|entry| ProbeDefinition {
            name: entry.name,
            description: entry.description.to_string(),
            category: entry.category.to_string(),
            requires_ipv6: entry.requires_ipv6,
            large_payload: entry.large_payload,
            example_url: endpoints.get(&entry.name).cloned().unwrap_or_default(),
            packet_size: entry.large_payload.then_some(packet_size),
        })
        .collect()
}
