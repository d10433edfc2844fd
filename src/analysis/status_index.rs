//! Per-signal status slots derived from a run

use crate::{
    models::{IpObservation, RunResult},
    types::{IpFamily, ProbeName, Status},
};

/// One status per logical signal plus the best known observations.
///
/// The dual-stack probe is answered by whichever family the client picked,
/// so its status lands in `ds4` or `ds6` by observed family and the other
/// slot becomes `bad` unless something already set it.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusIndex<'a> {
    /// ipv4_dns
    pub a: Status,
    /// ipv6_dns
    pub aaaa: Status,
    pub ds4: Status,
    pub ds6: Status,
    pub dsmtu: Status,
    pub v6mtu: Status,
    pub v6ns: Status,
    pub ipv4: Option<&'a IpObservation>,
    pub ipv6: Option<&'a IpObservation>,
}

#[derive(Default)]
struct Slots<'a> {
    a: Option<Status>,
    aaaa: Option<Status>,
    ds4: Option<Status>,
    ds6: Option<Status>,
    dsmtu: Option<Status>,
    v6mtu: Option<Status>,
    v6ns: Option<Status>,
    ipv4: Option<&'a IpObservation>,
    ipv6: Option<&'a IpObservation>,
}

impl<'a> StatusIndex<'a> {
    pub fn build(run: &'a RunResult) -> Self {
        let mut slots = Slots::default();

        for result in &run.results {
            match result.name {
                ProbeName::Ipv4Dns => {
                    slots.a = Some(result.status);
                    if slots.ipv4.is_none() {
                        slots.ipv4 = result.observation_of(IpFamily::Ipv4);
                    }
                }
                ProbeName::Ipv6Dns => {
                    slots.aaaa = Some(result.status);
                    if slots.ipv6.is_none() {
                        slots.ipv6 = result.observation_of(IpFamily::Ipv6);
                    }
                }
                ProbeName::DualStack => match result.observation_of(IpFamily::Ipv6) {
                    Some(observed) => {
                        slots.ds6 = Some(result.status);
                        slots.ds4.get_or_insert(Status::Bad);
                        slots.ipv6.get_or_insert(observed);
                    }
                    None => {
                        slots.ds4 = Some(result.status);
                        slots.ds6.get_or_insert(Status::Bad);
                        if slots.ipv4.is_none() {
                            slots.ipv4 = result.observation_of(IpFamily::Ipv4);
                        }
                    }
                },
                ProbeName::DualStackMtu => slots.dsmtu = Some(result.status),
                ProbeName::Ipv6Mtu => slots.v6mtu = Some(result.status),
                ProbeName::DnsV6Resolver => slots.v6ns = Some(result.status),
                ProbeName::AsnV4 | ProbeName::AsnV6 => {}
            }
        }

        // Run-level observations (ASN probes included) fill any gap
        let ipv4 = slots.ipv4.or(run.ipv4.as_ref());
        let ipv6 = slots.ipv6.or(run.ipv6.as_ref());

        let or_skipped = |slot: Option<Status>| slot.unwrap_or(Status::Skipped);
        Self {
            a: or_skipped(slots.a),
            aaaa: or_skipped(slots.aaaa),
            ds4: or_skipped(slots.ds4),
            ds6: or_skipped(slots.ds6),
            dsmtu: or_skipped(slots.dsmtu),
            v6mtu: or_skipped(slots.v6mtu),
            v6ns: or_skipped(slots.v6ns),
            ipv4,
            ipv6,
        }
    }

    /// An IPv4 observation with a non-empty address
    pub fn has_ipv4(&self) -> bool {
        self.ipv4.map(IpObservation::has_address).unwrap_or(false)
    }

    /// An IPv6 observation with a non-empty address
    pub fn has_ipv6(&self) -> bool {
        self.ipv6.map(IpObservation::has_address).unwrap_or(false)
    }

    pub fn ipv6_is_tunnel(&self) -> bool {
        self.ipv6.map(IpObservation::is_tunnel).unwrap_or(false)
    }

    pub fn ipv6_subtype_is(&self, subtype: &str) -> bool {
        self.ipv6.map(|obs| obs.is_subtype(subtype)).unwrap_or(false)
    }

    pub fn mini_primary(&self) -> String {
        [self.a, self.aaaa, self.ds4, self.ds6].iter().map(Status::as_char).collect()
    }

    pub fn mini_secondary(&self) -> String {
        [self.v6mtu, self.v6ns].iter().map(Status::as_char).collect()
    }
}
