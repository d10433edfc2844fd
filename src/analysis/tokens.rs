//! Token derivation rules
//!
//! Rules run in a fixed order and most append at most one token. Order and
//! the mutual exclusivity of the primary bucket both matter for the verdict,
//! so the rules are plain conditionals rather than a registry.

use super::{DiagnosticToken, StatusIndex};
use crate::types::Status;
use std::collections::HashSet;

/// Derive the ordered token list for an index.
///
/// `mini_primary` becomes the only token when no rule fires.
pub fn derive_tokens(index: &StatusIndex<'_>, mini_primary: &str) -> Vec<DiagnosticToken> {
    let mut tokens = Vec::new();

    let has_ipv4 = index.has_ipv4();
    let has_ipv6 = index.has_ipv6();

    // Address presence
    match (has_ipv4, has_ipv6) {
        (false, false) => tokens.push(DiagnosticToken::NO_ADDRESS),
        (false, true) => tokens.push(DiagnosticToken::IPV4_NO_ADDRESS),
        (true, false) => tokens.push(DiagnosticToken::IPV6_NO_ADDRESS),
        (true, true) => {}
    }

    // Primary bucket
    match (has_ipv4, has_ipv6) {
        (true, false) => {
            tokens.push(match index.ds6 {
                Status::Slow => DiagnosticToken::IPV4_ONLY_DS_SLOW,
                Status::Timeout | Status::Bad | Status::Error => DiagnosticToken::IPV4_ONLY_DS_TIMEOUT,
                Status::Ok | Status::Skipped => DiagnosticToken::IPV4_ONLY_DS_GOOD,
            });
            tokens.push(DiagnosticToken::IPV4_ONLY);
        }
        (false, true) => tokens.push(DiagnosticToken::IPV6_ONLY),
        (true, true) => {
            if matches!(index.ds6, Status::Bad | Status::Timeout | Status::Error) {
                tokens.push(DiagnosticToken::AVOIDS_IPV6);
            } else {
                tokens.push(DiagnosticToken::DUALSTACK_SAFE);
            }
        }
        (false, false) => {}
    }

    // Resolver reachability over IPv6
    if (index.ds4.is_healthy() || index.ds6.is_healthy()) && index.v6ns != Status::Skipped {
        tokens.push(if index.v6ns.is_healthy() {
            DiagnosticToken::V6NS_OK
        } else {
            DiagnosticToken::V6NS_BAD
        });
    }

    // Large packets fail while basic IPv6 works
    if index.aaaa.is_healthy() && (index.v6mtu.is_unhealthy() || index.dsmtu.is_unhealthy()) {
        tokens.push(DiagnosticToken::IPV6_MTU);
    }

    if !has_ipv6 || index.ipv6_is_tunnel() {
        if index.dsmtu.is_healthy() || index.dsmtu == Status::Skipped {
            tokens.push(DiagnosticToken::NEEDS_IPV6);
        }
    } else if !index.dsmtu.is_healthy() && index.dsmtu != Status::Skipped {
        tokens.push(DiagnosticToken::DUALSTACK_UNSAFE);
    }

    if index.ipv6_subtype_is("Teredo") {
        tokens.push(DiagnosticToken::TEREDO);
    }
    if index.ipv6_subtype_is("6to4") {
        tokens.push(DiagnosticToken::SIX_TO_FOUR);
    }

    if tokens.is_empty() {
        tokens.push(DiagnosticToken::new(mini_primary));
    }
    tokens
}

/// Drop repeats, keeping the first occurrence
pub fn dedupe(tokens: Vec<DiagnosticToken>) -> Vec<DiagnosticToken> {
    let mut seen = HashSet::with_capacity(tokens.len());
    tokens.into_iter().filter(|t| seen.insert(t.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IpObservation;
    use crate::types::IpFamily;

    fn index_with<'a>(ipv4: Option<&'a IpObservation>, ipv6: Option<&'a IpObservation>) -> StatusIndex<'a> {
        StatusIndex {
            a: Status::Skipped,
            aaaa: Status::Skipped,
            ds4: Status::Skipped,
            ds6: Status::Skipped,
            dsmtu: Status::Skipped,
            v6mtu: Status::Skipped,
            v6ns: Status::Skipped,
            ipv4,
            ipv6,
        }
    }

    fn names(tokens: &[DiagnosticToken]) -> Vec<&str> {
        tokens.iter().map(DiagnosticToken::as_str).collect()
    }

    #[test]
    fn test_ipv4_only_refined_by_dual_stack() {
        let v4 = IpObservation::new("192.0.2.1", IpFamily::Ipv4);

        let mut index = index_with(Some(&v4), None);
        index.ds6 = Status::Slow;
        assert_eq!(
            names(&derive_tokens(&index, "oxox")),
            ["ipv6:no_address", "ipv4_only:ds_slow", "ipv4_only", "needs_ipv6"]
        );

        index.ds6 = Status::Error;
        assert!(names(&derive_tokens(&index, "oxob")).contains(&"ipv4_only:ds_timeout"));

        index.ds6 = Status::Skipped;
        assert!(names(&derive_tokens(&index, "oxox")).contains(&"ipv4_only:ds_good"));
    }

    #[test]
    fn test_dual_stack_bucket() {
        let v4 = IpObservation::new("192.0.2.1", IpFamily::Ipv4);
        let v6 = IpObservation::new("2001:db8::1", IpFamily::Ipv6);

        let mut index = index_with(Some(&v4), Some(&v6));
        index.ds6 = Status::Ok;
        let tokens = derive_tokens(&index, "oobo");
        assert_eq!(names(&tokens), ["dualstack:safe"]);

        index.ds6 = Status::Timeout;
        assert_eq!(names(&derive_tokens(&index, "oobt")), ["avoids_ipv6"]);
    }

    #[test]
    fn test_v6ns_requires_healthy_dual_stack() {
        let v6 = IpObservation::new("2001:db8::1", IpFamily::Ipv6);
        let mut index = index_with(None, Some(&v6));
        index.v6ns = Status::Timeout;
        assert!(!names(&derive_tokens(&index, "xxxx")).contains(&"v6ns:bad"));

        index.ds4 = Status::Slow;
        assert!(names(&derive_tokens(&index, "xxsx")).contains(&"v6ns:bad"));

        index.v6ns = Status::Ok;
        assert!(names(&derive_tokens(&index, "xxsx")).contains(&"v6ns:ok"));
    }

    #[test]
    fn test_mtu_problem_and_unsafe() {
        let v4 = IpObservation::new("192.0.2.1", IpFamily::Ipv4);
        let v6 = IpObservation::new("2001:db8::1", IpFamily::Ipv6);
        let mut index = index_with(Some(&v4), Some(&v6));
        index.aaaa = Status::Ok;
        index.ds6 = Status::Ok;
        index.dsmtu = Status::Timeout;

        let tokens = derive_tokens(&index, "oobo");
        assert_eq!(names(&tokens), ["dualstack:safe", "IPv6 MTU", "dualstack:unsafe"]);

        // No MTU warning when plain IPv6 already fails
        index.aaaa = Status::Timeout;
        assert!(!names(&derive_tokens(&index, "otbo")).contains(&"IPv6 MTU"));
    }

    #[test]
    fn test_tunnels_need_ipv6() {
        let teredo = IpObservation::new("2001:0:4136::1", IpFamily::Ipv6).with_subtype("teredo");
        let index = index_with(None, Some(&teredo));
        assert_eq!(
            names(&derive_tokens(&index, "xxxx")),
            ["ipv4:no_address", "ipv6_only", "needs_ipv6", "teredo"]
        );

        let six_to_four = IpObservation::new("2002:c000:201::1", IpFamily::Ipv6).with_subtype("6to4");
        let index = index_with(None, Some(&six_to_four));
        assert!(names(&derive_tokens(&index, "xxxx")).contains(&"6to4"));
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let tokens = vec![
            DiagnosticToken::NEEDS_IPV6,
            DiagnosticToken::TEREDO,
            DiagnosticToken::new("needs_ipv6"),
            DiagnosticToken::IPV6_ONLY,
            DiagnosticToken::TEREDO,
        ];
        assert_eq!(names(&dedupe(tokens)), ["needs_ipv6", "teredo", "ipv6_only"]);
    }
}
