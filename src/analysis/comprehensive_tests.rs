//! Comprehensive tests for the analysis pipeline
//!
//! Whole-run scenarios plus property-based checks over arbitrary probe
//! outcomes.

use super::*;
use crate::{
    models::{IpObservation, ProbeResult, RunResult},
    runner::{first_observations, parse_ip_observation},
    types::{IpFamily, ProbeName, Status},
};
use proptest::prelude::*;
use std::time::Duration;

fn ok(name: ProbeName) -> ProbeResult {
    probe(name, Status::Ok)
}

fn probe(name: ProbeName, status: Status) -> ProbeResult {
    ProbeResult::attempted(name, format!("https://{}.example/ip/", name), status, Duration::from_millis(25))
}

fn v4(ip: &str) -> Option<IpObservation> {
    Some(IpObservation::new(ip, IpFamily::Ipv4))
}

fn v6(ip: &str) -> Option<IpObservation> {
    Some(IpObservation::new(ip, IpFamily::Ipv6))
}

/// Run with observations aggregated the way the runner does it
fn run_of(results: Vec<ProbeResult>) -> RunResult {
    let mut run = RunResult::empty("run-scenario");
    let (ipv4, ipv6) = first_observations(&results);
    run.ipv4 = ipv4;
    run.ipv6 = ipv6;
    run.results = results;
    run
}

mod scenarios {
    use super::*;

    #[test]
    fn test_healthy_dual_stack() {
        let run = run_of(vec![
            ok(ProbeName::Ipv4Dns).with_observation(v4("192.0.2.10")),
            ok(ProbeName::Ipv6Dns).with_observation(v6("2001:db8::10")),
            ok(ProbeName::DualStack).with_observation(v6("2001:db8::10")),
            ok(ProbeName::DualStackMtu).with_observation(v6("2001:db8::10")),
            ok(ProbeName::Ipv6Mtu).with_observation(v6("2001:db8::10")),
            ok(ProbeName::DnsV6Resolver).with_observation(v6("2001:db8::10")),
            ok(ProbeName::AsnV4).with_observation(v4("192.0.2.10")),
            ok(ProbeName::AsnV6).with_observation(v6("2001:db8::10")),
        ]);

        let analysis = analyze(&run);
        assert!(analysis.has_token("dualstack:safe"));
        assert!(analysis.has_token("v6ns:ok"));
        assert!(!analysis.has_token("needs_ipv6"));
        assert_eq!(analysis.score_transition, 10);
        assert_eq!(analysis.score_strict, 10);
        assert_eq!(analysis.mini_primary, "oobo");
        assert_eq!(analysis.mini_secondary, "oo");
    }

    #[test]
    fn test_ipv4_only_with_dual_stack_over_ipv4() {
        // The dual-stack answer over IPv4 leaves the IPv6 slot at bad
        let run = run_of(vec![
            ok(ProbeName::Ipv4Dns).with_observation(v4("192.0.2.20")),
            probe(ProbeName::Ipv6Dns, Status::Timeout),
            ok(ProbeName::DualStack).with_observation(v4("192.0.2.20")),
        ]);

        let analysis = analyze(&run);
        assert_eq!(analysis.mini_primary, "otob");
        assert_eq!(
            analysis.token_names(),
            ["ipv4_only", "ipv4_only:ds_timeout", "ipv6:no_address", "needs_ipv6"]
        );
        assert_eq!(analysis.score_strict, 0);
        assert_eq!(analysis.score_transition, 5);
    }

    #[test]
    fn test_teredo_only() {
        let teredo = IpObservation::new("2001:0:4136:e378::1", IpFamily::Ipv6).with_subtype("Teredo");
        let run = run_of(vec![
            probe(ProbeName::Ipv4Dns, Status::Error),
            ok(ProbeName::Ipv6Dns).with_observation(Some(teredo)),
        ]);

        let analysis = analyze(&run);
        assert!(analysis.has_token("ipv6_only"));
        assert!(analysis.has_token("teredo"));
        assert!(analysis.has_token("ipv4:no_address"));

        let teredo = analysis.tokens.iter().find(|t| t.token.as_str() == "teredo").unwrap();
        assert!(teredo.more_info.is_none());
        assert_eq!(analysis.score_transition, 0);
    }

    #[test]
    fn test_skipped_probe_leaves_slot_skipped() {
        let run = run_of(vec![
            ok(ProbeName::Ipv4Dns).with_observation(v4("192.0.2.30")),
            ProbeResult::skipped(ProbeName::DnsV6Resolver),
            ProbeResult::skipped(ProbeName::Ipv6Mtu),
            ok(ProbeName::DualStack).with_observation(v4("192.0.2.30")),
        ]);

        let index = StatusIndex::build(&run);
        assert_eq!(index.v6ns, Status::Skipped);
        assert_eq!(index.v6mtu, Status::Skipped);

        let analysis = analyze(&run);
        assert_eq!(analysis.mini_secondary, "xx");
        assert!(!analysis.has_token("v6ns:ok"));
        assert!(!analysis.has_token("v6ns:bad"));
    }

    #[test]
    fn test_jsonp_body_feeds_analysis() {
        let observed = parse_ip_observation(br#"callback({"ip":"2001:db8::1","type":"ipv6"});"#);
        assert_eq!(observed.as_ref().map(|o| o.family), Some(IpFamily::Ipv6));

        let run = run_of(vec![ok(ProbeName::Ipv6Dns).with_observation(observed)]);
        assert_eq!(run.ipv6.as_ref().map(|o| o.ip.as_str()), Some("2001:db8::1"));
        assert!(analyze(&run).has_token("ipv6_only"));
    }

    #[test]
    fn test_no_results_starts_with_no_address() {
        let analysis = analyze(&RunResult::empty("run-none"));
        let tokens = dedupe(derive_tokens(&StatusIndex::build(&RunResult::empty("run-none")), "xxxx"));
        assert_eq!(tokens.first(), Some(&DiagnosticToken::NO_ADDRESS));
        assert_ne!(analysis.score_transition, NOT_APPLICABLE);
    }

    #[test]
    fn test_avoids_ipv6() {
        let run = run_of(vec![
            ok(ProbeName::Ipv4Dns).with_observation(v4("192.0.2.40")),
            ok(ProbeName::Ipv6Dns).with_observation(v6("2001:db8::40")),
            probe(ProbeName::DualStack, Status::Timeout),
        ]);

        let analysis = analyze(&run);
        assert!(analysis.has_token("avoids_ipv6"));
        let avoids = analysis.tokens.iter().find(|t| t.token.as_str() == "avoids_ipv6").unwrap();
        assert_eq!(avoids.color, TokenColor::Orange);
        assert_eq!(avoids.more_info.as_deref(), Some("faq_avoids_ipv6.html"));
    }

    #[test]
    fn test_mtu_blackhole() {
        let run = run_of(vec![
            ok(ProbeName::Ipv4Dns).with_observation(v4("192.0.2.50")),
            ok(ProbeName::Ipv6Dns).with_observation(v6("2001:db8::50")),
            ok(ProbeName::DualStack).with_observation(v6("2001:db8::50")),
            probe(ProbeName::DualStackMtu, Status::Timeout),
            probe(ProbeName::Ipv6Mtu, Status::Timeout),
        ]);

        let analysis = analyze(&run);
        assert!(analysis.has_token("IPv6 MTU"));
        assert!(analysis.has_token("dualstack:unsafe"));
        assert_eq!(analysis.tokens[0].token.as_str(), "IPv6 MTU");
        assert_eq!((analysis.score_transition, analysis.score_strict), (1, 1));
    }
}

mod properties {
    use super::*;

    const PRIMARY: [&str; 4] = ["ipv4_only", "ipv6_only", "avoids_ipv6", "dualstack:safe"];

    fn status() -> impl Strategy<Value = Status> {
        prop_oneof![
            Just(Status::Ok),
            Just(Status::Slow),
            Just(Status::Bad),
            Just(Status::Timeout),
            Just(Status::Skipped),
            Just(Status::Error),
        ]
    }

    fn observation() -> impl Strategy<Value = Option<IpObservation>> {
        prop_oneof![
            Just(None),
            Just(v4("192.0.2.1")),
            Just(v6("2001:db8::1")),
            Just(Some(IpObservation::new("2001:0::1", IpFamily::Ipv6).with_subtype("Teredo"))),
            Just(Some(IpObservation::new("2002:c000:201::1", IpFamily::Ipv6).with_subtype("6to4"))),
            Just(Some(IpObservation::new("", IpFamily::Ipv4))),
        ]
    }

    fn runs() -> impl Strategy<Value = RunResult> {
        proptest::collection::vec((status(), observation(), any::<bool>()), ProbeName::ALL.len()).prop_map(|slots| {
            let results = ProbeName::ALL
                .iter()
                .zip(slots)
                .filter(|(_, (_, _, present))| *present)
                .map(|(&name, (status, observed, _))| match status {
                    Status::Skipped => ProbeResult::skipped(name),
                    _ => probe(name, status).with_observation(observed),
                })
                .collect();
            run_of(results)
        })
    }

    proptest! {
        #[test]
        fn analysis_is_idempotent(run in runs()) {
            prop_assert_eq!(analyze(&run), analyze(&run));
        }

        #[test]
        fn expansion_is_deterministic(run in runs()) {
            let index = StatusIndex::build(&run);
            let tokens = dedupe(derive_tokens(&index, &index.mini_primary()));
            prop_assert_eq!(expand_tokens(&tokens), expand_tokens(&tokens));
        }

        #[test]
        fn tokens_are_never_empty_and_scores_bounded(run in runs()) {
            let analysis = analyze(&run);
            prop_assert!(!analysis.tokens.is_empty());
            prop_assert!((0..=MAX_SCORE).contains(&analysis.score_transition));
            prop_assert!((0..=MAX_SCORE).contains(&analysis.score_strict));
        }

        #[test]
        fn tokens_sorted_and_unique(run in runs()) {
            let names = analyze(&run).token_names().into_iter().map(String::from).collect::<Vec<_>>();
            let mut sorted = names.clone();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(names, sorted);
        }

        #[test]
        fn primary_bucket_is_exclusive(run in runs()) {
            let index = StatusIndex::build(&run);
            let analysis = analyze(&run);
            let primary = PRIMARY.iter().filter(|t| analysis.has_token(t)).count();

            if index.has_ipv4() || index.has_ipv6() {
                prop_assert_eq!(primary, 1);
            } else {
                prop_assert_eq!(primary, 0);
                prop_assert!(analysis.has_token("no_address"));
            }
        }

        #[test]
        fn mini_strings_have_fixed_shape(run in runs()) {
            let analysis = analyze(&run);
            prop_assert_eq!(analysis.mini_primary.len(), 4);
            prop_assert_eq!(analysis.mini_secondary.len(), 2);
            prop_assert!(analysis
                .mini_primary
                .chars()
                .chain(analysis.mini_secondary.chars())
                .all(|c| "ostbx".contains(c)));
        }
    }
}
