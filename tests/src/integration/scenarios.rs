//! # Verification Scenarios
//!
//! End-to-end checks of the verifier on small hand-built networks, driven
//! through [`VerifierApi`] the way the update channel drives it.

#[cfg(test)]
mod tests {
    use crate::fixtures::{id, network, rule};
    use shared_types::parse_prefix;
    use vf_01_verification::{
        EquivalenceClass, ErrorKind, NetworkState, VerifierApi, VerifierService,
    };

    #[test]
    fn test_two_switch_loop_rooted_at_s1() {
        let service = VerifierService::new(network(
            "Loop\nS1:S2\nS2:S1\nH\nH1:S1\nR\nS1-10.0.0.0/24-S2\nS2-10.0.0.0/24-S1\n",
        ));

        let report = service.verify_all().unwrap();
        assert!(!report.well_formed);

        let errors = service.current_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Loop);
        assert_eq!(errors[0].starting_switch, id("S1"));
        assert_eq!(
            errors[0].ec,
            EquivalenceClass::from(parse_prefix("10.0.0.0/24").unwrap())
        );
    }

    #[test]
    fn test_black_hole_at_switch_without_rule_or_host() {
        let service = VerifierService::new(network(
            "Hole\nS1:S2\nS2:S1\nH\nH2:S2\nR\nS2-10.0.0.0/24-S1\n",
        ));

        let report = service.verify_all().unwrap();
        assert!(!report.well_formed);

        let errors = service.current_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::BlackHole);
        assert_eq!(errors[0].starting_switch, id("S2"));
        assert_eq!(errors[0].detected_at, id("S1"));
    }

    #[test]
    fn test_duplicate_add_is_refcounted() {
        let mut net = network("Dup\nS1:S2\nS2:S1\nH\nH1:S1\nR\n");
        let prefix = parse_prefix("10.0.0.0/24").unwrap();

        let first = net.add_rule(rule("S1-10.0.0.0/24-S2")).unwrap();
        assert!(!first.is_empty());
        assert_eq!(net.prefix_count(&prefix), 1);

        let second = net.add_rule(rule("S1-10.0.0.0/24-S2")).unwrap();
        assert!(second.is_empty());
        assert_eq!(net.prefix_count(&prefix), 2);
    }

    #[test]
    fn test_duplicate_add_through_service_skips_walks() {
        let service = VerifierService::new(NetworkState::new());
        assert!(service.add_rule(rule("S1-10.0.0.0/24-S2")).is_err());

        let service = VerifierService::new(network("Dup\nS1:S2\nS2:S1\nH\nH1:S1\nR\n"));
        service.add_rule(rule("S1-10.0.0.0/24-S2")).unwrap();
        let report = service.add_rule(rule("S1-10.0.0.0/24-S2")).unwrap();
        assert_eq!(report.affected_ecs, 0);
        assert_eq!(service.status().rules, 2);
    }

    #[test]
    fn test_loop_repaired_by_removal() {
        let service = VerifierService::new(network(
            "Loop\nS1:S2\nS2:S1\nH\nH1:S1\nH2:S2\nR\n",
        ));
        service.verify_all().unwrap();

        service.add_rule(rule("S1-10.0.0.0/16-S2")).unwrap();
        let report = service.add_rule(rule("S2-10.0.0.0/16-S1")).unwrap();
        assert!(!report.well_formed);
        assert!(report.new_errors.iter().all(|e| e.kind == ErrorKind::Loop));

        // A more specific rule delivers part of the range, the rest still loops.
        let report = service.add_rule(rule("S2-10.0.1.0/24-H2")).unwrap();
        assert!(!report.well_formed);
        assert!(report.new_errors.iter().all(|e| e.kind == ErrorKind::Loop));

        let report = service.remove_rule(&rule("S2-10.0.0.0/16-S1")).unwrap();
        assert!(report.well_formed);
        assert_eq!(report.total_errors, 0);
        assert!(service.current_errors().is_empty());
    }

    #[test]
    fn test_address_named_host_is_a_destination_for_any_ec() {
        let service = VerifierService::new(network(
            "Addr\nS1:S2\nS2:S1\nH\n10.0.0.1:S2\nH1:S1\nR\nS1-10.0.0.0/24-S2\n",
        ));
        let report = service.verify_all().unwrap();
        assert!(report.well_formed);
        assert!(service.current_errors().is_empty());
    }

    #[test]
    fn test_rule_toward_address_named_host_keeps_network_well_formed() {
        let service = VerifierService::new(network("Addr\nS1:\nH\n192.168.0.1:S1\nR\n"));
        assert!(service.verify_all().unwrap().well_formed);

        let report = service.add_rule(rule("S1-10.0.0.0/8-192.168.0.1")).unwrap();
        assert!(report.well_formed);
        assert_eq!(report.ec_count, 9);
        assert_eq!(report.total_errors, 0);
        assert!(service.verify_all().unwrap().well_formed);
    }
}
