//! # Incremental Verification Properties
//!
//! Random add/remove sequences on a small meshed network. After every
//! sequence the error set kept up by scoped passes must equal what a full
//! pass over the final state finds.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use shared_types::Rule;
    use vf_01_verification::{VerifierApi, VerifierService};

    use crate::fixtures::{id, network, rule, MESH_NEXT_HOPS, MESH_TOPOLOGY};

    const PREFIXES: [&str; 8] = [
        "0.0.0.0/0",
        "10.0.0.0/8",
        "10.0.0.0/16",
        "10.1.0.0/16",
        "10.0.0.0/24",
        "10.0.0.0/25",
        "10.0.0.128/25",
        "10.0.0.1/32",
    ];

    #[derive(Debug, Clone)]
    enum Op {
        Add(Rule),
        /// Remove the n-th rule added so far (modulo the count), if any.
        Remove(usize),
    }

    prop_compose! {
        fn arb_rule()(
            switch in 1usize..=3,
            prefix in prop::sample::select(PREFIXES.to_vec()),
            next_hop in prop::sample::select(MESH_NEXT_HOPS.to_vec()),
        ) -> Rule {
            rule(&format!("S{switch}-{prefix}-{next_hop}"))
        }
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            2 => arb_rule().prop_map(Op::Add),
            1 => any::<usize>().prop_map(Op::Remove),
        ]
    }

    fn apply(service: &VerifierService, ops: &[Op]) {
        let mut added: Vec<Rule> = Vec::new();
        for op in ops {
            match op {
                Op::Add(rule) => {
                    service.add_rule(rule.clone()).unwrap();
                    added.push(rule.clone());
                }
                Op::Remove(n) => {
                    if added.is_empty() {
                        continue;
                    }
                    let rule = added.remove(n % added.len());
                    service.remove_rule(&rule).unwrap();
                }
            }
        }
    }

    fn config() -> ProptestConfig {
        ProptestConfig {
            cases: 128,
            ..ProptestConfig::default()
        }
    }

    proptest! {
        #![proptest_config(config())]

        #[test]
        fn test_incremental_matches_full(ops in prop::collection::vec(arb_op(), 1..40)) {
            let service = VerifierService::new(network(MESH_TOPOLOGY));
            service.verify_all().unwrap();
            apply(&service, &ops);

            let incremental = service.current_errors();
            let report = service.verify_all().unwrap();
            prop_assert_eq!(service.current_errors(), incremental);
            prop_assert_eq!(report.well_formed, report.total_errors == 0);
        }

        #[test]
        fn test_reapplying_installed_rule_is_idempotent(
            ops in prop::collection::vec(arb_op(), 0..30),
            extra in arb_rule(),
        ) {
            let service = VerifierService::new(network(MESH_TOPOLOGY));
            service.verify_all().unwrap();
            apply(&service, &ops);

            service.add_rule(extra.clone()).unwrap();
            let errors = service.current_errors();
            let ecs = service.status().ec_count;

            let report = service.add_rule(extra).unwrap();
            prop_assert_eq!(report.affected_ecs, 0);
            prop_assert_eq!(service.current_errors(), errors);
            prop_assert_eq!(service.status().ec_count, ecs);
        }

        #[test]
        fn test_add_then_remove_is_inverse(
            ops in prop::collection::vec(arb_op(), 0..30),
            extra in arb_rule(),
        ) {
            let service = VerifierService::new(network(MESH_TOPOLOGY));
            service.verify_all().unwrap();
            apply(&service, &ops);

            let errors = service.current_errors();
            let status = service.status();
            let tables: Vec<Vec<Rule>> = ["S1", "S2", "S3"]
                .iter()
                .map(|s| service.list_flows(&id(s)).unwrap())
                .collect();

            service.add_rule(extra.clone()).unwrap();
            service.remove_rule(&extra).unwrap();

            prop_assert_eq!(service.current_errors(), errors);
            prop_assert_eq!(service.status(), status);
            for (i, s) in ["S1", "S2", "S3"].iter().enumerate() {
                prop_assert_eq!(&service.list_flows(&id(s)).unwrap(), &tables[i]);
            }
        }
    }
}
