//! # Partition Properties
//!
//! Whatever sequence of prefixes is marked and unmarked, the live ECs tile
//! the 32-bit address space and every marked prefix is a union of ECs.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::net::Ipv4Addr;

    use proptest::prelude::*;
    use shared_types::{prefix_bounds, Ipv4Net};
    use vf_01_verification::AddressTrie;

    #[derive(Debug, Clone)]
    enum TrieOp {
        Insert(Ipv4Net),
        /// Delete the n-th marked prefix (modulo the count), if any.
        Delete(usize),
    }

    prop_compose! {
        fn arb_prefix()(addr in any::<u32>(), len in 0u8..=32) -> Ipv4Net {
            Ipv4Net::new(Ipv4Addr::from(addr), len).unwrap().trunc()
        }
    }

    fn arb_op() -> impl Strategy<Value = TrieOp> {
        prop_oneof![
            3 => arb_prefix().prop_map(TrieOp::Insert),
            1 => any::<usize>().prop_map(TrieOp::Delete),
        ]
    }

    fn assert_partition(trie: &AddressTrie) {
        let ecs = trie.all_ecs();
        assert_eq!(ecs.len(), trie.ec_count());

        let mut next = 0u64;
        for ec in &ecs {
            assert_eq!(u64::from(ec.low()), next, "gap or overlap before {ec}");
            next = u64::from(ec.high()) + 1;
        }
        assert_eq!(next, 1u64 << 32);
    }

    proptest! {
        #[test]
        fn test_ecs_tile_address_space(ops in prop::collection::vec(arb_op(), 1..60)) {
            let mut trie = AddressTrie::new();
            let mut marked: BTreeSet<Ipv4Net> = BTreeSet::new();

            for op in ops {
                match op {
                    TrieOp::Insert(prefix) => {
                        trie.insert(&prefix);
                        marked.insert(prefix);
                    }
                    TrieOp::Delete(n) => {
                        if marked.is_empty() {
                            continue;
                        }
                        let prefix = *marked.iter().nth(n % marked.len()).unwrap();
                        trie.delete(&prefix);
                        marked.remove(&prefix);
                    }
                }
                assert_partition(&trie);
            }

            prop_assert_eq!(trie.prefix_count(), marked.len());
            for prefix in &marked {
                prop_assert!(trie.contains_prefix(prefix));
                let (low, high) = prefix_bounds(prefix);
                for ec in trie.ecs_within(prefix) {
                    prop_assert!(ec.low() >= low && ec.high() <= high);
                }
            }
        }

        #[test]
        fn test_delete_all_restores_single_ec(
            prefixes in prop::collection::vec(arb_prefix(), 1..30),
        ) {
            let mut trie = AddressTrie::new();
            for prefix in &prefixes {
                trie.insert(prefix);
            }
            for prefix in &prefixes {
                trie.delete(prefix);
            }
            prop_assert_eq!(trie.ec_count(), 1);
            prop_assert_eq!(trie.prefix_count(), 0);
            assert_partition(&trie);
        }

        #[test]
        fn test_insert_reports_changed_region(
            existing in prop::collection::vec(arb_prefix(), 0..20),
            prefix in arb_prefix(),
        ) {
            let mut trie = AddressTrie::new();
            for p in &existing {
                trie.insert(p);
            }
            let before = trie.all_ecs();
            let affected = trie.insert(&prefix);
            let after = trie.all_ecs();

            // Retired ECs are exactly those that disappeared.
            let gone: BTreeSet<_> = before.difference(&after).copied().collect();
            prop_assert_eq!(&affected.retired, &gone);
            // Every new EC is reported live.
            for ec in after.difference(&before) {
                prop_assert!(affected.live.contains(ec));
            }
        }
    }
}
