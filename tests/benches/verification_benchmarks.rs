//! # VeriFlow Verification Benchmarks
//!
//! | Path | What is measured |
//! |------|------------------|
//! | Trie | Insert and delete of random prefixes |
//! | Incremental | One rule add + remove with scoped re-verification |
//! | Full pass | `verify_all` over every EC |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared_types::Ipv4Net;
use std::net::Ipv4Addr;
use std::time::Duration;
use vf_01_verification::{AddressTrie, VerifierApi, VerifierService};
use vf_tests::fixtures::{network, random_ring_rules, ring_topology, rule};

const SWITCHES: usize = 16;

fn loaded_service(rules: usize) -> VerifierService {
    let mut rng = StdRng::seed_from_u64(7);
    let service = VerifierService::new(network(&ring_topology(SWITCHES)));
    for r in random_ring_rules(&mut rng, SWITCHES, rules) {
        service.add_rule(r).expect("ring rule");
    }
    service
}

fn bench_trie(c: &mut Criterion) {
    let mut group = c.benchmark_group("trie");

    for size in [100usize, 1_000, 10_000] {
        let mut rng = StdRng::seed_from_u64(1);
        let prefixes: Vec<Ipv4Net> = (0..size)
            .map(|_| {
                let len = rng.gen_range(8..=32u8);
                Ipv4Net::new(Ipv4Addr::from(rng.gen::<u32>()), len)
                    .expect("valid length")
                    .trunc()
            })
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("insert_delete", size), &prefixes, |b, prefixes| {
            b.iter(|| {
                let mut trie = AddressTrie::new();
                for p in prefixes {
                    black_box(trie.insert(p));
                }
                for p in prefixes {
                    black_box(trie.delete(p));
                }
                black_box(trie.ec_count())
            })
        });
    }

    group.finish();
}

fn bench_incremental(c: &mut Criterion) {
    let mut group = c.benchmark_group("incremental");
    group.measurement_time(Duration::from_secs(10));

    for rules in [100usize, 1_000] {
        let service = loaded_service(rules);
        let toggled = rule("S3-10.200.7.0/24-S4");
        group.bench_function(BenchmarkId::new("add_remove", rules), |b| {
            b.iter(|| {
                black_box(service.add_rule(toggled.clone()).expect("add"));
                black_box(service.remove_rule(&toggled).expect("remove"));
            })
        });
    }

    group.finish();
}

fn bench_full_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pass");
    group.sample_size(20);

    for rules in [100usize, 1_000] {
        let service = loaded_service(rules);
        group.bench_function(BenchmarkId::new("verify_all", rules), |b| {
            b.iter(|| black_box(service.verify_all().expect("verify")))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_trie, bench_incremental, bench_full_pass);
criterion_main!(benches);
