use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use cashscope_supply::{build_snapshot, count_unique_holders, SupplyInputs};
use cashscope_types::{LockingBytecode, NftCapability, TokenAmount, UnspentOutput};

fn holder(i: usize) -> LockingBytecode {
    let mut script = vec![0x76, 0xa9, 0x14];
    script.extend_from_slice(&(i as u64).to_le_bytes());
    script.extend([0u8; 12]);
    script.extend([0x88, 0xac]);
    LockingBytecode::new(script)
}

fn make_outputs(n: usize) -> Vec<UnspentOutput> {
    (0..n)
        .map(|i| {
            let output = UnspentOutput::fungible(holder(i % (n / 4 + 1)), 1_000 + i as u64);
            if i % 97 == 0 {
                UnspentOutput {
                    nft_capability: Some(NftCapability::Minting),
                    ..output
                }
            } else {
                output
            }
        })
        .collect()
}

fn bench_unique_holders(c: &mut Criterion) {
    let mut group = c.benchmark_group("count_unique_holders");

    for n in [5_000usize, 20_000, 100_000] {
        let outputs = make_outputs(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &outputs, |b, outputs| {
            b.iter(|| count_unique_holders(black_box(outputs)));
        });
    }

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_snapshot");
    let genesis = vec![UnspentOutput::fungible(holder(0), u64::MAX / 4)];

    for n in [5_000usize, 20_000, 100_000] {
        let outputs = make_outputs(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &outputs, |b, outputs| {
            b.iter(|| {
                build_snapshot(black_box(SupplyInputs {
                    genesis_outputs: &genesis,
                    token_outputs: outputs,
                    nft_outputs: &[],
                    minting_outputs: &[],
                    reserved: TokenAmount::new(1_000),
                }))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_unique_holders, bench_snapshot);
criterion_main!(benches);
