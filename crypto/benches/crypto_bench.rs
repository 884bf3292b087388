use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn sha256_registry_bench(c: &mut Criterion) {
    let document = vec![0x7bu8; 16 * 1024];

    c.bench_function("sha256_hex_16KB", |b| {
        b.iter(|| cashscope_crypto::sha256_hex(black_box(&document)))
    });
}

fn encode_p2pkh_bench(c: &mut Criterion) {
    let mut script = vec![0x76, 0xa9, 0x14];
    script.extend([0xF5u8; 20]);
    script.extend([0x88, 0xac]);

    c.bench_function("cashaddr_encode_p2pkh", |b| {
        b.iter(|| cashscope_crypto::encode_cash_address("bitcoincash", black_box(&script)))
    });
}

fn encode_p2sh32_bench(c: &mut Criterion) {
    let mut script = vec![0xaa, 0x20];
    script.extend([0x42u8; 32]);
    script.push(0x87);

    c.bench_function("cashaddr_encode_p2sh32", |b| {
        b.iter(|| cashscope_crypto::encode_cash_address("bitcoincash", black_box(&script)))
    });
}

fn decode_bench(c: &mut Criterion) {
    let address = "bitcoincash:qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekg2";

    c.bench_function("cashaddr_decode", |b| {
        b.iter(|| cashscope_crypto::decode_cash_address(black_box(address), "bitcoincash"))
    });
}

criterion_group!(
    benches,
    sha256_registry_bench,
    encode_p2pkh_bench,
    encode_p2sh32_bench,
    decode_bench,
);
criterion_main!(benches);
