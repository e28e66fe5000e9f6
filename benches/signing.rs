//! Benchmarks for the signing primitives on the onboarding path.
//!
//! Run with: `cargo bench --bench signing`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use chrono::{TimeZone, Utc};

use auth::{BearerToken, SigningChallenge, WalletIdentity};
use polymarket_core::signing::{derive_proxy_address, Deployment, SignInDomain, TypedData};

const TEST_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("Failed to build runtime")
}

/// Benchmark CREATE2 proxy address derivation.
fn bench_proxy_derivation(c: &mut Criterion) {
    let wallet = WalletIdentity::from_private_key(TEST_PRIVATE_KEY).unwrap();
    let deployment = Deployment::polygon();

    c.bench_function("derive_proxy_address", |b| {
        b.iter(|| black_box(derive_proxy_address(black_box(wallet.address()), &deployment)))
    });
}

/// Benchmark EIP-712 hashing of the CreateProxy payload.
fn bench_typed_data_hashing(c: &mut Criterion) {
    let mut group = c.benchmark_group("typed_data");
    let payload = TypedData::create_proxy(&Deployment::polygon());
    let json = serde_json::to_string(&payload).unwrap();

    group.throughput(Throughput::Elements(1));
    group.bench_function("signing_hash", |b| {
        b.iter(|| black_box(payload.signing_hash().unwrap()))
    });
    group.bench_function("parse_and_hash", |b| {
        b.iter(|| {
            let parsed = TypedData::from_json(black_box(&json)).unwrap();
            black_box(parsed.signing_hash().unwrap())
        })
    });

    group.finish();
}

/// Benchmark personal and typed-data signing.
fn bench_signing(c: &mut Criterion) {
    let rt = runtime();
    let wallet = WalletIdentity::from_private_key(TEST_PRIVATE_KEY).unwrap();
    let payload = TypedData::create_proxy(&Deployment::polygon());
    let challenge = SigningChallenge::new(
        &SignInDomain::polymarket(),
        137,
        wallet.address(),
        "abc123",
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    );
    let message = challenge.message();

    let mut group = c.benchmark_group("signing");
    group.throughput(Throughput::Elements(1));

    group.bench_function("personal_message", |b| {
        b.iter(|| black_box(rt.block_on(wallet.sign_personal_message(black_box(&message)))))
    });
    group.bench_function("typed_payload", |b| {
        b.iter(|| black_box(rt.block_on(wallet.sign_typed_payload(black_box(&payload)))))
    });

    for nonce_len in [8, 32, 128] {
        let nonce = "n".repeat(nonce_len);
        let challenge = SigningChallenge::new(
            &SignInDomain::polymarket(),
            137,
            wallet.address(),
            nonce,
            Utc::now(),
        );
        group.bench_with_input(
            BenchmarkId::new("bearer_token", nonce_len),
            &challenge,
            |b, challenge| {
                b.iter(|| {
                    let signature = rt
                        .block_on(wallet.sign_personal_message(&challenge.message()))
                        .unwrap();
                    black_box(BearerToken::encode(&challenge.claims(), &signature).unwrap())
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_proxy_derivation,
    bench_typed_data_hashing,
    bench_signing,
);

criterion_main!(benches);
