//! UID and path validation benchmarks

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use gotolink::utils::path_validator::validate_relative_path;
use gotolink::utils::{MAX_UID_LENGTH, generate_uid, is_valid_uid};

// ============== is_valid_uid ==============

fn bench_is_valid_uid(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/is_valid_uid");

    group.bench_function("valid_generated_shape", |b| {
        b.iter(|| {
            assert!(is_valid_uid("aB3xK9mQ"));
        });
    });

    group.bench_function("valid_with_dash_underscore", |b| {
        b.iter(|| {
            assert!(is_valid_uid("abc-DEF_123"));
        });
    });

    group.bench_function("invalid_empty", |b| {
        b.iter(|| {
            assert!(!is_valid_uid(""));
        });
    });

    group.bench_function("invalid_special_chars", |b| {
        b.iter(|| {
            assert!(!is_valid_uid("'; DROP TABLE--"));
        });
    });

    let max_len_uid = "a".repeat(MAX_UID_LENGTH);
    group.bench_function("valid_max_length", |b| {
        b.iter(|| {
            assert!(is_valid_uid(&max_len_uid));
        });
    });

    let too_long_uid = "a".repeat(MAX_UID_LENGTH + 1);
    group.bench_function("invalid_too_long", |b| {
        b.iter(|| {
            assert!(!is_valid_uid(&too_long_uid));
        });
    });

    group.finish();
}

// ============== generate_uid ==============

fn bench_generate_uid(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/generate_uid");

    for length in [6, 8, 12, 20] {
        group.bench_with_input(BenchmarkId::new("length", length), &length, |b, &length| {
            b.iter(|| {
                let uid = generate_uid(length);
                assert_eq!(uid.len(), length);
            });
        });
    }

    group.finish();
}

// ============== validate_relative_path ==============

fn bench_validate_relative_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/validate_relative_path");

    group.bench_function("valid_simple", |b| {
        b.iter(|| {
            assert!(validate_relative_path("d/abc123/my-dashboard").is_ok());
        });
    });

    group.bench_function("valid_with_query", |b| {
        b.iter(|| {
            assert!(validate_relative_path("d/abc123/my-dash?viewPanel=2&from=now-6h").is_ok());
        });
    });

    group.bench_function("invalid_absolute", |b| {
        b.iter(|| {
            assert!(validate_relative_path("/etc/passwd").is_err());
        });
    });

    group.bench_function("invalid_traversal", |b| {
        b.iter(|| {
            assert!(validate_relative_path("a/../../b").is_err());
        });
    });

    group.bench_function("invalid_scheme", |b| {
        b.iter(|| {
            assert!(validate_relative_path("https://evil.example/x").is_err());
        });
    });

    let long_path = format!("d/abc/{}", "a".repeat(1000));
    group.bench_function("valid_long_path", |b| {
        b.iter(|| {
            assert!(validate_relative_path(&long_path).is_ok());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_is_valid_uid,
    bench_generate_uid,
    bench_validate_relative_path,
);
criterion_main!(benches);
