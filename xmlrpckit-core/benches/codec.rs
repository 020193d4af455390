use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::BTreeMap;
use std::hint::black_box;
use xmlrpckit_core::codec::{encode_request, encode_response, parse_request};
use xmlrpckit_core::value::Value;

/// Helper to build a request document with `n` string parameters.
fn build_request_body(method: &str, n: usize) -> Vec<u8> {
    let params: Vec<Value> = (0..n)
        .map(|i| Value::String(format!("parameter-{}", i)))
        .collect();
    encode_request(method, &params).to_vec()
}

/// Helper to build a deeply structured parameter document.
fn build_nested_body(depth: usize) -> Vec<u8> {
    let mut value = Value::String("leaf".to_string());
    for level in 0..depth {
        value = Value::Struct(BTreeMap::from([
            (format!("level-{}", level), value),
            ("tag".to_string(), Value::Int(level as i32)),
        ]));
    }
    encode_request("nested", std::slice::from_ref(&value)).to_vec()
}

fn bench_parse_request(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_request");

    for n in &[1usize, 8, 64] {
        let body = build_request_body("bench.echo", *n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &body, |b, body| {
            b.iter(|| parse_request(black_box(body), body.len() as u64).unwrap());
        });
    }

    group.finish();
}

fn bench_parse_nested(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_nested");

    for depth in &[2usize, 8, 32] {
        let body = build_nested_body(*depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &body, |b, body| {
            b.iter(|| parse_request(black_box(body), body.len() as u64).unwrap());
        });
    }

    group.finish();
}

fn bench_encode_response(c: &mut Criterion) {
    let value = Value::Struct(BTreeMap::from([
        ("status".to_string(), Value::String("ok".to_string())),
        (
            "items".to_string(),
            Value::Array((0..32).map(Value::Int).collect()),
        ),
    ]));

    c.bench_function("encode_response", |b| {
        b.iter(|| encode_response(black_box(&value)));
    });
}

fn bench_error_cases(c: &mut Criterion) {
    let mut group = c.benchmark_group("error_handling");

    // Oversized declared length is rejected before parsing.
    let body = build_request_body("bench.echo", 8);
    group.bench_function("oversized_declared_length", |b| {
        b.iter(|| {
            let _ = parse_request(black_box(&body), 1 << 24);
        });
    });

    // Invalid XML
    let garbage = b"this is definitely not an xmlrpc document".to_vec();
    group.bench_function("invalid_xml", |b| {
        b.iter(|| {
            let _ = parse_request(black_box(&garbage), garbage.len() as u64);
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parse_request,
    bench_parse_nested,
    bench_encode_response,
    bench_error_cases
);
criterion_main!(benches);
