use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use lox_parser::lexer::Lexer;
use lox_parser::parser::Parser;
use lox_source::Source;

fn parse(source: &str) {
    let source = Source::new("bench", source);
    let _ast = Parser::new(&source).parse_program();
    assert!(source.has_no_errors());
}

fn long_expr(c: &mut Criterion) {
    let mut group = c.benchmark_group("long-expr");

    let mut source = "1".to_string();
    for _i in 0..1000 {
        source.push_str(" + 1");
    }
    source.push(';');
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("long-expr", |b| b.iter(|| parse(&source)));
}

fn stress_precedence(c: &mut Criterion) {
    let mut group = c.benchmark_group("stress-precedence");

    let mut source = "1".to_string();
    for _i in 0..200 {
        source.push_str(" == 2 < 3 + 5 * -5");
    }
    source.push(';');
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("stress-precedence", |b| b.iter(|| parse(&source)));
}

fn many_statements(c: &mut Criterion) {
    let mut group = c.benchmark_group("many-statements");

    let mut source = String::new();
    for i in 0..500 {
        source.push_str(&format!("var x{i} = \"str\" + \"ing\";\nprint x{i} == nil; // {i}\n"));
    }
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("lex", |b| b.iter(|| Lexer::new(&source).count()));
    group.bench_function("parse", |b| b.iter(|| parse(&source)));
}

criterion_group!(benches, long_expr, stress_precedence, many_statements);
criterion_main!(benches);
