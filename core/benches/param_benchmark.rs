use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use request_params::api::*;
use request_params::formatter::into_response;
use std::hint::black_box;
use std::time::Duration;

fn benchmark_query_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_parsing");

    group.bench_function("parse_flat", |b| {
        b.iter(|| {
            let params = parse_query_string(black_box("page=2&per_page=50&order=desc&q=rust+lang"));
            black_box(params)
        });
    });

    group.bench_function("parse_nested", |b| {
        b.iter(|| {
            let params = parse_query_string(black_box(
                "filter[status]=open&filter[owner][id]=7&ids[]=1&ids[]=2&ids[]=3",
            ));
            black_box(params)
        });
    });

    group.finish();
}

fn benchmark_coercion(c: &mut Criterion) {
    let mut group = c.benchmark_group("coercion");
    group.measurement_time(Duration::from_secs(10));

    for ty in ["Integer", "Float", "Boolean", "Date", "DateTime"] {
        let param_type: ParamType = ty.parse().unwrap_or(ParamType::String);
        let raw = match param_type {
            ParamType::Integer => "12345",
            ParamType::Float => "123.45",
            ParamType::Boolean => "yes",
            ParamType::Date => "2013-01-17",
            _ => "2013-01-17T10:30:00+02:00",
        };

        group.bench_with_input(BenchmarkId::new("scalar", ty), &raw, |b, raw| {
            b.iter(|| {
                let result = coerce(
                    black_box(Some(Value::from(*raw))),
                    &param_type,
                    Delimiters::default(),
                );
                black_box(result)
            });
        });
    }

    // Element-wise array coercion
    for size in [10, 100, 1000].iter() {
        let raw = (0..*size).map(|i| i.to_string()).collect::<Vec<_>>().join(",");
        let array_of = ParamType::array_of(ParamType::Integer);

        group.bench_with_input(BenchmarkId::new("array_of_integer", size), &raw, |b, raw| {
            b.iter(|| {
                let result = coerce(
                    black_box(Some(Value::from(raw.as_str()))),
                    &array_of,
                    Delimiters::default(),
                );
                black_box(result)
            });
        });
    }

    group.finish();
}

fn benchmark_declarations(c: &mut Criterion) {
    let mut group = c.benchmark_group("declarations");
    let settings = ParamSettings::default();
    let base = parse_query_string("page=2&order=desc&filter[status]=open&filter[limit]=20");

    let page = ParamOptions::new().default_value(1).min(1).max(1000);
    let order = ParamOptions::new()
        .transform(Transform::Upcase)
        .within(["ASC", "DESC"]);
    let status = ParamOptions::new().required().within(["open", "closed"]);
    let limit = ParamOptions::new().range(1..=100);

    group.bench_function("declare_flat", |b| {
        b.iter(|| {
            let mut params = base.clone();
            let mut ctx = ParamContext::new(&mut params, &settings);
            let result = ctx
                .param("page", &ParamType::Integer, &page)
                .and_then(|_| ctx.param("order", &ParamType::String, &order));
            black_box(result)
        });
    });

    group.bench_function("declare_nested", |b| {
        b.iter(|| {
            let mut params = base.clone();
            let mut ctx = ParamContext::new(&mut params, &settings);
            let result = ctx.param_nested("filter", &ParamType::Hash, &ParamOptions::new(), |filter| {
                filter.param("status", &ParamType::String, &status)?;
                filter.param("limit", &ParamType::Integer, &limit)?;
                Ok(())
            });
            black_box(result)
        });
    });

    group.bench_function("relational_one_of", |b| {
        let mut params = base.clone();
        let ctx = ParamContext::new(&mut params, &settings);
        b.iter(|| {
            let result = ctx.one_of(black_box(&["page", "order", "missing"]), &ParamOptions::new());
            black_box(result)
        });
    });

    group.finish();
}

fn benchmark_error_responses(c: &mut Criterion) {
    let mut group = c.benchmark_group("error_responses");
    let settings = ParamSettings::default();
    let mut params = parse_query_string("page=abc");
    let error = ParamContext::new(&mut params, &settings)
        .param("page", &ParamType::Integer, &ParamOptions::new())
        .err();

    if let Some(error) = error {
        group.bench_function("json_body", |b| {
            b.iter(|| black_box(into_response(black_box(&error), "application/json")));
        });

        group.bench_function("text_body", |b| {
            b.iter(|| black_box(into_response(black_box(&error), "text/plain")));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_query_parsing,
    benchmark_coercion,
    benchmark_declarations,
    benchmark_error_responses
);
criterion_main!(benches);
