use std::path::Path;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

use learnfil_core::curriculum::{parse_curriculum_str, validate_curriculum, Curriculum};
use learnfil_core::validator::values_equal;

fn bench_values_equal(c: &mut Criterion) {
    let mut group = c.benchmark_group("values_equal");

    let scalar = (json!(2880), json!(2880.0));
    let proposal = (
        json!({"pieceCid": "baga6ea4seaq", "size": 2048, "duration": 518400}),
        json!({"duration": 518400.0, "size": 2048, "pieceCid": "baga6ea4seaq"}),
    );
    let large = {
        let items: Vec<_> = (0..500).map(|i| json!({"id": i, "cid": format!("bafy{i}")})).collect();
        (json!(items.clone()), json!(items))
    };

    group.bench_function("scalar", |b| {
        b.iter(|| values_equal(black_box(&scalar.0), black_box(&scalar.1)))
    });
    group.bench_function("object", |b| {
        b.iter(|| values_equal(black_box(&proposal.0), black_box(&proposal.1)))
    });
    group.bench_function("array_500", |b| {
        b.iter(|| values_equal(black_box(&large.0), black_box(&large.1)))
    });

    group.finish();
}

fn bench_curriculum(c: &mut Criterion) {
    let mut group = c.benchmark_group("curriculum");

    let generated = {
        let mut s = String::from("[[modules]]\nid = \"m\"\ntitle = \"M\"\n");
        for i in 0..100 {
            s.push_str(&format!(
                "\n[[lessons]]\nid = \"l{i}\"\nmodule_id = \"m\"\ntitle = \"Lesson {i}\"\norder_index = {i}\nstarter_code = \"function f{i}() {{}}\"\n\n[[lessons.validation_tests]]\ndescription = \"defines f{i}\"\ncheck = {{ kind = \"contains\", needle = \"function f{i}\" }}\n"
            ));
        }
        s
    };

    group.bench_function("parse_builtin", |b| b.iter(Curriculum::builtin));

    group.bench_function("parse_100_lessons", |b| {
        b.iter(|| parse_curriculum_str(black_box(&generated), Path::new("bench.toml")))
    });

    let parsed = parse_curriculum_str(&generated, Path::new("bench.toml")).unwrap();
    group.bench_function("validate_100_lessons", |b| {
        b.iter(|| validate_curriculum(black_box(&parsed)))
    });

    group.finish();
}

criterion_group!(benches, bench_values_equal, bench_curriculum);
criterion_main!(benches);
