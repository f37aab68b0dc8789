//! Benchmarks for the filter pipeline.
//!
//! These benchmarks measure how the regex, prefix and ignore-list stages
//! scale with the number of candidate repositories.

use bulk_clone::filter::{parse_ignore_list, FilterPipeline};
use bulk_clone::repo::RepoDescriptor;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use regex::Regex;

const KINDS: [&str; 5] = ["api", "web", "lib", "tool", "infra"];

fn candidates(count: usize) -> Vec<RepoDescriptor> {
    (0..count)
        .map(|i| {
            let repo = RepoDescriptor::new(format!(
                "https://git.example.com/acme/{}-service-{}.git",
                KINDS[i % KINDS.len()],
                i
            ));
            match i % 10 {
                0 => repo.archived(),
                1 => repo.fork(),
                _ => repo,
            }
        })
        .collect()
}

fn ignore_list(count: usize) -> Vec<String> {
    let content: String = (0..count)
        .step_by(7)
        .map(|i| format!("service-{}.git\n", i))
        .collect();
    parse_ignore_list(&content)
}

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");

    for count in [100, 1_000, 10_000] {
        let pipeline = FilterPipeline {
            skip_forks: true,
            skip_archived: true,
            regex: Some(Regex::new("service-[0-9]*[02468]$").unwrap()),
            prefixes: vec!["api".to_string(), "web".to_string(), "lib".to_string()],
            ignored: Some(ignore_list(count)),
            ..FilterPipeline::default()
        };
        let repos = candidates(count);

        group.bench_with_input(BenchmarkId::from_parameter(count), &repos, |b, repos| {
            b.iter(|| pipeline.apply(black_box(repos.clone())))
        });
    }

    group.finish();
}

fn bench_regex_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("regex_only");
    let pipeline = FilterPipeline {
        regex: Some(Regex::new("^(api|web)-").unwrap()),
        ..FilterPipeline::default()
    };

    for count in [100, 1_000, 10_000] {
        let repos = candidates(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &repos, |b, repos| {
            b.iter(|| pipeline.apply(black_box(repos.clone())))
        });
    }

    group.finish();
}

fn bench_ignore_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("ignore_list");
    let repos = candidates(1_000);

    for entries in [10, 100, 1_000] {
        let pipeline = FilterPipeline {
            ignored: Some(ignore_list(entries * 7)),
            ..FilterPipeline::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(entries), &repos, |b, repos| {
            b.iter(|| pipeline.apply(black_box(repos.clone())))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_full_pipeline,
    bench_regex_only,
    bench_ignore_list
);
criterion_main!(benches);
