use std::fs::OpenOptions;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use extsort_core::merge::k_way_merge;
use extsort_core::record::bytes_for;
use extsort_core::run::Run;

/// Build an input file holding `k` interleaved sorted runs of `run_len`
/// records each, and a correctly sized, empty output file alongside it.
fn build_runs(dir: &std::path::Path, k: usize, run_len: u64) -> (std::fs::File, std::fs::File, Vec<Run>) {
    let in_path = dir.join("in.bin");
    let out_path = dir.join("out.bin");

    let mut records = Vec::with_capacity(k * run_len as usize);
    for i in 0..run_len as i64 {
        for r in 0..k as i64 {
            records.push(i * k as i64 + r);
        }
    }
    std::fs::write(&in_path, records.iter().flat_map(|v| v.to_ne_bytes()).collect::<Vec<u8>>()).unwrap();

    let input = OpenOptions::new().read(true).write(true).open(&in_path).unwrap();
    let output = OpenOptions::new().read(true).write(true).create(true).open(&out_path).unwrap();
    output.set_len(bytes_for(k as u64 * run_len)).unwrap();

    let runs: Vec<Run> = (0..k).map(|r| Run::new(r as u64 * run_len, run_len)).collect();
    (input, output, runs)
}

fn bench_k_way_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("k_way_merge");
    for k in [2usize, 8, 64] {
        let dir = tempfile::tempdir().unwrap();
        let run_len = 50_000u64;
        let (input, output, runs) = build_runs(dir.path(), k, run_len);

        group.bench_with_input(BenchmarkId::new("fan_in", k), &k, |b, _| {
            b.iter(|| {
                k_way_merge(black_box(&input), black_box(&output), black_box(&runs), 0, 4 * (1 << 20)).unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_k_way_merge);
criterion_main!(benches);
