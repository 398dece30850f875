use super::*;
use crate::record::bytes_for;

#[test]
fn writes_requested_record_count() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gen.bin");
    generate_file(&path, &GenerateOptions { count: 100, sorted: false, seed: Some(1) }).unwrap();
    let len = std::fs::metadata(&path).unwrap().len();
    assert_eq!(len, bytes_for(100));
}

#[test]
fn sorted_flag_produces_non_decreasing_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gen_sorted.bin");
    generate_file(&path, &GenerateOptions { count: 500, sorted: true, seed: Some(42) }).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    let records: Vec<i64> = bytes.chunks_exact(8).map(|c| i64::from_ne_bytes(c.try_into().unwrap())).collect();
    assert!(records.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn zero_count_produces_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.bin");
    generate_file(&path, &GenerateOptions { count: 0, sorted: false, seed: Some(7) }).unwrap();
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
}

#[test]
fn same_seed_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let p1 = dir.path().join("a.bin");
    let p2 = dir.path().join("b.bin");
    generate_file(&p1, &GenerateOptions { count: 50, sorted: false, seed: Some(99) }).unwrap();
    generate_file(&p2, &GenerateOptions { count: 50, sorted: false, seed: Some(99) }).unwrap();
    assert_eq!(std::fs::read(&p1).unwrap(), std::fs::read(&p2).unwrap());
}
