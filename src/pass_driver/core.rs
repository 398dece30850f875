use std::fs::File;
use std::io;

use crate::merge::k_way_merge;
use crate::run::{Run, total_len};

/// Merge `runs` (all in `input`) into `output` one window of `max_k`
/// runs at a time, returning the new run list. `new_runs.len() ==
/// ceil(runs.len() / max_k)`.
pub fn run_pass(input: &File, output: &File, runs: &[Run], mem_bytes: u64, max_k: usize) -> io::Result<Vec<Run>> {
    let max_k = max_k.max(1);
    let mut new_runs = Vec::with_capacity(runs.len().div_ceil(max_k));
    let mut out_off = 0u64;

    for window in runs.chunks(max_k) {
        let total_g = total_len(window);
        k_way_merge(input, output, window, out_off, mem_bytes)?;
        new_runs.push(Run::new(out_off, total_g));
        out_off += total_g;
    }

    Ok(new_runs)
}
