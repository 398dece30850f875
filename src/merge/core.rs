use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fs::File;
use std::io;

use crate::mapping::{Access, PageMapping};
use crate::record::{RECORD_SIZE, bytes_for};
use crate::run::Run;

/// Minimum step size for the degenerate single-run copy path.
const MIN_COPY_STEP_BYTES: u64 = 1 << 20;

/// Per-run state during a merge: how much of the run has been pulled
/// into `buffer`, and where the next unread record in `buffer` sits.
struct MergeState {
    file_offset: u64,
    length: u64,
    consumed: u64,
    buffer: Vec<i64>,
    buf_pos: usize,
    done: bool,
}

impl MergeState {
    fn new(run: Run) -> Self {
        MergeState {
            file_offset: run.offset,
            length: run.len,
            consumed: 0,
            buffer: Vec::new(),
            buf_pos: 0,
            done: false,
        }
    }

    /// Refill `buffer` from `input`, starting right after the last
    /// consumed record. Marks `done` once the run is exhausted.
    fn refill(&mut self, input: &File, in_cap: u64) -> io::Result<()> {
        self.buf_pos = 0;
        let remaining = self.length - self.consumed;
        if remaining == 0 {
            self.done = true;
            return Ok(());
        }

        let want = in_cap.min(remaining);
        let byte_off = bytes_for(self.file_offset + self.consumed);
        let byte_len = bytes_for(want) as usize;

        let map = PageMapping::map(input, byte_off, byte_len, Access::ReadOnly)?;
        self.buffer.clear();
        self.buffer.extend_from_slice(map.as_records());

        self.consumed += want;
        Ok(())
    }
}

/// Min-heap entry: the head value of a run, which run it came from, and
/// a monotonic sequence number so tie-breaking is deterministic (the
/// values themselves don't define an order between equal keys from
/// different runs, so this mirrors the refill order).
struct HeapEntry {
    value: i64,
    run_idx: usize,
    seq: u64,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.seq == other.seq
    }
}
impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value).then(self.seq.cmp(&other.seq))
    }
}

/// Merge `runs` (all residing in `input`) into `output` starting at
/// record offset `out_off`, using at most `mem_bytes` of buffering.
///
/// Preconditions: every run in `runs` is individually sorted; the
/// output range does not overlap any input range (guaranteed by the
/// pass driver, which always merges into the *other* file).
pub fn k_way_merge(input: &File, output: &File, runs: &[Run], out_off: u64, mem_bytes: u64) -> io::Result<()> {
    match runs.len() {
        0 => Ok(()),
        1 => copy_single_run(input, output, runs[0], out_off, mem_bytes),
        k => merge_many(input, output, runs, out_off, mem_bytes, k),
    }
}

/// k = 1: no heap needed, just stream the one run across in fixed
/// windows via paired mappings.
fn copy_single_run(input: &File, output: &File, run: Run, out_off: u64, mem_bytes: u64) -> io::Result<()> {
    let total_bytes = bytes_for(run.len);
    let step = mem_bytes.max(MIN_COPY_STEP_BYTES);

    let mut done = 0u64;
    while done < total_bytes {
        let s = step.min(total_bytes - done);
        let in_map = PageMapping::map(input, bytes_for(run.offset) + done, s as usize, Access::ReadOnly)?;
        let mut out_map = PageMapping::map(output, bytes_for(out_off) + done, s as usize, Access::ReadWriteShared)?;
        out_map.as_bytes_mut().copy_from_slice(in_map.as_bytes());
        done += s;
    }
    Ok(())
}

fn merge_many(input: &File, output: &File, runs: &[Run], out_off: u64, mem_bytes: u64, k: usize) -> io::Result<()> {
    let per_slot = (mem_bytes / (k as u64 + 1)) / RECORD_SIZE * RECORD_SIZE;
    let per_slot = per_slot.max(RECORD_SIZE);
    let in_cap = per_slot / RECORD_SIZE;
    let out_cap = in_cap as usize;

    let mut states: Vec<MergeState> = runs.iter().copied().map(MergeState::new).collect();
    let mut heap: BinaryHeap<std::cmp::Reverse<HeapEntry>> = BinaryHeap::with_capacity(k);
    let mut seq = 0u64;

    for (i, state) in states.iter_mut().enumerate() {
        state.refill(input, in_cap)?;
        if !state.done {
            heap.push(std::cmp::Reverse(HeapEntry {
                value: state.buffer[0],
                run_idx: i,
                seq,
            }));
            seq += 1;
            state.buf_pos = 1;
        }
    }

    let mut out_buf = vec![0i64; out_cap];
    let mut out_pos = 0usize;
    let mut cur_out = out_off;

    while let Some(std::cmp::Reverse(min)) = heap.pop() {
        out_buf[out_pos] = min.value;
        out_pos += 1;
        if out_pos == out_cap {
            flush_output(output, &out_buf, &mut out_pos, &mut cur_out)?;
        }

        let i = min.run_idx;
        if !states[i].done {
            if states[i].buf_pos == states[i].buffer.len() {
                states[i].refill(input, in_cap)?;
            }
            if states[i].done {
                continue;
            }
            let pos = states[i].buf_pos;
            heap.push(std::cmp::Reverse(HeapEntry {
                value: states[i].buffer[pos],
                run_idx: i,
                seq,
            }));
            seq += 1;
            states[i].buf_pos += 1;
        }
    }

    flush_output(output, &out_buf, &mut out_pos, &mut cur_out)?;

    debug_assert_eq!(cur_out - out_off, crate::run::total_len(runs));
    Ok(())
}

/// Write `out_buf[..*out_pos]` to `output` at `*cur_out`, then reset.
fn flush_output(output: &File, out_buf: &[i64], out_pos: &mut usize, cur_out: &mut u64) -> io::Result<()> {
    if *out_pos == 0 {
        return Ok(());
    }
    let byte_len = bytes_for(*out_pos as u64) as usize;
    let mut map = PageMapping::map(output, bytes_for(*cur_out), byte_len, Access::ReadWriteShared)?;
    map.as_records_mut().copy_from_slice(&out_buf[..*out_pos]);
    *cur_out += *out_pos as u64;
    *out_pos = 0;
    Ok(())
}
