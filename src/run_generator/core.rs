use std::fs::File;
use std::io;

use crate::mapping::{Access, PageMapping};
use crate::record::{RECORD_SIZE, bytes_for};
use crate::run::Run;

/// Generate initial sorted runs.
///
/// `chunk_bytes` is clamped to at least one record. Walks `input` in
/// strictly increasing offset order; for each chunk, sorts it in place
/// via a read/write mapping of `input`, then copies the sorted bytes
/// into the same byte range of `output`. `input`'s mapped regions end up
/// sorted too, as a side effect, but callers must not rely on that —
/// only `output` is guaranteed to hold the run catalog afterward.
pub fn generate_runs(input: &File, output: &File, total: u64, chunk_bytes: u64) -> io::Result<Vec<Run>> {
    let chunk_bytes = chunk_bytes.max(RECORD_SIZE);
    let chunk_records = (chunk_bytes / RECORD_SIZE).max(1);

    let mut runs = Vec::with_capacity(total.div_ceil(chunk_records) as usize);
    let mut off = 0u64;

    while off < total {
        let c = chunk_records.min(total - off);
        let byte_off = bytes_for(off);
        let byte_len = bytes_for(c) as usize;

        {
            let mut in_map = PageMapping::map(input, byte_off, byte_len, Access::ReadWriteShared)?;
            in_map.as_records_mut().sort_unstable();

            let mut out_map = PageMapping::map(output, byte_off, byte_len, Access::ReadWriteShared)?;
            out_map.as_bytes_mut().copy_from_slice(in_map.as_bytes());
        }

        runs.push(Run::new(off, c));
        off += c;
    }

    Ok(runs)
}
