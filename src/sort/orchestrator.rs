use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};

use crate::mapping::page_size;
use crate::pass_driver::run_pass;
use crate::record::{RECORD_SIZE, bytes_for, records_in};
use crate::run::Run;
use crate::run_generator::generate_runs;

/// Evenly spaced samples taken by the sortedness short-circuit.
const SORTEDNESS_SAMPLE_CAP: u64 = 1000;

/// Block size for the final streaming copy out of the temporary file.
const FINALIZE_COPY_BYTES: usize = 1 << 20;

/// Reserved buffer per merge input slot when deriving the fan-in bound.
const FAN_IN_SLOT_BYTES: u64 = 16 * 1024;

const MIN_MAX_K: u64 = 2;
const MAX_MAX_K: u64 = 1024;

#[derive(Debug, thiserror::Error)]
pub enum SortError {
    #[error("file size {size} is not a multiple of 8 bytes")]
    NotRecordAligned { size: u64 },
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("mapping {op} at offset {offset} failed: {source}")]
    Mapping { op: &'static str, offset: u64, source: io::Error },
}

/// Options for [`sort_file`].
#[derive(Debug, Clone)]
pub struct SortOptions {
    /// Mapping budget in MiB; `None` or `Some(0)` picks `fs / 10`.
    pub limit_mb: Option<u64>,
    /// Print one line per merge pass to stderr.
    pub progress: bool,
}

impl Default for SortOptions {
    fn default() -> Self {
        SortOptions { limit_mb: None, progress: false }
    }
}

/// Derive the mapping budget in bytes from the caller's `limit_mb` and the
/// file size, floored at one page so a tiny file never yields a
/// zero-byte budget.
pub fn resolve_mem_bytes(limit_mb: Option<u64>, file_size: u64) -> u64 {
    match limit_mb {
        None | Some(0) => (file_size / 10).max(page_size() as u64),
        Some(mb) => mb * (1 << 20),
    }
}

/// Derive the maximum merge fan-in from the mapping budget, reserving
/// `FAN_IN_SLOT_BYTES` per input slot and clamping to `[2, 1024]`.
pub fn compute_max_k(mem_bytes: u64) -> usize {
    let raw = (mem_bytes / FAN_IN_SLOT_BYTES).saturating_sub(1);
    raw.clamp(MIN_MAX_K, MAX_MAX_K) as usize
}

/// Sort `path` in place: an external, memory-mapped multi-way merge sort
/// of its fixed-width `i64` records.
pub fn sort_file(path: &Path, options: &SortOptions) -> Result<(), SortError> {
    let a = OpenOptions::new().read(true).write(true).open(path)?;
    let fs = a.metadata()?.len();
    if fs % RECORD_SIZE != 0 {
        return Err(SortError::NotRecordAligned { size: fs });
    }

    let total = records_in(fs);
    if total <= 1 {
        return Ok(());
    }

    if is_probably_sorted(&a, total)? {
        if options.progress {
            eprintln!("file already appears sorted (sampled check); skipping");
        }
        return Ok(());
    }

    let mem_bytes = resolve_mem_bytes(options.limit_mb, fs);
    let max_k = compute_max_k(mem_bytes);
    if options.progress {
        eprintln!(
            "file has {total} records; using up to {} MiB of mapping budget, fan-in {max_k}",
            mem_bytes / (1 << 20)
        );
    }

    let temp_path = temp_path_for(path);
    let b = OpenOptions::new().read(true).write(true).create(true).truncate(true).open(&temp_path)?;
    b.set_len(fs)?;

    let result = run_sort_passes(&a, &b, total, fs, mem_bytes, max_k, options.progress);

    // Always try to clean up the temporary file, even on failure, so a
    // retried sort does not trip over a stale `.tmp_sort`.
    let cleanup = fs::remove_file(&temp_path);
    result?;
    cleanup?;

    if options.progress {
        eprintln!("sorting complete");
    }
    Ok(())
}

fn run_sort_passes(
    a: &File,
    b: &File,
    total: u64,
    fs: u64,
    mem_bytes: u64,
    max_k: usize,
    progress: bool,
) -> Result<(), SortError> {
    let mut runs: Vec<Run> = generate_runs(a, b, total, mem_bytes)?;

    // `flip == true` means the next pass (if any) would read from `b`;
    // equivalently, the most recently written file is `b`. This mirrors
    // the two-file flip-flop, but unlike a literal transcription of the
    // source material it tracks *where data currently lives*, which is
    // what finalization actually needs to know.
    let mut flip = true;
    let mut pass_no = 0u32;

    while runs.len() > 1 {
        let (in_file, out_file) = if flip { (b, a) } else { (a, b) };
        out_file.set_len(fs)?;
        let new_runs = run_pass(in_file, out_file, &runs, mem_bytes, max_k)?;
        pass_no += 1;
        if progress {
            eprintln!("pass {pass_no}: {} runs -> {} runs", runs.len(), new_runs.len());
        }
        runs = new_runs;
        flip = !flip;
    }

    // The data currently lives in `b` exactly when `flip` is still
    // `true` here: either no pass ran at all (run generation itself
    // wrote the single sorted run into `b`), or the last pass wrote into
    // `b` and then toggled `flip` back to `true`. In both cases the
    // original file `a` does not yet hold the final result.
    if flip {
        stream_copy(b, a, fs)?;
    }

    Ok(())
}

/// Copy the first `len` bytes of `src` to `dst` using buffered reads and
/// writes in fixed-size blocks — not mappings, since both files must be
/// fully consistent with their on-disk contents at the copy boundary.
fn stream_copy(src: &File, dst: &File, len: u64) -> io::Result<()> {
    dst.set_len(len)?;
    let mut reader = BufReader::new(src.try_clone()?);
    let mut writer = BufWriter::new(dst.try_clone()?);
    let mut buf = vec![0u8; FINALIZE_COPY_BYTES];

    let mut remaining = len;
    while remaining > 0 {
        let want = (remaining as usize).min(buf.len());
        reader.read_exact(&mut buf[..want])?;
        writer.write_all(&buf[..want])?;
        remaining -= want as u64;
    }
    writer.flush()?;
    Ok(())
}

/// Sample up to [`SORTEDNESS_SAMPLE_CAP`] evenly spaced records and
/// report whether every adjacent sampled pair is non-decreasing. This is
/// a heuristic, not a proof: a pathological almost-sorted file can slip
/// through. Kept deliberately fast rather than strengthened to a full
/// scan, matching the short-circuit's purpose of skipping already-sorted
/// input cheaply.
fn is_probably_sorted(file: &File, total: u64) -> io::Result<bool> {
    let sample_count = total.min(SORTEDNESS_SAMPLE_CAP);
    if sample_count < 2 {
        return Ok(true);
    }

    let mut prev: Option<i64> = None;
    for i in 0..sample_count {
        let idx = i * (total - 1) / (sample_count - 1);
        let value = read_record_at(file, idx)?;
        if let Some(p) = prev {
            if value < p {
                return Ok(false);
            }
        }
        prev = Some(value);
    }
    Ok(true)
}

fn read_record_at(file: &File, index: u64) -> io::Result<i64> {
    let mut buf = [0u8; RECORD_SIZE as usize];
    file.read_exact_at(&mut buf, bytes_for(index))?;
    Ok(i64::from_ne_bytes(buf))
}

pub(crate) fn temp_path_for(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".tmp_sort");
    PathBuf::from(os)
}
