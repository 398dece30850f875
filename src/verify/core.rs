use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::record::{RECORD_SIZE, records_in};

/// Records per streaming read.
pub(crate) const VERIFY_BUF_RECORDS: usize = 32 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("file size {size} is not a multiple of {record_size} bytes")]
    NotRecordAligned { size: u64, record_size: u64 },
    #[error("{0}")]
    Io(#[from] io::Error),
}

/// Result of a [`verify_file`] scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// 0 or 1 records: vacuously sorted.
    TriviallySorted,
    /// Every adjacent pair is non-decreasing.
    Sorted,
    /// `file[index]` is smaller than `file[index - 1]`.
    NotSorted { index: u64, prev: i64, curr: i64 },
}

/// Scan `path` and determine whether it holds non-decreasing records.
pub fn verify_file(path: &Path) -> Result<VerifyOutcome, VerifyError> {
    let size = std::fs::metadata(path)?.len();
    if size % RECORD_SIZE != 0 {
        return Err(VerifyError::NotRecordAligned { size, record_size: RECORD_SIZE });
    }

    let total = records_in(size);
    if total < 2 {
        return Ok(VerifyOutcome::TriviallySorted);
    }

    let mut reader = io::BufReader::new(File::open(path)?);
    let mut byte_buf = vec![0u8; VERIFY_BUF_RECORDS * RECORD_SIZE as usize];
    let mut prev: Option<i64> = None;
    let mut index = 0u64;

    let mut remaining = total;
    while remaining > 0 {
        let want = VERIFY_BUF_RECORDS.min(remaining as usize);
        let want_bytes = want * RECORD_SIZE as usize;
        reader.read_exact(&mut byte_buf[..want_bytes])?;

        for chunk in byte_buf[..want_bytes].chunks_exact(RECORD_SIZE as usize) {
            let cur = i64::from_ne_bytes(chunk.try_into().unwrap());
            if let Some(p) = prev {
                if cur < p {
                    return Ok(VerifyOutcome::NotSorted { index, prev: p, curr: cur });
                }
            }
            prev = Some(cur);
            index += 1;
        }
        remaining -= want as u64;
    }

    Ok(VerifyOutcome::Sorted)
}
