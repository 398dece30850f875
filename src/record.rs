//! The on-disk record format: a raw, contiguous sequence of 8-byte
//! native-endian signed integers. No header, no footer; size must be a
//! multiple of [`RECORD_SIZE`].

/// Size in bytes of a single record.
pub const RECORD_SIZE: u64 = 8;

/// Number of records represented by `byte_len` bytes.
///
/// Caller must have already validated `byte_len % RECORD_SIZE == 0`.
pub fn records_in(byte_len: u64) -> u64 {
    byte_len / RECORD_SIZE
}

/// Byte length of `records` records.
pub fn bytes_for(records: u64) -> u64 {
    records * RECORD_SIZE
}
