//! k-way merger (C3): merges up to `k` sorted runs from `input` into a
//! contiguous range of `output`, using per-run refillable buffers, an
//! output buffer, and a min-heap keyed on head values.

pub mod core;


pub use self::core::*;
