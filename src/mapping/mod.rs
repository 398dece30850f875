//! Page-aligned memory mapping helper (C1).
//!
//! `mmap(2)` requires the file offset passed to it to be a multiple of the
//! system page size. Callers of this module want to address arbitrary
//! byte ranges, so [`PageMapping::map`] rounds the requested offset down
//! to the nearest page boundary, expands the mapped length by the
//! dropped prefix, and hands back a pointer that already points at the
//! caller's requested `byte_offset` — the alignment arithmetic is not
//! something any other module in this crate needs to know about.
//!
//! This intentionally goes straight to `libc::mmap`/`libc::munmap`
//! rather than through `memmap2`: `memmap2::MmapOptions` performs this
//! same rounding internally and never surfaces the raw, page-aligned
//! base/length pair, which is exactly the information this component is
//! specified to own and expose.

pub mod core;


pub use self::core::*;
