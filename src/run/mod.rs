//! A run: a contiguous, non-decreasing subrange of one of the two sort
//! files, identified by record offset and length.

pub mod core;


pub use self::core::*;
