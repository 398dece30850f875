//! Run generator (C2): partitions the input into memory-budget-sized
//! chunks, sorts each chunk in place through a writable mapping, and
//! copies the sorted bytes into the matching range of the output file.

pub mod core;


pub use self::core::*;
