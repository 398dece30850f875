//! Random-data generator (C6): writes `count` uniformly random int64
//! records to a file, optionally pre-sorted.

pub mod core;

#[cfg(test)]
mod tests;

pub use self::core::*;
