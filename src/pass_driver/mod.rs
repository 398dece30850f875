//! Pass driver (C4): groups the current run list into windows of `k`,
//! invokes the k-way merger per window, and emits the shorter run list
//! for the next pass.

pub mod core;


pub use self::core::*;
