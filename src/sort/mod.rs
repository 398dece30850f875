//! Orchestrator (C5): ties the mapping helper, run generator, and pass
//! driver together into the end-to-end external sort.

mod orchestrator;

#[cfg(test)]
mod tests;

pub use orchestrator::{SortError, SortOptions, compute_max_k, resolve_mem_bytes, sort_file};
