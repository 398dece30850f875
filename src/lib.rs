/// Use mimalloc as the global allocator for the sort binary.
/// External merge sort allocates a `Vec<i64>` per run slot on every
/// merge pass; mimalloc's thread-local caching keeps that churn cheap.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod generate;
pub mod mapping;
pub mod merge;
pub mod pass_driver;
pub mod record;
pub mod run;
pub mod run_generator;
pub mod sort;
pub mod verify;
