//! `isort` — single CLI dispatcher over the three modes this crate
//! exposes: generate, check, sort. The modes don't share a uniform flag
//! shape (`--gen`/`--check` aren't valid long-option identifiers a
//! `clap` subcommand tree would route uniformly alongside the bare-file
//! default mode), so the first argument is inspected by hand and each
//! branch parses its own remaining arguments with a `clap::Parser`
//! struct, the same way the teacher's per-tool binaries do.

use std::path::PathBuf;
use std::process;

use clap::Parser;

use extsort_core::generate::{GenerateOptions, generate_file};
use extsort_core::sort::{SortOptions, sort_file};
use extsort_core::verify::{VerifyOutcome, verify_file};

#[derive(Parser)]
#[command(name = "isort --gen", about = "Write random int64 records to a file")]
struct GenArgs {
    file: PathBuf,
    count: u64,
    /// Literal "sorted" pre-sorts the generated records before writing.
    sorted: Option<String>,
}

#[derive(Parser)]
#[command(name = "isort --check", about = "Report whether a file's records are non-decreasing")]
struct CheckArgs {
    file: PathBuf,
}

#[derive(Parser)]
#[command(name = "isort", about = "External mmap-based merge sort of fixed-width int64 records")]
struct SortArgs {
    file: PathBuf,
    limit_mb: Option<u64>,
}

fn main() {
    let mut args: Vec<String> = std::env::args().collect();
    let bin = args.remove(0);

    let code = match args.first().map(String::as_str) {
        Some("--gen") => run_gen(&bin, &args[1..]),
        Some("--check") => run_check(&bin, &args[1..]),
        _ => run_sort(&bin, &args),
    };
    process::exit(code);
}

fn run_gen(bin: &str, rest: &[String]) -> i32 {
    let parsed = match GenArgs::try_parse_from(std::iter::once(bin.to_string()).chain(rest.iter().cloned())) {
        Ok(parsed) => parsed,
        Err(err) => return report(bin, &err),
    };
    let sorted = matches!(parsed.sorted.as_deref(), Some("sorted"));
    let options = GenerateOptions { count: parsed.count, sorted, seed: None };

    match generate_file(&parsed.file, &options) {
        Ok(()) => {
            let suffix = if sorted { " (sorted)" } else { "" };
            println!(
                "Generated {} 64-bit integers into {}{}.",
                parsed.count,
                parsed.file.display(),
                suffix
            );
            0
        }
        Err(err) => report(bin, &err),
    }
}

fn run_check(bin: &str, rest: &[String]) -> i32 {
    let parsed = match CheckArgs::try_parse_from(std::iter::once(bin.to_string()).chain(rest.iter().cloned())) {
        Ok(parsed) => parsed,
        Err(err) => return report(bin, &err),
    };

    match verify_file(&parsed.file) {
        Ok(VerifyOutcome::TriviallySorted) | Ok(VerifyOutcome::Sorted) => {
            println!("sorted ascending");
            0
        }
        Ok(VerifyOutcome::NotSorted { index, prev, curr }) => {
            println!("NOT sorted: record {index} ({prev}) > record {} ({curr})", index + 1);
            0
        }
        Err(err) => report(bin, &err),
    }
}

fn run_sort(bin: &str, rest: &[String]) -> i32 {
    let parsed = match SortArgs::try_parse_from(std::iter::once(bin.to_string()).chain(rest.iter().cloned())) {
        Ok(parsed) => parsed,
        Err(err) => return report(bin, &err),
    };
    let options = SortOptions { limit_mb: parsed.limit_mb, progress: true };

    match sort_file(&parsed.file, &options) {
        Ok(()) => 0,
        Err(err) => report(bin, &err),
    }
}

fn report(bin: &str, err: &dyn std::fmt::Display) -> i32 {
    eprintln!("{bin}: {err}");
    1
}
