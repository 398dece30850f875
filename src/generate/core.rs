use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("{0}")]
    Io(#[from] io::Error),
}

/// Options for [`generate_file`].
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub count: u64,
    pub sorted: bool,
    /// Deterministic seed for tests; `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions { count: 0, sorted: false, seed: None }
    }
}

/// Write `options.count` uniformly distributed `i64` records to `path`,
/// overwriting it. Sorts the records first when `options.sorted` is set.
pub fn generate_file(path: &Path, options: &GenerateOptions) -> Result<(), GenerateError> {
    let mut rng: StdRng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut data: Vec<i64> = (0..options.count).map(|_| rng.gen::<i64>()).collect();
    if options.sorted {
        data.sort_unstable();
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for record in &data {
        writer.write_all(&record.to_ne_bytes())?;
    }
    writer.flush()?;
    Ok(())
}
