//! Benchmark utilities.

use rand::Rng;
use std::fs;
use std::path::Path;

/// Generate random payload data of the specified size.
pub fn random_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

/// Create `count` empty indexed files for `stem` + `ext` in `dir`.
pub fn seed_indexed_files(dir: &Path, stem: &str, ext: &str, count: u64) {
    for idx in 0..count {
        fs::write(dir.join(format!("{stem}_{idx}{ext}")), b"").unwrap();
    }
}
