//! Benchmark utilities.

use rand::Rng;

/// Generates `size` random bytes.
pub fn random_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

/// Splits `total` bytes into writes of `record` bytes each.
pub fn records(total: usize, record: usize) -> Vec<Vec<u8>> {
    let data = random_data(total);
    data.chunks(record.max(1)).map(<[u8]>::to_vec).collect()
}
