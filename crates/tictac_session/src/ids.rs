//! Random identifiers.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Generates a random alphanumeric identifier of `len` characters.
pub fn generate_id(len: usize) -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
