//! Short random job identifiers.
//!
//! Submitted jobs reuse the same human-readable display names across
//! runs; a short random suffix keeps concurrent runs apart. The token
//! offers probabilistic collision avoidance only and is not
//! cryptographically significant.

use rand::RngExt;

/// Suffix length used for job display names.
pub const DEFAULT_LENGTH: usize = 8;

const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a random lowercase-alphanumeric token of `length` characters.
pub fn generate(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// Generate a token of the default length.
pub fn generate_default() -> String {
    generate(DEFAULT_LENGTH)
}
