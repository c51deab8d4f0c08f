//! Session token minting and hashing

use std::fmt::Write as _;

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Random bytes behind each minted token
const TOKEN_BYTES: usize = 32;

/// Hex characters of the digest kept in log fingerprints
const FINGERPRINT_LEN: usize = 12;

/// Mint a new opaque session token
///
/// Tokens are 32 bytes from the thread-local CSPRNG, hex encoded.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    to_hex(&bytes)
}

/// Short, non-reversible token identifier for diagnostics
pub fn fingerprint(token: &str) -> String {
    let mut digest = sha256_hex(token);
    digest.truncate(FINGERPRINT_LEN);
    digest
}

/// Compute the SHA-256 hex digest of a string
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    to_hex(&hasher.finalize())
}

fn to_hex(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        // Writing hex to a String is infallible
        write!(hex, "{byte:02x}").unwrap();
    }
    hex
}
