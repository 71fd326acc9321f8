//! Deterministic content hashing of a node list.
//!
//! The hash covers every node field, UI offsets included, so any edit to a
//! rule's shape invalidates prior cache entries while leaving other shapes
//! of the same rule untouched.

use crate::error::HashError;
use crate::graph::Node;
use sha2::{Digest, Sha256};
use std::fmt::Write;

/// Computes the structure hash of a node list: SHA-256 over the canonical
/// binary encoding, rendered as 64 lowercase hex characters.
///
/// The encoding depends only on field values (struct field order and sorted
/// map keys), never on object identity, so the hash is stable across process
/// restarts. Each call owns its hashing state and is safe to run
/// concurrently with any other.
pub fn structure_hash(nodes: &[Node]) -> Result<String, HashError> {
    let bytes = bincode::serde::encode_to_vec(nodes, bincode::config::standard())
        .map_err(|e| HashError::SerializationFailed(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hasher.finalize();

    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        write!(hex, "{:02x}", byte)
            .map_err(|e| HashError::HashComputationFailed(e.to_string()))?;
    }
    Ok(hex)
}

/// Checks that a caller-supplied digest has the expected wire format.
pub fn verify_format(hash: &str) -> Result<(), HashError> {
    let well_formed = hash.len() == 64
        && hash
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c));
    if well_formed {
        Ok(())
    } else {
        Err(HashError::InvalidFormat(hash.to_string()))
    }
}
