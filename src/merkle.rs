//! Merkle root aggregation over transaction digests
//!
//! Levels with an odd number of nodes are padded by duplicating their last
//! hash before pairing, at every level. A single leaf is its own root.

use crate::crypto::{hash_pair, Sha256Hash};
use crate::error::{ChainError, Result};

/// Fold an ordered list of leaf digests into a single root.
pub fn compute_root(leaves: &[Sha256Hash]) -> Result<Sha256Hash> {
    if leaves.is_empty() {
        return Err(ChainError::EmptyTransactionSet);
    }

    let mut level = leaves.to_vec();
    while level.len() > 1 {
        if level.len() % 2 != 0 {
            let last = level[level.len() - 1];
            level.push(last);
        }
        level = level
            .chunks(2)
            .map(|pair| hash_pair(&pair[0], &pair[1]))
            .collect();
    }
    Ok(level[0])
}
