use crate::crypto::Sha256Hash;
use crate::error::{ChainError, IntegrityFault, Result};

use super::chain::{Block, Ledger, GENESIS_PREVIOUS_HASH};

/// Check one block against its own content and the hash it should link to.
///
/// Order: Merkle root, block hash, proof of work, linkage.
pub fn validate_block(
    block: &Block,
    expected_previous: &Sha256Hash,
) -> std::result::Result<(), IntegrityFault> {
    match block.recompute_merkle_root() {
        Ok(root) if root == block.merkle_root() => {}
        _ => return Err(IntegrityFault::MerkleRootMismatch),
    }
    if block.recompute_hash() != block.hash() {
        return Err(IntegrityFault::HashMismatch);
    }
    if !block.meets_difficulty() {
        return Err(IntegrityFault::InsufficientWork);
    }
    if block.previous_hash() != *expected_previous {
        return Err(IntegrityFault::LinkageMismatch);
    }
    Ok(())
}

impl Ledger {
    /// Re-derive every block and report the first inconsistency.
    pub fn validate_chain(&self) -> Result<()> {
        let mut expected_previous = GENESIS_PREVIOUS_HASH;
        for (index, block) in self.blocks.iter().enumerate() {
            validate_block(block, &expected_previous)
                .map_err(|fault| ChainError::IntegrityViolation { index, fault })?;
            expected_previous = block.hash();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::{OrderStatus, Transaction};

    const T0: u64 = 1_700_000_000_000;

    fn mined_ledger(blocks: u64) -> Ledger {
        let mut ledger = Ledger::new(1).unwrap();
        for i in 0..blocks {
            ledger.add_transaction(Transaction::new(i, "widget", OrderStatus::Ordered, T0 + i));
            ledger.add_transaction(Transaction::new(i + 100, "gadget", OrderStatus::Ordered, T0 + i));
            ledger.mine_pending().unwrap();
        }
        ledger
    }

    fn violation(index: usize, fault: IntegrityFault) -> Result<()> {
        Err(ChainError::IntegrityViolation { index, fault })
    }

    #[test]
    fn test_empty_and_mined_chains_validate() {
        assert!(Ledger::new(1).unwrap().validate_chain().is_ok());
        assert!(mined_ledger(4).validate_chain().is_ok());
    }

    #[test]
    fn test_nonce_tampering_is_localized() {
        for k in 0..4 {
            let mut ledger = mined_ledger(4);
            ledger.blocks[k].header.nonce += 1;
            assert_eq!(ledger.validate_chain(), violation(k, IntegrityFault::HashMismatch));
        }
    }

    #[test]
    fn test_transaction_tampering_is_a_merkle_fault() {
        let mut ledger = mined_ledger(3);
        ledger.blocks[1].transactions.swap(0, 1);
        assert_eq!(ledger.validate_chain(), violation(1, IntegrityFault::MerkleRootMismatch));

        let mut ledger = mined_ledger(3);
        ledger.blocks[2].transactions.clear();
        assert_eq!(ledger.validate_chain(), violation(2, IntegrityFault::MerkleRootMismatch));
    }

    #[test]
    fn test_rehashed_block_breaks_successor_link() {
        let mut ledger = mined_ledger(3);
        let block = &mut ledger.blocks[1];
        // Walk to a nonce that still meets difficulty so only the link breaks.
        let mut nonce = block.nonce() + 1;
        loop {
            block.set_nonce(nonce);
            if block.meets_difficulty() {
                break;
            }
            nonce += 1;
        }
        assert_eq!(ledger.validate_chain(), violation(2, IntegrityFault::LinkageMismatch));
    }

    #[test]
    fn test_insufficient_work_is_reported() {
        let mut ledger = mined_ledger(2);
        let block = &mut ledger.blocks[0];
        let mut nonce = block.nonce() + 1;
        loop {
            block.set_nonce(nonce);
            if !block.meets_difficulty() {
                break;
            }
            nonce += 1;
        }
        assert_eq!(ledger.validate_chain(), violation(0, IntegrityFault::InsufficientWork));
    }

    #[test]
    fn test_genesis_must_use_sentinel() {
        let mut ledger = mined_ledger(2);
        let block = &mut ledger.blocks[0];
        block.header.previous_hash = [7u8; 32];
        let mut nonce = 0;
        loop {
            block.set_nonce(nonce);
            if block.meets_difficulty() {
                break;
            }
            nonce += 1;
        }
        assert_eq!(ledger.validate_chain(), violation(0, IntegrityFault::LinkageMismatch));
    }
}
