use crate::config::LedgerConfig;
use crate::crypto::{hash_to_hex, leading_zero_nibbles, Sha256Hash};
use crate::error::{ChainError, Result};
use crate::merkle::compute_root;
use crate::miner::{CancelFlag, Miner};
use crate::transaction::Transaction;
use sha2::{Digest, Sha256};
use std::fmt;
use tracing::{debug, info};

/// Previous-hash value carried by the first block of a chain.
pub const GENESIS_PREVIOUS_HASH: Sha256Hash = [0u8; 32];

/// Highest satisfiable difficulty: every hex character of a SHA-256 digest.
pub const MAX_DIFFICULTY: u32 = 64;

pub fn validate_difficulty(difficulty: u32) -> Result<u32> {
    if difficulty > MAX_DIFFICULTY {
        return Err(ChainError::InvalidDifficulty(difficulty));
    }
    Ok(difficulty)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BlockHeader {
    /// Milliseconds since the Unix epoch.
    pub(crate) timestamp: u64,
    pub(crate) previous_hash: Sha256Hash,
    pub(crate) merkle_root: Sha256Hash,
    pub(crate) difficulty: u32,
    pub(crate) nonce: u64,
}

/// A batch of transactions linked to its predecessor by hash.
///
/// `hash` is cached and kept in step with `nonce`: the only way to change
/// the nonce is [`Block::set_nonce`], which recomputes the hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub(crate) header: BlockHeader,
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) hash: Sha256Hash,
}

impl Block {
    pub fn new(
        timestamp: u64,
        transactions: Vec<Transaction>,
        previous_hash: Sha256Hash,
        nonce: u64,
        difficulty: u32,
    ) -> Result<Self> {
        validate_difficulty(difficulty)?;
        let merkle_root = Block::calculate_merkle_root(&transactions)?;
        let hash = Block::calculate_hash(&transactions, timestamp, &previous_hash, nonce);

        Ok(Block {
            header: BlockHeader {
                timestamp,
                previous_hash,
                merkle_root,
                difficulty,
                nonce,
            },
            transactions,
            hash,
        })
    }

    /// SHA-256 over every transaction digest in order, then the timestamp
    /// (u64 LE), the previous hash and the nonce (u64 LE).
    pub fn calculate_hash(
        transactions: &[Transaction],
        timestamp: u64,
        previous_hash: &Sha256Hash,
        nonce: u64,
    ) -> Sha256Hash {
        let mut hasher = Sha256::new();
        for tx in transactions {
            hasher.update(tx.hash());
        }
        hasher.update(timestamp.to_le_bytes());
        hasher.update(previous_hash);
        hasher.update(nonce.to_le_bytes());
        hasher.finalize().into()
    }

    pub fn calculate_merkle_root(transactions: &[Transaction]) -> Result<Sha256Hash> {
        let leaves: Vec<Sha256Hash> = transactions.iter().map(Transaction::hash).collect();
        compute_root(&leaves)
    }

    /// Hash recomputed from the current content, ignoring the cached value.
    pub fn recompute_hash(&self) -> Sha256Hash {
        Block::calculate_hash(
            &self.transactions,
            self.header.timestamp,
            &self.header.previous_hash,
            self.header.nonce,
        )
    }

    pub fn recompute_merkle_root(&self) -> Result<Sha256Hash> {
        Block::calculate_merkle_root(&self.transactions)
    }

    pub(crate) fn set_nonce(&mut self, nonce: u64) {
        self.header.nonce = nonce;
        self.hash = self.recompute_hash();
    }

    pub fn meets_difficulty(&self) -> bool {
        leading_zero_nibbles(&self.hash) >= self.header.difficulty
    }

    pub fn hash(&self) -> Sha256Hash {
        self.hash
    }

    pub fn hash_str(&self) -> String {
        hash_to_hex(&self.hash)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn timestamp(&self) -> u64 {
        self.header.timestamp
    }

    pub fn previous_hash(&self) -> Sha256Hash {
        self.header.previous_hash
    }

    pub fn merkle_root(&self) -> Sha256Hash {
        self.header.merkle_root
    }

    pub fn difficulty(&self) -> u32 {
        self.header.difficulty
    }

    pub fn nonce(&self) -> u64 {
        self.header.nonce
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "Block [hash: {}, previous: {}, merkle_root: {}, time: {}, difficulty: {}, nonce: {}]",
            self.hash_str(),
            hash_to_hex(&self.header.previous_hash),
            hash_to_hex(&self.header.merkle_root),
            self.header.timestamp,
            self.header.difficulty,
            self.header.nonce
        )?;
        for tx in &self.transactions {
            writeln!(f, "  {}", tx)?;
        }
        Ok(())
    }
}

fn now_millis() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

/// Append-only chain of mined blocks plus the pending-transaction staging area.
#[derive(Debug, Clone)]
pub struct Ledger {
    pub(crate) blocks: Vec<Block>,
    difficulty: u32,
    pending: Vec<Transaction>,
    miner: Miner,
}

impl Ledger {
    /// Create an empty ledger mining at `difficulty` with the default miner.
    pub fn new(difficulty: u32) -> Result<Self> {
        Ok(Ledger {
            blocks: Vec::new(),
            difficulty: validate_difficulty(difficulty)?,
            pending: Vec::new(),
            miner: Miner::default(),
        })
    }

    pub fn from_config(config: &LedgerConfig) -> Result<Self> {
        let mut ledger = Ledger::new(config.difficulty)?;
        ledger.miner = Miner::new(config.cancel_check_interval);
        Ok(ledger)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn tip(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Hash the next block must link to.
    pub fn tip_hash(&self) -> Sha256Hash {
        self.tip().map_or(GENESIS_PREVIOUS_HASH, Block::hash)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn pending_transactions(&self) -> &[Transaction] {
        &self.pending
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Applies to the next block mined; existing blocks keep their own.
    pub fn set_difficulty(&mut self, difficulty: u32) -> Result<()> {
        self.difficulty = validate_difficulty(difficulty)?;
        Ok(())
    }

    pub fn miner(&self) -> &Miner {
        &self.miner
    }

    pub fn add_transaction(&mut self, transaction: Transaction) {
        debug!(
            "Queued transaction {} for order {}",
            transaction.hash_str(),
            transaction.order_id()
        );
        self.pending.push(transaction);
    }

    /// Unmined block over a snapshot of the pending set, linked to the tip.
    /// Leaves the ledger untouched.
    pub fn prepare_block(&self) -> Result<Block> {
        if self.pending.is_empty() {
            return Err(ChainError::EmptyTransactionSet);
        }
        Block::new(
            now_millis(),
            self.pending.clone(),
            self.tip_hash(),
            0,
            self.difficulty,
        )
    }

    /// Append a solved block built by [`Ledger::prepare_block`] and drop its
    /// transactions from the front of the pending set. The block must carry
    /// the ledger's current difficulty.
    pub fn commit_block(&mut self, block: Block) -> Result<Block> {
        let tip_hash = self.tip_hash();
        if block.previous_hash() != tip_hash {
            return Err(ChainError::StaleChainTip {
                expected: hash_to_hex(&block.previous_hash()),
                actual: hash_to_hex(&tip_hash),
            });
        }

        if block.difficulty() != self.difficulty {
            return Err(ChainError::DifficultyMismatch {
                expected: self.difficulty,
                actual: block.difficulty(),
            });
        }

        if block.hash != block.recompute_hash() || !block.meets_difficulty() {
            return Err(ChainError::UnsolvedBlock);
        }

        // Pending only shrinks together with a tip change, so an unchanged
        // tip means the snapshot is still the pending prefix.
        let count = block.transactions.len();
        if self.pending.len() < count || self.pending[..count] != block.transactions[..] {
            return Err(ChainError::StaleChainTip {
                expected: hash_to_hex(&block.previous_hash()),
                actual: hash_to_hex(&tip_hash),
            });
        }

        self.pending.drain(..count);
        self.blocks.push(block.clone());
        info!(
            "Appended block {} at height {} ({} transactions)",
            block.hash_str(),
            self.blocks.len() - 1,
            count
        );
        Ok(block)
    }

    /// Snapshot pending transactions into a block, mine it and append it.
    pub fn mine_pending(&mut self) -> Result<Block> {
        let block = self.prepare_block()?;
        let mined = self.miner.mine(block)?;
        self.commit_block(mined)
    }

    /// Like [`Ledger::mine_pending`], but stops when `cancel` is triggered.
    /// A cancelled search leaves the pending set untouched.
    pub fn mine_pending_with_cancel(&mut self, cancel: &CancelFlag) -> Result<Block> {
        let block = self.prepare_block()?;
        let mined = self.miner.mine_with_cancel(block, cancel)?;
        self.commit_block(mined)
    }
}

impl fmt::Display for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (height, block) in self.blocks.iter().enumerate() {
            write!(f, "#{} {}", height, block)?;
        }
        writeln!(
            f,
            "{} blocks, {} pending transactions, difficulty {}",
            self.blocks.len(),
            self.pending.len(),
            self.difficulty
        )
    }
}
