//! Thread-safe ledger handle
//!
//! All mutations go through one `parking_lot::Mutex`. Mining runs outside
//! the lock against a snapshot; the commit re-acquires the lock and is
//! rejected if another block landed first, in which case the handle
//! re-snapshots and mines again.

use crate::blockchain::{Block, Ledger};
use crate::config::LedgerConfig;
use crate::error::{ChainError, Result};
use crate::miner::{CancelFlag, Miner};
use crate::transaction::Transaction;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct SharedLedger {
    inner: Arc<Mutex<Ledger>>,
    miner: Miner,
    max_stale_retries: u32,
}

impl SharedLedger {
    pub fn new(ledger: Ledger, max_stale_retries: u32) -> Self {
        let miner = *ledger.miner();
        SharedLedger {
            inner: Arc::new(Mutex::new(ledger)),
            miner,
            max_stale_retries,
        }
    }

    pub fn from_config(config: &LedgerConfig) -> Result<Self> {
        Ok(SharedLedger::new(
            Ledger::from_config(config)?,
            config.max_stale_retries,
        ))
    }

    pub fn add_transaction(&self, transaction: Transaction) {
        self.inner.lock().add_transaction(transaction);
    }

    pub fn mine_pending(&self) -> Result<Block> {
        self.mine(None)
    }

    pub fn mine_pending_with_cancel(&self, cancel: &CancelFlag) -> Result<Block> {
        self.mine(Some(cancel))
    }

    fn mine(&self, cancel: Option<&CancelFlag>) -> Result<Block> {
        self.mine_with(|prepared| match cancel {
            Some(cancel) => self.miner.mine_with_cancel(prepared, cancel),
            None => self.miner.mine(prepared),
        })
    }

    /// Prepare under the lock, run `solve` unlocked, commit under the lock.
    /// A commit rejected because the tip or the difficulty moved is retried
    /// from a fresh snapshot up to `max_stale_retries` times.
    fn mine_with<F>(&self, mut solve: F) -> Result<Block>
    where
        F: FnMut(Block) -> Result<Block>,
    {
        let mut retries = 0;
        loop {
            let prepared = self.inner.lock().prepare_block()?;
            let mined = solve(prepared)?;

            let committed = self.inner.lock().commit_block(mined);
            match committed {
                Err(
                    err @ (ChainError::StaleChainTip { .. }
                    | ChainError::DifficultyMismatch { .. }),
                ) => {
                    if retries >= self.max_stale_retries {
                        return Err(err);
                    }
                    retries += 1;
                    warn!(
                        "Ledger moved while mining ({}); retry {}/{}",
                        err, retries, self.max_stale_retries
                    );
                }
                result => return result,
            }
        }
    }

    pub fn find_transaction_by_order_id(&self, order_id: u64) -> Option<Transaction> {
        self.inner.lock().find_transaction_by_order_id(order_id).cloned()
    }

    pub fn validate_chain(&self) -> Result<()> {
        self.inner.lock().validate_chain()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn pending_len(&self) -> usize {
        self.inner.lock().pending_transactions().len()
    }

    /// Direct access for reads that need more than one call to agree.
    pub fn lock(&self) -> MutexGuard<'_, Ledger> {
        self.inner.lock()
    }
}
