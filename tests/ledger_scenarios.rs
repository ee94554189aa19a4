//! Integration tests for the ledger's public surface

use orderchain::blockchain::{Ledger, GENESIS_PREVIOUS_HASH};
use orderchain::config::{parse_config, Config};
use orderchain::error::ChainError;
use orderchain::merkle::compute_root;
use orderchain::miner::CancelFlag;
use orderchain::shared::SharedLedger;
use orderchain::transaction::{OrderStatus, PartyId, Transaction};

const T0: u64 = 1_700_000_000_000;

#[test]
fn test_end_to_end_mining() -> Result<(), Box<dyn std::error::Error>> {
    let mut ledger = Ledger::new(1)?;
    let tx1 = Transaction::new(1, "widget", OrderStatus::Ordered, T0);
    let tx2 = Transaction::new(2, "gadget", OrderStatus::Ordered, T0);
    let expected_root = compute_root(&[tx1.hash(), tx2.hash()])?;

    ledger.add_transaction(tx1);
    ledger.add_transaction(tx2);
    assert_eq!(ledger.pending_transactions().len(), 2);

    let block = ledger.mine_pending()?;
    assert_eq!(block.merkle_root(), expected_root);
    assert_eq!(block.previous_hash(), GENESIS_PREVIOUS_HASH);
    assert!(block.hash_str().starts_with('0'));
    assert_eq!(block.transactions()[0].order_id(), 1);
    assert_eq!(block.transactions()[1].order_id(), 2);

    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.pending_transactions().len(), 0);

    assert_eq!(ledger.mine_pending(), Err(ChainError::EmptyTransactionSet));
    assert_eq!(ledger.len(), 1);
    ledger.validate_chain()?;

    Ok(())
}

#[test]
fn test_lookup_returns_most_recent_status() -> Result<(), Box<dyn std::error::Error>> {
    let mut ledger = Ledger::new(1)?;
    ledger.add_transaction(Transaction::new(5, "widget", OrderStatus::Ordered, T0));
    ledger.mine_pending()?;
    ledger.add_transaction(Transaction::new(5, "widget", OrderStatus::Delivered, T0 + 60_000));
    ledger.mine_pending()?;

    let found = ledger
        .find_transaction_by_order_id(5)
        .ok_or("order 5 not found")?;
    assert_eq!(found.status(), OrderStatus::Delivered);
    assert!(ledger.find_transaction_by_order_id(6).is_none());

    Ok(())
}

#[test]
fn test_many_blocks_validate() -> Result<(), Box<dyn std::error::Error>> {
    let mut ledger = Ledger::new(2)?;
    for order_id in 0..5 {
        ledger.add_transaction(
            Transaction::new(order_id, "chips", OrderStatus::Ordered, T0 + order_id)
                .with_client(PartyId::new("alice")),
        );
        ledger.add_transaction(
            Transaction::new(order_id, "chips", OrderStatus::InTransitToClient, T0 + order_id + 1)
                .with_distributor(PartyId::new("dave")),
        );
        ledger.mine_pending()?;
    }

    assert_eq!(ledger.len(), 5);
    for pair in ledger.blocks().windows(2) {
        assert_eq!(pair[1].previous_hash(), pair[0].hash());
    }
    for block in ledger.blocks() {
        assert!(block.hash_str().starts_with("00"));
        assert_eq!(block.difficulty(), 2);
    }
    ledger.validate_chain()?;

    Ok(())
}

#[test]
fn test_difficulty_change_applies_to_next_block() -> Result<(), Box<dyn std::error::Error>> {
    let mut ledger = Ledger::new(0)?;
    ledger.add_transaction(Transaction::new(1, "chips", OrderStatus::Ordered, T0));
    let first = ledger.mine_pending()?;
    assert_eq!(first.nonce(), 0);

    ledger.set_difficulty(2)?;
    ledger.add_transaction(Transaction::new(2, "chips", OrderStatus::Ordered, T0));
    let second = ledger.mine_pending()?;
    assert_eq!(second.difficulty(), 2);
    assert_eq!(ledger.blocks()[0].difficulty(), 0);
    ledger.validate_chain()?;

    Ok(())
}

#[test]
fn test_cancelled_mining_leaves_ledger_unchanged() -> Result<(), Box<dyn std::error::Error>> {
    let mut ledger = Ledger::new(64)?;
    ledger.add_transaction(Transaction::new(1, "chips", OrderStatus::Ordered, T0));

    let cancel = CancelFlag::new();
    cancel.trigger();
    assert_eq!(
        ledger.mine_pending_with_cancel(&cancel),
        Err(ChainError::MiningCancelled)
    );
    assert!(ledger.is_empty());
    assert_eq!(ledger.pending_transactions().len(), 1);

    Ok(())
}

#[test]
fn test_shared_ledger_from_config() -> Result<(), Box<dyn std::error::Error>> {
    let config: Config = parse_config("[ledger]\ndifficulty = 1\nmax_stale_retries = 2")?;
    let shared = SharedLedger::from_config(&config.ledger)?;

    let worker = {
        let shared = shared.clone();
        std::thread::spawn(move || {
            shared.add_transaction(Transaction::new(10, "biscuit", OrderStatus::Ordered, T0));
        })
    };
    worker.join().map_err(|_| "worker panicked")?;

    shared.mine_pending()?;
    assert_eq!(shared.len(), 1);
    assert_eq!(shared.pending_len(), 0);
    shared.validate_chain()?;

    Ok(())
}
