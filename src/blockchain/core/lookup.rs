use crate::error::Result;
use crate::transaction::{OrderStatus, Transaction};
use serde::Serialize;

use super::chain::Ledger;

/// Label payload describing the latest confirmed state of one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderReceipt {
    pub order_id: u64,
    pub timestamp: u64,
    pub product: String,
    pub client: Option<String>,
    pub distributor: Option<String>,
    pub status: OrderStatus,
    pub transaction_hash: String,
}

impl OrderReceipt {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<&Transaction> for OrderReceipt {
    fn from(tx: &Transaction) -> Self {
        OrderReceipt {
            order_id: tx.order_id(),
            timestamp: tx.timestamp(),
            product: tx.product_name().to_string(),
            client: tx.client().map(|p| p.to_string()),
            distributor: tx.distributor().map(|p| p.to_string()),
            status: tx.status(),
            transaction_hash: tx.hash_str(),
        }
    }
}

impl Ledger {
    /// Most recent confirmed record for `order_id`: newest block first, and
    /// within a block the last transaction first. Pending records are not
    /// considered.
    pub fn find_transaction_by_order_id(&self, order_id: u64) -> Option<&Transaction> {
        self.blocks
            .iter()
            .rev()
            .flat_map(|block| block.transactions.iter().rev())
            .find(|tx| tx.order_id() == order_id)
    }

    /// Every confirmed record for `order_id`, oldest first.
    pub fn order_history(&self, order_id: u64) -> Vec<&Transaction> {
        self.blocks
            .iter()
            .flat_map(|block| block.transactions.iter())
            .filter(|tx| tx.order_id() == order_id)
            .collect()
    }

    pub fn order_receipt(&self, order_id: u64) -> Option<OrderReceipt> {
        self.find_transaction_by_order_id(order_id)
            .map(OrderReceipt::from)
    }
}
