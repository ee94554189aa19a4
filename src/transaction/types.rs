/// Transaction types for OrderChain
use crate::crypto::{sha256, Sha256Hash};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle stage of an order recorded on the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Ordered,
    InTransitToDistributor,
    InTransitToClient,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Ordered => "ORDERED",
            OrderStatus::InTransitToDistributor => "IN_TRANSIT_TO_DISTRIBUTOR",
            OrderStatus::InTransitToClient => "IN_TRANSIT_TO_CLIENT",
            OrderStatus::Delivered => "DELIVERED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    /// Case-insensitive; `-`, `_` and spaces are interchangeable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();
        match normalized.as_str() {
            "ORDERED" | "ORDERED_BY_CLIENT" => Ok(OrderStatus::Ordered),
            "IN_TRANSIT_TO_DISTRIBUTOR" | "TRANSIT_TO_DISTRIBUTOR" => {
                Ok(OrderStatus::InTransitToDistributor)
            }
            "IN_TRANSIT_TO_CLIENT" | "TRANSIT_TO_CLIENT" => Ok(OrderStatus::InTransitToClient),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            _ => Err(format!("Unknown order status: {}", s)),
        }
    }
}

/// Identifier of an external party (manufacturer, distributor or client).
///
/// The ledger never owns party state; callers resolve ids against their own
/// directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PartyId(String);

impl PartyId {
    pub fn new(name: impl Into<String>) -> Self {
        PartyId(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PartyId {
    fn from(s: &str) -> Self {
        PartyId::new(s)
    }
}

/// One recorded order event.
///
/// Immutable once built: fields are private and the digest is computed in
/// the constructor. Party builders may be chained before the record is
/// handed to the ledger; they do not touch the digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    order_id: u64,
    product_name: String,
    status: OrderStatus,
    manufacturer: Option<PartyId>,
    distributor: Option<PartyId>,
    client: Option<PartyId>,
    /// Milliseconds since the Unix epoch.
    timestamp: u64,
    #[serde(skip)]
    hash: Sha256Hash,
}

impl Transaction {
    pub fn new(
        order_id: u64,
        product_name: impl Into<String>,
        status: OrderStatus,
        timestamp: u64,
    ) -> Self {
        Transaction {
            order_id,
            product_name: product_name.into(),
            status,
            manufacturer: None,
            distributor: None,
            client: None,
            timestamp,
            hash: Self::calculate_hash(order_id, timestamp),
        }
    }

    /// Record stamped with the current wall-clock time.
    pub fn now(order_id: u64, product_name: impl Into<String>, status: OrderStatus) -> Self {
        let timestamp = chrono::Utc::now().timestamp_millis().max(0) as u64;
        Self::new(order_id, product_name, status, timestamp)
    }

    pub fn with_manufacturer(mut self, party: PartyId) -> Self {
        self.manufacturer = Some(party);
        self
    }

    pub fn with_distributor(mut self, party: PartyId) -> Self {
        self.distributor = Some(party);
        self
    }

    pub fn with_client(mut self, party: PartyId) -> Self {
        self.client = Some(party);
        self
    }

    /// Canonical digest preimage: compact JSON with `orderId` then `time`.
    /// Object keys serialize in sorted order, which is also the wire order.
    pub fn hash_preimage(order_id: u64, timestamp: u64) -> String {
        serde_json::json!({
            "orderId": order_id,
            "time": timestamp,
        })
        .to_string()
    }

    pub fn calculate_hash(order_id: u64, timestamp: u64) -> Sha256Hash {
        sha256(Self::hash_preimage(order_id, timestamp).as_bytes())
    }

    pub fn hash(&self) -> Sha256Hash {
        self.hash
    }

    pub fn hash_str(&self) -> String {
        hex::encode(self.hash)
    }

    pub fn order_id(&self) -> u64 {
        self.order_id
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn manufacturer(&self) -> Option<&PartyId> {
        self.manufacturer.as_ref()
    }

    pub fn distributor(&self) -> Option<&PartyId> {
        self.distributor.as_ref()
    }

    pub fn client(&self) -> Option<&PartyId> {
        self.client.as_ref()
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let party = |p: Option<&PartyId>| p.map_or("-".to_string(), |p| p.to_string());
        write!(
            f,
            "Transaction [order: {}, product: {}, status: {}, manufacturer: {}, distributor: {}, client: {}, time: {}, hash: {}]",
            self.order_id,
            self.product_name,
            self.status,
            party(self.manufacturer()),
            party(self.distributor()),
            party(self.client()),
            self.timestamp,
            self.hash_str()
        )
    }
}
