// Thin re-export module: implementation lives in `blockchain/core.rs`, split
// into block/ledger management, order lookups and chain validation.

pub mod core;
pub use core::*;
