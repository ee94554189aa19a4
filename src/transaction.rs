//! Transaction module: order-event records and their digests

pub mod types;

pub use types::*;
