#![no_std]
//! Shared building blocks for the signed price oracles: packed message
//! layouts, secp256k1 signer recovery, PricePairId derivation and median
//! aggregation.

pub mod constants;
pub mod median;
pub mod message;
pub mod pair_id;
pub mod signature;
pub mod signer_set;
pub mod types;

pub use types::{FeedStatus, Intent, OracleError, OracleValue, PairIdMode};

#[cfg(any(test, feature = "testutils"))]
pub mod testutils;
