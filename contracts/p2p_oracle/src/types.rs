use oracle_common::{Intent, PairIdMode};
use soroban_sdk::{contracttype, Address, BytesN, String};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub admin: Address,
    pub id_mode: PairIdMode,
    /// Seconds a transmitted timestamp may lead ledger time.
    pub max_future_skew: u64,
    pub paused: bool,
}

/// Per-pair record in the oracle arena.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OracleInstance {
    /// 1-based arena slot; doubles as the instance address.
    pub slot: u32,
    pub pair_name: String,
    pub decimals: u32,
    pub owner: Address,
    pub latest_round: u64,
    pub latest_modification_round: u64,
    pub created_at: u64,
}

impl OracleInstance {
    pub fn next_round(&self, intent: Intent) -> u64 {
        match intent {
            Intent::Transmit => self.latest_round + 1,
            Intent::ModifySigners => self.latest_modification_round + 1,
        }
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Config,
    PairCount,
    Pair(BytesN<32>),
    Slot(u32),
    Signers(BytesN<32>),
    Value(BytesN<32>),
    Cancelled(BytesN<32>, BytesN<20>, u64, Intent),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OracleEvent {
    PriceFeedCreated,
    Transmitted,
    SignersModified,
    SignatureCancelled,
    SignerAdded,
    SignerRevoked,
    OwnerTransferred,
    AdminTransferred,
    ConfigUpdated,
}
