use soroban_sdk::{contracttype, Address, BytesN, String};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeedConfig {
    pub pair_name: String,
    pub decimals: u32,
    /// Plain-mode PricePairId; fences signer modification messages.
    pub pair_id: BytesN<32>,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Role {
    /// Grants and revokes roles.
    DefaultAdmin,
    /// May transmit single answers without signatures.
    Validator,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Config,
    Role(Role, Address),
    Signers,
    Value,
    Round,
    ModificationRound,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FeedEvent {
    Transmitted,
    SignersModified,
    RoleGranted,
    RoleRevoked,
}
