use soroban_sdk::{contracterror, contracttype};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum OracleError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    ArrayLengthMismatch = 3,
    TooFewSigners = 4,
    SignerNotValidator = 5,
    DuplicateOrCancelledSignature = 6,
    NotSorted = 7,
    StaleTimestamp = 8,
    FutureTimestamp = 9,
    AlreadyDeployed = 10,
    Unauthorized = 11,
    NeedMoreSigners = 12,
    ProviderDoesNotExist = 13,
    InvalidSignature = 14,
    SignerAlreadyExists = 15,
    SignerNotFound = 16,
    InvalidDecimals = 17,
    PairNameTooLong = 18,
    Paused = 19,
    StalePrice = 20,
}

/// Status code reported alongside a price, mirroring HTTP semantics.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum FeedStatus {
    Ok = 200,
    NotFound = 404,
}

/// Latest aggregated answer of a pair. Prices travel as `int192` in signed
/// messages but are held as `i128`, so answers beyond the `i128` range
/// cannot be submitted.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OracleValue {
    pub price: i128,
    pub timestamp: u64,
    pub status: FeedStatus,
}

impl OracleValue {
    pub fn not_found() -> Self {
        OracleValue {
            price: 0,
            timestamp: 0,
            status: FeedStatus::NotFound,
        }
    }

    pub fn is_live(&self) -> bool {
        self.status == FeedStatus::Ok
    }
}

/// What a signature authorises. Rounds and cancellation flags are tracked
/// separately for each intent.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Intent {
    Transmit,
    ModifySigners,
}

impl Intent {
    pub fn from_flag(is_transmit: bool) -> Self {
        if is_transmit {
            Intent::Transmit
        } else {
            Intent::ModifySigners
        }
    }

    pub fn is_transmit(&self) -> bool {
        matches!(self, Intent::Transmit)
    }
}

/// How a PricePairId is derived from the pair name.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PairIdMode {
    /// `keccak256("Price-" ‖ name ‖ "-" ‖ decimals)`
    Plain,
    /// `keccak256("Price-" ‖ name ‖ "-" ‖ decimals ‖ "-" ‖ provider)`
    PerProvider,
}
