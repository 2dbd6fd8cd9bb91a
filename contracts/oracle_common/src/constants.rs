/// Smallest signer set a pair may shrink to through quorum, and the
/// smallest number of signatures a transmit or signer change needs.
pub const MIN_SIGNERS: u32 = 2;

/// Seconds a submitted timestamp may run ahead of ledger time.
pub const DEFAULT_MAX_FUTURE_SKEW: u64 = 60;

/// Longest pair name accepted for PricePairId derivation, in bytes.
pub const MAX_PAIR_NAME_LEN: usize = 64;

pub const MAX_DECIMALS: u32 = 255;

// Ledger-count TTL windows (~5s ledgers).
pub const DAY_IN_LEDGERS: u32 = 17_280;
pub const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub const PERSISTENT_LIFETIME_THRESHOLD: u32 = PERSISTENT_BUMP_AMOUNT - DAY_IN_LEDGERS;
pub const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
pub const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

/// secp256k1 group order divided by two; signatures with a larger `s`
/// are rejected as malleable.
pub const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
];

/// secp256k1 group order `n`; `r` must lie below it.
pub const SECP256K1_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];
