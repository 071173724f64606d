use soroban_sdk::{contracttype, Address};

/// USD entrance fee used by the reference deployment ($0.01, 8 decimals).
pub const DEFAULT_USD_ENTRANCE_FEE: i128 = 1_000_000;

/// Minimum participants used by the reference deployment.
pub const DEFAULT_MIN_PARTICIPANTS: u32 = 3;

/// Fixed-point precision of the configured USD entrance fee.
pub const USD_DECIMALS: u32 = 8;

/// Percentage of a resolved pot paid to the winner.
pub const WINNER_SHARE_PERCENT: i128 = 80;

pub const LEDGER_THRESHOLD: u32 = 518_400; // ~30 days @ 5s/ledger
pub const LEDGER_BUMP: u32 = 1_036_800; // ~60 days @ 5s/ledger

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RoundState {
    /// Accepting entries
    Open = 0,
    /// Randomness requested, waiting for the coordinator callback
    Calculating = 1,
}

/// Who may close a round and trigger the randomness request.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RoundCloser {
    Admin,
    Keeper(Address),
    Anyone,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LotteryConfig {
    pub admin: Address,
    /// Token contract used as the native currency
    pub token: Address,
    pub token_decimals: u32,
    pub price_feed: Address,
    pub vrf_coordinator: Address,
    /// Entrance fee in USD with 8 decimal digits
    pub usd_entrance_fee: i128,
    pub subscription_id: u64,
    pub min_participants: u32,
    pub round_closer: RoundCloser,
}

/// Latest answer of a price feed: `price / 10^decimals` USD per whole token.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceReading {
    pub price: i128,
    pub decimals: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParticipantEntry {
    /// Position in the ordered participant list
    pub slot: u32,
    pub deposited: i128,
}

/// A resolved round whose funds have not fully left the contract yet.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Payout {
    pub round: u32,
    pub winner: Address,
    pub winner_share: i128,
    pub admin_share: i128,
    pub winner_paid: bool,
    pub admin_paid: bool,
}

#[contracttype]
pub enum DataKey {
    Config,
    State,
    Round,
    ParticipantCount,    // u32, current round
    Slot(u32, u32),      // (round, slot) -> Address
    Entry(u32, Address), // (round, participant) -> ParticipantEntry
    PendingRequest,      // u64
    RecentWinner,        // Address
    HeldBalance,         // i128
    Payout,              // Payout
}
