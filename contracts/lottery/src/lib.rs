#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, log, token, Address, Env, Vec, U256};

mod events;
mod ledger;
mod oracle;
mod randomness;
mod registry;
mod types;

mod mock;

pub use oracle::{PriceFeed, PriceFeedClient};
pub use randomness::{RandomnessCoordinator, RandomnessCoordinatorClient, NUM_WORDS};
pub use types::*;

//
// ──────────────────────────────────────────────────────────
// ERRORS
// ──────────────────────────────────────────────────────────
//

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    NotOwner = 3,
    NotAuthorized = 4,
    InvalidConfig = 5,
    LotteryClosed = 6,
    SendMoreToEnterLottery = 7,
    InsufficientDeposit = 8,
    NotEnoughParticipants = 9,
    RoundAlreadyClosing = 10,
    UnknownRequest = 11,
    EmptyRandomWords = 12,
    TransferFailed = 13,
    OracleUnavailable = 14,
    NoPendingPayout = 15,
    PayoutPending = 16,
    ArithmeticOverflow = 17,
}

//
// ──────────────────────────────────────────────────────────
// CONTRACT
// ──────────────────────────────────────────────────────────
//

/// Single-round lottery settled by verifiable randomness
///
/// Players pay an entrance fee quoted in USD and converted through a price
/// feed. Closing a round asks a randomness coordinator for one word; the
/// coordinator's callback picks the winner, pays out the pot and opens the
/// next round.
///
/// # Pot Split
/// - Winner: `(pot / 100) * 80`
/// - Admin: the rest
/// - A payout the callback cannot complete is retried with `disperse_funds`
#[contract]
pub struct LotteryContract;

#[contractimpl]
impl LotteryContract {
    // ───────────── INITIALIZATION ─────────────

    /// Initialize the lottery and open the first round
    ///
    /// # Arguments
    /// * `admin` - Owner; receives the non-winner share of every pot
    /// * `token` - Token contract used as the native currency
    /// * `price_feed` - Feed quoting the token in USD
    /// * `vrf_coordinator` - Randomness coordinator allowed to fulfill requests
    /// * `usd_entrance_fee` - Entrance fee in USD with 8 decimals
    /// * `subscription_id` - Coordinator subscription billed for requests
    /// * `min_participants` - Participants required before a round can close
    pub fn initialize(
        env: Env,
        admin: Address,
        token: Address,
        price_feed: Address,
        vrf_coordinator: Address,
        usd_entrance_fee: i128,
        subscription_id: u64,
        min_participants: u32,
    ) -> Result<(), Error> {
        admin.require_auth();

        let storage = env.storage().instance();
        if storage.has(&DataKey::Config) {
            return Err(Error::AlreadyInitialized);
        }
        if min_participants == 0 || usd_entrance_fee <= 0 {
            return Err(Error::InvalidConfig);
        }

        let token_decimals = token::Client::new(&env, &token).decimals();

        let config = LotteryConfig {
            admin,
            token,
            token_decimals,
            price_feed,
            vrf_coordinator,
            usd_entrance_fee,
            subscription_id,
            min_participants,
            round_closer: RoundCloser::Admin,
        };

        storage.set(&DataKey::Config, &config);
        storage.set(&DataKey::State, &RoundState::Open);
        storage.set(&DataKey::Round, &1u32);
        storage.set(&DataKey::HeldBalance, &0i128);
        Self::bump_instance(&env);

        Ok(())
    }

    // ───────────── ADMIN FUNCTIONS ─────────────

    /// Change the number of participants required to close a round (admin only)
    pub fn set_min_participants_limit(env: Env, caller: Address, limit: u32) -> Result<(), Error> {
        caller.require_auth();
        let mut config = Self::load_config(&env)?;
        Self::assert_owner(&config, &caller)?;

        if limit == 0 {
            return Err(Error::InvalidConfig);
        }

        let old = config.min_participants;
        config.min_participants = limit;
        env.storage().instance().set(&DataKey::Config, &config);
        Self::bump_instance(&env);

        events::min_limit_changed(&env, old, limit);

        Ok(())
    }

    /// Choose who may close rounds (admin only)
    pub fn set_round_closer(env: Env, caller: Address, policy: RoundCloser) -> Result<(), Error> {
        caller.require_auth();
        let mut config = Self::load_config(&env)?;
        Self::assert_owner(&config, &caller)?;

        config.round_closer = policy;
        env.storage().instance().set(&DataKey::Config, &config);
        Self::bump_instance(&env);

        events::closer_changed(&env, &config.round_closer);

        Ok(())
    }

    /// Retry the payout of the last resolved round (admin only)
    ///
    /// Either everything still owed is paid or nothing changes.
    ///
    /// # Returns
    /// * `Ok(i128)` - Amount paid out by this call
    /// * `Err(Error::NoPendingPayout)` - The last pot was already paid
    /// * `Err(Error::TransferFailed)` - A recipient still rejects the funds
    pub fn disperse_funds(env: Env, caller: Address) -> Result<i128, Error> {
        caller.require_auth();
        let config = Self::load_config(&env)?;
        Self::assert_owner(&config, &caller)?;
        Self::bump_instance(&env);

        ledger::disburse(&env, &config.token, &config.admin)
    }

    // ───────────── ROUND LIFECYCLE ─────────────

    /// Enter the current round by depositing at least the entrance fee
    ///
    /// Entering again adds to the existing deposit without taking a new slot.
    pub fn enter(env: Env, participant: Address, amount: i128) -> Result<(), Error> {
        participant.require_auth();
        let config = Self::load_config(&env)?;

        if Self::state(&env) != RoundState::Open {
            return Err(Error::LotteryClosed);
        }

        let fee = oracle::entrance_fee(&env, &config)?;
        if amount < fee {
            return Err(Error::SendMoreToEnterLottery);
        }

        let round = Self::round(&env);
        let entry = registry::enter(&env, round, &participant, amount, fee)?;
        ledger::credit(&env, amount)?;
        Self::bump_instance(&env);

        let client = token::Client::new(&env, &config.token);
        match client.try_transfer(&participant, &env.current_contract_address(), &amount) {
            Ok(Ok(())) => {}
            _ => return Err(Error::TransferFailed),
        }

        events::participant_entered(&env, round, &participant, &entry, amount);

        Ok(())
    }

    /// Close the round and request randomness for the draw
    ///
    /// # Returns
    /// * `Ok(u64)` - Coordinator request id
    /// * `Err(Error::RoundAlreadyClosing)` - A request is already outstanding
    /// * `Err(Error::PayoutPending)` - The previous pot has not been paid yet
    /// * `Err(Error::NotEnoughParticipants)` - Below the configured minimum
    pub fn end_round(env: Env, caller: Address) -> Result<u64, Error> {
        caller.require_auth();
        let config = Self::load_config(&env)?;
        Self::assert_can_close(&config, &caller)?;

        if Self::state(&env) == RoundState::Calculating {
            return Err(Error::RoundAlreadyClosing);
        }
        if ledger::pending_payout(&env).is_some() {
            return Err(Error::PayoutPending);
        }

        let count = registry::participant_count(&env);
        if count == 0 || count < config.min_participants {
            return Err(Error::NotEnoughParticipants);
        }

        env.storage().instance().set(&DataKey::State, &RoundState::Calculating);
        Self::bump_instance(&env);

        let request_id = randomness::request(&env, &config)?;
        env.storage().instance().set(&DataKey::PendingRequest, &request_id);

        events::randomness_requested(&env, Self::round(&env), request_id);

        Ok(request_id)
    }

    /// Coordinator callback carrying the randomness for a pending request
    ///
    /// Picks the winner, resets the round and pays out the pot. A rejected
    /// transfer does not undo the draw; the unpaid part stays on the ledger
    /// for `disperse_funds`.
    pub fn fulfill_random_words(
        env: Env,
        request_id: u64,
        random_words: Vec<U256>,
    ) -> Result<(), Error> {
        let config = Self::load_config(&env)?;
        config.vrf_coordinator.require_auth();

        let pending: Option<u64> = env.storage().instance().get(&DataKey::PendingRequest);
        if pending != Some(request_id) {
            log!(&env, "unknown randomness request", request_id);
            return Err(Error::UnknownRequest);
        }

        let round = Self::round(&env);
        let count = registry::participant_count(&env);
        let index = randomness::winner_index(&env, &random_words, count)?;
        let winner =
            registry::participant_at(&env, round, index).ok_or(Error::NotEnoughParticipants)?;
        let pot = ledger::held_balance(&env);

        // Settle the round before any funds move
        let storage = env.storage().instance();
        storage.remove(&DataKey::PendingRequest);
        storage.set(&DataKey::RecentWinner, &winner);
        ledger::open_payout(&env, round, &winner);
        registry::reset(&env);
        storage.set(&DataKey::State, &RoundState::Open);
        storage.set(&DataKey::Round, &(round + 1));
        Self::bump_instance(&env);

        events::winner_picked(&env, round, &winner, pot);

        if ledger::disburse(&env, &config.token, &config.admin).is_err() {
            log!(&env, "payout deferred", round, winner);
            let owed = ledger::pending_payout(&env)
                .map(|payout| ledger::outstanding(&payout))
                .unwrap_or(0);
            events::payout_deferred(&env, round, &winner, owed);
        }

        Ok(())
    }

    // ───────────── VIEW FUNCTIONS ─────────────

    /// Entrance fee in token units at the current price
    pub fn get_entrance_fee(env: Env) -> Result<i128, Error> {
        let config = Self::load_config(&env)?;
        oracle::entrance_fee(&env, &config)
    }

    pub fn get_participant_count(env: Env) -> u32 {
        registry::participant_count(&env)
    }

    pub fn get_participant(env: Env, index: u32) -> Option<Address> {
        registry::participant_at(&env, Self::round(&env), index)
    }

    pub fn get_participants(env: Env) -> Vec<Address> {
        registry::participants(&env, Self::round(&env))
    }

    /// Total deposited by `participant` in the current round
    pub fn get_deposit(env: Env, participant: Address) -> i128 {
        registry::deposit_of(&env, Self::round(&env), &participant)
    }

    pub fn is_participant(env: Env, participant: Address) -> bool {
        registry::is_participant(&env, Self::round(&env), &participant)
    }

    pub fn get_state(env: Env) -> RoundState {
        Self::state(&env)
    }

    pub fn get_round(env: Env) -> u32 {
        Self::round(&env)
    }

    pub fn get_recent_winner(env: Env) -> Option<Address> {
        env.storage().instance().get(&DataKey::RecentWinner)
    }

    pub fn get_pending_request(env: Env) -> Option<u64> {
        env.storage().instance().get(&DataKey::PendingRequest)
    }

    /// Funds the contract holds for players, including any unpaid payout
    pub fn get_held_balance(env: Env) -> i128 {
        ledger::held_balance(&env)
    }

    pub fn get_pending_payout(env: Env) -> Option<Payout> {
        ledger::pending_payout(&env)
    }

    pub fn get_min_participants(env: Env) -> Result<u32, Error> {
        Ok(Self::load_config(&env)?.min_participants)
    }

    pub fn get_config(env: Env) -> Result<LotteryConfig, Error> {
        Self::load_config(&env)
    }

    // ───────────── INTERNAL HELPERS ─────────────

    fn bump_instance(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(LEDGER_THRESHOLD, LEDGER_BUMP);
    }

    fn load_config(env: &Env) -> Result<LotteryConfig, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(Error::NotInitialized)
    }

    fn state(env: &Env) -> RoundState {
        env.storage()
            .instance()
            .get(&DataKey::State)
            .unwrap_or(RoundState::Open)
    }

    fn round(env: &Env) -> u32 {
        env.storage().instance().get(&DataKey::Round).unwrap_or(1)
    }

    fn assert_owner(config: &LotteryConfig, caller: &Address) -> Result<(), Error> {
        if config.admin != *caller {
            return Err(Error::NotOwner);
        }
        Ok(())
    }

    fn assert_can_close(config: &LotteryConfig, caller: &Address) -> Result<(), Error> {
        let allowed = match &config.round_closer {
            RoundCloser::Admin => *caller == config.admin,
            RoundCloser::Keeper(keeper) => caller == keeper || *caller == config.admin,
            RoundCloser::Anyone => true,
        };
        if !allowed {
            return Err(Error::NotAuthorized);
        }
        Ok(())
    }
}
