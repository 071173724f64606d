#![cfg(test)]

//! Stand-ins for the external services the lottery talks to.

use soroban_sdk::{contract, contracterror, contractimpl, contracttype, Address, Env, Vec, U256};

use crate::{LotteryContractClient, PriceReading};

// ───────────── PRICE FEED ─────────────

#[contracttype]
pub enum FeedKey {
    Reading,
    Down,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum FeedError {
    NoAnswer = 1,
}

#[contract]
pub struct MockPriceFeed;

#[contractimpl]
impl MockPriceFeed {
    pub fn set_price(env: Env, price: i128, decimals: u32) {
        env.storage()
            .instance()
            .set(&FeedKey::Reading, &PriceReading { price, decimals });
    }

    pub fn set_feed_down(env: Env, down: bool) {
        env.storage().instance().set(&FeedKey::Down, &down);
    }

    pub fn latest_price(env: Env) -> Result<PriceReading, FeedError> {
        let down: bool = env.storage().instance().get(&FeedKey::Down).unwrap_or(false);
        if down {
            return Err(FeedError::NoAnswer);
        }
        env.storage()
            .instance()
            .get(&FeedKey::Reading)
            .ok_or(FeedError::NoAnswer)
    }
}

// ───────────── VRF COORDINATOR ─────────────

#[contracttype]
pub enum CoordinatorKey {
    LastRequestId,
    Consumer(u64),
    Offline,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum CoordinatorError {
    Offline = 1,
    InvalidRequest = 2,
}

/// Records requests and delivers words when the test says so.
#[contract]
pub struct MockVrfCoordinator;

#[contractimpl]
impl MockVrfCoordinator {
    pub fn request_random_words(
        env: Env,
        consumer: Address,
        _subscription_id: u64,
        num_words: u32,
    ) -> Result<u64, CoordinatorError> {
        let offline: bool = env.storage().instance().get(&CoordinatorKey::Offline).unwrap_or(false);
        if offline {
            return Err(CoordinatorError::Offline);
        }
        if num_words == 0 {
            return Err(CoordinatorError::InvalidRequest);
        }

        let request_id: u64 = env
            .storage()
            .instance()
            .get(&CoordinatorKey::LastRequestId)
            .unwrap_or(0)
            + 1;
        env.storage().instance().set(&CoordinatorKey::LastRequestId, &request_id);
        env.storage()
            .instance()
            .set(&CoordinatorKey::Consumer(request_id), &consumer);

        Ok(request_id)
    }

    /// Push `random_words` to the consumer of `request_id`.
    /// Returns whether the consumer accepted them.
    pub fn fulfill(env: Env, request_id: u64, random_words: Vec<U256>) -> bool {
        let consumer: Option<Address> = env
            .storage()
            .instance()
            .get(&CoordinatorKey::Consumer(request_id));
        let Some(consumer) = consumer else {
            return false;
        };

        let client = LotteryContractClient::new(&env, &consumer);
        matches!(
            client.try_fulfill_random_words(&request_id, &random_words),
            Ok(Ok(()))
        )
    }

    pub fn set_offline(env: Env, offline: bool) {
        env.storage().instance().set(&CoordinatorKey::Offline, &offline);
    }

    pub fn request_count(env: Env) -> u64 {
        env.storage()
            .instance()
            .get(&CoordinatorKey::LastRequestId)
            .unwrap_or(0)
    }
}

// ───────────── TOKEN ─────────────

#[contracttype]
pub enum TokenKey {
    Balance(Address),
    Rejecting(Address),
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum TokenError {
    InsufficientBalance = 1,
    RecipientRejected = 2,
}

/// Minimal token whose recipients can refuse incoming transfers.
#[contract]
pub struct MockToken;

#[contractimpl]
impl MockToken {
    pub fn mint(env: Env, to: Address, amount: i128) {
        let balance = Self::balance(env.clone(), to.clone());
        env.storage()
            .persistent()
            .set(&TokenKey::Balance(to), &(balance + amount));
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        env.storage()
            .persistent()
            .get(&TokenKey::Balance(id))
            .unwrap_or(0)
    }

    pub fn decimals(_env: Env) -> u32 {
        7
    }

    pub fn set_rejecting(env: Env, id: Address, rejecting: bool) {
        env.storage()
            .persistent()
            .set(&TokenKey::Rejecting(id), &rejecting);
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) -> Result<(), TokenError> {
        from.require_auth();

        let rejecting: bool = env
            .storage()
            .persistent()
            .get(&TokenKey::Rejecting(to.clone()))
            .unwrap_or(false);
        if rejecting {
            return Err(TokenError::RecipientRejected);
        }

        let from_balance = Self::balance(env.clone(), from.clone());
        if from_balance < amount {
            return Err(TokenError::InsufficientBalance);
        }
        let to_balance = Self::balance(env.clone(), to.clone());

        env.storage()
            .persistent()
            .set(&TokenKey::Balance(from), &(from_balance - amount));
        env.storage()
            .persistent()
            .set(&TokenKey::Balance(to), &(to_balance + amount));

        Ok(())
    }
}
