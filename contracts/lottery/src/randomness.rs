use soroban_sdk::{contractclient, Address, Env, Vec, U256};

use crate::types::LotteryConfig;
use crate::Error;

/// Random words requested per round. Only the first one is consumed.
pub const NUM_WORDS: u32 = 1;

/// Verifiable randomness coordinator. Requests are answered later by a
/// call to the consumer's `fulfill_random_words`.
#[allow(dead_code)]
#[contractclient(name = "RandomnessCoordinatorClient")]
pub trait RandomnessCoordinator {
    fn request_random_words(
        env: Env,
        consumer: Address,
        subscription_id: u64,
        num_words: u32,
    ) -> u64;
}

/// Ask the coordinator for randomness on behalf of this contract.
pub fn request(env: &Env, config: &LotteryConfig) -> Result<u64, Error> {
    let coordinator = RandomnessCoordinatorClient::new(env, &config.vrf_coordinator);
    match coordinator.try_request_random_words(
        &env.current_contract_address(),
        &config.subscription_id,
        &NUM_WORDS,
    ) {
        Ok(Ok(request_id)) => Ok(request_id),
        _ => Err(Error::OracleUnavailable),
    }
}

/// Zero-based winner slot: `random_words[0] mod participant_count`.
pub fn winner_index(env: &Env, random_words: &Vec<U256>, participant_count: u32) -> Result<u32, Error> {
    if participant_count == 0 {
        return Err(Error::NotEnoughParticipants);
    }
    let word = random_words.get(0).ok_or(Error::EmptyRandomWords)?;
    let index = word.rem_euclid(&U256::from_u32(env, participant_count));

    // always below participant_count
    index
        .to_u128()
        .map(|i| i as u32)
        .ok_or(Error::ArithmeticOverflow)
}
