//! Participant bookkeeping for the current round.
//!
//! Every key is scoped by round number. A participant owns a
//! `ParticipantEntry` under `Entry(round, id)`, whose presence is the
//! membership flag, and the ordered sequence is one `Slot(round, index)`
//! entry per member. Only the count lives in instance storage, so closing
//! a round never touches per-participant entries; the old ones are left
//! to expire.

use soroban_sdk::{Address, Env, Vec};

use crate::types::{DataKey, ParticipantEntry, LEDGER_BUMP, LEDGER_THRESHOLD};
use crate::Error;

fn bump(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, LEDGER_THRESHOLD, LEDGER_BUMP);
}

pub fn participant_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::ParticipantCount)
        .unwrap_or(0)
}

pub fn participant_at(env: &Env, round: u32, index: u32) -> Option<Address> {
    if index >= participant_count(env) {
        return None;
    }
    env.storage().persistent().get(&DataKey::Slot(round, index))
}

/// Ordered participants of `round`. One read per member, so keep it to views.
pub fn participants(env: &Env, round: u32) -> Vec<Address> {
    let mut list = Vec::new(env);
    for index in 0..participant_count(env) {
        if let Some(id) = participant_at(env, round, index) {
            list.push_back(id);
        }
    }
    list
}

pub fn entry_of(env: &Env, round: u32, id: &Address) -> Option<ParticipantEntry> {
    env.storage()
        .persistent()
        .get(&DataKey::Entry(round, id.clone()))
}

pub fn is_participant(env: &Env, round: u32, id: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Entry(round, id.clone()))
}

pub fn deposit_of(env: &Env, round: u32, id: &Address) -> i128 {
    entry_of(env, round, id)
        .map(|entry| entry.deposited)
        .unwrap_or(0)
}

/// Record a deposit of `amount` for `id` in `round`.
///
/// A first deposit takes the next slot. Later deposits are added to the
/// existing entry and keep its slot.
///
/// # Returns
/// * `Ok(ParticipantEntry)` - The entry after the deposit
/// * `Err(Error::InsufficientDeposit)` - `amount` is below `minimum` or not positive
pub fn enter(
    env: &Env,
    round: u32,
    id: &Address,
    amount: i128,
    minimum: i128,
) -> Result<ParticipantEntry, Error> {
    if amount <= 0 || amount < minimum {
        return Err(Error::InsufficientDeposit);
    }

    let key = DataKey::Entry(round, id.clone());
    let storage = env.storage().persistent();

    let entry = match storage.get::<_, ParticipantEntry>(&key) {
        Some(mut entry) => {
            entry.deposited = entry
                .deposited
                .checked_add(amount)
                .ok_or(Error::ArithmeticOverflow)?;
            entry
        }
        None => {
            let slot = participant_count(env);
            let slot_key = DataKey::Slot(round, slot);
            storage.set(&slot_key, id);
            bump(env, &slot_key);
            env.storage()
                .instance()
                .set(&DataKey::ParticipantCount, &(slot + 1));
            ParticipantEntry {
                slot,
                deposited: amount,
            }
        }
    };

    storage.set(&key, &entry);
    bump(env, &key);

    Ok(entry)
}

/// Start an empty sequence. Callers move on to the next round number
/// before accepting entries again.
pub fn reset(env: &Env) {
    env.storage()
        .instance()
        .set(&DataKey::ParticipantCount, &0u32);
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::LotteryContract;
    use soroban_sdk::testutils::Address as _;

    fn with_registry(f: impl FnOnce(&Env)) {
        let env = Env::default();
        let contract = env.register_contract(None, LotteryContract);
        env.as_contract(&contract, || f(&env));
    }

    #[test]
    fn test_deposit_below_minimum_is_rejected() {
        with_registry(|env| {
            let id = Address::generate(env);

            assert_eq!(enter(env, 1, &id, 99, 100), Err(Error::InsufficientDeposit));
            assert_eq!(participant_count(env), 0);
            assert!(!is_participant(env, 1, &id));
            assert_eq!(participant_at(env, 1, 0), None);
        });
    }

    #[test]
    fn test_non_positive_deposit_is_rejected() {
        with_registry(|env| {
            let id = Address::generate(env);

            // a fee that rounds down to zero still needs a real deposit
            assert_eq!(enter(env, 1, &id, 0, 0), Err(Error::InsufficientDeposit));
            assert_eq!(enter(env, 1, &id, -5, 0), Err(Error::InsufficientDeposit));
            assert_eq!(participant_count(env), 0);
            assert!(!is_participant(env, 1, &id));
            assert_eq!(deposit_of(env, 1, &id), 0);
        });
    }

    #[test]
    fn test_reentry_keeps_slot() {
        with_registry(|env| {
            let first = Address::generate(env);
            let second = Address::generate(env);

            assert_eq!(enter(env, 1, &first, 10, 10).unwrap().slot, 0);
            assert_eq!(enter(env, 1, &second, 10, 10).unwrap().slot, 1);

            let again = enter(env, 1, &first, 15, 10).unwrap();
            assert_eq!(again.slot, 0);
            assert_eq!(again.deposited, 25);
            assert_eq!(participant_count(env), 2);
            assert_eq!(participants(env, 1), Vec::from_array(env, [first, second]));
        });
    }

    #[test]
    fn test_reset_leaves_old_round_behind() {
        with_registry(|env| {
            let id = Address::generate(env);
            enter(env, 1, &id, 10, 10).unwrap();

            reset(env);

            assert_eq!(participant_count(env), 0);
            assert!(!is_participant(env, 2, &id));
            assert_eq!(participants(env, 2).len(), 0);

            let entry = enter(env, 2, &id, 10, 10).unwrap();
            assert_eq!(entry.slot, 0);
            assert_eq!(entry.deposited, 10);
        });
    }
}
