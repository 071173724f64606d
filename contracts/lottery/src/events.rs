use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::types::{ParticipantEntry, Payout, RoundCloser};

pub const ENTERED: Symbol = symbol_short!("entered");
pub const RANDOMNESS_REQUESTED: Symbol = symbol_short!("rnd_req");
pub const WINNER_PICKED: Symbol = symbol_short!("winner");
pub const FUNDS_PAID: Symbol = symbol_short!("paid");
pub const PAYOUT_DEFERRED: Symbol = symbol_short!("pay_late");
pub const MIN_LIMIT_CHANGED: Symbol = symbol_short!("min_limit");
pub const CLOSER_CHANGED: Symbol = symbol_short!("closer");

pub fn participant_entered(
    env: &Env,
    round: u32,
    participant: &Address,
    entry: &ParticipantEntry,
    amount: i128,
) {
    env.events().publish(
        (ENTERED, participant.clone()),
        (round, entry.slot, amount, entry.deposited),
    );
}

pub fn randomness_requested(env: &Env, round: u32, request_id: u64) {
    env.events().publish((RANDOMNESS_REQUESTED, round), request_id);
}

pub fn winner_picked(env: &Env, round: u32, winner: &Address, pot: i128) {
    env.events().publish((WINNER_PICKED, winner.clone()), (round, pot));
}

pub fn funds_paid(env: &Env, payout: &Payout) {
    env.events().publish(
        (FUNDS_PAID, payout.winner.clone()),
        (payout.round, payout.winner_share, payout.admin_share),
    );
}

pub fn payout_deferred(env: &Env, round: u32, winner: &Address, owed: i128) {
    env.events().publish((PAYOUT_DEFERRED, winner.clone()), (round, owed));
}

pub fn min_limit_changed(env: &Env, old: u32, new: u32) {
    env.events().publish((MIN_LIMIT_CHANGED,), (old, new));
}

pub fn closer_changed(env: &Env, policy: &RoundCloser) {
    env.events().publish((CLOSER_CHANGED,), policy.clone());
}
