//! Custody of the pot.
//!
//! `HeldBalance` counts every unit the contract owes: deposits of the
//! open round plus whatever is left of a resolved round's payout.

use soroban_sdk::{token, Address, Env};

use crate::events;
use crate::types::{DataKey, Payout, WINNER_SHARE_PERCENT};
use crate::Error;

pub fn held_balance(env: &Env) -> i128 {
    env.storage().instance().get(&DataKey::HeldBalance).unwrap_or(0)
}

fn set_held_balance(env: &Env, amount: i128) {
    env.storage().instance().set(&DataKey::HeldBalance, &amount);
}

pub fn credit(env: &Env, amount: i128) -> Result<(), Error> {
    let held = held_balance(env)
        .checked_add(amount)
        .ok_or(Error::ArithmeticOverflow)?;
    set_held_balance(env, held);
    Ok(())
}

fn debit(env: &Env, amount: i128) {
    set_held_balance(env, held_balance(env) - amount);
}

/// Winner and admin shares of `balance`.
///
/// The winner gets `(balance / 100) * 80`; dividing first keeps the
/// remainder of the division with the admin.
pub fn split(balance: i128) -> (i128, i128) {
    let winner_share = (balance / 100) * WINNER_SHARE_PERCENT;
    (winner_share, balance - winner_share)
}

pub fn pending_payout(env: &Env) -> Option<Payout> {
    env.storage().instance().get(&DataKey::Payout)
}

/// Earmark the whole held balance for `winner` and the admin.
pub fn open_payout(env: &Env, round: u32, winner: &Address) -> Payout {
    let (winner_share, admin_share) = split(held_balance(env));
    let payout = Payout {
        round,
        winner: winner.clone(),
        winner_share,
        admin_share,
        winner_paid: false,
        admin_paid: false,
    };
    env.storage().instance().set(&DataKey::Payout, &payout);
    payout
}

/// Pay whatever is still owed on the pending payout.
///
/// Each leg is recorded as paid right after its transfer lands, so a
/// retry never sends the same leg twice. Callers that return the error
/// roll the whole attempt back.
///
/// # Returns
/// * `Ok(i128)` - Amount transferred by this call
/// * `Err(Error::NoPendingPayout)` - Nothing is owed
/// * `Err(Error::TransferFailed)` - A recipient rejected the funds
pub fn disburse(env: &Env, token: &Address, admin: &Address) -> Result<i128, Error> {
    let mut payout = pending_payout(env).ok_or(Error::NoPendingPayout)?;
    let client = token::Client::new(env, token);
    let mut paid = 0i128;

    if !payout.winner_paid {
        send(env, &client, &payout.winner, payout.winner_share)?;
        payout.winner_paid = true;
        debit(env, payout.winner_share);
        paid += payout.winner_share;
        env.storage().instance().set(&DataKey::Payout, &payout);
    }

    if !payout.admin_paid {
        send(env, &client, admin, payout.admin_share)?;
        payout.admin_paid = true;
        debit(env, payout.admin_share);
        paid += payout.admin_share;
    }

    env.storage().instance().remove(&DataKey::Payout);
    events::funds_paid(env, &payout);

    Ok(paid)
}

/// Amount still owed on the pending payout.
pub fn outstanding(payout: &Payout) -> i128 {
    let mut owed = 0;
    if !payout.winner_paid {
        owed += payout.winner_share;
    }
    if !payout.admin_paid {
        owed += payout.admin_share;
    }
    owed
}

fn send(env: &Env, client: &token::Client, to: &Address, amount: i128) -> Result<(), Error> {
    if amount == 0 {
        return Ok(());
    }
    match client.try_transfer(&env.current_contract_address(), to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(Error::TransferFailed),
    }
}
