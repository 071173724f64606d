use soroban_sdk::{contractclient, Env};

use crate::types::{LotteryConfig, PriceReading, USD_DECIMALS};
use crate::Error;

/// Price feed quoting the native token in USD.
#[allow(dead_code)]
#[contractclient(name = "PriceFeedClient")]
pub trait PriceFeed {
    fn latest_price(env: Env) -> PriceReading;
}

/// Current entrance fee in token units, derived from the latest price.
pub fn entrance_fee(env: &Env, config: &LotteryConfig) -> Result<i128, Error> {
    let reading = latest_price(env, config)?;
    usd_to_token(config.usd_entrance_fee, &reading, config.token_decimals)
}

fn latest_price(env: &Env, config: &LotteryConfig) -> Result<PriceReading, Error> {
    let feed = PriceFeedClient::new(env, &config.price_feed);
    match feed.try_latest_price() {
        Ok(Ok(reading)) => Ok(reading),
        _ => Err(Error::OracleUnavailable),
    }
}

/// Convert an 8-decimal USD amount into token units, rounding down.
///
/// `usd * 10^feed_decimals * 10^token_decimals / (price * 10^8)`
pub fn usd_to_token(usd: i128, reading: &PriceReading, token_decimals: u32) -> Result<i128, Error> {
    if reading.price <= 0 {
        return Err(Error::OracleUnavailable);
    }

    let scale = reading
        .decimals
        .checked_add(token_decimals)
        .and_then(|exp| 10i128.checked_pow(exp))
        .ok_or(Error::ArithmeticOverflow)?;
    let numerator = usd.checked_mul(scale).ok_or(Error::ArithmeticOverflow)?;
    let denominator = reading
        .price
        .checked_mul(10i128.pow(USD_DECIMALS))
        .ok_or(Error::ArithmeticOverflow)?;

    Ok(numerator / denominator)
}
