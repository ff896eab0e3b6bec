use crate::error::Error;
use crate::storage::{SCALE, USD_DECIMALS};
use soroban_sdk::{contractclient, Address, Env};

/// Aggregator-style price feed quoting the native token in USD
#[contractclient(name = "PriceFeedClient")]
pub trait PriceFeedInterface {
    /// Latest USD price of one whole native unit, scaled by `decimals()`
    fn latest_answer(env: Env) -> i128;

    fn decimals(env: Env) -> u32;

    fn version(env: Env) -> u32;
}

/// Read the feed and return the price of one native unit in USD, scaled to
/// 7 decimals
///
/// # Errors
/// - `InvalidPrice`: Feed answered zero or a negative price, or its
///   decimals cannot be brought to 7
pub fn get_price(env: &Env, price_feed: &Address) -> Result<i128, Error> {
    let feed = PriceFeedClient::new(env, price_feed);
    normalize_price(feed.latest_answer(), feed.decimals())
}

/// Rescale a feed answer from `decimals` to `USD_DECIMALS`
///
/// Example:
/// - answer: 2000_0000_0000 (2000 USD at 8 decimals)
/// - normalized: 2000_000_0000 (2000 USD at 7 decimals)
pub fn normalize_price(answer: i128, decimals: u32) -> Result<i128, Error> {
    if answer <= 0 {
        return Err(Error::InvalidPrice);
    }

    let price = if decimals >= USD_DECIMALS {
        let divisor = 10i128
            .checked_pow(decimals - USD_DECIMALS)
            .ok_or(Error::InvalidPrice)?;
        answer / divisor
    } else {
        let multiplier = 10i128
            .checked_pow(USD_DECIMALS - decimals)
            .ok_or(Error::InvalidPrice)?;
        answer.checked_mul(multiplier).ok_or(Error::InvalidPrice)?
    };

    // Sub-cent answers from a high-precision feed round down to nothing
    if price == 0 {
        return Err(Error::InvalidPrice);
    }

    Ok(price)
}

/// USD value of `amount` native units at `price`
///
/// Formula: usd = amount × price / SCALE
///
/// Example:
/// - amount: 1 XLM (10,000,000 stroops)
/// - price: 2000 USD
/// - usd: 10,000,000 × 20,000,000,000 / 10,000,000 = 2000 USD
pub fn get_conversion_rate(amount: i128, price: i128) -> Option<i128> {
    amount.checked_mul(price)?.checked_div(SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED_DECIMALS: u32 = 8;

    #[test]
    fn test_normalize_eight_decimal_feed() {
        let answer = 2000 * 100_000_000; // 2000 USD at 8 decimals
        let price = normalize_price(answer, FEED_DECIMALS).unwrap();
        assert_eq!(price, 2000 * SCALE);
    }

    #[test]
    fn test_normalize_low_precision_feed() {
        let answer = 2000 * 100; // 2000 USD at 2 decimals
        let price = normalize_price(answer, 2).unwrap();
        assert_eq!(price, 2000 * SCALE);
    }

    #[test]
    fn test_normalize_rejects_non_positive_answer() {
        assert_eq!(normalize_price(0, FEED_DECIMALS), Err(Error::InvalidPrice));
        assert_eq!(normalize_price(-1, FEED_DECIMALS), Err(Error::InvalidPrice));
    }

    #[test]
    fn test_normalize_rejects_dust_price() {
        // 0.00000001 USD cannot be expressed at 7 decimals
        assert_eq!(normalize_price(1, FEED_DECIMALS), Err(Error::InvalidPrice));
    }

    #[test]
    fn test_normalize_rejects_absurd_decimals() {
        assert_eq!(normalize_price(1, 200), Err(Error::InvalidPrice));
    }

    #[test]
    fn test_conversion_one_unit() {
        let price = 2000 * SCALE;
        let usd = get_conversion_rate(SCALE, price).unwrap();
        assert_eq!(usd, 2000 * SCALE);
    }

    #[test]
    fn test_conversion_below_floor() {
        // 0.001 native units at 2000 USD = 2 USD
        let price = 2000 * SCALE;
        let usd = get_conversion_rate(SCALE / 1000, price).unwrap();
        assert_eq!(usd, 2 * SCALE);
        assert!(usd < 50 * SCALE);
    }

    #[test]
    fn test_conversion_overflow() {
        assert_eq!(get_conversion_rate(i128::MAX, 2000 * SCALE), None);
    }
}
