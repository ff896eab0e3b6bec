use crate::error::Error;
use soroban_sdk::{contracttype, Address, Env, Vec};

// Constants
pub const SCALE: i128 = 10_000_000; // 7 decimals, native token and USD values
pub const USD_DECIMALS: u32 = 7;

// Instance entries live as long as the contract keeps being used
pub const INSTANCE_LIFETIME_THRESHOLD: u32 = 17_280; // ~1 day
pub const INSTANCE_BUMP_AMOUNT: u32 = 86_400; // ~5 days

// Roster and per-funder records sit in their own persistent entries
pub const PERSISTENT_LIFETIME_THRESHOLD: u32 = 120_960; // ~7 days
pub const PERSISTENT_BUMP_AMOUNT: u32 = 1_051_200; // ~60 days

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Owner,
    PriceFeed,
    NativeToken,
    MinimumUsd,
    Funders,               // Vec<Address> in first-contribution order
    AmountFunded(Address), // funder → cumulative amount
}

/// Typed access to the ledger's storage. Configuration lives in instance
/// storage; the roster and the records get persistent entries of their own.
///
/// The roster (`Funders`) and the per-funder records (`AmountFunded`) are
/// only written through `record_contribution`, `zero_records` and
/// `clear_records`, which keep them in step: a funder is on the roster
/// exactly when its record is non-zero.
pub struct Storage;

impl Storage {
    pub fn bump(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
    }

    // Configuration (written once by the constructor)
    pub fn set_config(
        env: &Env,
        owner: &Address,
        price_feed: &Address,
        native_token: &Address,
        minimum_usd: i128,
    ) {
        let instance = env.storage().instance();
        instance.set(&DataKey::Owner, owner);
        instance.set(&DataKey::PriceFeed, price_feed);
        instance.set(&DataKey::NativeToken, native_token);
        instance.set(&DataKey::MinimumUsd, &minimum_usd);
    }

    pub fn get_owner(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Owner)
            .ok_or(Error::NotInitialized)
    }

    pub fn get_price_feed(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::PriceFeed)
            .ok_or(Error::NotInitialized)
    }

    pub fn get_native_token(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::NativeToken)
            .ok_or(Error::NotInitialized)
    }

    pub fn get_minimum_usd(env: &Env) -> Result<i128, Error> {
        env.storage()
            .instance()
            .get(&DataKey::MinimumUsd)
            .ok_or(Error::NotInitialized)
    }

    // Funder records (persistent)
    fn bump_persistent(env: &Env, key: &DataKey) {
        env.storage().persistent().extend_ttl(
            key,
            PERSISTENT_LIFETIME_THRESHOLD,
            PERSISTENT_BUMP_AMOUNT,
        );
    }

    pub fn get_amount_funded(env: &Env, funder: &Address) -> i128 {
        env.storage()
            .persistent()
            .get(&DataKey::AmountFunded(funder.clone()))
            .unwrap_or(0)
    }

    pub fn get_funders(env: &Env) -> Vec<Address> {
        env.storage()
            .persistent()
            .get(&DataKey::Funders)
            .unwrap_or(Vec::new(env))
    }

    pub fn funder_count(env: &Env) -> u32 {
        Self::get_funders(env).len()
    }

    pub fn funder_at(env: &Env, index: u32) -> Option<Address> {
        Self::get_funders(env).get(index)
    }

    /// Credit `amount` to `funder`, appending it to the roster when its
    /// record goes from zero to non-zero. Returns the new cumulative record.
    pub fn record_contribution(env: &Env, funder: &Address, amount: i128) -> Result<i128, Error> {
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let previous = Self::get_amount_funded(env, funder);
        let total = previous.checked_add(amount).ok_or(Error::InvalidAmount)?;

        if previous == 0 {
            let mut funders = Self::get_funders(env);
            funders.push_back(funder.clone());
            env.storage().persistent().set(&DataKey::Funders, &funders);
            Self::bump_persistent(env, &DataKey::Funders);
        }

        let key = DataKey::AmountFunded(funder.clone());
        env.storage().persistent().set(&key, &total);
        Self::bump_persistent(env, &key);

        Ok(total)
    }

    /// Reset by walking the stored roster one position at a time and writing
    /// an explicit zero for each record, then storing an empty roster. Every
    /// step reloads the roster, so the cost grows with the square of its length.
    pub fn zero_records(env: &Env) -> u32 {
        let count = Self::funder_count(env);
        let mut index = 0;
        while index < Self::funder_count(env) {
            if let Some(funder) = Self::funder_at(env, index) {
                env.storage()
                    .persistent()
                    .set(&DataKey::AmountFunded(funder), &0i128);
            }
            index += 1;
        }
        env.storage()
            .persistent()
            .set(&DataKey::Funders, &Vec::<Address>::new(env));
        count
    }

    /// Reset from a single in-memory copy of the roster, dropping each record
    /// entry and then the roster entry itself. Reads afterwards see zero and
    /// an empty roster, same as `zero_records`.
    pub fn clear_records(env: &Env) -> u32 {
        let funders = Self::get_funders(env);
        for funder in funders.iter() {
            env.storage()
                .persistent()
                .remove(&DataKey::AmountFunded(funder));
        }
        env.storage().persistent().remove(&DataKey::Funders);
        funders.len()
    }
}
