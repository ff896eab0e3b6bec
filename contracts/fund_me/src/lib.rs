#![no_std]

mod error;
mod events;
mod price_converter;
mod storage;

pub use error::Error;
pub use events::{FundedEvent, WithdrawnEvent};
pub use price_converter::{PriceFeedClient, PriceFeedInterface};
pub use storage::SCALE;

use price_converter::{get_conversion_rate, get_price};
use storage::Storage;

use soroban_sdk::{contract, contractimpl, log, token, Address, Env, Symbol};

#[contract]
pub struct FundMe;

#[contractimpl]
impl FundMe {
    // ============================================
    // CONSTRUCTION
    // ============================================

    /// Fix the owner, price feed, native token and USD floor for the
    /// lifetime of the contract. `minimum_usd` uses 7 decimals.
    ///
    /// # Errors
    /// - `InvalidAmount`: Floor is zero or negative
    pub fn __constructor(
        env: Env,
        owner: Address,
        price_feed: Address,
        native_token: Address,
        minimum_usd: i128,
    ) -> Result<(), Error> {
        if minimum_usd <= 0 {
            return Err(Error::InvalidAmount);
        }

        Storage::set_config(&env, &owner, &price_feed, &native_token, minimum_usd);
        Storage::bump(&env);
        Ok(())
    }

    // ============================================
    // FUNDING
    // ============================================

    /// Contribute `amount` native units (7 decimals) to the ledger
    ///
    /// The USD value at the current feed price must reach the floor. A
    /// funder's first contribution appends it to the roster; later ones only
    /// grow its record.
    ///
    /// # Errors
    /// - `InvalidAmount`: Amount is negative or its USD value overflows
    /// - `InvalidPrice`: Feed returned an unusable price
    /// - `InsufficientContribution`: USD value below the floor
    /// - `TransferFailure`: Funder's tokens could not be moved in
    pub fn fund(env: Env, funder: Address, amount: i128) -> Result<(), Error> {
        funder.require_auth();

        if amount < 0 {
            return Err(Error::InvalidAmount);
        }

        let usd_value = Self::usd_value(&env, amount)?;
        let minimum_usd = Storage::get_minimum_usd(&env)?;
        if usd_value < minimum_usd {
            log!(&env, "contribution below floor: {} < {}", usd_value, minimum_usd);
            return Err(Error::InsufficientContribution);
        }

        let native_token = Storage::get_native_token(&env)?;
        Self::transfer_native(
            &env,
            &native_token,
            &funder,
            &env.current_contract_address(),
            amount,
        )?;

        let total_funded = Storage::record_contribution(&env, &funder, amount)?;
        Storage::bump(&env);

        env.events().publish(
            (Symbol::new(&env, "funded"), funder.clone()),
            FundedEvent {
                funder,
                amount,
                total_funded,
            },
        );

        Ok(())
    }

    // ============================================
    // SETTLEMENT
    // ============================================

    /// Send the whole balance to the owner and reset every funder record,
    /// walking the stored roster entry by entry. Returns the amount paid out.
    ///
    /// # Errors
    /// - `NotOwner`: Caller is not the owner
    /// - `TransferFailure`: Owner could not receive the balance; nothing is reset
    pub fn withdraw(env: Env, caller: Address) -> Result<i128, Error> {
        Self::settle(&env, &caller, Storage::zero_records)
    }

    /// Same outcome as `withdraw`, resetting from one in-memory copy of the
    /// roster and dropping the entries instead of rewriting them.
    ///
    /// # Errors
    /// - `NotOwner`: Caller is not the owner
    /// - `TransferFailure`: Owner could not receive the balance; nothing is reset
    pub fn cheaper_withdraw(env: Env, caller: Address) -> Result<i128, Error> {
        Self::settle(&env, &caller, Storage::clear_records)
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    /// Funder at `index` in first-contribution order
    ///
    /// # Errors
    /// - `IndexOutOfRange`: `index` is not below the roster length
    pub fn get_funder(env: Env, index: u32) -> Result<Address, Error> {
        Storage::funder_at(&env, index).ok_or(Error::IndexOutOfRange)
    }

    /// Cumulative amount funded since the last settlement, 0 if none
    pub fn get_address_to_amount_funded(env: Env, funder: Address) -> i128 {
        Storage::get_amount_funded(&env, &funder)
    }

    pub fn get_funder_count(env: Env) -> u32 {
        Storage::funder_count(&env)
    }

    pub fn get_price_feed(env: Env) -> Result<Address, Error> {
        Storage::get_price_feed(&env)
    }

    pub fn get_owner(env: Env) -> Result<Address, Error> {
        Storage::get_owner(&env)
    }

    pub fn get_native_token(env: Env) -> Result<Address, Error> {
        Storage::get_native_token(&env)
    }

    pub fn get_minimum_usd(env: Env) -> Result<i128, Error> {
        Storage::get_minimum_usd(&env)
    }

    /// Version reported by the configured price feed
    pub fn get_version(env: Env) -> Result<u32, Error> {
        let price_feed = Storage::get_price_feed(&env)?;
        Ok(PriceFeedClient::new(&env, &price_feed).version())
    }

    /// Native balance currently held by the ledger
    ///
    /// This is the token balance at the contract address, so tokens sent
    /// straight to it (bypassing `fund`) show up here without a funder
    /// record and are paid out by the next withdraw.
    pub fn get_balance(env: Env) -> Result<i128, Error> {
        let native_token = Storage::get_native_token(&env)?;
        Ok(token::Client::new(&env, &native_token).balance(&env.current_contract_address()))
    }

    /// USD value (7 decimals) of `amount` native units at the current price
    pub fn get_conversion_rate(env: Env, amount: i128) -> Result<i128, Error> {
        if amount < 0 {
            return Err(Error::InvalidAmount);
        }
        Self::usd_value(&env, amount)
    }
}

// ============================================
// INTERNAL HELPERS
// ============================================

impl FundMe {
    fn usd_value(env: &Env, amount: i128) -> Result<i128, Error> {
        let price_feed = Storage::get_price_feed(env)?;
        let price = get_price(env, &price_feed)?;
        get_conversion_rate(amount, price).ok_or(Error::InvalidAmount)
    }

    fn transfer_native(
        env: &Env,
        native_token: &Address,
        from: &Address,
        to: &Address,
        amount: i128,
    ) -> Result<(), Error> {
        match token::Client::new(env, native_token).try_transfer(from, to, &amount) {
            Ok(Ok(())) => Ok(()),
            _ => {
                log!(
                    env,
                    "native transfer failed: {} from {} to {}",
                    amount,
                    from.clone(),
                    to.clone()
                );
                Err(Error::TransferFailure)
            }
        }
    }

    /// Owner check, payout, then reset. The payout goes first so a failed
    /// transfer returns before any record is touched.
    fn settle(env: &Env, caller: &Address, reset: fn(&Env) -> u32) -> Result<i128, Error> {
        caller.require_auth();

        let owner = Storage::get_owner(env)?;
        if *caller != owner {
            log!(env, "withdraw rejected for non-owner {}", caller.clone());
            return Err(Error::NotOwner);
        }

        let native_token = Storage::get_native_token(env)?;
        let contract = env.current_contract_address();
        let amount = token::Client::new(env, &native_token).balance(&contract);

        if amount > 0 {
            Self::transfer_native(env, &native_token, &contract, &owner, amount)?;
        }

        let funders_cleared = reset(env);
        Storage::bump(env);

        env.events().publish(
            (Symbol::new(env, "withdrawn"), owner.clone()),
            WithdrawnEvent {
                owner,
                amount,
                funders_cleared,
            },
        );

        Ok(amount)
    }
}
