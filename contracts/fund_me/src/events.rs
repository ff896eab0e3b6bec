use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundedEvent {
    pub funder: Address,
    pub amount: i128,
    /// Funder's cumulative record after this contribution
    pub total_funded: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub owner: Address,
    pub amount: i128,
    pub funders_cleared: u32,
}
