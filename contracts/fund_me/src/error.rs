use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ============================================
    // CONFIGURATION ERRORS (1-5)
    // ============================================
    /// Constructor state missing from instance storage
    NotInitialized = 1,

    // ============================================
    // AUTHORIZATION ERRORS (10-15)
    // ============================================
    /// Caller is not the owner fixed at construction
    NotOwner = 10,

    // ============================================
    // FUNDING ERRORS (20-29)
    // ============================================
    /// USD value of the contribution is below the floor
    InsufficientContribution = 20,
    /// Amount is negative or its USD value overflows
    InvalidAmount = 21,

    // ============================================
    // ORACLE ERRORS (30-39)
    // ============================================
    /// Price feed answered zero, a negative price or unusable decimals
    InvalidPrice = 30,

    // ============================================
    // QUERY ERRORS (40-49)
    // ============================================
    /// Roster position past the current number of funders
    IndexOutOfRange = 40,

    // ============================================
    // SETTLEMENT ERRORS (50-59)
    // ============================================
    /// Native token transfer did not go through
    TransferFailure = 50,
}
