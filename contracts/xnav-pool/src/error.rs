use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // Authorization
    UnauthorizedCaller = 1,
    DirectCallNotAllowed = 2,

    // Donation state machine
    /// A donation is already in flight
    DonationLocked = 10,
    /// Phase two without a preceding phase one
    DonationNotLocked = 11,
    /// Phase two for a token other than the one initialized
    TokenNotInitialized = 12,

    // Amount integrity
    /// Balance decreased since the snapshot
    BalanceUnderflow = 20,
    /// Claimed more than was delivered
    CallerTransferAmount = 21,
    SourceAmountMismatch = 22,
    InvalidAmount = 23,

    // Eligibility
    UnsupportedCrossChainToken = 30,
    TokenWithoutPriceFeed = 31,
    InvalidOpType = 32,
    InvalidMessage = 33,
    InvalidTolerance = 34,
    DeadlineExpired = 35,
    ActiveTokensLimitReached = 36,

    // Accounting
    ReductionExceedsBalance = 40,
    EffectiveSupplyTooLow = 41,
    NegativePoolValue = 42,
    NavDeviationTooHigh = 43,
    InsufficientShares = 44,
    InsufficientLiquidity = 45,
    MathOverflow = 46,
}
