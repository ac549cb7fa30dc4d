use anchor_lang::prelude::*;

#[error_code]
pub enum StakingError {
    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    #[msg("Stake amount is below the minimum for this stake kind")]
    BelowMinimumStake,

    #[msg("Invalid global parameters")]
    InvalidParameters,

    #[msg("Affiliate level table must sum to the affiliate cap")]
    InvalidAffiliateTable,

    #[msg("Fee split must sum to 10000 basis points")]
    InvalidFeeSplit,

    #[msg("Referral chain accounts are missing")]
    IncompleteReferralChain,

    #[msg("More referral accounts were supplied than the chain contains")]
    UnexpectedReferralAccounts,

    #[msg("Token account does not belong to the expected asset")]
    InvalidAsset,

    #[msg("Unauthorized")]
    Unauthorized,

    #[msg("A user cannot refer themselves")]
    SelfReferral,

    #[msg("Referrer is already set")]
    ReferrerAlreadySet,

    #[msg("Referrer has no account")]
    UnregisteredReferrer,

    #[msg("Referral link would create a cycle")]
    CircularReferral,

    #[msg("Referral account does not match the expected ancestor")]
    InvalidReferralAccount,

    #[msg("Invalid token account")]
    InvalidTokenAccount,

    #[msg("Staking is currently paused")]
    StakingPaused,

    #[msg("Staking is already paused")]
    AlreadyPaused,

    #[msg("Staking is not paused")]
    NotPaused,

    #[msg("Stake position is not active")]
    PositionInactive,

    #[msg("Operation requires a long-term position")]
    NotLongTermPosition,

    #[msg("Lock period has not elapsed")]
    LockPeriodActive,

    #[msg("Lock period has already elapsed, use unstake")]
    LockPeriodElapsed,

    #[msg("Vault balance is insufficient")]
    InsufficientVaultBalance,

    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,

    #[msg("Token transfer failed")]
    TokenTransferFailed,
}

/// Coarse classification clients use to decide between fixing input,
/// waiting for state to change, or retrying.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authorization,
    State,
    Arithmetic,
    ExternalTransfer,
}

impl StakingError {
    pub fn kind(&self) -> ErrorKind {
        use StakingError::*;
        match self {
            ZeroAmount
            | BelowMinimumStake
            | InvalidParameters
            | InvalidAffiliateTable
            | InvalidFeeSplit
            | IncompleteReferralChain
            | UnexpectedReferralAccounts
            | InvalidAsset => ErrorKind::Validation,
            Unauthorized
            | SelfReferral
            | ReferrerAlreadySet
            | UnregisteredReferrer
            | CircularReferral
            | InvalidReferralAccount
            | InvalidTokenAccount => ErrorKind::Authorization,
            StakingPaused
            | AlreadyPaused
            | NotPaused
            | PositionInactive
            | NotLongTermPosition
            | LockPeriodActive
            | LockPeriodElapsed
            | InsufficientVaultBalance => ErrorKind::State,
            ArithmeticOverflow => ErrorKind::Arithmetic,
            TokenTransferFailed => ErrorKind::ExternalTransfer,
        }
    }
}
