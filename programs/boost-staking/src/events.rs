use anchor_lang::prelude::*;

use crate::state::{RewardAsset, StakeKind};

#[event]
pub struct ConfigInitialized {
    pub authority: Pubkey,
    pub primary_mint: Pubkey,
    pub secondary_mint: Pubkey,
}

#[event]
pub struct ParametersUpdated {
    pub authority: Pubkey,
    pub params_version: u64,
}

#[event]
pub struct PauseToggled {
    pub paused: bool,
    pub authority: Pubkey,
}

#[event]
pub struct RewardsFunded {
    pub asset: RewardAsset,
    pub amount: u64,
    pub funder: Pubkey,
}

#[event]
pub struct StakeOpened {
    pub user: Pubkey,
    pub seq: u64,
    pub stake_kind: StakeKind,
    pub amount: u64,
    pub entry_fee: u64,
    pub principal: u64,
    pub lock_end_time: i64,
}

#[event]
pub struct ReferrerRegistered {
    pub user: Pubkey,
    pub referrer: Pubkey,
    pub affiliate_boost_percent: u8,
}

/// Referral activity notification for the ranking service.
#[event]
pub struct ReferralLogged {
    pub user: Pubkey,
}

#[event]
pub struct BoostBurned {
    pub user: Pubkey,
    pub seq: u64,
    pub amount: u64,
    pub total_burned: u64,
    pub burn_boost_percent: u8,
    pub affiliate_boost_percent: u8,
    pub effective_apy_bps: u32,
}

/// Burn activity notification for the ranking service.
#[event]
pub struct BurnLogged {
    pub user: Pubkey,
    pub amount: u64,
}

#[event]
pub struct RewardsClaimed {
    pub user: Pubkey,
    pub seq: u64,
    pub asset: RewardAsset,
    pub gross: u64,
    pub fee: u64,
    pub net: u64,
}

#[event]
pub struct PositionUnstaked {
    pub user: Pubkey,
    pub seq: u64,
    pub stake_kind: StakeKind,
    pub principal_returned: u64,
    pub cancellation_fee: u64,
    pub primary_reward: u64,
    pub secondary_reward: u64,
}

#[event]
pub struct EmergencyUnstaked {
    pub user: Pubkey,
    pub seq: u64,
    pub principal_returned: u64,
    pub capital_penalty: u64,
    pub interest_penalty: u64,
    pub secondary_penalty: u64,
    pub primary_reward: u64,
    pub secondary_reward: u64,
}

#[event]
pub struct BoostSynced {
    pub user: Pubkey,
    pub affiliate_boost_percent: u8,
    pub staking_power: u8,
}
