use anchor_lang::prelude::*;

#[constant]
pub const GLOBAL_CONFIG_SEED: &[u8] = b"global_config";
pub const USER_ACCOUNT_SEED: &[u8] = b"user_account";
pub const STAKE_POSITION_SEED: &[u8] = b"stake_position";
pub const STAKE_VAULT_SEED: &[u8] = b"stake_vault";
pub const PRIMARY_REWARD_VAULT_SEED: &[u8] = b"primary_reward_vault";
pub const SECONDARY_REWARD_VAULT_SEED: &[u8] = b"secondary_reward_vault";

pub const SECONDS_PER_DAY: i64 = 86_400;
pub const SECONDS_PER_YEAR: u64 = 365 * 86_400;

/// 100% expressed in basis points
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Percent values (boosts, staking power) never exceed this
pub const MAX_POWER_PERCENT: u8 = 100;

/// Upward referral levels that contribute to the affiliate boost
pub const MAX_AFFILIATE_LEVELS: usize = 6;

pub const ENTRY_FEE_TIER_COUNT: usize = 4;

/// Both assets use 6 decimals
pub const TOKEN_UNIT: u64 = 1_000_000;

pub const DEFAULT_LONG_TERM_BASE_APY_BPS: u32 = 1_000; // 10%
pub const DEFAULT_LONG_TERM_MAX_APY_BPS: u32 = 28_000; // 280%
pub const DEFAULT_FLEXIBLE_BASE_APY_BPS: u32 = 500; // 5%
pub const DEFAULT_FLEXIBLE_MAX_APY_BPS: u32 = 7_000; // 70%

pub const DEFAULT_LONG_TERM_MIN_STAKE: u64 = 1_000 * TOKEN_UNIT;
pub const DEFAULT_FLEXIBLE_MIN_STAKE: u64 = 100 * TOKEN_UNIT;
pub const DEFAULT_LONG_TERM_LOCK_SECONDS: i64 = 365 * SECONDS_PER_DAY;

pub const DEFAULT_AFFILIATE_LEVEL_PERCENTS: [u8; MAX_AFFILIATE_LEVELS] = [20, 15, 8, 4, 2, 1];
pub const DEFAULT_AFFILIATE_CAP_PERCENT: u8 = 50;
