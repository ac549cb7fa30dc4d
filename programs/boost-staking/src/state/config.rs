use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::StakingError;

/// The two fungible assets the engine pays rewards in.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RewardAsset {
    /// Reward / governance token, also the staked asset
    Primary,
    /// Stable-value asset
    Secondary,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StakeKind {
    /// Fixed lock duration, burn-for-boost eligible
    LongTerm,
    /// Open-ended, cancellation fee on exit
    Flexible,
}

/// APY range and minimum deposit for one stake kind.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KindParameters {
    /// APY at zero total power, in basis points
    pub base_apy_bps: u32,
    /// APY at full (100) total power, in basis points
    pub max_apy_bps: u32,
    pub min_stake_amount: u64,
}

/// Partition of a fee or penalty across destination buckets, in basis points.
/// Bucket order is burn, staking reward pool, ranking pool, treasury.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeeSplit {
    pub burn_bps: u16,
    pub staking_pool_bps: u16,
    pub ranking_pool_bps: u16,
    pub treasury_bps: u16,
}

impl FeeSplit {
    pub const fn new(burn_bps: u16, staking_pool_bps: u16, ranking_pool_bps: u16, treasury_bps: u16) -> Self {
        Self {
            burn_bps,
            staking_pool_bps,
            ranking_pool_bps,
            treasury_bps,
        }
    }

    pub fn total_bps(&self) -> u32 {
        self.burn_bps as u32
            + self.staking_pool_bps as u32
            + self.ranking_pool_bps as u32
            + self.treasury_bps as u32
    }

    pub fn validate(&self) -> Result<()> {
        require!(
            self.total_bps() == BPS_DENOMINATOR as u32,
            StakingError::InvalidFeeSplit
        );
        Ok(())
    }
}

/// A percentage fee together with how it is split.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeeSchedule {
    pub rate_bps: u16,
    pub split: FeeSplit,
}

impl FeeSchedule {
    pub fn validate(&self) -> Result<()> {
        require!(
            self.rate_bps as u64 <= BPS_DENOMINATOR,
            StakingError::InvalidParameters
        );
        self.split.validate()
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EntryFeeTier {
    /// Gross stake amount at which this tier starts to apply
    pub min_amount: u64,
    pub fee_bps: u16,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EarlyExitPenalty {
    /// Applied to principal
    pub capital_penalty_bps: u16,
    /// Applied to accrued primary interest
    pub interest_penalty_bps: u16,
    /// Fixed amount charged in the secondary asset
    pub secondary_fixed: u64,
}

/// Administrator-owned parameter record. Replaced as a whole by
/// `set_global_parameters` and validated before every write.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlobalParameters {
    pub long_term: KindParameters,
    pub flexible: KindParameters,
    pub long_term_lock_seconds: i64,

    /// Ascending by `min_amount`, first tier starts at zero
    pub entry_fee_tiers: [EntryFeeTier; ENTRY_FEE_TIER_COUNT],
    pub entry_fee_split: FeeSplit,

    /// Percentage fee on the burned primary amount
    pub burn_fee: FeeSchedule,
    /// Fixed secondary-asset fee per burn, split like `burn_fee`
    pub burn_fee_secondary_fixed: u64,

    pub primary_claim_fee: FeeSchedule,
    pub secondary_claim_fee: FeeSchedule,

    /// Cancellation fee on flexible principal
    pub flexible_exit_fee: FeeSchedule,

    pub early_exit: EarlyExitPenalty,
    pub penalty_split: FeeSplit,

    /// Share of the computed yield paid in each asset
    pub primary_reward_weight_bps: u16,
    pub secondary_reward_weight_bps: u16,

    /// Level 1 (direct referrer) first
    pub affiliate_level_percents: [u8; MAX_AFFILIATE_LEVELS],
    pub affiliate_cap_percent: u8,
}

impl Default for GlobalParameters {
    fn default() -> Self {
        Self {
            long_term: KindParameters {
                base_apy_bps: DEFAULT_LONG_TERM_BASE_APY_BPS,
                max_apy_bps: DEFAULT_LONG_TERM_MAX_APY_BPS,
                min_stake_amount: DEFAULT_LONG_TERM_MIN_STAKE,
            },
            flexible: KindParameters {
                base_apy_bps: DEFAULT_FLEXIBLE_BASE_APY_BPS,
                max_apy_bps: DEFAULT_FLEXIBLE_MAX_APY_BPS,
                min_stake_amount: DEFAULT_FLEXIBLE_MIN_STAKE,
            },
            long_term_lock_seconds: DEFAULT_LONG_TERM_LOCK_SECONDS,
            entry_fee_tiers: [
                EntryFeeTier { min_amount: 0, fee_bps: 500 },
                EntryFeeTier { min_amount: 10_000 * TOKEN_UNIT, fee_bps: 300 },
                EntryFeeTier { min_amount: 100_000 * TOKEN_UNIT, fee_bps: 200 },
                EntryFeeTier { min_amount: 1_000_000 * TOKEN_UNIT, fee_bps: 100 },
            ],
            entry_fee_split: FeeSplit::new(2_000, 4_000, 2_000, 2_000),
            burn_fee: FeeSchedule {
                rate_bps: 200,
                split: FeeSplit::new(0, 5_000, 2_500, 2_500),
            },
            burn_fee_secondary_fixed: TOKEN_UNIT,
            primary_claim_fee: FeeSchedule {
                rate_bps: 1_000,
                split: FeeSplit::new(1_000, 1_000, 4_000, 4_000),
            },
            secondary_claim_fee: FeeSchedule {
                rate_bps: 1_000,
                split: FeeSplit::new(0, 2_000, 4_000, 4_000),
            },
            flexible_exit_fee: FeeSchedule {
                rate_bps: 300,
                split: FeeSplit::new(5_000, 3_000, 0, 2_000),
            },
            early_exit: EarlyExitPenalty {
                capital_penalty_bps: 5_000,
                interest_penalty_bps: 8_000,
                secondary_fixed: 5 * TOKEN_UNIT,
            },
            penalty_split: FeeSplit::new(5_000, 3_000, 0, 2_000),
            primary_reward_weight_bps: 10_000,
            secondary_reward_weight_bps: 1_000,
            affiliate_level_percents: DEFAULT_AFFILIATE_LEVEL_PERCENTS,
            affiliate_cap_percent: DEFAULT_AFFILIATE_CAP_PERCENT,
        }
    }
}

impl GlobalParameters {
    pub const LEN: usize = 2 * (4 + 4 + 8) + // long_term, flexible
        8 + // long_term_lock_seconds
        ENTRY_FEE_TIER_COUNT * (8 + 2) + // entry_fee_tiers
        8 + // entry_fee_split
        (2 + 8) + // burn_fee
        8 + // burn_fee_secondary_fixed
        2 * (2 + 8) + // primary_claim_fee, secondary_claim_fee
        (2 + 8) + // flexible_exit_fee
        (2 + 2 + 8) + // early_exit
        8 + // penalty_split
        2 + 2 + // reward weights
        MAX_AFFILIATE_LEVELS + // affiliate_level_percents
        1; // affiliate_cap_percent

    pub fn kind(&self, kind: StakeKind) -> &KindParameters {
        match kind {
            StakeKind::LongTerm => &self.long_term,
            StakeKind::Flexible => &self.flexible,
        }
    }

    pub fn claim_fee(&self, asset: RewardAsset) -> &FeeSchedule {
        match asset {
            RewardAsset::Primary => &self.primary_claim_fee,
            RewardAsset::Secondary => &self.secondary_claim_fee,
        }
    }

    pub fn reward_weight_bps(&self, asset: RewardAsset) -> u16 {
        match asset {
            RewardAsset::Primary => self.primary_reward_weight_bps,
            RewardAsset::Secondary => self.secondary_reward_weight_bps,
        }
    }

    /// Fee rate of the highest tier whose threshold `amount` reaches.
    pub fn entry_fee_bps(&self, amount: u64) -> u16 {
        self.entry_fee_tiers
            .iter()
            .take_while(|tier| amount >= tier.min_amount)
            .last()
            .map(|tier| tier.fee_bps)
            .unwrap_or(0)
    }

    /// Structural checks run once at configuration load.
    pub fn validate(&self) -> Result<()> {
        for kind in [&self.long_term, &self.flexible] {
            require!(kind.base_apy_bps <= kind.max_apy_bps, StakingError::InvalidParameters);
            require!(kind.min_stake_amount > 0, StakingError::InvalidParameters);
        }
        require!(self.long_term_lock_seconds > 0, StakingError::InvalidParameters);

        require!(
            self.entry_fee_tiers[0].min_amount == 0,
            StakingError::InvalidParameters
        );
        for pair in self.entry_fee_tiers.windows(2) {
            require!(
                pair[0].min_amount < pair[1].min_amount,
                StakingError::InvalidParameters
            );
        }
        for tier in &self.entry_fee_tiers {
            require!(
                tier.fee_bps as u64 <= BPS_DENOMINATOR,
                StakingError::InvalidParameters
            );
        }
        self.entry_fee_split.validate()?;

        self.burn_fee.validate()?;
        self.primary_claim_fee.validate()?;
        self.secondary_claim_fee.validate()?;
        self.flexible_exit_fee.validate()?;

        require!(
            self.early_exit.capital_penalty_bps as u64 <= BPS_DENOMINATOR
                && self.early_exit.interest_penalty_bps as u64 <= BPS_DENOMINATOR,
            StakingError::InvalidParameters
        );
        self.penalty_split.validate()?;

        require!(
            self.primary_reward_weight_bps as u64 <= BPS_DENOMINATOR
                && self.secondary_reward_weight_bps as u64 <= BPS_DENOMINATOR,
            StakingError::InvalidParameters
        );

        let affiliate_total: u32 = self
            .affiliate_level_percents
            .iter()
            .map(|p| *p as u32)
            .sum();
        require!(
            self.affiliate_cap_percent <= MAX_POWER_PERCENT
                && affiliate_total == self.affiliate_cap_percent as u32,
            StakingError::InvalidAffiliateTable
        );

        Ok(())
    }
}

/// Token accounts a fee in one asset can be routed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssetRoute {
    pub mint: Pubkey,
    pub reward_vault: Pubkey,
    pub ranking_pool: Pubkey,
    pub treasury: Pubkey,
}

#[account]
pub struct GlobalConfig {
    /// Authority allowed to change parameters and pause
    pub authority: Pubkey,

    pub params: GlobalParameters,

    /// Incremented on every parameter update
    pub params_version: u64,

    pub paused: bool,

    pub primary_mint: Pubkey,
    pub secondary_mint: Pubkey,

    /// Holds staked principal (primary asset)
    pub stake_vault: Pubkey,
    pub primary_reward_vault: Pubkey,
    pub secondary_reward_vault: Pubkey,

    pub primary_ranking_pool: Pubkey,
    pub secondary_ranking_pool: Pubkey,
    pub primary_treasury: Pubkey,
    pub secondary_treasury: Pubkey,

    pub created_at: i64,

    /// Bump seed for PDA
    pub bump: u8,
}

impl GlobalConfig {
    pub const LEN: usize = 8 + // discriminator
        32 + // authority
        GlobalParameters::LEN + // params
        8 + // params_version
        1 + // paused
        32 + 32 + // mints
        32 * 3 + // vaults
        32 * 4 + // ranking pools, treasuries
        8 + // created_at
        1; // bump

    pub fn route(&self, asset: RewardAsset) -> AssetRoute {
        match asset {
            RewardAsset::Primary => AssetRoute {
                mint: self.primary_mint,
                reward_vault: self.primary_reward_vault,
                ranking_pool: self.primary_ranking_pool,
                treasury: self.primary_treasury,
            },
            RewardAsset::Secondary => AssetRoute {
                mint: self.secondary_mint,
                reward_vault: self.secondary_reward_vault,
                ranking_pool: self.secondary_ranking_pool,
                treasury: self.secondary_treasury,
            },
        }
    }

    pub fn ensure_active(&self) -> Result<()> {
        require!(!self.paused, StakingError::StakingPaused);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_parameters_are_valid() {
        GlobalParameters::default().validate().unwrap();
    }

    #[test]
    fn affiliate_table_must_sum_to_cap() {
        let mut params = GlobalParameters::default();
        params.affiliate_level_percents = [20, 15, 8, 4, 2, 2];
        assert_eq!(
            params.validate().unwrap_err(),
            StakingError::InvalidAffiliateTable.into()
        );

        params.affiliate_cap_percent = 51;
        params.validate().unwrap();
    }

    #[test]
    fn split_tables_must_be_complete() {
        let mut params = GlobalParameters::default();
        params.primary_claim_fee.split = FeeSplit::new(1_000, 1_000, 4_000, 3_999);
        assert_eq!(
            params.validate().unwrap_err(),
            StakingError::InvalidFeeSplit.into()
        );
    }

    #[test]
    fn apy_range_must_be_ordered() {
        let mut params = GlobalParameters::default();
        params.flexible.max_apy_bps = params.flexible.base_apy_bps - 1;
        assert_eq!(
            params.validate().unwrap_err(),
            StakingError::InvalidParameters.into()
        );
    }

    #[test]
    fn entry_fee_tiers_by_amount() {
        let params = GlobalParameters::default();
        assert_eq!(params.entry_fee_bps(100 * TOKEN_UNIT), 500);
        assert_eq!(params.entry_fee_bps(10_000 * TOKEN_UNIT), 300);
        assert_eq!(params.entry_fee_bps(99_999 * TOKEN_UNIT), 300);
        assert_eq!(params.entry_fee_bps(250_000 * TOKEN_UNIT), 200);
        assert_eq!(params.entry_fee_bps(u64::MAX), 100);
    }

    #[test]
    fn unordered_tiers_rejected() {
        let mut params = GlobalParameters::default();
        params.entry_fee_tiers[2].min_amount = params.entry_fee_tiers[1].min_amount;
        assert!(params.validate().is_err());
    }

    #[test]
    fn params_len_matches_serialized_size() {
        let bytes = GlobalParameters::default().try_to_vec().unwrap();
        assert_eq!(bytes.len(), GlobalParameters::LEN);
    }
}
