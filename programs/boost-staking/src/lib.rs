use anchor_lang::prelude::*;

pub mod constants;
pub mod engine;
pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;

pub use instructions::*;
use state::*;

declare_id!("BstK9xQfP8dN3n2v6yWm4cT7hLrJ5sZaE1uGqR8oVkDp");

#[program]
pub mod boost_staking {
    use super::*;

    /// Create the global configuration and vaults (admin)
    pub fn initialize(ctx: Context<Initialize>, params: GlobalParameters) -> Result<()> {
        instructions::initialize::handler(ctx, params)
    }

    /// Replace the global parameters (admin only)
    pub fn set_global_parameters(
        ctx: Context<SetGlobalParameters>,
        params: GlobalParameters,
    ) -> Result<()> {
        instructions::set_global_parameters::handler(ctx, params)
    }

    /// Halt every user operation (admin only)
    pub fn pause(ctx: Context<SetPause>) -> Result<()> {
        instructions::pause::handler(ctx, true)
    }

    /// Resume user operations (admin only)
    pub fn unpause(ctx: Context<SetPause>) -> Result<()> {
        instructions::pause::handler(ctx, false)
    }

    /// Top up a reward vault (admin only)
    pub fn fund_rewards(ctx: Context<FundRewards>, asset: RewardAsset, amount: u64) -> Result<()> {
        instructions::fund_rewards::handler(ctx, asset, amount)
    }

    /// Open a fixed-lock position
    pub fn open_long_term_stake(ctx: Context<OpenStake>, amount: u64) -> Result<()> {
        instructions::open_stake::handler(ctx, StakeKind::LongTerm, amount)
    }

    /// Open an open-ended position
    pub fn open_flexible_stake(ctx: Context<OpenStake>, amount: u64) -> Result<()> {
        instructions::open_stake::handler(ctx, StakeKind::Flexible, amount)
    }

    /// Link the caller to a referrer, once
    pub fn register_referrer<'info>(
        ctx: Context<'_, '_, '_, 'info, RegisterReferrer<'info>>,
        referrer: Pubkey,
    ) -> Result<()> {
        instructions::register_referrer::handler(ctx, referrer)
    }

    /// Burn primary tokens against a long-term position to raise its rate
    pub fn burn_for_boost(ctx: Context<BurnForBoost>, seq: u64, amount: u64) -> Result<()> {
        instructions::burn_for_boost::handler(ctx, seq, amount)
    }

    pub fn claim_primary_rewards(ctx: Context<ClaimRewards>, seq: u64) -> Result<()> {
        instructions::claim_rewards::handler(ctx, seq, RewardAsset::Primary)
    }

    pub fn claim_secondary_rewards(ctx: Context<ClaimRewards>, seq: u64) -> Result<()> {
        instructions::claim_rewards::handler(ctx, seq, RewardAsset::Secondary)
    }

    /// Close a position normally
    pub fn unstake(ctx: Context<ExitPosition>, seq: u64) -> Result<()> {
        instructions::unstake::handler(ctx, seq)
    }

    /// Close a locked long-term position early, with penalties
    pub fn emergency_unstake(ctx: Context<ExitPosition>, seq: u64) -> Result<()> {
        instructions::emergency_unstake::handler(ctx, seq)
    }

    /// Refresh the caller's cached affiliate boost from its referral chain
    pub fn sync_boost(ctx: Context<SyncBoost>) -> Result<()> {
        instructions::sync_boost::handler(ctx)
    }
}
