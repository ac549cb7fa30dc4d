use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::StakingError;
use crate::events::BoostSynced;
use crate::instructions::referral_chain::refresh_affiliate_boost;
use crate::state::{GlobalConfig, UserAccount};

#[derive(Accounts)]
pub struct SyncBoost<'info> {
    pub user: Signer<'info>,

    #[account(
        seeds = [GLOBAL_CONFIG_SEED],
        bump = config.bump,
        constraint = !config.paused @ StakingError::StakingPaused
    )]
    pub config: Box<Account<'info, GlobalConfig>>,

    #[account(
        mut,
        seeds = [USER_ACCOUNT_SEED, user.key().as_ref()],
        bump = user_account.bump
    )]
    pub user_account: Box<Account<'info, UserAccount>>,
}

/// Recomputes the caller's cached affiliate boost, and with it the staking
/// power its referrals read. Remaining accounts carry the referral chain.
pub fn handler(ctx: Context<SyncBoost>) -> Result<()> {
    let params = ctx.accounts.config.params;
    let clock = Clock::get()?;

    let user_account = &mut ctx.accounts.user_account;
    let affiliate_boost_percent = refresh_affiliate_boost(
        user_account,
        &params,
        ctx.remaining_accounts,
        clock.unix_timestamp,
    )?;

    emit!(BoostSynced {
        user: user_account.owner,
        affiliate_boost_percent,
        staking_power: user_account.staking_power,
    });

    msg!(
        "User {} boost synced: affiliate {}%, staking power {}",
        user_account.owner,
        affiliate_boost_percent,
        user_account.staking_power
    );

    Ok(())
}
