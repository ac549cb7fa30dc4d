use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::engine::fee_router::{burn_tokens, FeeRoute};
use crate::engine::settlement::plan_burn;
use crate::errors::StakingError;
use crate::events::{BoostBurned, BurnLogged};
use crate::instructions::referral_chain::refresh_affiliate_boost;
use crate::state::{GlobalConfig, StakePosition, UserAccount};

#[derive(Accounts)]
#[instruction(seq: u64)]
pub struct BurnForBoost<'info> {
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

    #[account(
        mut,
        seeds = [STAKE_POSITION_SEED, user.key().as_ref(), &seq.to_le_bytes()],
        bump = position.bump,
        constraint = position.owner == user.key() @ StakingError::Unauthorized
    )]
    pub position: Box<Account<'info, StakePosition>>,

    /// Source of the burned amount and the percentage fee
    #[account(
        mut,
        constraint = user_primary_account.mint == config.primary_mint @ StakingError::InvalidAsset,
        constraint = user_primary_account.owner == user.key() @ StakingError::InvalidTokenAccount
    )]
    pub user_primary_account: Box<Account<'info, TokenAccount>>,

    /// Source of the fixed fee
    #[account(
        mut,
        constraint = user_secondary_account.mint == config.secondary_mint @ StakingError::InvalidAsset,
        constraint = user_secondary_account.owner == user.key() @ StakingError::InvalidTokenAccount
    )]
    pub user_secondary_account: Box<Account<'info, TokenAccount>>,

    #[account(mut, address = config.primary_mint @ StakingError::InvalidAsset)]
    pub primary_mint: Box<Account<'info, Mint>>,

    #[account(mut, address = config.secondary_mint @ StakingError::InvalidAsset)]
    pub secondary_mint: Box<Account<'info, Mint>>,

    #[account(mut, address = config.primary_reward_vault @ StakingError::InvalidTokenAccount)]
    pub primary_reward_vault: Box<Account<'info, TokenAccount>>,

    #[account(mut, address = config.secondary_reward_vault @ StakingError::InvalidTokenAccount)]
    pub secondary_reward_vault: Box<Account<'info, TokenAccount>>,

    #[account(mut, address = config.primary_ranking_pool @ StakingError::InvalidTokenAccount)]
    pub primary_ranking_pool: Box<Account<'info, TokenAccount>>,

    #[account(mut, address = config.secondary_ranking_pool @ StakingError::InvalidTokenAccount)]
    pub secondary_ranking_pool: Box<Account<'info, TokenAccount>>,

    #[account(mut, address = config.primary_treasury @ StakingError::InvalidTokenAccount)]
    pub primary_treasury: Box<Account<'info, TokenAccount>>,

    #[account(mut, address = config.secondary_treasury @ StakingError::InvalidTokenAccount)]
    pub secondary_treasury: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

impl<'info> BurnForBoost<'info> {
    fn primary_fee_route(&self) -> FeeRoute<'info> {
        FeeRoute {
            token_program: self.token_program.to_account_info(),
            mint: self.primary_mint.to_account_info(),
            source: self.user_primary_account.to_account_info(),
            authority: self.user.to_account_info(),
            reward_vault: self.primary_reward_vault.to_account_info(),
            ranking_pool: self.primary_ranking_pool.to_account_info(),
            treasury: self.primary_treasury.to_account_info(),
        }
    }

    fn secondary_fee_route(&self) -> FeeRoute<'info> {
        FeeRoute {
            token_program: self.token_program.to_account_info(),
            mint: self.secondary_mint.to_account_info(),
            source: self.user_secondary_account.to_account_info(),
            authority: self.user.to_account_info(),
            reward_vault: self.secondary_reward_vault.to_account_info(),
            ranking_pool: self.secondary_ranking_pool.to_account_info(),
            treasury: self.secondary_treasury.to_account_info(),
        }
    }
}

/// Remaining accounts carry the caller's referral chain, nearest ancestor
/// first, so the affiliate boost is current when the new rate takes effect.
pub fn handler(ctx: Context<BurnForBoost>, seq: u64, amount: u64) -> Result<()> {
    let params = ctx.accounts.config.params;
    let plan = plan_burn(amount, &params)?;

    let clock = Clock::get()?;
    let current_time = clock.unix_timestamp;

    let user_account = &mut ctx.accounts.user_account;
    let position = &mut ctx.accounts.position;
    position.ensure_active()?;
    position.ensure_long_term()?;

    let affiliate_boost_percent =
        refresh_affiliate_boost(user_account, &params, ctx.remaining_accounts, current_time)?;

    // Accrual so far is earned at the pre-burn rate
    position.settle(&params, current_time, affiliate_boost_percent)?;

    let previous_burn_boost = position.burn_boost_percent;
    let burn_boost_percent = position.record_burn(amount)?;
    user_account.record_burn(amount, previous_burn_boost, burn_boost_percent)?;

    let effective_apy_bps = position.effective_apy_bps(&params)?;
    let total_burned = position.total_burned_for_boost;

    burn_tokens(
        &ctx.accounts.token_program.to_account_info(),
        &ctx.accounts.primary_mint.to_account_info(),
        &ctx.accounts.user_primary_account.to_account_info(),
        &ctx.accounts.user.to_account_info(),
        plan.burned,
        &[],
    )?;
    ctx.accounts.primary_fee_route().execute(&plan.primary_fee, &[])?;
    ctx.accounts.secondary_fee_route().execute(&plan.secondary_fee, &[])?;

    let user_key = ctx.accounts.user.key();
    emit!(BoostBurned {
        user: user_key,
        seq,
        amount,
        total_burned,
        burn_boost_percent,
        affiliate_boost_percent,
        effective_apy_bps,
    });
    emit!(BurnLogged {
        user: user_key,
        amount,
    });

    msg!(
        "User {} burned {} tokens on position {}: burn boost {}%, apy {} bps",
        user_key,
        amount,
        seq,
        burn_boost_percent,
        effective_apy_bps
    );

    Ok(())
}
