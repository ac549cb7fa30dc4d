use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::engine::fee_router::{transfer_tokens, FeeRoute};
use crate::engine::settlement::plan_entry;
use crate::errors::StakingError;
use crate::events::StakeOpened;
use crate::state::{GlobalConfig, StakeKind, StakePosition, UserAccount};

#[derive(Accounts)]
pub struct OpenStake<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        seeds = [GLOBAL_CONFIG_SEED],
        bump = config.bump,
        constraint = !config.paused @ StakingError::StakingPaused
    )]
    pub config: Box<Account<'info, GlobalConfig>>,

    /// Created on the user's first interaction
    #[account(
        init_if_needed,
        payer = user,
        space = UserAccount::LEN,
        seeds = [USER_ACCOUNT_SEED, user.key().as_ref()],
        bump
    )]
    pub user_account: Box<Account<'info, UserAccount>>,

    /// New position, addressed by the user's next sequence number
    #[account(
        init,
        payer = user,
        space = StakePosition::LEN,
        seeds = [
            STAKE_POSITION_SEED,
            user.key().as_ref(),
            &user_account.total_positions.to_le_bytes()
        ],
        bump
    )]
    pub position: Box<Account<'info, StakePosition>>,

    /// User's primary token account (source of the stake and the entry fee)
    #[account(
        mut,
        constraint = user_token_account.mint == config.primary_mint @ StakingError::InvalidAsset,
        constraint = user_token_account.owner == user.key() @ StakingError::InvalidTokenAccount
    )]
    pub user_token_account: Box<Account<'info, TokenAccount>>,

    #[account(mut, address = config.primary_mint @ StakingError::InvalidAsset)]
    pub primary_mint: Box<Account<'info, Mint>>,

    #[account(mut, address = config.stake_vault @ StakingError::InvalidTokenAccount)]
    pub stake_vault: Box<Account<'info, TokenAccount>>,

    #[account(mut, address = config.primary_reward_vault @ StakingError::InvalidTokenAccount)]
    pub primary_reward_vault: Box<Account<'info, TokenAccount>>,

    #[account(mut, address = config.primary_ranking_pool @ StakingError::InvalidTokenAccount)]
    pub primary_ranking_pool: Box<Account<'info, TokenAccount>>,

    #[account(mut, address = config.primary_treasury @ StakingError::InvalidTokenAccount)]
    pub primary_treasury: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

impl<'info> OpenStake<'info> {
    fn entry_fee_route(&self) -> FeeRoute<'info> {
        FeeRoute {
            token_program: self.token_program.to_account_info(),
            mint: self.primary_mint.to_account_info(),
            source: self.user_token_account.to_account_info(),
            authority: self.user.to_account_info(),
            reward_vault: self.primary_reward_vault.to_account_info(),
            ranking_pool: self.primary_ranking_pool.to_account_info(),
            treasury: self.primary_treasury.to_account_info(),
        }
    }
}

pub fn handler(ctx: Context<OpenStake>, stake_kind: StakeKind, amount: u64) -> Result<()> {
    let params = ctx.accounts.config.params;
    let plan = plan_entry(amount, stake_kind, &params)?;

    let clock = Clock::get()?;
    let current_time = clock.unix_timestamp;
    let user_key = ctx.accounts.user.key();

    let user_account = &mut ctx.accounts.user_account;
    user_account.ensure_initialized(user_key, ctx.bumps.user_account, current_time);
    let seq = user_account.record_position_opened(plan.principal)?;
    let affiliate_boost_percent = user_account.affiliate_boost_percent;

    let position = StakePosition::open(
        user_key,
        seq,
        stake_kind,
        plan.principal,
        affiliate_boost_percent,
        &params,
        current_time,
        ctx.bumps.position,
    )?;
    let lock_end_time = position.lock_end_time;
    ctx.accounts.position.set_inner(position);

    // Entry fee first, then the principal
    ctx.accounts.entry_fee_route().execute(&plan.fee, &[])?;
    transfer_tokens(
        &ctx.accounts.token_program.to_account_info(),
        &ctx.accounts.user_token_account.to_account_info(),
        &ctx.accounts.stake_vault.to_account_info(),
        &ctx.accounts.user.to_account_info(),
        plan.principal,
        &[],
    )?;

    let entry_fee = plan.fee.total()?;
    emit!(StakeOpened {
        user: user_key,
        seq,
        stake_kind,
        amount,
        entry_fee,
        principal: plan.principal,
        lock_end_time,
    });

    msg!(
        "User {} opened {:?} position {} with {} tokens (fee {}, principal {})",
        user_key,
        stake_kind,
        seq,
        amount,
        entry_fee,
        plan.principal
    );

    Ok(())
}
