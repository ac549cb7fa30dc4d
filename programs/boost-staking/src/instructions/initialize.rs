use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::errors::StakingError;
use crate::events::ConfigInitialized;
use crate::state::{GlobalConfig, GlobalParameters};

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    /// Global configuration (PDA), authority of every vault
    #[account(
        init,
        payer = authority,
        space = GlobalConfig::LEN,
        seeds = [GLOBAL_CONFIG_SEED],
        bump
    )]
    pub config: Box<Account<'info, GlobalConfig>>,

    /// Staked and primary reward asset
    pub primary_mint: Box<Account<'info, Mint>>,

    /// Stable-value reward asset
    #[account(
        constraint = secondary_mint.key() != primary_mint.key() @ StakingError::InvalidParameters
    )]
    pub secondary_mint: Box<Account<'info, Mint>>,

    #[account(
        init,
        payer = authority,
        token::mint = primary_mint,
        token::authority = config,
        seeds = [STAKE_VAULT_SEED],
        bump
    )]
    pub stake_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        init,
        payer = authority,
        token::mint = primary_mint,
        token::authority = config,
        seeds = [PRIMARY_REWARD_VAULT_SEED],
        bump
    )]
    pub primary_reward_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        init,
        payer = authority,
        token::mint = secondary_mint,
        token::authority = config,
        seeds = [SECONDARY_REWARD_VAULT_SEED],
        bump
    )]
    pub secondary_reward_vault: Box<Account<'info, TokenAccount>>,

    #[account(constraint = primary_ranking_pool.mint == primary_mint.key() @ StakingError::InvalidAsset)]
    pub primary_ranking_pool: Box<Account<'info, TokenAccount>>,

    #[account(constraint = secondary_ranking_pool.mint == secondary_mint.key() @ StakingError::InvalidAsset)]
    pub secondary_ranking_pool: Box<Account<'info, TokenAccount>>,

    #[account(constraint = primary_treasury.mint == primary_mint.key() @ StakingError::InvalidAsset)]
    pub primary_treasury: Box<Account<'info, TokenAccount>>,

    #[account(constraint = secondary_treasury.mint == secondary_mint.key() @ StakingError::InvalidAsset)]
    pub secondary_treasury: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

pub fn handler(ctx: Context<Initialize>, params: GlobalParameters) -> Result<()> {
    params.validate()?;

    let clock = Clock::get()?;
    let authority = ctx.accounts.authority.key();
    let accounts = &ctx.accounts;

    let config = GlobalConfig {
        authority,
        params,
        params_version: 0,
        paused: false,
        primary_mint: accounts.primary_mint.key(),
        secondary_mint: accounts.secondary_mint.key(),
        stake_vault: accounts.stake_vault.key(),
        primary_reward_vault: accounts.primary_reward_vault.key(),
        secondary_reward_vault: accounts.secondary_reward_vault.key(),
        primary_ranking_pool: accounts.primary_ranking_pool.key(),
        secondary_ranking_pool: accounts.secondary_ranking_pool.key(),
        primary_treasury: accounts.primary_treasury.key(),
        secondary_treasury: accounts.secondary_treasury.key(),
        created_at: clock.unix_timestamp,
        bump: ctx.bumps.config,
    };
    ctx.accounts.config.set_inner(config);

    emit!(ConfigInitialized {
        authority,
        primary_mint: ctx.accounts.primary_mint.key(),
        secondary_mint: ctx.accounts.secondary_mint.key(),
    });

    msg!("Boost staking initialized by {}", authority);

    Ok(())
}
