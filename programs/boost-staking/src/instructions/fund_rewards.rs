use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::constants::GLOBAL_CONFIG_SEED;
use crate::engine::fee_router::transfer_tokens;
use crate::errors::StakingError;
use crate::events::RewardsFunded;
use crate::state::{GlobalConfig, RewardAsset};

#[derive(Accounts)]
#[instruction(asset: RewardAsset)]
pub struct FundRewards<'info> {
    pub authority: Signer<'info>,

    #[account(
        seeds = [GLOBAL_CONFIG_SEED],
        bump = config.bump,
        constraint = config.authority == authority.key() @ StakingError::Unauthorized
    )]
    pub config: Box<Account<'info, GlobalConfig>>,

    /// Authority's token account (source of reward tokens)
    #[account(
        mut,
        constraint = source.mint == config.route(asset).mint @ StakingError::InvalidAsset,
        constraint = source.owner == authority.key() @ StakingError::InvalidTokenAccount
    )]
    pub source: Box<Account<'info, TokenAccount>>,

    /// Reward vault of `asset`
    #[account(
        mut,
        address = config.route(asset).reward_vault @ StakingError::InvalidAsset
    )]
    pub reward_vault: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

pub fn handler(ctx: Context<FundRewards>, asset: RewardAsset, amount: u64) -> Result<()> {
    require!(amount > 0, StakingError::ZeroAmount);

    transfer_tokens(
        &ctx.accounts.token_program.to_account_info(),
        &ctx.accounts.source.to_account_info(),
        &ctx.accounts.reward_vault.to_account_info(),
        &ctx.accounts.authority.to_account_info(),
        amount,
        &[],
    )?;

    emit!(RewardsFunded {
        asset,
        amount,
        funder: ctx.accounts.authority.key(),
    });

    msg!(
        "Funded {:?} reward vault with {} tokens",
        asset,
        amount
    );

    Ok(())
}
