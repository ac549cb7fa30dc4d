use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::engine::fee_router::{transfer_tokens, FeeRoute};
use crate::engine::settlement::plan_claim;
use crate::errors::StakingError;
use crate::events::RewardsClaimed;
use crate::state::{GlobalConfig, RewardAsset, StakePosition, UserAccount};

/// Accounts for a claim in either asset. The asset-specific accounts are
/// checked against the configured route in the handler.
#[derive(Accounts)]
#[instruction(seq: u64)]
pub struct ClaimRewards<'info> {
    pub user: Signer<'info>,

    #[account(
        seeds = [GLOBAL_CONFIG_SEED],
        bump = config.bump,
        constraint = !config.paused @ StakingError::StakingPaused
    )]
    pub config: Box<Account<'info, GlobalConfig>>,

    #[account(
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

    /// User's token account (destination for the net reward)
    #[account(
        mut,
        constraint = user_reward_account.owner == user.key() @ StakingError::InvalidTokenAccount
    )]
    pub user_reward_account: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub mint: Box<Account<'info, Mint>>,

    #[account(mut)]
    pub reward_vault: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub ranking_pool: Box<Account<'info, TokenAccount>>,

    #[account(mut)]
    pub treasury: Box<Account<'info, TokenAccount>>,

    pub token_program: Program<'info, Token>,
}

impl<'info> ClaimRewards<'info> {
    fn validate_route(&self, asset: RewardAsset) -> Result<()> {
        let route = self.config.route(asset);
        require_keys_eq!(self.mint.key(), route.mint, StakingError::InvalidAsset);
        require_keys_eq!(self.user_reward_account.mint, route.mint, StakingError::InvalidAsset);
        require_keys_eq!(
            self.reward_vault.key(),
            route.reward_vault,
            StakingError::InvalidTokenAccount
        );
        require_keys_eq!(
            self.ranking_pool.key(),
            route.ranking_pool,
            StakingError::InvalidTokenAccount
        );
        require_keys_eq!(self.treasury.key(), route.treasury, StakingError::InvalidTokenAccount);
        Ok(())
    }

    fn fee_route(&self) -> FeeRoute<'info> {
        FeeRoute {
            token_program: self.token_program.to_account_info(),
            mint: self.mint.to_account_info(),
            source: self.reward_vault.to_account_info(),
            authority: self.config.to_account_info(),
            reward_vault: self.reward_vault.to_account_info(),
            ranking_pool: self.ranking_pool.to_account_info(),
            treasury: self.treasury.to_account_info(),
        }
    }
}

/// Settles the position and pays out the pending bucket of `asset` net of
/// its claim fee. The other asset stays pending.
pub fn handler(ctx: Context<ClaimRewards>, seq: u64, asset: RewardAsset) -> Result<()> {
    ctx.accounts.validate_route(asset)?;

    let params = ctx.accounts.config.params;
    let clock = Clock::get()?;
    let current_time = clock.unix_timestamp;

    let affiliate_boost_percent = ctx.accounts.user_account.affiliate_boost_percent;
    let position = &mut ctx.accounts.position;
    position.settle(&params, current_time, affiliate_boost_percent)?;

    let payout = plan_claim(position.pending(asset), params.claim_fee(asset))?;
    require!(
        ctx.accounts.reward_vault.amount >= payout.gross,
        StakingError::InsufficientVaultBalance
    );
    ctx.accounts.position.take_pending(asset)?;

    // Vaults are owned by the config PDA
    let bump = ctx.accounts.config.bump;
    let seeds = &[GLOBAL_CONFIG_SEED, &[bump]];
    let signer = &[&seeds[..]];

    transfer_tokens(
        &ctx.accounts.token_program.to_account_info(),
        &ctx.accounts.reward_vault.to_account_info(),
        &ctx.accounts.user_reward_account.to_account_info(),
        &ctx.accounts.config.to_account_info(),
        payout.net,
        signer,
    )?;
    ctx.accounts.fee_route().execute(&payout.fee, signer)?;

    let fee = payout.fee.total()?;
    emit!(RewardsClaimed {
        user: ctx.accounts.user.key(),
        seq,
        asset,
        gross: payout.gross,
        fee,
        net: payout.net,
    });

    msg!(
        "User {} claimed {} {:?} rewards from position {} (fee {})",
        ctx.accounts.user.key(),
        payout.net,
        asset,
        seq,
        fee
    );

    Ok(())
}
