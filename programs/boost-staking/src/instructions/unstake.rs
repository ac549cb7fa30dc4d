use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::engine::fee_router::{transfer_tokens, FeeRoute};
use crate::engine::settlement::{plan_unstake, ExitPlan};
use crate::errors::StakingError;
use crate::events::PositionUnstaked;
use crate::state::{GlobalConfig, GlobalParameters, RewardAsset, StakePosition, UserAccount};

/// Accounts for closing a position, shared by `unstake` and
/// `emergency_unstake`.
#[derive(Accounts)]
#[instruction(seq: u64)]
pub struct ExitPosition<'info> {
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

    /// Receives principal and the primary reward
    #[account(
        mut,
        constraint = user_primary_account.mint == config.primary_mint @ StakingError::InvalidAsset,
        constraint = user_primary_account.owner == user.key() @ StakingError::InvalidTokenAccount
    )]
    pub user_primary_account: Box<Account<'info, TokenAccount>>,

    /// Receives the secondary reward, pays any uncovered fixed penalty
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

    #[account(mut, address = config.stake_vault @ StakingError::InvalidTokenAccount)]
    pub stake_vault: Box<Account<'info, TokenAccount>>,

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

impl<'info> ExitPosition<'info> {
    fn fee_route(
        &self,
        asset: RewardAsset,
        source: AccountInfo<'info>,
        authority: AccountInfo<'info>,
    ) -> FeeRoute<'info> {
        let (mint, reward_vault, ranking_pool, treasury) = match asset {
            RewardAsset::Primary => (
                self.primary_mint.to_account_info(),
                self.primary_reward_vault.to_account_info(),
                self.primary_ranking_pool.to_account_info(),
                self.primary_treasury.to_account_info(),
            ),
            RewardAsset::Secondary => (
                self.secondary_mint.to_account_info(),
                self.secondary_reward_vault.to_account_info(),
                self.secondary_ranking_pool.to_account_info(),
                self.secondary_treasury.to_account_info(),
            ),
        };
        FeeRoute {
            token_program: self.token_program.to_account_info(),
            mint,
            source,
            authority,
            reward_vault,
            ranking_pool,
            treasury,
        }
    }

    /// Settles the position up to `now` at the rate it has been accruing.
    pub fn settle_position(&mut self, params: &GlobalParameters, now: i64) -> Result<()> {
        let affiliate_boost_percent = self.user_account.affiliate_boost_percent;
        self.position.settle(params, now, affiliate_boost_percent)?;
        Ok(())
    }

    /// Moves every amount in `plan` and closes the position.
    pub fn execute_exit(&mut self, plan: &ExitPlan, now: i64) -> Result<()> {
        require!(
            self.stake_vault.amount >= plan.principal.gross,
            StakingError::InsufficientVaultBalance
        );
        require!(
            self.primary_reward_vault.amount >= plan.primary.gross,
            StakingError::InsufficientVaultBalance
        );
        require!(
            self.secondary_reward_vault.amount >= plan.secondary.gross,
            StakingError::InsufficientVaultBalance
        );

        let bump = self.config.bump;
        let seeds = &[GLOBAL_CONFIG_SEED, &[bump]];
        let signer = &[&seeds[..]];

        let token_program = self.token_program.to_account_info();
        let config = self.config.to_account_info();
        let user = self.user.to_account_info();
        let user_primary = self.user_primary_account.to_account_info();
        let user_secondary = self.user_secondary_account.to_account_info();
        let stake_vault = self.stake_vault.to_account_info();
        let primary_vault = self.primary_reward_vault.to_account_info();
        let secondary_vault = self.secondary_reward_vault.to_account_info();

        // Principal
        transfer_tokens(
            &token_program,
            &stake_vault,
            &user_primary,
            &config,
            plan.principal.net,
            signer,
        )?;
        self.fee_route(RewardAsset::Primary, stake_vault, config.clone())
            .execute(&plan.principal.fee, signer)?;

        // Primary reward
        transfer_tokens(
            &token_program,
            &primary_vault,
            &user_primary,
            &config,
            plan.primary.net,
            signer,
        )?;
        self.fee_route(RewardAsset::Primary, primary_vault, config.clone())
            .execute(&plan.primary.fee, signer)?;

        // Secondary reward
        transfer_tokens(
            &token_program,
            &secondary_vault,
            &user_secondary,
            &config,
            plan.secondary.net,
            signer,
        )?;
        self.fee_route(RewardAsset::Secondary, secondary_vault, config)
            .execute(&plan.secondary.fee, signer)?;

        if !plan.secondary_shortfall.is_empty() {
            self.fee_route(RewardAsset::Secondary, user_secondary, user)
                .execute(&plan.secondary_shortfall, &[])?;
        }

        let position = &mut self.position;
        position.take_pending(RewardAsset::Primary)?;
        position.take_pending(RewardAsset::Secondary)?;
        position.deactivate(now)?;
        let principal = position.principal_amount;
        let burn_boost_percent = position.burn_boost_percent;
        self.user_account
            .record_position_closed(principal, burn_boost_percent)
    }
}

/// Normal exit: long-term positions after their lock, flexible positions at
/// any time against the cancellation fee.
pub fn handler(ctx: Context<ExitPosition>, seq: u64) -> Result<()> {
    let params = ctx.accounts.config.params;
    let clock = Clock::get()?;
    let current_time = clock.unix_timestamp;

    ctx.accounts.settle_position(&params, current_time)?;
    let plan = plan_unstake(&ctx.accounts.position, &params, current_time)?;
    ctx.accounts.execute_exit(&plan, current_time)?;

    let principal_returned = plan.principal.net;
    let cancellation_fee = plan.principal.fee.total()?;
    emit!(PositionUnstaked {
        user: ctx.accounts.user.key(),
        seq,
        stake_kind: ctx.accounts.position.stake_kind,
        principal_returned,
        cancellation_fee,
        primary_reward: plan.primary.net,
        secondary_reward: plan.secondary.net,
    });

    msg!(
        "User {} unstaked position {}: {} principal, {} primary and {} secondary rewards",
        ctx.accounts.user.key(),
        seq,
        principal_returned,
        plan.primary.net,
        plan.secondary.net
    );

    Ok(())
}
