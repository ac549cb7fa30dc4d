use anchor_lang::prelude::*;

use crate::constants::GLOBAL_CONFIG_SEED;
use crate::errors::StakingError;
use crate::events::PauseToggled;
use crate::state::GlobalConfig;

#[derive(Accounts)]
pub struct SetPause<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [GLOBAL_CONFIG_SEED],
        bump = config.bump,
        constraint = config.authority == authority.key() @ StakingError::Unauthorized
    )]
    pub config: Box<Account<'info, GlobalConfig>>,
}

pub fn handler(ctx: Context<SetPause>, paused: bool) -> Result<()> {
    let config = &mut ctx.accounts.config;

    if paused {
        require!(!config.paused, StakingError::AlreadyPaused);
    } else {
        require!(config.paused, StakingError::NotPaused);
    }
    config.paused = paused;

    emit!(PauseToggled {
        paused,
        authority: ctx.accounts.authority.key(),
    });

    msg!(
        "Staking {} by {}",
        if paused { "PAUSED" } else { "UNPAUSED" },
        ctx.accounts.authority.key()
    );

    Ok(())
}
