use anchor_lang::prelude::*;

use crate::constants::GLOBAL_CONFIG_SEED;
use crate::errors::StakingError;
use crate::events::ParametersUpdated;
use crate::state::{GlobalConfig, GlobalParameters};

#[derive(Accounts)]
pub struct SetGlobalParameters<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [GLOBAL_CONFIG_SEED],
        bump = config.bump,
        constraint = config.authority == authority.key() @ StakingError::Unauthorized
    )]
    pub config: Box<Account<'info, GlobalConfig>>,
}

pub fn handler(ctx: Context<SetGlobalParameters>, params: GlobalParameters) -> Result<()> {
    params.validate()?;

    let config = &mut ctx.accounts.config;
    config.params = params;
    config.params_version = config
        .params_version
        .checked_add(1)
        .ok_or(StakingError::ArithmeticOverflow)?;

    emit!(ParametersUpdated {
        authority: ctx.accounts.authority.key(),
        params_version: config.params_version,
    });

    msg!(
        "Global parameters updated to version {} by {}",
        config.params_version,
        ctx.accounts.authority.key()
    );

    Ok(())
}
