use anchor_lang::prelude::*;

use crate::engine::settlement::plan_emergency_unstake;
use crate::errors::StakingError;
use crate::events::EmergencyUnstaked;
use crate::instructions::unstake::ExitPosition;

/// Early exit of a locked long-term position against the capital, interest
/// and fixed secondary penalties.
pub fn handler(ctx: Context<ExitPosition>, seq: u64) -> Result<()> {
    let params = ctx.accounts.config.params;
    let clock = Clock::get()?;
    let current_time = clock.unix_timestamp;

    ctx.accounts.settle_position(&params, current_time)?;
    let plan = plan_emergency_unstake(&ctx.accounts.position, &params, current_time)?;
    ctx.accounts.execute_exit(&plan, current_time)?;

    let capital_penalty = plan.principal.fee.total()?;
    let interest_penalty = plan.primary.fee.total()?;
    let secondary_penalty = plan
        .secondary
        .fee
        .total()?
        .checked_add(plan.secondary_shortfall.total()?)
        .ok_or(StakingError::ArithmeticOverflow)?;

    emit!(EmergencyUnstaked {
        user: ctx.accounts.user.key(),
        seq,
        principal_returned: plan.principal.net,
        capital_penalty,
        interest_penalty,
        secondary_penalty,
        primary_reward: plan.primary.net,
        secondary_reward: plan.secondary.net,
    });

    msg!(
        "User {} emergency unstaked position {}: returned {} primary, penalties {}/{}/{}",
        ctx.accounts.user.key(),
        seq,
        plan.primary_out()?,
        capital_penalty,
        interest_penalty,
        secondary_penalty
    );

    Ok(())
}
