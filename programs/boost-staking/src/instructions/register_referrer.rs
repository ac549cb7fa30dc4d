use anchor_lang::prelude::*;

use crate::constants::*;
use crate::engine::boost;
use crate::errors::StakingError;
use crate::events::{ReferralLogged, ReferrerRegistered};
use crate::instructions::referral_chain::{ensure_all_consumed, load_chain};
use crate::state::{GlobalConfig, UserAccount};

#[derive(Accounts)]
pub struct RegisterReferrer<'info> {
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(
        seeds = [GLOBAL_CONFIG_SEED],
        bump = config.bump,
        constraint = !config.paused @ StakingError::StakingPaused
    )]
    pub config: Box<Account<'info, GlobalConfig>>,

    #[account(
        init_if_needed,
        payer = user,
        space = UserAccount::LEN,
        seeds = [USER_ACCOUNT_SEED, user.key().as_ref()],
        bump
    )]
    pub user_account: Box<Account<'info, UserAccount>>,

    /// CHECK: the referrer's user account, verified by `UserAccount::load_ancestor`
    pub referrer_account: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Links the caller to `referrer`. Remaining accounts carry the referrer's
/// own ancestors (levels 2 and up), nearest first.
pub fn handler<'info>(
    ctx: Context<'_, '_, '_, 'info, RegisterReferrer<'info>>,
    referrer: Pubkey,
) -> Result<()> {
    let params = ctx.accounts.config.params;
    let clock = Clock::get()?;
    let current_time = clock.unix_timestamp;
    let user_key = ctx.accounts.user.key();

    let user_account = &mut ctx.accounts.user_account;
    user_account.ensure_initialized(user_key, ctx.bumps.user_account, current_time);
    user_account.set_referrer(referrer)?;

    let referrer_info = ctx.accounts.referrer_account.to_account_info();
    UserAccount::load_ancestor(&referrer_info, &referrer)
        .map_err(|_| error!(StakingError::UnregisteredReferrer))?;

    let mut chain = Vec::with_capacity(ctx.remaining_accounts.len() + 1);
    chain.push(referrer_info);
    chain.extend_from_slice(ctx.remaining_accounts);

    let walk = load_chain(&user_key, Some(referrer), &chain)?;
    require!(!walk.reached_origin, StakingError::CircularReferral);
    ensure_all_consumed(&walk, &chain)?;

    let affiliate_boost_percent = boost::affiliate_boost_percent(
        &params.affiliate_level_percents,
        params.affiliate_cap_percent,
        &walk.powers,
    );
    let user_account = &mut ctx.accounts.user_account;
    user_account.apply_affiliate_boost(affiliate_boost_percent, current_time);

    emit!(ReferrerRegistered {
        user: user_key,
        referrer,
        affiliate_boost_percent,
    });
    emit!(ReferralLogged { user: referrer });

    msg!(
        "User {} registered referrer {} ({} levels, affiliate boost {}%)",
        user_key,
        referrer,
        walk.levels(),
        affiliate_boost_percent
    );

    Ok(())
}
