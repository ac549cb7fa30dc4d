use anchor_lang::prelude::*;

use crate::constants::MAX_AFFILIATE_LEVELS;
use crate::engine::boost::{self, ReferralWalk};
use crate::errors::StakingError;
use crate::state::{GlobalParameters, UserAccount};

/// Walks the ancestors of `origin` starting at `first`, reading level `i`
/// from `accounts[i]`. Accounts must be supplied nearest ancestor first.
pub fn load_chain(
    origin: &Pubkey,
    first: Option<Pubkey>,
    accounts: &[AccountInfo],
) -> Result<ReferralWalk> {
    boost::walk_referral_chain(origin, first, MAX_AFFILIATE_LEVELS, |level, expected| {
        let info = accounts
            .get(level)
            .ok_or_else(|| error!(StakingError::IncompleteReferralChain))?;
        UserAccount::load_ancestor(info, expected)
    })
}

pub fn ensure_all_consumed(walk: &ReferralWalk, accounts: &[AccountInfo]) -> Result<()> {
    require!(
        walk.levels() == accounts.len(),
        StakingError::UnexpectedReferralAccounts
    );
    Ok(())
}

/// Recomputes and caches the affiliate boost of `user` from its current
/// referral chain.
pub fn refresh_affiliate_boost(
    user: &mut UserAccount,
    params: &GlobalParameters,
    accounts: &[AccountInfo],
    now: i64,
) -> Result<u8> {
    let walk = load_chain(&user.owner, user.referrer, accounts)?;
    ensure_all_consumed(&walk, accounts)?;

    let percent = boost::affiliate_boost_percent(
        &params.affiliate_level_percents,
        params.affiliate_cap_percent,
        &walk.powers,
    );
    user.apply_affiliate_boost(percent, now);
    Ok(percent)
}
