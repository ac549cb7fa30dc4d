//! Referral graph traversal and the two boost sources.
//!
//! The affiliate walk is an iterative loop over parent pointers, bounded by
//! [`MAX_AFFILIATE_LEVELS`]. It reads each ancestor's cached staking power
//! rather than recomputing it, so its cost never depends on graph depth.

use anchor_lang::prelude::*;

use crate::constants::{MAX_AFFILIATE_LEVELS, MAX_POWER_PERCENT};
use crate::errors::StakingError;

/// What the walk needs to know about one ancestor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AncestorView {
    pub wallet: Pubkey,
    pub referrer: Option<Pubkey>,
    /// 0..=100
    pub staking_power: u8,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferralWalk {
    /// Staking power per level, nearest ancestor first
    pub powers: Vec<u8>,
    /// The chain led back to the user the walk started from
    pub reached_origin: bool,
}

impl ReferralWalk {
    pub fn levels(&self) -> usize {
        self.powers.len()
    }
}

/// Walks up from `first` for at most `max_levels` ancestors.
///
/// `load` is called with the level index (0 = `first`) and the wallet the
/// ancestor account must belong to. The walk ends on a missing referrer, at
/// `max_levels`, or right before an ancestor equal to `origin`.
pub fn walk_referral_chain<F>(
    origin: &Pubkey,
    first: Option<Pubkey>,
    max_levels: usize,
    mut load: F,
) -> Result<ReferralWalk>
where
    F: FnMut(usize, &Pubkey) -> Result<AncestorView>,
{
    let mut walk = ReferralWalk::default();
    let mut next = first;

    while walk.powers.len() < max_levels.min(MAX_AFFILIATE_LEVELS) {
        let Some(expected) = next else {
            break;
        };
        if expected == *origin {
            walk.reached_origin = true;
            break;
        }

        let ancestor = load(walk.powers.len(), &expected)?;
        require_keys_eq!(ancestor.wallet, expected, StakingError::InvalidReferralAccount);

        walk.powers.push(ancestor.staking_power.min(MAX_POWER_PERCENT));
        next = ancestor.referrer;
    }

    Ok(walk)
}

/// `min(cap, floor(Σ percent[i] × power[i] / 100))` over the supplied levels.
/// Levels beyond the table are ignored.
pub fn affiliate_boost_percent(
    level_percents: &[u8; MAX_AFFILIATE_LEVELS],
    cap_percent: u8,
    powers: &[u8],
) -> u8 {
    let weighted: u32 = level_percents
        .iter()
        .zip(powers)
        .map(|(percent, power)| *percent as u32 * (*power).min(MAX_POWER_PERCENT) as u32)
        .sum();

    (weighted / MAX_POWER_PERCENT as u32).min(cap_percent as u32) as u8
}

/// `min(100, floor(total_burned × 100 / principal))`.
pub fn burn_boost_percent(total_burned: u64, principal: u64) -> Result<u8> {
    require!(principal > 0, StakingError::ZeroAmount);

    let percent = (total_burned as u128)
        .checked_mul(MAX_POWER_PERCENT as u128)
        .ok_or(StakingError::ArithmeticOverflow)?
        / principal as u128;

    Ok(percent.min(MAX_POWER_PERCENT as u128) as u8)
}

/// Burn and affiliate boosts are summed first, then capped once.
pub fn total_power(burn_boost_percent: u8, affiliate_boost_percent: u8) -> u8 {
    (burn_boost_percent as u16 + affiliate_boost_percent as u16).min(MAX_POWER_PERCENT as u16) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_AFFILIATE_CAP_PERCENT, DEFAULT_AFFILIATE_LEVEL_PERCENTS};
    use std::collections::HashMap;

    const TABLE: [u8; 6] = DEFAULT_AFFILIATE_LEVEL_PERCENTS;
    const CAP: u8 = DEFAULT_AFFILIATE_CAP_PERCENT;

    /// Builds a linear chain `wallets[0] -> wallets[1] -> ...` where every
    /// member has the given power.
    fn chain(powers: &[u8]) -> (Vec<Pubkey>, HashMap<Pubkey, AncestorView>) {
        let wallets: Vec<Pubkey> = (0..=powers.len()).map(|_| Pubkey::new_unique()).collect();
        let mut graph = HashMap::new();
        for (i, wallet) in wallets.iter().enumerate() {
            graph.insert(
                *wallet,
                AncestorView {
                    wallet: *wallet,
                    referrer: wallets.get(i + 1).copied(),
                    staking_power: if i == 0 { 0 } else { powers[i - 1] },
                },
            );
        }
        (wallets, graph)
    }

    fn walk(origin: &Pubkey, graph: &HashMap<Pubkey, AncestorView>) -> ReferralWalk {
        let first = graph[origin].referrer;
        walk_referral_chain(origin, first, MAX_AFFILIATE_LEVELS, |_, key| {
            graph
                .get(key)
                .copied()
                .ok_or_else(|| error!(StakingError::IncompleteReferralChain))
        })
        .unwrap()
    }

    #[test]
    fn empty_chain_gives_zero() {
        assert_eq!(affiliate_boost_percent(&TABLE, CAP, &[]), 0);
        let (wallets, graph) = chain(&[]);
        let result = walk(&wallets[0], &graph);
        assert_eq!(result.levels(), 0);
        assert!(!result.reached_origin);
    }

    #[test]
    fn full_chain_at_full_power_reaches_cap() {
        assert_eq!(affiliate_boost_percent(&TABLE, CAP, &[100; 6]), 50);
    }

    #[test]
    fn level_weights_scale_with_ancestor_power() {
        // 20*50 + 15*100 + 8*25 = 1000 + 1500 + 200 = 2700 -> 27
        assert_eq!(affiliate_boost_percent(&TABLE, CAP, &[50, 100, 25]), 27);
        // single fully powered referrer contributes at most its level weight
        assert_eq!(affiliate_boost_percent(&TABLE, CAP, &[100]), 20);
        // all ancestors powerless
        assert_eq!(affiliate_boost_percent(&TABLE, CAP, &[0; 6]), 0);
    }

    #[test]
    fn cap_applies_to_the_sum() {
        let table = [30, 30, 0, 0, 0, 0];
        assert_eq!(affiliate_boost_percent(&table, 50, &[100, 100]), 50);
    }

    #[test]
    fn walk_stops_after_six_levels() {
        let (wallets, graph) = chain(&[100; 9]);
        let result = walk(&wallets[0], &graph);
        assert_eq!(result.powers, vec![100; 6]);
        assert_eq!(affiliate_boost_percent(&TABLE, CAP, &result.powers), 50);
    }

    #[test]
    fn walk_collects_powers_in_level_order() {
        let (wallets, graph) = chain(&[10, 20, 30]);
        let result = walk(&wallets[0], &graph);
        assert_eq!(result.powers, vec![10, 20, 30]);
    }

    #[test]
    fn walk_stops_before_returning_to_origin() {
        let (wallets, mut graph) = chain(&[100, 100]);
        // close the loop: the top ancestor points back at the origin
        graph.get_mut(&wallets[2]).unwrap().referrer = Some(wallets[0]);
        let result = walk(&wallets[0], &graph);
        assert_eq!(result.levels(), 2);
        assert!(result.reached_origin);
    }

    #[test]
    fn walk_rejects_mismatched_ancestor() {
        let origin = Pubkey::new_unique();
        let expected = Pubkey::new_unique();
        let imposter = AncestorView {
            wallet: Pubkey::new_unique(),
            referrer: None,
            staking_power: 100,
        };
        let err = walk_referral_chain(&origin, Some(expected), 6, |_, _| Ok(imposter)).unwrap_err();
        assert_eq!(err, StakingError::InvalidReferralAccount.into());
    }

    #[test]
    fn walk_propagates_loader_errors() {
        let origin = Pubkey::new_unique();
        let err = walk_referral_chain(&origin, Some(Pubkey::new_unique()), 6, |_, _| {
            err!(StakingError::IncompleteReferralChain)
        })
        .unwrap_err();
        assert_eq!(err, StakingError::IncompleteReferralChain.into());
    }

    #[test]
    fn burn_boost_floors_and_caps() {
        assert_eq!(burn_boost_percent(0, 10_000).unwrap(), 0);
        assert_eq!(burn_boost_percent(99, 10_000).unwrap(), 0);
        assert_eq!(burn_boost_percent(5_000, 10_000).unwrap(), 50);
        assert_eq!(burn_boost_percent(5_099, 10_000).unwrap(), 50);
        assert_eq!(burn_boost_percent(30_000, 10_000).unwrap(), 100);
        assert_eq!(burn_boost_percent(u64::MAX, 1).unwrap(), 100);
    }

    #[test]
    fn total_power_is_capped_once() {
        assert_eq!(total_power(50, 25), 75);
        assert_eq!(total_power(80, 50), 100);
        assert_eq!(total_power(100, 50), 100);
        assert_eq!(total_power(0, 0), 0);
    }
}
