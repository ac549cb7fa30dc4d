use anchor_lang::prelude::*;

use crate::engine::{boost, yield_engine};
use crate::errors::StakingError;
use crate::state::{GlobalParameters, RewardAsset, StakeKind};

/// One stake event. Active until unstaked, immutable afterwards.
#[account]
#[derive(Debug)]
pub struct StakePosition {
    pub owner: Pubkey,

    /// Per-owner sequence number, part of the PDA seeds
    pub seq: u64,

    pub stake_kind: StakeKind,

    /// Net of the entry fee
    pub principal_amount: u64,

    pub start_time: i64,

    /// Earliest penalty-free exit for long-term positions, `start_time` otherwise
    pub lock_end_time: i64,

    /// Accrual checkpoint for both reward assets
    pub last_reward_claim_time: i64,

    pub is_active: bool,

    pub total_burned_for_boost: u64,

    /// `min(100, floor(total_burned_for_boost × 100 / principal_amount))`
    pub burn_boost_percent: u8,

    /// Owner's affiliate boost the position has accrued under since
    /// `last_reward_claim_time`. Adopted from the owner at each settlement.
    pub affiliate_boost_percent: u8,

    /// Settled but not yet paid out, before claim fees
    pub pending_primary_reward: u64,
    pub pending_secondary_reward: u64,

    pub total_primary_claimed: u64,
    pub total_secondary_claimed: u64,

    pub closed_at: Option<i64>,

    /// Bump seed for PDA
    pub bump: u8,
}

impl StakePosition {
    pub const LEN: usize = 8 + // discriminator
        32 + // owner
        8 + // seq
        1 + // stake_kind
        8 + // principal_amount
        8 + // start_time
        8 + // lock_end_time
        8 + // last_reward_claim_time
        1 + // is_active
        8 + // total_burned_for_boost
        1 + // burn_boost_percent
        1 + // affiliate_boost_percent
        8 + // pending_primary_reward
        8 + // pending_secondary_reward
        8 + // total_primary_claimed
        8 + // total_secondary_claimed
        (1 + 8) + // closed_at
        1; // bump

    #[allow(clippy::too_many_arguments)]
    pub fn open(
        owner: Pubkey,
        seq: u64,
        stake_kind: StakeKind,
        principal_amount: u64,
        affiliate_boost_percent: u8,
        params: &GlobalParameters,
        now: i64,
        bump: u8,
    ) -> Result<Self> {
        require!(principal_amount > 0, StakingError::ZeroAmount);

        let lock_end_time = match stake_kind {
            StakeKind::LongTerm => now
                .checked_add(params.long_term_lock_seconds)
                .ok_or(StakingError::ArithmeticOverflow)?,
            StakeKind::Flexible => now,
        };

        Ok(Self {
            owner,
            seq,
            stake_kind,
            principal_amount,
            start_time: now,
            lock_end_time,
            last_reward_claim_time: now,
            is_active: true,
            total_burned_for_boost: 0,
            burn_boost_percent: 0,
            affiliate_boost_percent,
            pending_primary_reward: 0,
            pending_secondary_reward: 0,
            total_primary_claimed: 0,
            total_secondary_claimed: 0,
            closed_at: None,
            bump,
        })
    }

    pub fn ensure_active(&self) -> Result<()> {
        require!(self.is_active, StakingError::PositionInactive);
        Ok(())
    }

    pub fn ensure_long_term(&self) -> Result<()> {
        require!(
            self.stake_kind == StakeKind::LongTerm,
            StakingError::NotLongTermPosition
        );
        Ok(())
    }

    pub fn is_unlocked(&self, now: i64) -> bool {
        now >= self.lock_end_time
    }

    pub fn total_power(&self) -> u8 {
        boost::total_power(self.burn_boost_percent, self.affiliate_boost_percent)
    }

    /// Rate the position currently accrues at.
    pub fn effective_apy_bps(&self, params: &GlobalParameters) -> Result<u32> {
        yield_engine::effective_apy_bps(params.kind(self.stake_kind), self.total_power())
    }

    /// Reward for `asset` accrued since the last checkpoint, not yet settled.
    pub fn accrued_reward(
        &self,
        asset: RewardAsset,
        apy_bps: u32,
        params: &GlobalParameters,
        now: i64,
    ) -> Result<u64> {
        yield_engine::accrued_reward(
            self.principal_amount,
            apy_bps,
            params.reward_weight_bps(asset),
            self.last_reward_claim_time,
            now,
        )
    }

    /// Moves accrual for both assets into the pending ledger at the rate in
    /// effect since the last checkpoint, advances the checkpoint, then adopts
    /// `affiliate_boost_percent` for the period that starts at `now`.
    /// Returns the newly accrued `(primary, secondary)` amounts.
    pub fn settle(
        &mut self,
        params: &GlobalParameters,
        now: i64,
        affiliate_boost_percent: u8,
    ) -> Result<(u64, u64)> {
        self.ensure_active()?;

        let apy_bps = self.effective_apy_bps(params)?;
        let primary = self.accrued_reward(RewardAsset::Primary, apy_bps, params, now)?;
        let secondary = self.accrued_reward(RewardAsset::Secondary, apy_bps, params, now)?;

        self.pending_primary_reward = self
            .pending_primary_reward
            .checked_add(primary)
            .ok_or(StakingError::ArithmeticOverflow)?;
        self.pending_secondary_reward = self
            .pending_secondary_reward
            .checked_add(secondary)
            .ok_or(StakingError::ArithmeticOverflow)?;
        self.last_reward_claim_time = self.last_reward_claim_time.max(now);
        self.affiliate_boost_percent = affiliate_boost_percent;

        Ok((primary, secondary))
    }

    pub fn pending(&self, asset: RewardAsset) -> u64 {
        match asset {
            RewardAsset::Primary => self.pending_primary_reward,
            RewardAsset::Secondary => self.pending_secondary_reward,
        }
    }

    /// Clears the pending bucket and records the gross amount as claimed.
    pub fn take_pending(&mut self, asset: RewardAsset) -> Result<u64> {
        let (pending, claimed) = match asset {
            RewardAsset::Primary => (
                &mut self.pending_primary_reward,
                &mut self.total_primary_claimed,
            ),
            RewardAsset::Secondary => (
                &mut self.pending_secondary_reward,
                &mut self.total_secondary_claimed,
            ),
        };
        let amount = *pending;
        *claimed = claimed
            .checked_add(amount)
            .ok_or(StakingError::ArithmeticOverflow)?;
        *pending = 0;
        Ok(amount)
    }

    /// Adds to the burned total and recomputes the burn boost.
    pub fn record_burn(&mut self, amount: u64) -> Result<u8> {
        self.ensure_active()?;
        self.ensure_long_term()?;
        require!(amount > 0, StakingError::ZeroAmount);

        self.total_burned_for_boost = self
            .total_burned_for_boost
            .checked_add(amount)
            .ok_or(StakingError::ArithmeticOverflow)?;

        let recomputed =
            boost::burn_boost_percent(self.total_burned_for_boost, self.principal_amount)?;
        self.burn_boost_percent = self.burn_boost_percent.max(recomputed);
        Ok(self.burn_boost_percent)
    }

    /// Active -> Inactive, exactly once.
    pub fn deactivate(&mut self, now: i64) -> Result<()> {
        self.ensure_active()?;
        self.is_active = false;
        self.closed_at = Some(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{SECONDS_PER_YEAR, TOKEN_UNIT};

    fn position(kind: StakeKind, principal: u64) -> StakePosition {
        StakePosition::open(
            Pubkey::new_unique(),
            0,
            kind,
            principal,
            0,
            &GlobalParameters::default(),
            1_000,
            254,
        )
        .unwrap()
    }

    #[test]
    fn long_term_lock_end() {
        let params = GlobalParameters::default();
        let long = position(StakeKind::LongTerm, 10);
        assert_eq!(long.lock_end_time, 1_000 + params.long_term_lock_seconds);
        assert!(!long.is_unlocked(1_000));
        assert!(long.is_unlocked(long.lock_end_time));

        let flex = position(StakeKind::Flexible, 10);
        assert!(flex.is_unlocked(1_000));
    }

    #[test]
    fn zero_principal_rejected() {
        let err = StakePosition::open(
            Pubkey::new_unique(),
            0,
            StakeKind::Flexible,
            0,
            0,
            &GlobalParameters::default(),
            0,
            0,
        )
        .unwrap_err();
        assert_eq!(err, StakingError::ZeroAmount.into());
    }

    #[test]
    fn burn_boost_is_monotonic_and_capped() {
        let mut pos = position(StakeKind::LongTerm, 10_000);
        let mut previous = 0;
        for burn in [1, 99, 2_500, 2_400, 1, 10_000, 50_000] {
            let boost = pos.record_burn(burn).unwrap();
            assert!(boost >= previous);
            assert!(boost <= 100);
            previous = boost;
        }
        assert_eq!(pos.burn_boost_percent, 100);
    }

    #[test]
    fn burn_overflow_is_rejected_without_mutation() {
        let mut pos = position(StakeKind::LongTerm, 10_000);
        pos.record_burn(u64::MAX - 5).unwrap();
        let err = pos.record_burn(10).unwrap_err();
        assert_eq!(err, StakingError::ArithmeticOverflow.into());
        assert_eq!(pos.total_burned_for_boost, u64::MAX - 5);
    }

    #[test]
    fn flexible_positions_cannot_burn() {
        let mut pos = position(StakeKind::Flexible, 10_000);
        let err = pos.record_burn(100).unwrap_err();
        assert_eq!(err, StakingError::NotLongTermPosition.into());
    }

    #[test]
    fn settle_accrues_both_assets_and_advances_checkpoint() {
        let params = GlobalParameters::default();
        let mut pos = position(StakeKind::LongTerm, 10_000 * TOKEN_UNIT);
        let now = 1_000 + SECONDS_PER_YEAR as i64;

        let (primary, secondary) = pos.settle(&params, now, 0).unwrap();
        assert_eq!(primary, 1_000 * TOKEN_UNIT);
        assert_eq!(secondary, 100 * TOKEN_UNIT);
        assert_eq!(pos.last_reward_claim_time, now);

        // settling again at the same instant accrues nothing
        assert_eq!(pos.settle(&params, now, 0).unwrap(), (0, 0));
        assert_eq!(pos.pending(RewardAsset::Primary), 1_000 * TOKEN_UNIT);
    }

    #[test]
    fn affiliate_boost_applies_from_the_next_period_only() {
        let params = GlobalParameters::default();
        let mut pos = position(StakeKind::LongTerm, 10_000 * TOKEN_UNIT);
        let year = SECONDS_PER_YEAR as i64;

        // a full year at zero boost, then the owner's boost jumps to 50
        let (first_year, _) = pos.settle(&params, 1_000 + year, 50).unwrap();
        assert_eq!(first_year, 1_000 * TOKEN_UNIT);
        assert_eq!(pos.affiliate_boost_percent, 50);

        // 10% + 50% of 270% = 145%
        let (second_year, _) = pos.settle(&params, 1_000 + 2 * year, 50).unwrap();
        assert_eq!(second_year, 14_500 * TOKEN_UNIT);
    }

    #[test]
    fn affiliate_boost_drop_is_not_retroactive_either() {
        let params = GlobalParameters::default();
        let mut pos = position(StakeKind::Flexible, 10_000 * TOKEN_UNIT);
        pos.affiliate_boost_percent = 50;
        let year = SECONDS_PER_YEAR as i64;

        // 5% + 50% of 65% = 37.5%
        let (primary, _) = pos.settle(&params, 1_000 + year, 0).unwrap();
        assert_eq!(primary, 3_750 * TOKEN_UNIT);
        assert_eq!(pos.effective_apy_bps(&params).unwrap(), 500);
    }

    #[test]
    fn take_pending_moves_to_claimed() {
        let mut pos = position(StakeKind::Flexible, 1);
        pos.pending_secondary_reward = 42;
        assert_eq!(pos.take_pending(RewardAsset::Secondary).unwrap(), 42);
        assert_eq!(pos.pending_secondary_reward, 0);
        assert_eq!(pos.total_secondary_claimed, 42);
        assert_eq!(pos.take_pending(RewardAsset::Secondary).unwrap(), 0);
    }

    #[test]
    fn deactivate_happens_once() {
        let mut pos = position(StakeKind::Flexible, 1);
        pos.deactivate(2_000).unwrap();
        assert_eq!(pos.closed_at, Some(2_000));
        assert_eq!(pos.deactivate(3_000).unwrap_err(), StakingError::PositionInactive.into());
        assert_eq!(pos.closed_at, Some(2_000));
    }

    #[test]
    fn len_matches_serialized_size() {
        let mut pos = position(StakeKind::LongTerm, 1);
        pos.closed_at = Some(1);
        assert_eq!(pos.try_to_vec().unwrap().len() + 8, StakePosition::LEN);
    }
}
