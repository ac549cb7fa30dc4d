//! Amount planning for each value-moving operation.
//!
//! Handlers compute a plan first, check it against vault balances, execute
//! the transfers it describes, and only then commit position and account
//! state. Any failure along the way aborts the whole instruction.

use anchor_lang::prelude::*;

use crate::engine::fee_router::{fee_amount, split, SplitAmounts};
use crate::errors::StakingError;
use crate::state::{FeeSchedule, GlobalParameters, StakeKind, StakePosition};

/// Gross amount, the deduction taken from it, and what reaches the owner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Payout {
    pub gross: u64,
    pub fee: SplitAmounts,
    pub net: u64,
}

impl Payout {
    fn with_deduction(gross: u64, fee: SplitAmounts) -> Result<Self> {
        let net = gross
            .checked_sub(fee.total()?)
            .ok_or(StakingError::ArithmeticOverflow)?;
        Ok(Self { gross, fee, net })
    }
}

/// A claim of `gross` reward under `schedule`. Zero gross is a valid,
/// empty payout.
pub fn plan_claim(gross: u64, schedule: &FeeSchedule) -> Result<Payout> {
    let fee = split(fee_amount(gross, schedule.rate_bps)?, &schedule.split)?;
    Payout::with_deduction(gross, fee)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntryPlan {
    pub gross: u64,
    pub fee: SplitAmounts,
    pub principal: u64,
}

pub fn plan_entry(amount: u64, kind: StakeKind, params: &GlobalParameters) -> Result<EntryPlan> {
    require!(amount > 0, StakingError::ZeroAmount);
    require!(
        amount >= params.kind(kind).min_stake_amount,
        StakingError::BelowMinimumStake
    );

    let fee = split(
        fee_amount(amount, params.entry_fee_bps(amount))?,
        &params.entry_fee_split,
    )?;
    let principal = amount
        .checked_sub(fee.total()?)
        .ok_or(StakingError::ArithmeticOverflow)?;
    require!(principal > 0, StakingError::ZeroAmount);

    Ok(EntryPlan {
        gross: amount,
        fee,
        principal,
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BurnPlan {
    pub burned: u64,
    /// Percentage fee on the burned amount, primary asset
    pub primary_fee: SplitAmounts,
    /// Fixed fee, secondary asset
    pub secondary_fee: SplitAmounts,
}

pub fn plan_burn(amount: u64, params: &GlobalParameters) -> Result<BurnPlan> {
    require!(amount > 0, StakingError::ZeroAmount);

    Ok(BurnPlan {
        burned: amount,
        primary_fee: split(
            fee_amount(amount, params.burn_fee.rate_bps)?,
            &params.burn_fee.split,
        )?,
        secondary_fee: split(params.burn_fee_secondary_fixed, &params.burn_fee.split)?,
    })
}

/// Everything that moves when a position is closed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExitPlan {
    /// Principal leaving the stake vault, deduction included
    pub principal: Payout,
    /// Pending primary reward leaving the primary reward vault
    pub primary: Payout,
    /// Pending secondary reward leaving the secondary reward vault
    pub secondary: Payout,
    /// Part of a fixed secondary penalty the pending reward could not cover,
    /// charged to the owner's secondary token account
    pub secondary_shortfall: SplitAmounts,
}

impl ExitPlan {
    /// Primary asset returned to the owner.
    pub fn primary_out(&self) -> Result<u64> {
        self.principal
            .net
            .checked_add(self.primary.net)
            .ok_or_else(|| error!(StakingError::ArithmeticOverflow))
    }
}

/// Normal exit. Long-term positions must be past their lock, flexible ones
/// pay the cancellation fee on principal. Rewards pay the regular claim fees.
/// Expects the position to be settled at `now`.
pub fn plan_unstake(
    position: &StakePosition,
    params: &GlobalParameters,
    now: i64,
) -> Result<ExitPlan> {
    position.ensure_active()?;

    let principal = match position.stake_kind {
        StakeKind::LongTerm => {
            require!(position.is_unlocked(now), StakingError::LockPeriodActive);
            Payout::with_deduction(position.principal_amount, SplitAmounts::default())?
        }
        StakeKind::Flexible => plan_claim(position.principal_amount, &params.flexible_exit_fee)?,
    };

    Ok(ExitPlan {
        principal,
        primary: plan_claim(position.pending_primary_reward, &params.primary_claim_fee)?,
        secondary: plan_claim(position.pending_secondary_reward, &params.secondary_claim_fee)?,
        secondary_shortfall: SplitAmounts::default(),
    })
}

/// Early exit of a locked long-term position. The capital penalty, the
/// interest penalty and the fixed secondary penalty are independent of each
/// other and replace the claim fees. Expects the position to be settled at
/// `now`.
pub fn plan_emergency_unstake(
    position: &StakePosition,
    params: &GlobalParameters,
    now: i64,
) -> Result<ExitPlan> {
    position.ensure_active()?;
    position.ensure_long_term()?;
    require!(!position.is_unlocked(now), StakingError::LockPeriodElapsed);

    let penalty = &params.early_exit;

    let capital_penalty = fee_amount(position.principal_amount, penalty.capital_penalty_bps)?;
    let principal = Payout::with_deduction(
        position.principal_amount,
        split(capital_penalty, &params.penalty_split)?,
    )?;

    let interest = position.pending_primary_reward;
    let interest_penalty = fee_amount(interest, penalty.interest_penalty_bps)?;
    let primary = Payout::with_deduction(interest, split(interest_penalty, &params.penalty_split)?)?;

    let secondary_pending = position.pending_secondary_reward;
    let covered = secondary_pending.min(penalty.secondary_fixed);
    let secondary = Payout::with_deduction(secondary_pending, split(covered, &params.penalty_split)?)?;
    let secondary_shortfall = split(penalty.secondary_fixed - covered, &params.penalty_split)?;

    Ok(ExitPlan {
        principal,
        primary,
        secondary,
        secondary_shortfall,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TOKEN_UNIT;

    fn params() -> GlobalParameters {
        GlobalParameters::default()
    }

    fn position(kind: StakeKind, principal: u64) -> StakePosition {
        StakePosition::open(Pubkey::new_unique(), 0, kind, principal, 0, &params(), 0, 255).unwrap()
    }

    #[test]
    fn claim_of_zero_is_empty() {
        let payout = plan_claim(0, &params().primary_claim_fee).unwrap();
        assert_eq!(payout, Payout::default());
    }

    #[test]
    fn claim_fee_uses_asset_split() {
        let p = params();
        let primary = plan_claim(1_000, &p.primary_claim_fee).unwrap();
        assert_eq!(primary.net, 900);
        assert_eq!(primary.fee.burn, 10);
        assert_eq!(primary.fee.treasury, 40);

        let secondary = plan_claim(1_000, &p.secondary_claim_fee).unwrap();
        assert_eq!(secondary.net, 900);
        assert_eq!(secondary.fee.burn, 0);
        assert_eq!(secondary.fee.staking_pool, 20);
    }

    #[test]
    fn entry_fee_by_tier() {
        let p = params();
        let small = plan_entry(1_000 * TOKEN_UNIT, StakeKind::LongTerm, &p).unwrap();
        assert_eq!(small.fee.total().unwrap(), 50 * TOKEN_UNIT);
        assert_eq!(small.principal, 950 * TOKEN_UNIT);

        let large = plan_entry(200_000 * TOKEN_UNIT, StakeKind::LongTerm, &p).unwrap();
        assert_eq!(large.fee.total().unwrap(), 4_000 * TOKEN_UNIT);
    }

    #[test]
    fn minimum_is_per_kind() {
        let p = params();
        let amount = 500 * TOKEN_UNIT;
        assert!(plan_entry(amount, StakeKind::Flexible, &p).is_ok());
        assert_eq!(
            plan_entry(amount, StakeKind::LongTerm, &p).unwrap_err(),
            StakingError::BelowMinimumStake.into()
        );
        assert_eq!(
            plan_entry(0, StakeKind::Flexible, &p).unwrap_err(),
            StakingError::ZeroAmount.into()
        );
    }

    #[test]
    fn burn_fees_in_both_assets() {
        let plan = plan_burn(1_000 * TOKEN_UNIT, &params()).unwrap();
        assert_eq!(plan.primary_fee.total().unwrap(), 20 * TOKEN_UNIT);
        assert_eq!(plan.secondary_fee.total().unwrap(), TOKEN_UNIT);
    }

    #[test]
    fn long_term_unstake_requires_elapsed_lock() {
        let p = params();
        let pos = position(StakeKind::LongTerm, 10_000);
        assert_eq!(
            plan_unstake(&pos, &p, pos.lock_end_time - 1).unwrap_err(),
            StakingError::LockPeriodActive.into()
        );
        let plan = plan_unstake(&pos, &p, pos.lock_end_time).unwrap();
        assert_eq!(plan.principal.net, 10_000);
        assert!(plan.principal.fee.is_empty());
    }

    #[test]
    fn flexible_unstake_pays_cancellation_fee() {
        let mut pos = position(StakeKind::Flexible, 10_000);
        pos.pending_primary_reward = 100;
        let plan = plan_unstake(&pos, &params(), 0).unwrap();
        assert_eq!(plan.principal.fee.total().unwrap(), 300);
        assert_eq!(plan.principal.net, 9_700);
        assert_eq!(plan.primary.net, 90);
        assert_eq!(plan.primary_out().unwrap(), 9_790);
    }

    #[test]
    fn emergency_penalties_are_independent() {
        let mut pos = position(StakeKind::LongTerm, 10_000);
        pos.pending_primary_reward = 1_000;
        pos.pending_secondary_reward = 8 * TOKEN_UNIT;

        let plan = plan_emergency_unstake(&pos, &params(), 1).unwrap();
        assert_eq!(plan.principal.fee.total().unwrap(), 5_000);
        assert_eq!(plan.primary.fee.total().unwrap(), 800);
        assert_eq!(plan.primary_out().unwrap(), 5_200);
        assert_eq!(plan.secondary.net, 3 * TOKEN_UNIT);
        assert!(plan.secondary_shortfall.is_empty());
    }

    #[test]
    fn emergency_secondary_shortfall_charged_to_wallet() {
        let mut pos = position(StakeKind::LongTerm, 10_000);
        pos.pending_secondary_reward = 2 * TOKEN_UNIT;

        let plan = plan_emergency_unstake(&pos, &params(), 1).unwrap();
        assert_eq!(plan.secondary.net, 0);
        assert_eq!(plan.secondary.fee.total().unwrap(), 2 * TOKEN_UNIT);
        assert_eq!(plan.secondary_shortfall.total().unwrap(), 3 * TOKEN_UNIT);
    }

    #[test]
    fn emergency_only_while_locked() {
        let p = params();
        let pos = position(StakeKind::LongTerm, 10_000);
        assert_eq!(
            plan_emergency_unstake(&pos, &p, pos.lock_end_time).unwrap_err(),
            StakingError::LockPeriodElapsed.into()
        );

        let flex = position(StakeKind::Flexible, 10_000);
        assert_eq!(
            plan_emergency_unstake(&flex, &p, 0).unwrap_err(),
            StakingError::NotLongTermPosition.into()
        );
    }

    #[test]
    fn inactive_positions_cannot_exit() {
        let p = params();
        let mut pos = position(StakeKind::Flexible, 10_000);
        pos.deactivate(5).unwrap();
        assert_eq!(
            plan_unstake(&pos, &p, 10).unwrap_err(),
            StakingError::PositionInactive.into()
        );
    }
}
