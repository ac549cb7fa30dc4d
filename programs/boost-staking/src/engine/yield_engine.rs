//! APY interpolation and reward accrual.
//!
//! All math is integer fixed-point over `u128` with checked operations and
//! floor rounding. Any overflow fails the call instead of saturating.

use anchor_lang::prelude::*;

use crate::constants::{BPS_DENOMINATOR, MAX_POWER_PERCENT, SECONDS_PER_YEAR};
use crate::errors::StakingError;
use crate::state::KindParameters;

/// `base + total_power / 100 × (max − base)`, in basis points.
pub fn effective_apy_bps(kind: &KindParameters, total_power: u8) -> Result<u32> {
    let power = total_power.min(MAX_POWER_PERCENT) as u64;
    let spread = (kind.max_apy_bps as u64)
        .checked_sub(kind.base_apy_bps as u64)
        .ok_or(StakingError::InvalidParameters)?;

    let boost = spread
        .checked_mul(power)
        .ok_or(StakingError::ArithmeticOverflow)?
        / MAX_POWER_PERCENT as u64;

    let apy = (kind.base_apy_bps as u64)
        .checked_add(boost)
        .ok_or(StakingError::ArithmeticOverflow)?;
    u32::try_from(apy).map_err(|_| error!(StakingError::ArithmeticOverflow))
}

/// Reward accrued between `since` and `now` for one asset:
/// `floor(principal × apy × elapsed × weight / (year × 10⁴ × 10⁴))`.
///
/// A non-positive interval accrues nothing.
pub fn accrued_reward(
    principal: u64,
    apy_bps: u32,
    weight_bps: u16,
    since: i64,
    now: i64,
) -> Result<u64> {
    let elapsed = now.saturating_sub(since);
    if elapsed <= 0 || principal == 0 || apy_bps == 0 || weight_bps == 0 {
        return Ok(0);
    }

    let numerator = (principal as u128)
        .checked_mul(apy_bps as u128)
        .and_then(|v| v.checked_mul(elapsed as u128))
        .and_then(|v| v.checked_mul(weight_bps as u128))
        .ok_or(StakingError::ArithmeticOverflow)?;

    let denominator = (SECONDS_PER_YEAR as u128)
        * BPS_DENOMINATOR as u128
        * BPS_DENOMINATOR as u128;

    u64::try_from(numerator / denominator).map_err(|_| error!(StakingError::ArithmeticOverflow))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{SECONDS_PER_DAY, TOKEN_UNIT};
    use crate::state::GlobalParameters;

    fn long_term() -> KindParameters {
        GlobalParameters::default().long_term
    }

    fn flexible() -> KindParameters {
        GlobalParameters::default().flexible
    }

    #[test]
    fn published_ranges() {
        assert_eq!(effective_apy_bps(&long_term(), 0).unwrap(), 1_000);
        assert_eq!(effective_apy_bps(&long_term(), 100).unwrap(), 28_000);
        assert_eq!(effective_apy_bps(&flexible(), 0).unwrap(), 500);
        assert_eq!(effective_apy_bps(&flexible(), 100).unwrap(), 7_000);
    }

    #[test]
    fn seventy_five_power_long_term() {
        // 10% + 0.75 × 270% = 212.5%
        assert_eq!(effective_apy_bps(&long_term(), 75).unwrap(), 21_250);
    }

    #[test]
    fn apy_is_monotonic_and_bounded() {
        let kind = long_term();
        let mut previous = 0;
        for power in 0..=120u8 {
            let apy = effective_apy_bps(&kind, power).unwrap();
            assert!(apy >= previous);
            assert!(apy >= kind.base_apy_bps && apy <= kind.max_apy_bps);
            previous = apy;
        }
    }

    #[test]
    fn one_year_at_base_rate() {
        let principal = 10_000 * TOKEN_UNIT;
        let reward = accrued_reward(principal, 1_000, 10_000, 0, SECONDS_PER_YEAR as i64).unwrap();
        assert_eq!(reward, 1_000 * TOKEN_UNIT);
    }

    #[test]
    fn weight_scales_reward() {
        let principal = 10_000 * TOKEN_UNIT;
        let full = accrued_reward(principal, 21_250, 10_000, 0, SECONDS_PER_YEAR as i64).unwrap();
        let tenth = accrued_reward(principal, 21_250, 1_000, 0, SECONDS_PER_YEAR as i64).unwrap();
        assert_eq!(full, 21_250 * TOKEN_UNIT);
        assert_eq!(tenth, 2_125 * TOKEN_UNIT);
    }

    #[test]
    fn accrual_rounds_down() {
        // 1 unit at 10% for one day = 0.000273.. units
        assert_eq!(accrued_reward(1, 1_000, 10_000, 0, SECONDS_PER_DAY).unwrap(), 0);
        // 365 units at 10% for one day = 0.1 units
        assert_eq!(accrued_reward(365, 1_000, 10_000, 0, SECONDS_PER_DAY).unwrap(), 0);
        assert_eq!(accrued_reward(3_650, 1_000, 10_000, 0, SECONDS_PER_DAY).unwrap(), 1);
    }

    #[test]
    fn no_time_no_reward() {
        assert_eq!(accrued_reward(1_000, 1_000, 10_000, 500, 500).unwrap(), 0);
        assert_eq!(accrued_reward(1_000, 1_000, 10_000, 500, 100).unwrap(), 0);
    }

    #[test]
    fn overflow_is_rejected() {
        let err = accrued_reward(u64::MAX, 28_000, 10_000, 0, i64::MAX).unwrap_err();
        assert_eq!(err, StakingError::ArithmeticOverflow.into());
    }

    #[test]
    fn large_but_representable_values_succeed() {
        let principal = u64::MAX / 1_000;
        let reward = accrued_reward(principal, 28_000, 10_000, 0, SECONDS_PER_YEAR as i64).unwrap();
        assert_eq!(reward as u128, principal as u128 * 28_000 / 10_000);
    }
}
