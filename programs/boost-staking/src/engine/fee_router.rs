//! Splits fees and penalties into destination buckets and moves the tokens.

use anchor_lang::prelude::*;
use anchor_spl::token;

use crate::constants::BPS_DENOMINATOR;
use crate::errors::StakingError;
use crate::state::FeeSplit;

/// Concrete bucket amounts for one fee. Always sums to the split amount.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SplitAmounts {
    pub burn: u64,
    pub staking_pool: u64,
    pub ranking_pool: u64,
    pub treasury: u64,
}

impl SplitAmounts {
    pub fn total(&self) -> Result<u64> {
        self.burn
            .checked_add(self.staking_pool)
            .and_then(|v| v.checked_add(self.ranking_pool))
            .and_then(|v| v.checked_add(self.treasury))
            .ok_or_else(|| error!(StakingError::ArithmeticOverflow))
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// `floor(amount × rate_bps / 10⁴)`.
pub fn fee_amount(amount: u64, rate_bps: u16) -> Result<u64> {
    require!(
        rate_bps as u64 <= BPS_DENOMINATOR,
        StakingError::InvalidParameters
    );
    let fee = (amount as u128)
        .checked_mul(rate_bps as u128)
        .ok_or(StakingError::ArithmeticOverflow)?
        / BPS_DENOMINATOR as u128;
    u64::try_from(fee).map_err(|_| error!(StakingError::ArithmeticOverflow))
}

/// Partitions `amount` by `table`. Each bucket is floored, the treasury
/// bucket takes the remainder.
pub fn split(amount: u64, table: &FeeSplit) -> Result<SplitAmounts> {
    table.validate()?;

    let burn = fee_amount(amount, table.burn_bps)?;
    let staking_pool = fee_amount(amount, table.staking_pool_bps)?;
    let ranking_pool = fee_amount(amount, table.ranking_pool_bps)?;
    let treasury = amount
        .checked_sub(burn)
        .and_then(|v| v.checked_sub(staking_pool))
        .and_then(|v| v.checked_sub(ranking_pool))
        .ok_or(StakingError::ArithmeticOverflow)?;

    Ok(SplitAmounts {
        burn,
        staking_pool,
        ranking_pool,
        treasury,
    })
}

/// Accounts a split of one asset is paid out of and into.
pub struct FeeRoute<'info> {
    pub token_program: AccountInfo<'info>,
    pub mint: AccountInfo<'info>,
    pub source: AccountInfo<'info>,
    pub authority: AccountInfo<'info>,
    pub reward_vault: AccountInfo<'info>,
    pub ranking_pool: AccountInfo<'info>,
    pub treasury: AccountInfo<'info>,
}

impl<'info> FeeRoute<'info> {
    /// Burns the burn bucket from the source and transfers the rest. The
    /// staking-pool bucket stays put when the source already is the reward
    /// vault.
    pub fn execute(&self, amounts: &SplitAmounts, signer_seeds: &[&[&[u8]]]) -> Result<()> {
        burn_tokens(
            &self.token_program,
            &self.mint,
            &self.source,
            &self.authority,
            amounts.burn,
            signer_seeds,
        )?;

        if self.source.key() != self.reward_vault.key() {
            transfer_tokens(
                &self.token_program,
                &self.source,
                &self.reward_vault,
                &self.authority,
                amounts.staking_pool,
                signer_seeds,
            )?;
        }

        transfer_tokens(
            &self.token_program,
            &self.source,
            &self.ranking_pool,
            &self.authority,
            amounts.ranking_pool,
            signer_seeds,
        )?;
        transfer_tokens(
            &self.token_program,
            &self.source,
            &self.treasury,
            &self.authority,
            amounts.treasury,
            signer_seeds,
        )
    }
}

pub fn transfer_tokens<'info>(
    token_program: &AccountInfo<'info>,
    from: &AccountInfo<'info>,
    to: &AccountInfo<'info>,
    authority: &AccountInfo<'info>,
    amount: u64,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    let cpi_accounts = token::Transfer {
        from: from.clone(),
        to: to.clone(),
        authority: authority.clone(),
    };
    let cpi_ctx = CpiContext::new_with_signer(token_program.clone(), cpi_accounts, signer_seeds);
    token::transfer(cpi_ctx, amount).map_err(|e| {
        msg!("transfer of {} from {} failed: {:?}", amount, from.key(), e);
        error!(StakingError::TokenTransferFailed)
    })
}

pub fn burn_tokens<'info>(
    token_program: &AccountInfo<'info>,
    mint: &AccountInfo<'info>,
    from: &AccountInfo<'info>,
    authority: &AccountInfo<'info>,
    amount: u64,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    let cpi_accounts = token::Burn {
        mint: mint.clone(),
        from: from.clone(),
        authority: authority.clone(),
    };
    let cpi_ctx = CpiContext::new_with_signer(token_program.clone(), cpi_accounts, signer_seeds);
    token::burn(cpi_ctx, amount).map_err(|e| {
        msg!("burn of {} from {} failed: {:?}", amount, from.key(), e);
        error!(StakingError::TokenTransferFailed)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sums_exactly(amount: u64, table: &FeeSplit) {
        let parts = split(amount, table).unwrap();
        assert_eq!(parts.total().unwrap(), amount, "amount {amount} table {table:?}");
    }

    #[test]
    fn partition_sums_to_amount() {
        let tables = [
            FeeSplit::new(2_000, 4_000, 2_000, 2_000),
            FeeSplit::new(3_333, 3_333, 3_333, 1),
            FeeSplit::new(0, 0, 0, 10_000),
            FeeSplit::new(10_000, 0, 0, 0),
            FeeSplit::new(1, 1, 1, 9_997),
        ];
        let amounts = [0, 1, 2, 3, 7, 99, 10_001, 123_456_789, u64::MAX / 3, u64::MAX];
        for table in &tables {
            for amount in amounts {
                sums_exactly(amount, table);
            }
        }
    }

    #[test]
    fn treasury_absorbs_remainder() {
        let parts = split(10, &FeeSplit::new(3_333, 3_333, 3_333, 1)).unwrap();
        assert_eq!(
            parts,
            SplitAmounts {
                burn: 3,
                staking_pool: 3,
                ranking_pool: 3,
                treasury: 1,
            }
        );
    }

    #[test]
    fn exact_percentages() {
        let parts = split(1_000, &FeeSplit::new(1_000, 1_000, 4_000, 4_000)).unwrap();
        assert_eq!(parts.burn, 100);
        assert_eq!(parts.staking_pool, 100);
        assert_eq!(parts.ranking_pool, 400);
        assert_eq!(parts.treasury, 400);
    }

    #[test]
    fn incomplete_table_rejected() {
        let err = split(1_000, &FeeSplit::new(1_000, 1_000, 1_000, 1_000)).unwrap_err();
        assert_eq!(err, StakingError::InvalidFeeSplit.into());
    }

    #[test]
    fn fee_amount_floors() {
        assert_eq!(fee_amount(99, 100).unwrap(), 0);
        assert_eq!(fee_amount(100, 100).unwrap(), 1);
        assert_eq!(fee_amount(10_000, 5_000).unwrap(), 5_000);
        assert_eq!(fee_amount(u64::MAX, 10_000).unwrap(), u64::MAX);
    }

    #[test]
    fn fee_rate_above_hundred_percent_rejected() {
        assert!(fee_amount(100, 10_001).is_err());
    }

    #[test]
    fn zero_split_is_empty() {
        assert!(split(0, &FeeSplit::new(2_500, 2_500, 2_500, 2_500)).unwrap().is_empty());
    }
}
