use anchor_lang::prelude::*;

use crate::constants::*;
use crate::engine::boost::{self, AncestorView};
use crate::errors::StakingError;

/// Per-participant aggregate and referral link.
#[account]
#[derive(Debug)]
pub struct UserAccount {
    /// Wallet this account belongs to
    pub owner: Pubkey,

    /// Direct referrer. Written once through `set_referrer`, never cleared.
    pub referrer: Option<Pubkey>,

    /// Positions ever opened, also the next position sequence number
    pub total_positions: u64,

    pub active_positions: u32,

    /// Principal across active positions
    pub total_staked_amount: u64,

    /// Primary tokens burned for boost across all positions
    pub total_burned: u64,

    /// Best burn boost among the active positions
    pub burn_boost_percent: u8,

    /// Active positions per non-zero burn boost, indexed by `percent - 1`
    pub burned_positions: [u16; MAX_POWER_PERCENT as usize],

    /// Cached level-weighted affiliate boost (0..=50), refreshed lazily
    pub affiliate_boost_percent: u8,

    /// Own capped total power, read by downstream referral walks
    pub staking_power: u8,

    pub boost_refreshed_at: i64,

    pub created_at: i64,

    /// Bump seed for PDA
    pub bump: u8,
}

impl Default for UserAccount {
    fn default() -> Self {
        Self {
            owner: Pubkey::default(),
            referrer: None,
            total_positions: 0,
            active_positions: 0,
            total_staked_amount: 0,
            total_burned: 0,
            burn_boost_percent: 0,
            burned_positions: [0; MAX_POWER_PERCENT as usize],
            affiliate_boost_percent: 0,
            staking_power: 0,
            boost_refreshed_at: 0,
            created_at: 0,
            bump: 0,
        }
    }
}

impl UserAccount {
    pub const LEN: usize = 8 + // discriminator
        32 + // owner
        (1 + 32) + // referrer
        8 + // total_positions
        4 + // active_positions
        8 + // total_staked_amount
        8 + // total_burned
        1 + // burn_boost_percent
        2 * MAX_POWER_PERCENT as usize + // burned_positions
        1 + // affiliate_boost_percent
        1 + // staking_power
        8 + // boost_refreshed_at
        8 + // created_at
        1; // bump

    /// Sets up a freshly created account. No-op if already initialized.
    pub fn ensure_initialized(&mut self, owner: Pubkey, bump: u8, now: i64) {
        if self.owner == Pubkey::default() {
            self.owner = owner;
            self.referrer = None;
            self.created_at = now;
            self.boost_refreshed_at = now;
            self.bump = bump;
        }
    }

    /// The only write path for `referrer`.
    pub fn set_referrer(&mut self, referrer: Pubkey) -> Result<()> {
        require!(referrer != self.owner, StakingError::SelfReferral);
        require!(self.referrer.is_none(), StakingError::ReferrerAlreadySet);
        self.referrer = Some(referrer);
        Ok(())
    }

    pub fn apply_affiliate_boost(&mut self, affiliate_boost_percent: u8, now: i64) {
        self.affiliate_boost_percent = affiliate_boost_percent;
        self.boost_refreshed_at = now;
        self.refresh_staking_power();
    }

    /// Records a burn that moved an active position's boost from `previous`
    /// to `current`.
    pub fn record_burn(&mut self, amount: u64, previous: u8, current: u8) -> Result<()> {
        self.total_burned = self
            .total_burned
            .checked_add(amount)
            .ok_or(StakingError::ArithmeticOverflow)?;
        if previous != current {
            self.untrack_burn_boost(previous)?;
            self.track_burn_boost(current)?;
        }
        self.refresh_staking_power();
        Ok(())
    }

    /// Returns the sequence number assigned to the new position.
    pub fn record_position_opened(&mut self, principal: u64) -> Result<u64> {
        let seq = self.total_positions;
        self.total_positions = seq
            .checked_add(1)
            .ok_or(StakingError::ArithmeticOverflow)?;
        self.active_positions = self
            .active_positions
            .checked_add(1)
            .ok_or(StakingError::ArithmeticOverflow)?;
        self.total_staked_amount = self
            .total_staked_amount
            .checked_add(principal)
            .ok_or(StakingError::ArithmeticOverflow)?;
        self.refresh_staking_power();
        Ok(seq)
    }

    /// `burn_boost_percent` is the closed position's final burn boost.
    pub fn record_position_closed(&mut self, principal: u64, burn_boost_percent: u8) -> Result<()> {
        self.active_positions = self
            .active_positions
            .checked_sub(1)
            .ok_or(StakingError::ArithmeticOverflow)?;
        self.total_staked_amount = self
            .total_staked_amount
            .checked_sub(principal)
            .ok_or(StakingError::ArithmeticOverflow)?;
        self.untrack_burn_boost(burn_boost_percent)?;
        self.refresh_staking_power();
        Ok(())
    }

    fn track_burn_boost(&mut self, percent: u8) -> Result<()> {
        if let Some(slot) = self.burned_slot(percent)? {
            *slot = slot.checked_add(1).ok_or(StakingError::ArithmeticOverflow)?;
        }
        self.burn_boost_percent = self.burn_boost_percent.max(percent);
        Ok(())
    }

    fn untrack_burn_boost(&mut self, percent: u8) -> Result<()> {
        if let Some(slot) = self.burned_slot(percent)? {
            *slot = slot.checked_sub(1).ok_or(StakingError::ArithmeticOverflow)?;
        }
        self.burn_boost_percent = self
            .burned_positions
            .iter()
            .rposition(|count| *count > 0)
            .map_or(0, |index| index as u8 + 1);
        Ok(())
    }

    fn burned_slot(&mut self, percent: u8) -> Result<Option<&mut u16>> {
        if percent == 0 {
            return Ok(None);
        }
        self.burned_positions
            .get_mut(usize::from(percent) - 1)
            .map(Some)
            .ok_or_else(|| error!(StakingError::ArithmeticOverflow))
    }

    fn refresh_staking_power(&mut self) {
        self.staking_power = if self.active_positions == 0 {
            0
        } else {
            boost::total_power(self.burn_boost_percent, self.affiliate_boost_percent)
        };
    }

    pub fn as_ancestor(&self) -> AncestorView {
        AncestorView {
            wallet: self.owner,
            referrer: self.referrer,
            staking_power: self.staking_power,
        }
    }

    /// Reads an ancestor's account passed through `remaining_accounts` and
    /// checks that it is the genuine account of `expected`.
    pub fn load_ancestor(info: &AccountInfo, expected: &Pubkey) -> Result<AncestorView> {
        require_keys_eq!(*info.owner, crate::ID, StakingError::InvalidReferralAccount);

        let account = {
            let data = info.try_borrow_data()?;
            let mut slice: &[u8] = &data;
            UserAccount::try_deserialize(&mut slice)
                .map_err(|_| error!(StakingError::InvalidReferralAccount))?
        };
        require_keys_eq!(account.owner, *expected, StakingError::InvalidReferralAccount);

        let address = Pubkey::create_program_address(
            &[USER_ACCOUNT_SEED, expected.as_ref(), &[account.bump]],
            &crate::ID,
        )
        .map_err(|_| error!(StakingError::InvalidReferralAccount))?;
        require_keys_eq!(address, info.key(), StakingError::InvalidReferralAccount);

        Ok(account.as_ancestor())
    }
}
