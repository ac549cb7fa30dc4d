// Every module exports a `handler`; only the accounts items are used through the globs.
#![allow(ambiguous_glob_reexports)]

pub mod burn_for_boost;
pub mod claim_rewards;
pub mod emergency_unstake;
pub mod fund_rewards;
pub mod initialize;
pub mod open_stake;
pub mod pause;
pub mod referral_chain;
pub mod register_referrer;
pub mod set_global_parameters;
pub mod sync_boost;
pub mod unstake;

// Re-export account structs for the program module, together with the
// `__client_accounts_*` modules `#[program]` resolves at the crate root
pub use burn_for_boost::*;
pub use claim_rewards::*;
pub use fund_rewards::*;
pub use initialize::*;
pub use open_stake::*;
pub use pause::*;
pub use register_referrer::*;
pub use set_global_parameters::*;
pub use sync_boost::*;
pub use unstake::*;
