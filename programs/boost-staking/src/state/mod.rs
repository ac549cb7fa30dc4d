pub mod config;
pub mod stake_position;
pub mod user_account;

pub use config::*;
pub use stake_position::*;
pub use user_account::*;
