pub mod boost;
pub mod fee_router;
pub mod settlement;
pub mod yield_engine;
