pub mod config;
/// Observed option price -> implied volatility -> finish/touch probabilities.
/// [`engine::compute`] is the entry point; `lines` turns its output into
/// American moneylines for a ladder of strikes.
pub mod engine;
pub mod errors;
pub mod feeds;
pub mod lines;
pub mod models;

pub use engine::{compute, compute_at, MarketObservation, OddsResult};
pub use errors::{EngineError, EngineResult};
pub use models::OptionType;
