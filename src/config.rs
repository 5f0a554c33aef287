use crate::errors::{EngineError, EngineResult};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub polygon_api_key: String,
    pub polygon_base_url: String,
    pub strike_step: f64,
    pub ladder_width: u32,
    pub risk_free_rate: f64,
    pub dividend_yield: f64,
    pub arbitrage_tick: f64,
}

impl AppConfig {
    pub fn from_env() -> EngineResult<Self> {
        dotenvy::dotenv().ok();

        let strike_step = env_var_or("STRIKE_STEP", "5")
            .parse::<f64>()
            .map_err(|e| EngineError::Config(format!("STRIKE_STEP: {e}")))?;
        if !(strike_step > 0.0) {
            return Err(EngineError::Config(format!("STRIKE_STEP must be positive, got {strike_step}")));
        }

        let ladder_width = env_var_or("LADDER_WIDTH", "5")
            .parse::<u32>()
            .map_err(|e| EngineError::Config(format!("LADDER_WIDTH: {e}")))?;

        let risk_free_rate = env_var_or("RISK_FREE_RATE", "0")
            .parse::<f64>()
            .map_err(|e| EngineError::Config(format!("RISK_FREE_RATE: {e}")))?;

        let dividend_yield = env_var_or("DIVIDEND_YIELD", "0")
            .parse::<f64>()
            .map_err(|e| EngineError::Config(format!("DIVIDEND_YIELD: {e}")))?;

        let arbitrage_tick = env_var_or("ARBITRAGE_TICK", "0.01")
            .parse::<f64>()
            .map_err(|e| EngineError::Config(format!("ARBITRAGE_TICK: {e}")))?;

        Ok(Self {
            polygon_api_key: env_var("POLYGON_API_KEY")?,
            polygon_base_url: env_var_or("POLYGON_BASE_URL", "https://api.polygon.io"),
            strike_step,
            ladder_width,
            risk_free_rate,
            dividend_yield,
            arbitrage_tick,
        })
    }
}

fn env_var(key: &str) -> EngineResult<String> {
    std::env::var(key).map_err(|_| EngineError::Config(format!("missing env var: {key}")))
}

fn env_var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
