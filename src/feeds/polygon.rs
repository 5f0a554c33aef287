use crate::errors::{EngineError, EngineResult};
use reqwest::Client;
use serde::Deserialize;

/// Polygon REST snapshot client. Point-in-time lookups only, no streaming.
/// The API key is injected at construction and sent as a bearer token.
#[derive(Clone)]
pub struct PolygonClient {
    client: Client,
    base_url: String,
    api_key: String,
}

// Stock snapshot response (trimmed to the fields we read):
// {
//   "status": "OK",
//   "ticker": {
//     "ticker": "SPY",
//     "day":     { "c": 512.31, "o": 509.9, ... },
//     "prevDay": { "c": 510.06, ... }
//   }
// }

#[derive(Debug, Deserialize)]
pub struct StockSnapshotResponse {
    pub ticker: Option<StockSnapshot>,
}

#[derive(Debug, Deserialize)]
pub struct StockSnapshot {
    pub day: Option<Bar>,
    #[serde(rename = "prevDay")]
    pub prev_day: Option<Bar>,
}

#[derive(Debug, Deserialize)]
pub struct Bar {
    #[serde(rename = "c")]
    pub close: Option<f64>,
}

// Option contract snapshot response:
// {
//   "status": "OK",
//   "results": { "day": { "close": 4.35, "open": 3.9, ... }, "details": { ... } }
// }

#[derive(Debug, Deserialize)]
pub struct OptionSnapshotResponse {
    pub results: Option<OptionSnapshot>,
}

#[derive(Debug, Deserialize)]
pub struct OptionSnapshot {
    pub day: Option<OptionDay>,
}

#[derive(Debug, Deserialize)]
pub struct OptionDay {
    pub close: Option<f64>,
}

impl PolygonClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .pool_max_idle_per_host(4)
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> EngineResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(EngineError::MarketData(format!("GET {path}: HTTP {status}: {body}")));
        }

        resp.json::<T>()
            .await
            .map_err(|e| EngineError::Parse(format!("GET {path}: {e}")))
    }

    /// Latest close of the underlying.
    pub async fn spot_price(&self, ticker: &str) -> EngineResult<f64> {
        let path = format!(
            "/v2/snapshot/locale/us/markets/stocks/tickers/{}",
            ticker.to_uppercase()
        );
        let snapshot: StockSnapshotResponse = self.get(&path).await?;
        let price = spot_from_snapshot(&snapshot)
            .ok_or_else(|| EngineError::MarketData(format!("no close for {ticker}")))?;
        tracing::debug!(ticker = %ticker, price = price, "spot price fetched");
        Ok(price)
    }

    /// Day close of one option contract, e.g. `O:SPY240308C00510000`.
    pub async fn option_close(&self, underlying: &str, symbol: &str) -> EngineResult<f64> {
        let path = format!("/v3/snapshot/options/{}/{}", underlying.to_uppercase(), symbol);
        let snapshot: OptionSnapshotResponse = self.get(&path).await?;
        snapshot
            .results
            .and_then(|r| r.day)
            .and_then(|d| d.close)
            .filter(|p| p.is_finite() && *p >= 0.0)
            .ok_or_else(|| EngineError::MarketData(format!("no close for {symbol}")))
    }
}

/// Day close, falling back to the previous day's close when the day
/// bar is empty (market holiday or pre-open).
pub fn spot_from_snapshot(snapshot: &StockSnapshotResponse) -> Option<f64> {
    let ticker = snapshot.ticker.as_ref()?;
    let valid = |bar: &Option<Bar>| {
        bar.as_ref()
            .and_then(|b| b.close)
            .filter(|c| *c > 0.0 && c.is_finite())
    };
    valid(&ticker.day).or_else(|| valid(&ticker.prev_day))
}
