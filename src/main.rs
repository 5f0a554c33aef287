use chrono::{NaiveDate, Utc};
use strike_lines::config::AppConfig;
use strike_lines::feeds::polygon::PolygonClient;
use strike_lines::lines::{build_board, ladder, BoardParams, StrikeQuote};
use strike_lines::OptionType;

#[tokio::main]
async fn main() {
    // Structured logging to stderr so stdout carries only the board
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut ticker: Option<String> = None;
    let mut json = false;
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            json = true;
        } else if ticker.is_none() {
            ticker = Some(arg.to_uppercase());
        }
    }
    let Some(ticker) = ticker else {
        eprintln!("usage: strike_lines <TICKER> [--json]");
        std::process::exit(2);
    };

    let cfg = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    let client = PolygonClient::new(&cfg.polygon_base_url, &cfg.polygon_api_key);

    let spot = match client.spot_price(&ticker).await {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(ticker = %ticker, "spot price error: {e}");
            std::process::exit(1);
        }
    };

    let now = Utc::now();
    let expiry = ladder::next_weekly_expiry(now.date_naive());
    let strikes = ladder::strike_ladder(spot, cfg.strike_step, cfg.ladder_width);
    tracing::info!(
        ticker = %ticker,
        spot = spot,
        expiry = %expiry,
        strikes = strikes.len(),
        "building lines"
    );

    let quotes = fetch_quotes(&client, &ticker, expiry, &strikes).await;
    if quotes.is_empty() {
        tracing::error!(ticker = %ticker, "no option quotes available");
        std::process::exit(1);
    }

    let params = BoardParams {
        ticker,
        spot,
        expiry,
        risk_free_rate: cfg.risk_free_rate,
        dividend_yield: cfg.dividend_yield,
        arbitrage_tick: cfg.arbitrage_tick,
    };
    let board = build_board(&params, &quotes, now);

    if json {
        match serde_json::to_string_pretty(&board) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                tracing::error!("serialize error: {e}");
                std::process::exit(1);
            }
        }
    } else {
        print!("{board}");
    }
}

/// Fetches call and put closes for each strike. A strike missing either
/// leg is skipped with a warning.
async fn fetch_quotes(
    client: &PolygonClient,
    ticker: &str,
    expiry: NaiveDate,
    strikes: &[f64],
) -> Vec<StrikeQuote> {
    let mut quotes = Vec::with_capacity(strikes.len());

    for &strike in strikes {
        let call_symbol = ladder::option_symbol(ticker, expiry, OptionType::Call, strike);
        let put_symbol = ladder::option_symbol(ticker, expiry, OptionType::Put, strike);

        let (call, put) = tokio::join!(
            client.option_close(ticker, &call_symbol),
            client.option_close(ticker, &put_symbol),
        );

        match (call, put) {
            (Ok(call_price), Ok(put_price)) => quotes.push(StrikeQuote {
                strike,
                call_price,
                put_price,
            }),
            (call, put) => {
                for e in [call.err(), put.err()].into_iter().flatten() {
                    tracing::warn!(strike = strike, error = %e, "skipping strike");
                }
            }
        }
    }

    quotes
}
