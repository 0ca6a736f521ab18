// demos/solve_quotes.rs

//! Solve implied volatilities for a CSV file of quotes.
//!
//! Usage:
//!
//! ```text
//! cargo run --example solve_quotes -- [quotes.csv] [solver.toml]
//! RUST_LOG=implied_vol_lib=trace cargo run --example solve_quotes
//! ```
//!
//! The CSV needs the columns `symbol, option_type, spot, strike, rate,
//! years_to_exp`, and either `price` or `true_vol`. When only `true_vol` is
//! present the quote is priced at that volatility first, which is how the test
//! fixture in `tests/data/quotes.csv` is laid out.

use anyhow::{anyhow, Result};
use implied_vol_lib::{
    default_configs, models::bs::bs_price, ImpliedVolSolver, OptionQuoteInputs, SolverConfig,
};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
struct QuoteRow {
    symbol: String,
    option_type: String,
    spot: f64,
    strike: f64,
    rate: f64,
    years_to_exp: f64,
    #[serde(default)]
    price: Option<f64>,
    #[serde(default)]
    true_vol: Option<f64>,
}

impl QuoteRow {
    fn to_quote(&self) -> Result<OptionQuoteInputs> {
        let is_call = match self.option_type.to_lowercase().as_str() {
            "call" => true,
            "put" => false,
            other => return Err(anyhow!("Invalid option type: {}", other)),
        };
        let price = match (self.price, self.true_vol) {
            (Some(price), _) => price,
            (None, Some(vol)) => bs_price(
                is_call,
                self.spot,
                self.strike,
                self.rate,
                self.years_to_exp,
                vol,
            ),
            (None, None) => return Err(anyhow!("{}: needs price or true_vol", self.symbol)),
        };
        Ok(OptionQuoteInputs::new(
            is_call,
            self.spot,
            self.strike,
            self.rate,
            self.years_to_exp,
            price,
        ))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let csv_path = args
        .next()
        .unwrap_or_else(|| "tests/data/quotes.csv".to_string());
    let config = match args.next() {
        Some(path) => SolverConfig::from_toml_file(path)?,
        None => default_configs::production(),
    };

    println!("Implied Volatility Demo");
    println!("=======================");
    let solver = ImpliedVolSolver::new(config)?;
    println!("Quotes: {}", csv_path);
    println!("Config: {:?}\n", solver.config());

    let mut reader = csv::Reader::from_path(&csv_path)?;

    println!(
        "{:<16} {:>5} {:>12} {:>12} {:>12} {:>10} {:>6}",
        "Symbol", "Type", "Strike", "Price", "Implied Vol", "Error", "Iters"
    );
    for result in reader.deserialize() {
        let row: QuoteRow = result?;
        let quote = row.to_quote()?;
        match solver.solve_with_report(quote) {
            Ok(report) => println!(
                "{:<16} {:>5} {:>12.4} {:>12.6} {:>11.4}% {:>10.2e} {:>6}",
                row.symbol,
                row.option_type,
                quote.strike,
                quote.market_price,
                report.volatility * 100.0,
                report.price_error,
                report.iterations
            ),
            Err(e) => println!("{:<16} failed: {}", row.symbol, e),
        }
    }

    Ok(())
}
