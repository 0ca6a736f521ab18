use implied_vol_lib::{models::bs::bs_price, OptionQuoteInputs};
use serde::Deserialize;

/// CSV row structure for the synthetic quote fixtures
#[derive(Debug, Deserialize)]
#[allow(dead_code)] // symbol is only used for assertion messages
pub struct CsvQuote {
    pub symbol: String,
    pub option_type: String,
    pub spot: f64,
    pub strike: f64,
    pub rate: f64,
    pub years_to_exp: f64,
    pub true_vol: f64,
}

impl CsvQuote {
    pub fn is_call(&self) -> bool {
        self.option_type.eq_ignore_ascii_case("call")
    }

    /// Quote priced at the row's true volatility
    pub fn to_quote(&self) -> OptionQuoteInputs {
        quote_from_vol(
            self.is_call(),
            self.spot,
            self.strike,
            self.rate,
            self.years_to_exp,
            self.true_vol,
        )
    }
}

/// Load quote fixtures from a CSV file
#[allow(dead_code)]
pub fn load_quotes(file_path: &str) -> Result<Vec<CsvQuote>, Box<dyn std::error::Error>> {
    let mut reader = csv::Reader::from_path(file_path)?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: CsvQuote = result?;
        rows.push(row);
    }
    Ok(rows)
}

/// Build a quote whose market price is the model price at `sigma`
pub fn quote_from_vol(
    is_call: bool,
    spot: f64,
    strike: f64,
    rate: f64,
    tte: f64,
    sigma: f64,
) -> OptionQuoteInputs {
    let price = bs_price(is_call, spot, strike, rate, tte, sigma);
    OptionQuoteInputs::new(is_call, spot, strike, rate, tte, price)
}
