use crate::error::VolError;

/// One observed option quote together with the market parameters needed to
/// invert the Black-Scholes price.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionQuoteInputs {
    /// `true` for a call, `false` for a put
    pub is_call: bool,
    /// Underlying asset price
    pub spot: f64,
    /// Strike price
    pub strike: f64,
    /// Annualized continuously-compounded risk-free rate
    pub risk_free_rate: f64,
    /// Time to expiration in years
    pub time_to_expiry: f64,
    /// Observed option price
    pub market_price: f64,
}

impl OptionQuoteInputs {
    /// Build a quote in the external calling-convention order.
    pub fn new(
        is_call: bool,
        spot: f64,
        strike: f64,
        risk_free_rate: f64,
        time_to_expiry: f64,
        market_price: f64,
    ) -> Self {
        Self {
            is_call,
            spot,
            strike,
            risk_free_rate,
            time_to_expiry,
            market_price,
        }
    }

    /// Reject non-finite values and out-of-domain parameters.
    ///
    /// Finiteness is checked for every field before any sign check.
    pub fn validate(&self) -> Result<(), VolError> {
        let fields = [
            ("spot", self.spot),
            ("strike", self.strike),
            ("risk_free_rate", self.risk_free_rate),
            ("time_to_expiry", self.time_to_expiry),
            ("market_price", self.market_price),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(VolError::invalid(format!(
                "{} must be finite, got: {}",
                name, value
            )));
        }

        let positive = [
            ("spot", self.spot),
            ("strike", self.strike),
            ("time_to_expiry", self.time_to_expiry),
            ("market_price", self.market_price),
        ];
        if let Some((name, value)) = positive.iter().find(|(_, v)| *v <= 0.0) {
            return Err(VolError::invalid(format!(
                "{} must be positive, got: {}",
                name, value
            )));
        }
        Ok(())
    }
}

/// Which stopping rule ended the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// Price sat on the discounted intrinsic value; no iteration was run.
    IntrinsicValue,
    /// `|price(sigma) - market_price|` dropped below the price tolerance.
    PriceTolerance,
    /// The bracket narrowed below the volatility tolerance.
    BracketWidth,
}

/// Solved volatility together with solver diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImpliedVolReport {
    /// Implied volatility (as decimal, e.g., 0.25 for 25%)
    pub volatility: f64,
    /// Root-finding iterations (function evaluations for Brent)
    pub iterations: usize,
    /// `price(volatility) - market_price`
    pub price_error: f64,
    /// Final `(sigma_low, sigma_high)`; Brent reports the bracket it started from
    pub bracket: (f64, f64),
    pub termination: Termination,
}
