//! Analytic starting points for the volatility search.
//!
//! Both approximations match moments of the lognormal price around the forward,
//! so they are accurate near the money and degrade (but stay finite) in the wings.

use std::f64::consts::PI;

use super::types::OptionQuoteInputs;

/// Corrado-Miller approximation of implied volatility.
///
/// Puts are mapped to the equivalent call price through put-call parity. A negative
/// discriminant (far from the money) is clamped to zero, which keeps the estimate
/// usable as a starting point. Returns `None` when the result is not a positive
/// finite number.
pub fn corrado_miller(quote: &OptionQuoteInputs) -> Option<f64> {
    let discounted_strike = quote.strike * (-quote.risk_free_rate * quote.time_to_expiry).exp();
    let call_price = if quote.is_call {
        quote.market_price
    } else {
        quote.market_price + quote.spot - discounted_strike
    };

    let gap = quote.spot - discounted_strike;
    let centred = call_price - 0.5 * gap;
    let discriminant = (centred * centred - gap * gap / PI).max(0.0);

    let total_vol =
        (2.0 * PI).sqrt() / (quote.spot + discounted_strike) * (centred + discriminant.sqrt());
    let sigma = total_vol / quote.time_to_expiry.sqrt();

    (sigma.is_finite() && sigma > 0.0).then_some(sigma)
}

/// Brenner-Subrahmanyam at-the-money approximation `sqrt(2*pi/T) * C / S`.
pub fn brenner_subrahmanyam(quote: &OptionQuoteInputs) -> Option<f64> {
    let call_price = if quote.is_call {
        quote.market_price
    } else {
        let discounted_strike =
            quote.strike * (-quote.risk_free_rate * quote.time_to_expiry).exp();
        quote.market_price + quote.spot - discounted_strike
    };
    let sigma = (2.0 * PI / quote.time_to_expiry).sqrt() * call_price / quote.spot;

    (sigma.is_finite() && sigma > 0.0).then_some(sigma)
}

/// First guess for the search: Corrado-Miller, else Brenner-Subrahmanyam.
pub fn initial_guess(quote: &OptionQuoteInputs) -> Option<f64> {
    corrado_miller(quote).or_else(|| brenner_subrahmanyam(quote))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bs::{bs_call_price, bs_put_price};

    #[test]
    fn test_guess_close_near_the_money() {
        let price = bs_call_price(100.0, 100.0, 0.05, 1.0, 0.2);
        let quote = OptionQuoteInputs::new(true, 100.0, 100.0, 0.05, 1.0, price);
        let guess = corrado_miller(&quote).expect("guess");
        assert!((guess - 0.2).abs() < 5e-3, "guess {}", guess);
    }

    #[test]
    fn test_put_guess_uses_parity() {
        let call = bs_call_price(100.0, 105.0, 0.02, 0.5, 0.3);
        let put = bs_put_price(100.0, 105.0, 0.02, 0.5, 0.3);
        let call_quote = OptionQuoteInputs::new(true, 100.0, 105.0, 0.02, 0.5, call);
        let put_quote = OptionQuoteInputs::new(false, 100.0, 105.0, 0.02, 0.5, put);

        let a = corrado_miller(&call_quote).expect("call guess");
        let b = corrado_miller(&put_quote).expect("put guess");
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn test_brenner_subrahmanyam_at_the_money_forward() {
        let k = 100.0 * (0.05f64).exp();
        let price = bs_call_price(100.0, k, 0.05, 1.0, 0.25);
        let quote = OptionQuoteInputs::new(true, 100.0, k, 0.05, 1.0, price);
        let guess = brenner_subrahmanyam(&quote).expect("guess");
        assert!((guess - 0.25).abs() < 5e-3, "guess {}", guess);
    }
}
