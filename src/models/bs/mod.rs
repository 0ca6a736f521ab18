// Closed-form Black-Scholes pricing for European options without dividends.
// These are the functions the implied-volatility solver inverts, plus the
// no-arbitrage bounds it validates market prices against.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use crate::error::VolError;

/// Standard normal cumulative distribution function.
///
/// Uses `erfc` rather than `erf` so the lower tail keeps full relative precision.
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * libm::erfc(-x * FRAC_1_SQRT_2)
}

/// Standard normal probability density function.
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Black-Scholes `d1`.
#[allow(non_snake_case)]
pub fn d1(sigma: f64, S: f64, K: f64, r: f64, T: f64) -> Result<f64, VolError> {
    if sigma <= 0.0 || T <= 0.0 || K <= 0.0 {
        return Err(VolError::invalid(format!(
            "d1 requires positive volatility, expiry and strike, got: sigma={}, T={}, K={}",
            sigma, T, K
        )));
    }
    Ok(raw_d1(sigma, S, K, r, T))
}

/// Black-Scholes `d2 = d1 - sigma * sqrt(T)`.
#[allow(non_snake_case)]
pub fn d2(d1: f64, sigma: f64, T: f64) -> Result<f64, VolError> {
    if sigma <= 0.0 || T <= 0.0 {
        return Err(VolError::invalid(format!(
            "d2 requires positive volatility and expiry, got: sigma={}, T={}",
            sigma, T
        )));
    }
    Ok(d1 - sigma * T.sqrt())
}

#[allow(non_snake_case)]
#[inline]
fn raw_d1(sigma: f64, S: f64, K: f64, r: f64, T: f64) -> f64 {
    ((S / K).ln() + (r + 0.5 * sigma * sigma) * T) / (sigma * T.sqrt())
}

/// Price of a European call option under Black-Scholes assumptions.
///
/// A zero volatility (or expiry) yields the discounted intrinsic value, the
/// limit of the formula as `sigma -> 0`.
#[allow(non_snake_case)]
pub fn bs_call_price(S: f64, K: f64, r: f64, T: f64, sigma: f64) -> f64 {
    let df = (-r * T).exp();
    if T <= 0.0 || sigma <= 0.0 {
        return (S - K * df).max(0.0);
    }
    let d1 = raw_d1(sigma, S, K, r, T);
    let d2 = d1 - sigma * T.sqrt();
    S * norm_cdf(d1) - K * df * norm_cdf(d2)
}

/// Price of a European put option under Black-Scholes assumptions.
#[allow(non_snake_case)]
pub fn bs_put_price(S: f64, K: f64, r: f64, T: f64, sigma: f64) -> f64 {
    let df = (-r * T).exp();
    if T <= 0.0 || sigma <= 0.0 {
        return (K * df - S).max(0.0);
    }
    let d1 = raw_d1(sigma, S, K, r, T);
    let d2 = d1 - sigma * T.sqrt();
    K * df * norm_cdf(-d2) - S * norm_cdf(-d1)
}

/// Call or put price selected by `is_call`.
#[allow(non_snake_case)]
pub fn bs_price(is_call: bool, S: f64, K: f64, r: f64, T: f64, sigma: f64) -> f64 {
    if is_call {
        bs_call_price(S, K, r, T, sigma)
    } else {
        bs_put_price(S, K, r, T, sigma)
    }
}

/// Sensitivity of the option price to volatility, identical for calls and puts.
#[allow(non_snake_case)]
pub fn bs_vega(S: f64, K: f64, r: f64, T: f64, sigma: f64) -> f64 {
    if T <= 0.0 || sigma <= 0.0 {
        return 0.0;
    }
    S * norm_pdf(raw_d1(sigma, S, K, r, T)) * T.sqrt()
}

/// No-arbitrage price range `(lower, upper)` for a European option.
///
/// `lower` is the discounted intrinsic value, reached as volatility goes to zero.
/// `upper` is the supremum approached as volatility grows without bound: the spot
/// for a call, the discounted strike for a put. A model price always lies in
/// `[lower, upper)`.
#[allow(non_snake_case)]
pub fn price_bounds(is_call: bool, S: f64, K: f64, r: f64, T: f64) -> (f64, f64) {
    let discounted_strike = K * (-r * T).exp();
    if is_call {
        ((S - discounted_strike).max(0.0), S)
    } else {
        ((discounted_strike - S).max(0.0), discounted_strike)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_call_price() {
        // Hull's textbook value for S=K=100, r=5%, T=1, sigma=20%.
        let price = bs_call_price(100.0, 100.0, 0.05, 1.0, 0.2);
        assert!((price - 10.450583572185565).abs() < 1e-9, "got {}", price);
    }

    #[test]
    fn test_put_call_parity() {
        let (s, k, r, t) = (105.0, 95.0, 0.03, 0.75);
        for &sigma in &[0.05, 0.2, 0.8, 2.5] {
            let call = bs_call_price(s, k, r, t, sigma);
            let put = bs_put_price(s, k, r, t, sigma);
            let parity = s - k * (-r * t).exp();
            assert!((call - put - parity).abs() < 1e-10, "sigma={}", sigma);
        }
    }

    #[test]
    fn test_zero_volatility_is_discounted_intrinsic() {
        let (lower, _) = price_bounds(true, 110.0, 100.0, 0.05, 1.0);
        assert_eq!(bs_call_price(110.0, 100.0, 0.05, 1.0, 0.0), lower);
        assert_eq!(bs_put_price(110.0, 100.0, 0.05, 1.0, 0.0), 0.0);
    }

    #[test]
    fn test_d1_d2_reject_degenerate_inputs() {
        assert!(d1(0.0, 100.0, 100.0, 0.05, 1.0).is_err());
        assert!(d1(0.2, 100.0, 0.0, 0.05, 1.0).is_err());
        assert!(d2(0.3, 0.2, 0.0).is_err());

        let d1_val = d1(0.2, 100.0, 100.0, 0.05, 1.0).unwrap();
        assert!((d1_val - 0.35).abs() < 1e-12);
        let d2_val = d2(d1_val, 0.2, 1.0).unwrap();
        assert!((d2_val - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_vega_matches_finite_difference() {
        let (s, k, r, t, sigma) = (100.0, 90.0, 0.02, 0.5, 0.35);
        let h = 1e-5;
        let fd = (bs_call_price(s, k, r, t, sigma + h) - bs_call_price(s, k, r, t, sigma - h))
            / (2.0 * h);
        assert!((bs_vega(s, k, r, t, sigma) - fd).abs() < 1e-6);
    }

    #[test]
    fn test_price_bounds_put() {
        let (lower, upper) = price_bounds(false, 80.0, 100.0, 0.0, 1.0);
        assert_eq!(lower, 20.0);
        assert_eq!(upper, 100.0);
    }
}
