use roots::{find_root_brent, SimpleConvergency};
use tracing::{debug, trace, warn};

use super::config::{SolverConfig, SolverMethod};
use super::guess::initial_guess;
use super::types::{ImpliedVolReport, OptionQuoteInputs, Termination};
use crate::error::VolError;
use crate::models::bs::{bs_price, bs_vega, price_bounds};

/// Below this vega a Newton step is not attempted.
const MIN_VEGA: f64 = 1e-12;

/// Rounding allowance, in ulps of the upper bound, when comparing against the
/// no-arbitrage bounds.
const BOUND_ULPS: f64 = 4.0;

/// Stateless implied-volatility solver for European options under Black-Scholes.
///
/// The solver owns only its configuration, so one instance can be shared by
/// reference across threads and reused for any number of quotes.
#[derive(Debug, Clone, Default)]
pub struct ImpliedVolSolver {
    config: SolverConfig,
}

impl ImpliedVolSolver {
    /// Create a solver after validating `config`.
    pub fn new(config: SolverConfig) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Validated configuration this solver runs with.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Volatility that reproduces `quote.market_price`.
    pub fn solve(&self, quote: OptionQuoteInputs) -> Result<f64, VolError> {
        self.solve_with_report(quote).map(|report| report.volatility)
    }

    /// Same as [`solve`](Self::solve) but also returns iteration diagnostics.
    ///
    /// # Errors
    ///
    /// * [`VolError::InvalidInput`] for non-finite or out-of-domain parameters
    /// * [`VolError::PriceOutOfBounds`] when no volatility up to the configured
    ///   ceiling reproduces the price
    /// * [`VolError::DidNotConverge`] when the iteration cap is exhausted
    pub fn solve_with_report(
        &self,
        quote: OptionQuoteInputs,
    ) -> Result<ImpliedVolReport, VolError> {
        if let Err(e) = quote.validate() {
            debug!("Rejected quote {:?}: {}", quote, e);
            return Err(e);
        }

        let target = quote.market_price;
        let tol = self.config.price_tolerance;
        let (lower, upper) = price_bounds(
            quote.is_call,
            quote.spot,
            quote.strike,
            quote.risk_free_rate,
            quote.time_to_expiry,
        );

        // Model prices carry a few ulps of rounding, which outgrows the absolute
        // tolerance for large underlyings; the same floor applies while iterating.
        let slack = tol.max(BOUND_ULPS * f64::EPSILON * upper);

        if target < lower - slack || target >= upper {
            debug!(
                "Price {} outside no-arbitrage bounds [{}, {})",
                target, lower, upper
            );
            return Err(VolError::PriceOutOfBounds {
                price: target,
                lower,
                upper,
            });
        }

        // Vega vanishes as sigma -> 0, so iterating here would only stall.
        if target - lower <= slack {
            debug!(
                "Price {} at intrinsic value {}, returning zero volatility",
                target, lower
            );
            return Ok(ImpliedVolReport {
                volatility: 0.0,
                iterations: 0,
                price_error: lower - target,
                bracket: (0.0, 0.0),
                termination: Termination::IntrinsicValue,
            });
        }

        let (lo, hi) = self.establish_bracket(&quote, lower)?;
        debug!("Bracket established: [{}, {}]", lo, hi);

        match self.config.method {
            SolverMethod::Hybrid => self.run_hybrid(&quote, lo, hi, slack),
            SolverMethod::Brent => self.run_brent(&quote, lo, hi, slack),
        }
    }

    /// Expand `sigma_high` geometrically until the model price exceeds the target.
    ///
    /// Every rejected candidate becomes the new `sigma_low`, which is valid because
    /// the price is strictly increasing in volatility.
    fn establish_bracket(
        &self,
        quote: &OptionQuoteInputs,
        lower: f64,
    ) -> Result<(f64, f64), VolError> {
        let target = quote.market_price;
        let ceiling = self.config.max_volatility;
        let mut lo = 0.0;
        let mut hi = self.config.initial_upper_volatility.min(ceiling);

        loop {
            let price = model_price(quote, hi);
            if price > target {
                return Ok((lo, hi));
            }
            if hi >= ceiling {
                debug!(
                    "Price {} not reached at volatility ceiling {} (model price {})",
                    target, ceiling, price
                );
                return Err(VolError::PriceOutOfBounds {
                    price: target,
                    lower,
                    upper: price,
                });
            }
            lo = hi;
            hi = (hi * 2.0).min(ceiling);
        }
    }

    fn run_hybrid(
        &self,
        quote: &OptionQuoteInputs,
        mut lo: f64,
        mut hi: f64,
        price_tol: f64,
    ) -> Result<ImpliedVolReport, VolError> {
        let target = quote.market_price;
        let max_iterations = self.config.max_iterations;

        let mut sigma = initial_guess(quote)
            .filter(|&guess| guess > lo && guess < hi)
            .unwrap_or(0.5 * (lo + hi));
        let mut prev_step = hi - lo;
        let mut last_error = f64::INFINITY;

        for iteration in 1..=max_iterations {
            let diff = model_price(quote, sigma) - target;
            last_error = diff.abs();

            if diff.abs() < price_tol {
                return Ok(ImpliedVolReport {
                    volatility: sigma,
                    iterations: iteration,
                    price_error: diff,
                    bracket: (lo, hi),
                    termination: Termination::PriceTolerance,
                });
            }

            if diff > 0.0 {
                hi = sigma;
            } else {
                lo = sigma;
            }

            if hi - lo < self.config.sigma_tolerance {
                let mid = 0.5 * (lo + hi);
                return Ok(ImpliedVolReport {
                    volatility: mid,
                    iterations: iteration,
                    price_error: model_price(quote, mid) - target,
                    bracket: (lo, hi),
                    termination: Termination::BracketWidth,
                });
            }

            let vega = bs_vega(
                quote.spot,
                quote.strike,
                quote.risk_free_rate,
                quote.time_to_expiry,
                sigma,
            );
            let newton_step = diff / vega;
            let candidate = sigma - newton_step;

            // Bisect when Newton leaves the bracket or is not halving its step.
            let use_newton = vega > MIN_VEGA
                && candidate.is_finite()
                && candidate > lo
                && candidate < hi
                && 2.0 * newton_step.abs() <= prev_step.abs();

            let next = if use_newton {
                candidate
            } else {
                0.5 * (lo + hi)
            };
            trace!(
                iteration,
                sigma,
                diff,
                vega,
                lo,
                hi,
                newton = use_newton,
                "hybrid step"
            );

            prev_step = next - sigma;
            sigma = next;
        }

        warn!(
            "Implied volatility did not converge after {} iterations (last error {:e})",
            max_iterations, last_error
        );
        Err(VolError::DidNotConverge {
            iterations: max_iterations,
            last_error,
        })
    }

    fn run_brent(
        &self,
        quote: &OptionQuoteInputs,
        lo: f64,
        hi: f64,
        price_tol: f64,
    ) -> Result<ImpliedVolReport, VolError> {
        let target = quote.market_price;
        let mut convergency = SimpleConvergency {
            eps: price_tol.min(self.config.sigma_tolerance),
            max_iter: self.config.max_iterations,
        };
        let mut evaluations = 0usize;

        let result = find_root_brent(
            lo,
            hi,
            |sigma: f64| {
                evaluations += 1;
                model_price(quote, sigma) - target
            },
            &mut convergency,
        );

        match result {
            Ok(sigma) => {
                let price_error = model_price(quote, sigma) - target;
                let termination = if price_error.abs() < price_tol {
                    Termination::PriceTolerance
                } else {
                    Termination::BracketWidth
                };
                Ok(ImpliedVolReport {
                    volatility: sigma,
                    iterations: evaluations,
                    price_error,
                    bracket: (lo, hi),
                    termination,
                })
            }
            Err(e) => {
                warn!("Brent search failed after {} evaluations: {:?}", evaluations, e);
                Err(VolError::DidNotConverge {
                    iterations: evaluations,
                    last_error: f64::NAN,
                })
            }
        }
    }
}

fn model_price(quote: &OptionQuoteInputs, sigma: f64) -> f64 {
    bs_price(
        quote.is_call,
        quote.spot,
        quote.strike,
        quote.risk_free_rate,
        quote.time_to_expiry,
        sigma,
    )
}

/// Implied volatility in the fixed external calling order, using the default
/// solver configuration.
pub fn implied_volatility(
    is_call: bool,
    spot: f64,
    strike: f64,
    risk_free_rate: f64,
    time_to_expiry: f64,
    market_price: f64,
) -> Result<f64, VolError> {
    ImpliedVolSolver::default().solve(OptionQuoteInputs::new(
        is_call,
        spot,
        strike,
        risk_free_rate,
        time_to_expiry,
        market_price,
    ))
}
