//! Failure taxonomy of the implied-volatility solver.
//!
//! Every failure is terminal for the call that produced it. The three kinds are
//! never conflated: callers can tell a bad request from a price no volatility can
//! reproduce, and both from a numerical failure.

use thiserror::Error;

/// Errors surfaced by pricing helpers and the implied-volatility solver.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VolError {
    /// A parameter is non-finite or outside its domain.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Which parameter was rejected and why.
        reason: String,
    },

    /// The observed price cannot be reproduced by any volatility under the model.
    #[error("Price {price} is outside the model bounds [{lower}, {upper})")]
    PriceOutOfBounds {
        /// Observed market price.
        price: f64,
        /// Lowest price the model can produce (volatility -> 0).
        lower: f64,
        /// Supremum the model approaches as volatility grows; for a bracket
        /// ceiling failure this is the price at the ceiling instead.
        upper: f64,
    },

    /// The iteration cap was reached before either stopping rule fired.
    #[error("Solver did not converge after {iterations} iterations (last price error: {last_error:e})")]
    DidNotConverge {
        /// Iterations performed.
        iterations: usize,
        /// Absolute price error at the last evaluated volatility.
        last_error: f64,
    },
}

impl VolError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        VolError::InvalidInput {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = VolError::invalid("spot must be positive, got: -1");
        assert_eq!(err.to_string(), "Invalid input: spot must be positive, got: -1");

        let err = VolError::DidNotConverge {
            iterations: 100,
            last_error: 1e-3,
        };
        assert!(err.to_string().contains("100 iterations"));
    }
}
