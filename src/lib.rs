//! # Implied-Vol-Lib: Robust Black-Scholes Implied Volatility
//!
//! `implied-vol-lib` inverts the Black-Scholes price of a European option: given an
//! observed market price together with spot, strike, risk-free rate and time to
//! expiry, it returns the volatility that reproduces that price.
//!
//! ## Core Features
//!
//! - **Bracketed hybrid solver**: Newton-Raphson on vega, guarded by a maintained
//!   bracket with bisection fallback, so deep in/out-of-the-money and short-dated
//!   quotes still converge
//! - **Analytic first guess**: Corrado-Miller moment matching
//! - **Typed failures**: [`VolError`] separates bad input, prices no volatility can
//!   reproduce, and numerical non-convergence
//! - **Stateless**: every call is independent and safe to run concurrently
//!
//! ## Quick Start
//!
//! ```rust
//! use implied_vol_lib::{implied_volatility, models::bs::bs_call_price};
//!
//! let price = bs_call_price(100.0, 100.0, 0.05, 1.0, 0.20);
//! let vol = implied_volatility(true, 100.0, 100.0, 0.05, 1.0, price)?;
//! assert!((vol - 0.20).abs() < 1e-6);
//! # Ok::<(), implied_vol_lib::VolError>(())
//! ```
//!
//! ## Configuration Presets
//!
//! Solver tolerances and limits live in [`SolverConfig`]:
//! - `production()`: 1e-8 tolerances, 100 iterations, 500% ceiling
//! - `fast()`: looser tolerances for screening
//! - `research()`: 1e-12 tolerances and a 1000% ceiling
//! - `minimal()`: quick validation settings

// ================================================================================================
// MODULES
// ================================================================================================

pub mod error;
pub mod models;
pub mod solver;

// ================================================================================================
// PUBLIC RE-EXPORTS
// ================================================================================================

pub use error::VolError;

pub use solver::{
    config::{SolverConfig, SolverMethod},
    pipeline::{implied_volatility, ImpliedVolSolver},
    types::{ImpliedVolReport, OptionQuoteInputs, Termination},
};

// ================================================================================================
// DEFAULT CONFIGURATIONS
// ================================================================================================

/// Pre-configured solver settings for common use cases.
pub mod default_configs {
    use crate::solver::config::SolverConfig;

    /// Tight tolerances for live pricing and risk.
    ///
    /// **Characteristics:**
    /// - Maximum iterations: 100
    /// - Price and volatility tolerance: 1e-8
    /// - Bracket ceiling: 500% volatility
    ///
    /// # Example
    ///
    /// ```rust
    /// use implied_vol_lib::{default_configs, ImpliedVolSolver};
    ///
    /// let solver = ImpliedVolSolver::new(default_configs::production()).unwrap();
    /// ```
    pub fn production() -> SolverConfig {
        SolverConfig::production()
    }

    /// Looser tolerances (1e-6) and 50 iterations, for scanning many quotes.
    pub fn fast() -> SolverConfig {
        SolverConfig::fast()
    }

    /// High-precision configuration for model validation.
    ///
    /// **Characteristics:**
    /// - Maximum iterations: 500
    /// - Price and volatility tolerance: 1e-12
    /// - Bracket ceiling: 1000% volatility
    pub fn research() -> SolverConfig {
        SolverConfig::research()
    }

    /// Minimal configuration for quick validation and debugging.
    pub fn minimal() -> SolverConfig {
        SolverConfig::minimal()
    }
}
