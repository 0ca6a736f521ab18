use anyhow::{anyhow, Result};

/// Root-finding strategy used once the volatility bracket is established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SolverMethod {
    /// Newton-Raphson on vega, falling back to bisection whenever the step
    /// leaves the bracket or stalls.
    #[default]
    Hybrid,
    /// Brent's method over the bracket (derivative free).
    Brent,
}

/// Main configuration struct for the implied-volatility solver
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Hard cap on root-finding iterations
    #[cfg_attr(feature = "serde", serde(default = "default_max_iterations"))]
    pub max_iterations: usize,

    /// Absolute price tolerance, in price units
    #[cfg_attr(feature = "serde", serde(default = "default_price_tolerance"))]
    pub price_tolerance: f64,

    /// Bracket width below which the volatility is considered pinned
    #[cfg_attr(feature = "serde", serde(default = "default_sigma_tolerance"))]
    pub sigma_tolerance: f64,

    /// First candidate for the upper end of the bracket
    #[cfg_attr(feature = "serde", serde(default = "default_initial_upper_volatility"))]
    pub initial_upper_volatility: f64,

    /// Ceiling for bracket expansion (5.0 = 500%)
    #[cfg_attr(feature = "serde", serde(default = "default_max_volatility"))]
    pub max_volatility: f64,

    #[cfg_attr(feature = "serde", serde(default))]
    pub method: SolverMethod,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            price_tolerance: default_price_tolerance(),
            sigma_tolerance: default_sigma_tolerance(),
            initial_upper_volatility: default_initial_upper_volatility(),
            max_volatility: default_max_volatility(),
            method: SolverMethod::default(),
        }
    }
}

impl SolverConfig {
    /// Default configuration for production use with tight tolerances
    pub fn production() -> Self {
        Self::default()
    }

    /// Looser tolerances for screening large quote sets quickly
    pub fn fast() -> Self {
        Self {
            max_iterations: 50,
            price_tolerance: 1e-6,
            sigma_tolerance: 1e-6,
            ..Self::default()
        }
    }

    /// High-precision configuration for research and model validation
    pub fn research() -> Self {
        Self {
            max_iterations: 500,
            price_tolerance: 1e-12,
            sigma_tolerance: 1e-12,
            max_volatility: 10.0,
            ..Self::default()
        }
    }

    /// Minimal configuration for quick validation and debugging
    pub fn minimal() -> Self {
        Self {
            max_iterations: 20,
            price_tolerance: 1e-4,
            sigma_tolerance: 1e-4,
            ..Self::default()
        }
    }

    /// Check that the configuration can drive a bounded, well-posed search.
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(anyhow!("max_iterations must be at least 1"));
        }
        if !(self.price_tolerance.is_finite() && self.price_tolerance > 0.0) {
            return Err(anyhow!(
                "price_tolerance must be positive and finite, got: {}",
                self.price_tolerance
            ));
        }
        if !(self.sigma_tolerance.is_finite() && self.sigma_tolerance > 0.0) {
            return Err(anyhow!(
                "sigma_tolerance must be positive and finite, got: {}",
                self.sigma_tolerance
            ));
        }
        if !(self.initial_upper_volatility.is_finite() && self.initial_upper_volatility > 0.0) {
            return Err(anyhow!(
                "initial_upper_volatility must be positive and finite, got: {}",
                self.initial_upper_volatility
            ));
        }
        if !(self.max_volatility.is_finite() && self.max_volatility >= self.initial_upper_volatility)
        {
            return Err(anyhow!(
                "max_volatility ({}) must be finite and not below initial_upper_volatility ({})",
                self.max_volatility,
                self.initial_upper_volatility
            ));
        }
        Ok(())
    }

    /// Parse a configuration from TOML; missing fields take their defaults.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: SolverConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file.
    #[cfg(feature = "serde")]
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))?;
        Self::from_toml_str(&contents)
    }
}

fn default_max_iterations() -> usize {
    100
}

fn default_price_tolerance() -> f64 {
    1e-8
}

fn default_sigma_tolerance() -> f64 {
    1e-8
}

fn default_initial_upper_volatility() -> f64 {
    1.0
}

fn default_max_volatility() -> f64 {
    5.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for config in [
            SolverConfig::production(),
            SolverConfig::fast(),
            SolverConfig::research(),
            SolverConfig::minimal(),
        ] {
            config.validate().expect("preset should be valid");
        }
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = SolverConfig::default();
        config.max_iterations = 0;
        assert!(config.validate().is_err());

        let mut config = SolverConfig::default();
        config.price_tolerance = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = SolverConfig::default();
        config.max_volatility = 0.5;
        assert!(config.validate().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_toml_partial() {
        let config = SolverConfig::from_toml_str(
            r#"
            max_iterations = 250
            method = "brent"
            "#,
        )
        .expect("valid TOML");
        assert_eq!(config.max_iterations, 250);
        assert_eq!(config.method, SolverMethod::Brent);
        assert_eq!(config.price_tolerance, 1e-8);
        assert_eq!(config.max_volatility, 5.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_toml_rejects_invalid() {
        assert!(SolverConfig::from_toml_str("sigma_tolerance = -1.0").is_err());
        assert!(SolverConfig::from_toml_str("method = \"secant\"").is_err());
    }
}
