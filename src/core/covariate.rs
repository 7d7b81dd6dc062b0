use serde::Serialize;

/// How a covariate is normalized before entering the network. Boolean input
/// is accepted at the parsing boundary: `true` selects `Auto`, `false`
/// selects `Off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    Auto,
    Off,
    Minmax,
    Standardize,
    Soft,
}

impl From<bool> for Normalization {
    fn from(flag: bool) -> Self {
        if flag {
            Normalization::Auto
        } else {
            Normalization::Off
        }
    }
}

/// Configuration for one external covariate.
#[derive(Debug, Clone, Serialize)]
pub struct CovariateConfig {
    pub reg_lambda: Option<f64>,
    /// Treat the covariate as a single scalar coefficient rather than a
    /// lagged vector.
    pub as_scalar: bool,
    pub normalize: Normalization,
}

impl CovariateConfig {
    pub fn new(
        reg_lambda: Option<f64>,
        as_scalar: bool,
        normalize: impl Into<Normalization>,
    ) -> crate::Result<Self> {
        if let Some(reg_lambda) = reg_lambda {
            if reg_lambda < 0.0 {
                return Err(crate::AugurError::DataValidation(
                    "regularization must be >= 0".to_string(),
                ));
            }
        }
        Ok(Self {
            reg_lambda,
            as_scalar,
            normalize: normalize.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_reg_rejected() {
        let result = CovariateConfig::new(Some(-0.1), true, Normalization::Auto);
        assert!(matches!(result, Err(crate::AugurError::DataValidation(_))));
    }

    #[test]
    fn test_zero_and_positive_reg_accepted() {
        assert!(CovariateConfig::new(Some(0.0), true, Normalization::Auto).is_ok());
        assert!(CovariateConfig::new(Some(1.5), false, Normalization::Standardize).is_ok());
    }

    #[test]
    fn test_absent_reg_accepted() {
        let config = CovariateConfig::new(None, false, Normalization::Minmax).unwrap();
        assert_eq!(config.reg_lambda, None);
        assert!(!config.as_scalar);
        assert_eq!(config.normalize, Normalization::Minmax);
    }

    #[test]
    fn test_bool_normalization_boundary() {
        let config = CovariateConfig::new(None, true, true).unwrap();
        assert_eq!(config.normalize, Normalization::Auto);
        let config = CovariateConfig::new(None, true, false).unwrap();
        assert_eq!(config.normalize, Normalization::Off);
    }
}
