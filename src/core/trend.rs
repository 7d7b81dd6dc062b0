use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::core::data::{parse_ds, TimeDataset};

/// Trend growth mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Growth {
    Off,
    Linear,
    Discontinuous,
    Logistic,
}

impl Growth {
    pub fn as_str(&self) -> &'static str {
        match self {
            Growth::Off => "off",
            Growth::Linear => "linear",
            Growth::Discontinuous => "discontinuous",
            Growth::Logistic => "logistic",
        }
    }
}

impl std::fmt::Display for Growth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw growth setting as supplied by the user. Legacy boolean flags are
/// still accepted here and translated to a named mode during validation.
#[derive(Debug, Clone)]
pub enum GrowthArg {
    Named(String),
    Flag(bool),
}

impl From<bool> for GrowthArg {
    fn from(flag: bool) -> Self {
        GrowthArg::Flag(flag)
    }
}

impl From<&str> for GrowthArg {
    fn from(name: &str) -> Self {
        GrowthArg::Named(name.to_string())
    }
}

impl From<String> for GrowthArg {
    fn from(name: String) -> Self {
        GrowthArg::Named(name)
    }
}

impl GrowthArg {
    /// An unrecognized name falls back to linear growth with an error event,
    /// it never fails construction.
    fn resolve(&self) -> Growth {
        match self {
            GrowthArg::Named(name) => match name.as_str() {
                "off" => Growth::Off,
                "linear" => Growth::Linear,
                "discontinuous" => Growth::Discontinuous,
                "logistic" => Growth::Logistic,
                other => {
                    error!("Invalid trend growth '{}'. Default to 'linear'", other);
                    Growth::Linear
                }
            },
            GrowthArg::Flag(true) => {
                let growth = Growth::Linear;
                info!("Trend growth set to '{}'", growth);
                growth
            }
            GrowthArg::Flag(false) => {
                let growth = Growth::Off;
                info!("Trend growth set to '{}'", growth);
                growth
            }
        }
    }
}

/// Raw threshold setting: `Auto(true)` derives the threshold from the
/// changepoint count, `Auto(false)` disables it, `Value` is used verbatim
/// after sign checks.
#[derive(Debug, Clone, Copy)]
pub enum ThresholdArg {
    Auto(bool),
    Value(f64),
}

impl From<bool> for ThresholdArg {
    fn from(flag: bool) -> Self {
        ThresholdArg::Auto(flag)
    }
}

impl From<f64> for ThresholdArg {
    fn from(value: f64) -> Self {
        ThresholdArg::Value(value)
    }
}

/// Logistic-growth-only settings. The slope, cap, and floor start as
/// placeholders and are overwritten by [`TrendConfig::init_logistic_growth`]
/// once training data is available.
#[derive(Debug, Clone, Serialize)]
pub struct LogisticGrowth {
    /// Scale parameter of the trend delta initialization.
    pub tau: f64,
    /// Quantiles used to initialize floor and cap, for robustness against
    /// outliers in the targets.
    pub floor_init_quantile: f64,
    pub cap_init_quantile: f64,
    pub initial_slope: f64,
    pub cap: f64,
    pub floor: f64,
}

impl Default for LogisticGrowth {
    fn default() -> Self {
        Self {
            tau: 0.1,
            floor_init_quantile: 0.1,
            cap_init_quantile: 0.9,
            initial_slope: 0.0,
            cap: 0.5,
            floor: -0.5,
        }
    }
}

/// Validated trend configuration.
///
/// Invariants after construction: growth `Off` implies no changepoints and a
/// zero changepoint count; `trend_reg_threshold` is `None` or a finite
/// non-negative value; `logistic` is present exactly when growth is
/// `Logistic`.
#[derive(Debug, Clone, Serialize)]
pub struct TrendConfig {
    pub growth: Growth,
    pub changepoints: Option<Vec<NaiveDateTime>>,
    pub n_changepoints: usize,
    pub changepoints_range: f64,
    pub trend_reg: f64,
    pub trend_reg_threshold: Option<f64>,
    pub trend_cap_user: bool,
    pub trend_floor_user: bool,
    pub logistic: Option<LogisticGrowth>,
}

impl TrendConfig {
    pub fn new(
        growth: impl Into<GrowthArg>,
        changepoints: Option<Vec<String>>,
        n_changepoints: usize,
        changepoints_range: f64,
        trend_reg: f64,
        trend_reg_threshold: impl Into<ThresholdArg>,
    ) -> crate::Result<Self> {
        let growth = growth.into().resolve();

        let logistic = if growth == Growth::Logistic {
            Some(LogisticGrowth::default())
        } else {
            None
        };

        // Custom changepoints override the requested count. Growth "off"
        // carries no changepoints at all, whatever was supplied.
        let (changepoints, n_changepoints) = if growth == Growth::Off {
            (None, 0)
        } else if let Some(raw) = changepoints {
            let mut parsed: Vec<NaiveDateTime> = raw
                .iter()
                .map(|s| {
                    parse_ds(s).ok_or_else(|| {
                        crate::AugurError::DataValidation(format!(
                            "Invalid changepoint date: {}",
                            s
                        ))
                    })
                })
                .collect::<crate::Result<_>>()?;
            parsed.sort();
            let n = parsed.len();
            (Some(parsed), n)
        } else {
            (None, n_changepoints)
        };

        // The derived threshold uses the regularization weight as supplied,
        // before any clamping below.
        let trend_reg_threshold = match trend_reg_threshold.into() {
            ThresholdArg::Auto(true) => {
                let threshold =
                    3.0 / (3.0 + (1.0 + trend_reg) * (n_changepoints as f64).sqrt());
                debug!("Trend reg threshold automatically set to: {}", threshold);
                Some(threshold)
            }
            ThresholdArg::Auto(false) => None,
            ThresholdArg::Value(value) if value < 0.0 => {
                warn!("Negative trend reg threshold set to zero.");
                None
            }
            ThresholdArg::Value(value) if value == 0.0 => None,
            ThresholdArg::Value(value) => Some(value),
        };

        let mut trend_reg = trend_reg;
        if trend_reg < 0.0 {
            warn!("Negative trend reg lambda set to zero.");
            trend_reg = 0.0;
        }
        if trend_reg > 0.0 {
            if n_changepoints > 0 {
                info!("Note: Trend changepoint regularization is experimental.");
                trend_reg *= 0.001;
            } else {
                info!("Trend reg lambda ignored due to no changepoints.");
                trend_reg = 0.0;
                if trend_reg_threshold.map_or(false, |t| t > 0.0) {
                    info!("Trend reg threshold ignored due to no changepoints.");
                }
            }
        } else if trend_reg_threshold.map_or(false, |t| t > 0.0) {
            info!("Trend reg threshold ignored due to reg lambda <= 0.");
        }

        Ok(Self {
            growth,
            changepoints,
            n_changepoints,
            changepoints_range,
            trend_reg,
            trend_reg_threshold,
            trend_cap_user: false,
            trend_floor_user: false,
            logistic,
        })
    }

    /// Record a user-supplied carrying capacity. Marks the cap as user-set so
    /// data-driven initialization leaves it alone.
    pub fn with_user_cap(mut self, cap: f64) -> Self {
        self.trend_cap_user = true;
        if let Some(logistic) = self.logistic.as_mut() {
            logistic.cap = cap;
        }
        self
    }

    /// Record a user-supplied floor.
    pub fn with_user_floor(mut self, floor: f64) -> Self {
        self.trend_floor_user = true;
        if let Some(logistic) = self.logistic.as_mut() {
            logistic.floor = floor;
        }
        self
    }

    /// Initialize the logistic growth base rate, cap, and floor from the
    /// training dataset. Gives more robust training in common cases.
    ///
    /// The base rate is seeded with the slope of a linear least-squares fit
    /// of the targets against normalized time, which gives the correct
    /// initial sign of the trend rate in the overall logistic curve.
    pub fn init_logistic_growth(&mut self, dataset: &TimeDataset) -> crate::Result<()> {
        if self.growth != Growth::Logistic {
            return Err(crate::AugurError::Config(format!(
                "logistic growth initialization requires growth 'logistic', got '{}'",
                self.growth
            )));
        }
        let logistic = match self.logistic.as_mut() {
            Some(logistic) => logistic,
            None => {
                return Err(crate::AugurError::Config(
                    "logistic growth settings missing".to_string(),
                ))
            }
        };

        let (slope, _intercept) = least_squares_line(&dataset.t, &dataset.y);
        logistic.initial_slope = slope;

        // Ceiling or carrying capacity of the logistic trend.
        if !self.trend_cap_user {
            logistic.cap = kth_target_value(&dataset.y, logistic.cap_init_quantile);
        }

        // Floor or lowest point of the logistic trend.
        // TODO: guard on trend_floor_user once user-supplied floors are
        // exercised by the trainer; kept keyed to the cap flag to preserve
        // the established numeric behavior.
        if !self.trend_cap_user {
            logistic.floor = kth_target_value(&dataset.y, logistic.floor_init_quantile);
        }

        Ok(())
    }
}

/// Ordinary least squares for y ~ slope*t + intercept.
fn least_squares_line(t: &[f64], y: &[f64]) -> (f64, f64) {
    let n = t.len() as f64;
    if n == 0.0 {
        return (0.0, 0.0);
    }
    let sum_t: f64 = t.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_tt: f64 = t.iter().map(|v| v * v).sum();
    let sum_ty: f64 = t.iter().zip(y).map(|(ti, yi)| ti * yi).sum();
    let denom = n * sum_tt - sum_t * sum_t;
    if denom.abs() < 1e-12 {
        // degenerate time axis: flat fit
        let intercept = sum_y / n;
        return (0.0, intercept);
    }
    let slope = (n * sum_ty - sum_t * sum_y) / denom;
    let intercept = (sum_y - slope * sum_t) / n;
    (slope, intercept)
}

/// k-th smallest target where k = floor(n * quantile), 1-based and clamped
/// into the valid range.
fn kth_target_value(values: &[f64], quantile: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let k = ((values.len() as f64 * quantile) as usize)
        .max(1)
        .min(sorted.len());
    sorted[k - 1]
}
