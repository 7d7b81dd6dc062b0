use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonalityMode {
    Additive,
    Multiplicative,
}

/// How seasonal components are represented. Fourier terms are the only
/// supported computation at the moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonComputation {
    Fourier,
}

/// Per-period selector: detect from the data, force on/off, manage the
/// period entirely by hand, or pin an explicit Fourier order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeasonArg {
    Auto,
    Enabled,
    Disabled,
    Custom,
    Explicit(usize),
}

impl From<bool> for SeasonArg {
    fn from(flag: bool) -> Self {
        if flag {
            SeasonArg::Enabled
        } else {
            SeasonArg::Disabled
        }
    }
}

impl From<usize> for SeasonArg {
    fn from(resolution: usize) -> Self {
        SeasonArg::Explicit(resolution)
    }
}

/// One seasonal component: Fourier order (0 disables it), period length in
/// days, and the selector it was configured with.
#[derive(Debug, Clone, Serialize)]
pub struct Season {
    pub name: String,
    pub resolution: usize,
    pub period: f64,
    pub arg: SeasonArg,
}

impl Season {
    fn new(name: &str, resolution: usize, period: f64, arg: SeasonArg) -> Self {
        Self {
            name: name.to_string(),
            resolution,
            period,
            arg,
        }
    }
}

/// Validated seasonality configuration: the built-in yearly/weekly/daily
/// registry plus any appended custom periods, in insertion order.
#[derive(Debug, Clone, Serialize)]
pub struct SeasonalityConfig {
    pub mode: SeasonalityMode,
    pub computation: SeasonComputation,
    pub reg_lambda: f64,
    pub periods: Vec<Season>,
}

impl SeasonalityConfig {
    pub fn new(
        mode: SeasonalityMode,
        computation: SeasonComputation,
        reg_lambda: f64,
        yearly: impl Into<SeasonArg>,
        weekly: impl Into<SeasonArg>,
        daily: impl Into<SeasonArg>,
    ) -> Self {
        let mut reg_lambda = reg_lambda;
        if reg_lambda > 0.0 && computation == SeasonComputation::Fourier {
            info!("Note: Fourier-based seasonality regularization is experimental.");
            reg_lambda *= 0.01;
        }
        let periods = vec![
            Season::new("yearly", 6, 365.25, yearly.into()),
            Season::new("weekly", 3, 7.0, weekly.into()),
            Season::new("daily", 6, 1.0, daily.into()),
        ];
        Self {
            mode,
            computation,
            reg_lambda,
            periods,
        }
    }

    /// Add a named custom period. Re-using a name replaces the existing
    /// entry in place.
    pub fn append(&mut self, name: &str, period: f64, resolution: usize, arg: SeasonArg) {
        let season = Season::new(name, resolution, period, arg);
        if let Some(existing) = self.periods.iter_mut().find(|p| p.name == name) {
            *existing = season;
        } else {
            self.periods.push(season);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Season> {
        self.periods.iter().find(|p| p.name == name)
    }

    /// Resolve the periods that were left on auto or forced by the user,
    /// given the observation timestamps of the training data.
    ///
    /// Yearly stays on with at least two years of history. Weekly needs at
    /// least two weeks of history and date spacing under a week. Daily needs
    /// at least two days of history and date spacing under a day.
    ///
    /// Periods that resolve to order 0 are dropped; returns `None` when
    /// nothing is left, meaning the model has no seasonal components.
    pub fn set_auto_seasonalities(mut self, dates: &[NaiveDateTime]) -> Option<Self> {
        debug!("seasonality config received: {:?}", self);
        let span = date_span(dates);
        let min_dt = min_date_gap(dates);

        for season in self.periods.iter_mut() {
            let auto_disable = match season.name.as_str() {
                "yearly" => span < Duration::days(730),
                "weekly" => {
                    span < Duration::weeks(2)
                        || min_dt.map_or(false, |dt| dt >= Duration::weeks(1))
                }
                "daily" => {
                    span < Duration::days(2) || min_dt.map_or(false, |dt| dt >= Duration::days(1))
                }
                _ => false,
            };
            match season.arg {
                SeasonArg::Custom => continue,
                SeasonArg::Auto => {
                    if auto_disable {
                        info!(
                            "Disabling {} seasonality. Run the forecaster with \
                             {}_seasonality=true to override this.",
                            season.name, season.name
                        );
                        season.resolution = 0;
                    }
                }
                SeasonArg::Enabled => {}
                SeasonArg::Disabled => season.resolution = 0,
                SeasonArg::Explicit(resolution) => season.resolution = resolution,
            }
        }

        self.periods.retain(|p| p.resolution > 0);
        if self.periods.is_empty() {
            debug!("seasonality config: none");
            None
        } else {
            debug!("seasonality config: {:?}", self);
            Some(self)
        }
    }
}

fn date_span(dates: &[NaiveDateTime]) -> Duration {
    match (dates.iter().min(), dates.iter().max()) {
        (Some(first), Some(last)) => *last - *first,
        _ => Duration::zero(),
    }
}

/// Smallest non-zero gap between consecutive sorted dates, if any.
fn min_date_gap(dates: &[NaiveDateTime]) -> Option<Duration> {
    let mut sorted = dates.to_vec();
    sorted.sort();
    sorted
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|dt| *dt > Duration::zero())
        .min()
}
