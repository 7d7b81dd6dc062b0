use serde::Serialize;
use tracing::info;

/// Loss function used to fit the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Loss {
    /// Huber / smooth L1.
    SmoothL1,
    /// Mean absolute error.
    L1,
    /// Mean squared error.
    L2,
}

/// Loss selector: either a name to look up or an already-built loss.
#[derive(Debug, Clone)]
pub enum LossArg {
    Name(String),
    Builtin(Loss),
}

impl From<&str> for LossArg {
    fn from(name: &str) -> Self {
        LossArg::Name(name.to_string())
    }
}

impl From<String> for LossArg {
    fn from(name: String) -> Self {
        LossArg::Name(name)
    }
}

impl From<Loss> for LossArg {
    fn from(loss: Loss) -> Self {
        LossArg::Builtin(loss)
    }
}

impl LossArg {
    fn resolve(&self) -> crate::Result<Loss> {
        match self {
            LossArg::Name(name) => match name.to_lowercase().as_str() {
                "huber" | "smoothl1" | "smoothl1loss" => Ok(Loss::SmoothL1),
                "mae" | "l1" | "l1loss" => Ok(Loss::L1),
                "mse" | "mseloss" | "l2" | "l2loss" => Ok(Loss::L2),
                _ => Err(crate::AugurError::UnsupportedLoss(name.clone())),
            },
            LossArg::Builtin(loss) => Ok(*loss),
        }
    }
}

/// Validated training configuration. `None` for learning rate, epochs, or
/// batch size means "decide from the data" via [`set_auto_batch_epoch`]
/// and the trainer's learning-rate finder.
///
/// [`set_auto_batch_epoch`]: TrainConfig::set_auto_batch_epoch
#[derive(Debug, Clone, Serialize)]
pub struct TrainConfig {
    pub learning_rate: Option<f64>,
    pub epochs: Option<usize>,
    pub batch_size: Option<usize>,
    pub loss_func: Loss,
    pub train_speed: Option<f64>,
    pub ar_sparsity: Option<f64>,
    pub reg_delay_pct: f64,
    /// Epoch index at which regularization reaches full strength, derived
    /// from `reg_delay_pct` whenever the epoch count is known.
    pub lambda_delay: Option<usize>,
    pub reg_lambda_trend: Option<f64>,
    pub trend_reg_threshold: Option<f64>,
    pub reg_lambda_season: Option<f64>,
}

impl TrainConfig {
    pub fn new(
        learning_rate: Option<f64>,
        epochs: Option<usize>,
        batch_size: Option<usize>,
        loss: impl Into<LossArg>,
        train_speed: Option<f64>,
        ar_sparsity: Option<f64>,
        reg_delay_pct: f64,
    ) -> crate::Result<Self> {
        let loss_func = loss.into().resolve()?;
        let lambda_delay = epochs.map(|e| (reg_delay_pct * e as f64) as usize);
        Ok(Self {
            learning_rate,
            epochs,
            batch_size,
            loss_func,
            train_speed,
            ar_sparsity,
            reg_delay_pct,
            lambda_delay,
            reg_lambda_trend: None,
            trend_reg_threshold: None,
            reg_lambda_season: None,
        })
    }

    /// Carry the trend regularization settings resolved by the trend config.
    pub fn with_trend_reg(mut self, reg_lambda: f64, threshold: Option<f64>) -> Self {
        self.reg_lambda_trend = Some(reg_lambda);
        self.trend_reg_threshold = threshold;
        self
    }

    /// Carry the seasonality regularization weight.
    pub fn with_season_reg(mut self, reg_lambda: f64) -> Self {
        self.reg_lambda_season = Some(reg_lambda);
        self
    }

    /// Fill unset batch size and epoch count from the number of training
    /// samples, with the default bounds of batch in [1, 128] and epochs in
    /// [5, 1000].
    pub fn set_auto_batch_epoch(&mut self, n_data: usize) -> crate::Result<()> {
        self.set_auto_batch_epoch_bounded(n_data, 1, 128, 5, 1000)
    }

    /// Both settings scale with the decimal magnitude of the data volume:
    /// batch size grows as 2^(2*log10(n) - 1), epochs shrink as the data
    /// grows, as (1000/n) * 2^(3 + log10(n)).
    pub fn set_auto_batch_epoch_bounded(
        &mut self,
        n_data: usize,
        min_batch: usize,
        max_batch: usize,
        min_epoch: usize,
        max_epoch: usize,
    ) -> crate::Result<()> {
        if n_data < 1 {
            return Err(crate::AugurError::DataValidation(
                "auto batch/epoch selection needs at least one sample".to_string(),
            ));
        }
        let log_data = (n_data as f64).log10().floor() as i32;
        if self.batch_size.is_none() {
            let raw = 2f64.powi(2 * log_data - 1);
            let batch_size = raw.max(min_batch as f64).min(max_batch as f64) as usize;
            self.batch_size = Some(batch_size);
            info!("Auto-set batch_size to {}", batch_size);
        }
        if self.epochs.is_none() {
            let datamult = 1000.0 / n_data as f64;
            let raw = (datamult * 2f64.powi(3 + log_data)) as usize;
            let epochs = raw.max(min_epoch).min(max_epoch);
            self.epochs = Some(epochs);
            info!("Auto-set epochs to {}", epochs);
            self.lambda_delay = Some((self.reg_delay_pct * epochs as f64) as usize);
        }
        Ok(())
    }

    /// Trade batch size, epoch count, and learning rate against each other
    /// with the single train-speed dial: each unit of speed doubles the
    /// batch size and learning rate and halves the epoch count. Does nothing
    /// when the dial is unset or zero.
    pub fn apply_train_speed(&mut self, batch: bool, epoch: bool, lr: bool) {
        let speed = match self.train_speed {
            Some(speed) if speed != 0.0 => speed,
            _ => return,
        };
        if batch {
            if let Some(batch_size) = self.batch_size {
                let scaled = ((batch_size as f64 * 2f64.powf(speed)) as usize).max(1);
                self.batch_size = Some(scaled);
                info!(
                    "train_speed-{} {}creased batch_size to {}",
                    speed,
                    if speed < 0.0 { "de" } else { "in" },
                    scaled
                );
            }
        }
        if epoch {
            if let Some(epochs) = self.epochs {
                let scaled = ((epochs as f64 * 2f64.powf(-speed)) as usize).max(1);
                self.epochs = Some(scaled);
                info!(
                    "train_speed-{} {}creased epochs to {}",
                    speed,
                    if speed > 0.0 { "de" } else { "in" },
                    scaled
                );
            }
        }
        if lr {
            if let Some(learning_rate) = self.learning_rate {
                let scaled = learning_rate * 2f64.powf(speed);
                self.learning_rate = Some(scaled);
                info!(
                    "train_speed-{} {}creased learning_rate to {}",
                    speed,
                    if speed < 0.0 { "de" } else { "in" },
                    scaled
                );
            }
        }
    }

    pub fn apply_train_speed_all(&mut self) {
        if matches!(self.train_speed, Some(speed) if speed != 0.0) {
            self.apply_train_speed(true, true, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config(loss: impl Into<LossArg>) -> TrainConfig {
        TrainConfig::new(None, None, None, loss, None, None, 0.5).unwrap()
    }

    #[test]
    fn test_loss_names_resolve() {
        for name in ["huber", "smoothl1", "SmoothL1Loss"] {
            assert_eq!(base_config(name).loss_func, Loss::SmoothL1);
        }
        for name in ["mae", "L1", "l1loss"] {
            assert_eq!(base_config(name).loss_func, Loss::L1);
        }
        for name in ["MSE", "mseloss", "l2", "L2Loss"] {
            assert_eq!(base_config(name).loss_func, Loss::L2);
        }
    }

    #[test]
    fn test_mse_matches_l2loss_any_case() {
        assert_eq!(base_config("MSE").loss_func, base_config("l2loss").loss_func);
    }

    #[test]
    fn test_builtin_loss_accepted() {
        assert_eq!(base_config(Loss::L1).loss_func, Loss::L1);
    }

    #[test]
    fn test_unknown_loss_fails() {
        let result = TrainConfig::new(None, None, None, "hinge", None, None, 0.5);
        assert!(matches!(
            result,
            Err(crate::AugurError::UnsupportedLoss(name)) if name == "hinge"
        ));
    }

    #[test]
    fn test_lambda_delay_derived_from_epochs() {
        let config = TrainConfig::new(None, Some(100), None, "mse", None, None, 0.5).unwrap();
        assert_eq!(config.lambda_delay, Some(50));
        let config = TrainConfig::new(None, None, None, "mse", None, None, 0.5).unwrap();
        assert_eq!(config.lambda_delay, None);
    }

    #[test]
    fn test_auto_batch_epoch_n100() {
        let mut config = base_config("huber");
        config.set_auto_batch_epoch(100).unwrap();
        // log10(100) = 2: batch 2^3 = 8, epochs floor(10 * 2^5) = 320
        assert_eq!(config.batch_size, Some(8));
        assert_eq!(config.epochs, Some(320));
        assert_eq!(config.lambda_delay, Some(160));
    }

    #[test]
    fn test_auto_batch_epoch_small_n_clamps() {
        let mut config = base_config("huber");
        config.set_auto_batch_epoch(5).unwrap();
        // log10(5) truncates to 0: raw batch is half a unit, clamped up
        assert_eq!(config.batch_size, Some(1));
        // raw epochs 200 * 8 = 1600, clamped down
        assert_eq!(config.epochs, Some(1000));
    }

    #[test]
    fn test_auto_batch_epoch_large_n_clamps() {
        let mut config = base_config("huber");
        config.set_auto_batch_epoch(1_000_000).unwrap();
        // log10 = 6: raw batch 2^11 = 2048, clamped to 128
        assert_eq!(config.batch_size, Some(128));
        // raw epochs 0.001 * 512 = 0, clamped to 5
        assert_eq!(config.epochs, Some(5));
    }

    #[test]
    fn test_auto_batch_epoch_rejects_zero() {
        let mut config = base_config("huber");
        assert!(config.set_auto_batch_epoch(0).is_err());
    }

    #[test]
    fn test_auto_batch_epoch_keeps_explicit_values() {
        let mut config =
            TrainConfig::new(None, Some(42), Some(16), "mse", None, None, 0.5).unwrap();
        config.set_auto_batch_epoch(100).unwrap();
        assert_eq!(config.batch_size, Some(16));
        assert_eq!(config.epochs, Some(42));
    }

    #[test]
    fn test_train_speed_doubles_batch() {
        let mut config =
            TrainConfig::new(None, None, Some(8), "mse", Some(1.0), None, 0.5).unwrap();
        config.apply_train_speed(true, false, false);
        assert_eq!(config.batch_size, Some(16));
    }

    #[test]
    fn test_negative_train_speed_doubles_epochs() {
        let mut config =
            TrainConfig::new(None, Some(100), None, "mse", Some(-1.0), None, 0.5).unwrap();
        config.apply_train_speed(false, true, false);
        // epochs scale as 2^(-speed), so speed -1 doubles them
        assert_eq!(config.epochs, Some(200));
    }

    #[test]
    fn test_train_speed_all() {
        let mut config = TrainConfig::new(
            Some(0.001),
            Some(100),
            Some(8),
            "mse",
            Some(2.0),
            None,
            0.5,
        )
        .unwrap();
        config.apply_train_speed_all();
        assert_eq!(config.batch_size, Some(32));
        assert_eq!(config.epochs, Some(25));
        assert!((config.learning_rate.unwrap() - 0.004).abs() < 1e-12);
    }

    #[test]
    fn test_train_speed_zero_is_noop() {
        let mut config =
            TrainConfig::new(Some(0.001), Some(100), Some(8), "mse", Some(0.0), None, 0.5)
                .unwrap();
        config.apply_train_speed_all();
        assert_eq!(config.batch_size, Some(8));
        assert_eq!(config.epochs, Some(100));
        assert_eq!(config.learning_rate, Some(0.001));

        let mut config =
            TrainConfig::new(Some(0.001), Some(100), Some(8), "mse", None, None, 0.5).unwrap();
        config.apply_train_speed_all();
        assert_eq!(config.batch_size, Some(8));
    }

    #[test]
    fn test_fractional_train_speed_floors() {
        let mut config =
            TrainConfig::new(None, None, Some(10), "mse", Some(0.5), None, 0.5).unwrap();
        config.apply_train_speed(true, false, false);
        // 10 * 2^0.5 = 14.14 floored
        assert_eq!(config.batch_size, Some(14));
    }

    #[test]
    fn test_reg_carriers() {
        let config = base_config("mse")
            .with_trend_reg(0.002, Some(0.3))
            .with_season_reg(0.01);
        assert_eq!(config.reg_lambda_trend, Some(0.002));
        assert_eq!(config.trend_reg_threshold, Some(0.3));
        assert_eq!(config.reg_lambda_season, Some(0.01));
    }
}
