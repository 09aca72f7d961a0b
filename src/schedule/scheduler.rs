use super::{Granularity, ScheduleError, cosine_decay};
use burn::LearningRate;
use burn::lr_scheduler::LrScheduler;
use burn::prelude::*;

/// Configuration to create a [`CosineDecay`] learning rate scheduler.
#[derive(Config, Debug)]
pub struct CosineDecayConfig {
    /// Rate at the start of every cycle.
    pub init_lr: LearningRate,

    /// Number of time steps in one decay cycle.
    pub cycle_length: usize,

    /// Rate approached at the end of every cycle.
    #[config(default = 1e-6)]
    pub min_lr: LearningRate,

    /// First time index of the decay; earlier time steps stay at `init_lr`.
    #[config(default = 1)]
    pub start: usize,

    #[config(default = "Granularity::Step")]
    pub granularity: Granularity,
}

impl CosineDecayConfig {
    /// Returns the initialized scheduler.
    pub fn init(&self) -> Result<CosineDecay, ScheduleError> {
        if self.cycle_length == 0 {
            return Err(ScheduleError::ZeroCycleLength);
        }
        for (name, value) in [("init_lr", self.init_lr), ("min_lr", self.min_lr)] {
            if !value.is_finite() {
                return Err(ScheduleError::NonFiniteLr { name, value });
            }
        }
        self.granularity.validate()?;

        if self.min_lr > self.init_lr {
            log::warn!(
                "min_lr {} is above init_lr {}, the rate will rise within each cycle",
                self.min_lr,
                self.init_lr
            );
        }

        Ok(CosineDecay {
            init_lr: self.init_lr,
            min_lr: self.min_lr,
            cycle_length: self.cycle_length,
            start: self.start,
            granularity: self.granularity.clone(),
            iteration: 0,
        })
    }
}

/// Cyclic half-cosine learning rate scheduler.
///
/// The first [`step`](LrScheduler::step) returns the rate at time 1.
#[derive(Clone, Debug)]
pub struct CosineDecay {
    init_lr: LearningRate,
    min_lr: LearningRate,
    cycle_length: usize,
    start: usize,
    granularity: Granularity,
    /// Number of steps taken so far.
    iteration: usize,
}

impl CosineDecay {
    /// Rate at `time`, independent of the scheduler's progress.
    pub fn lr_at(&self, time: usize) -> LearningRate {
        cosine_decay(time, self.cycle_length, self.init_lr, self.min_lr, self.start)
    }

    /// Time index of the last step, 0 before the first one.
    pub fn time(&self) -> usize {
        self.granularity.time(self.iteration)
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Whether the last step was the first one of a decay cycle.
    ///
    /// With epoch granularity only the first iteration of the epoch counts.
    fn begins_cycle(&self) -> bool {
        let time = self.time();
        self.granularity.advances_at(self.iteration)
            && time >= self.start
            && (time - self.start) % self.cycle_length == 0
    }
}

impl LrScheduler for CosineDecay {
    type Record<B: Backend> = usize;

    fn step(&mut self) -> LearningRate {
        self.iteration += 1;
        let time = self.time();
        let lr = self.lr_at(time);

        if self.begins_cycle() {
            log::debug!(
                "cosine decay cycle {} begins at time {time} (iteration {})",
                (time - self.start) / self.cycle_length + 1,
                self.iteration
            );
        }
        log::trace!("iteration {} time {time} lr {lr:e}", self.iteration);

        lr
    }

    fn to_record<B: Backend>(&self) -> Self::Record<B> {
        self.iteration
    }

    fn load_record<B: Backend>(mut self, record: Self::Record<B>) -> Self {
        self.iteration = record;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{DEFAULT_MIN_LR, DEFAULT_START};
    use approx::assert_abs_diff_eq;

    type TestBackend = burn::backend::NdArray<f32, i32>;

    fn steps(scheduler: &mut CosineDecay, n: usize) -> Vec<LearningRate> {
        (0..n).map(|_| scheduler.step()).collect()
    }

    #[test]
    fn config_defaults() {
        let config = CosineDecayConfig::new(0.1, 10);
        assert_eq!(config.min_lr, DEFAULT_MIN_LR);
        assert_eq!(config.start, DEFAULT_START);
        assert_eq!(config.granularity, Granularity::Step);
    }

    #[test]
    fn steps_follow_the_pure_function() {
        let config = CosineDecayConfig::new(0.1, 10).with_min_lr(0.0);
        let mut scheduler = config.init().unwrap();
        assert_eq!(scheduler.time(), 0);

        let lrs = steps(&mut scheduler, 25);
        for (i, lr) in lrs.iter().enumerate() {
            let time = i + 1;
            assert_abs_diff_eq!(*lr, cosine_decay(time, 10, 0.1, 0.0, 1), epsilon = 1e-15);
        }
        assert_abs_diff_eq!(lrs[0], 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(lrs[5], 0.05, epsilon = 1e-12);
        assert_abs_diff_eq!(lrs[10], 0.1, epsilon = 1e-12);
        assert_eq!(scheduler.time(), 25);
    }

    #[test]
    fn delayed_start_holds_init_lr() {
        let mut scheduler = CosineDecayConfig::new(0.2, 4)
            .with_start(5)
            .init()
            .unwrap();
        let lrs = steps(&mut scheduler, 6);
        assert_eq!(&lrs[..4], &[0.2; 4]);
        assert_abs_diff_eq!(lrs[4], 0.2, epsilon = 1e-12);
        assert!(lrs[5] < 0.2);
    }

    #[test]
    fn epoch_granularity_changes_rate_once_per_epoch() {
        let mut scheduler = CosineDecayConfig::new(0.1, 10)
            .with_min_lr(0.0)
            .with_granularity(Granularity::Epoch { steps_per_epoch: 4 })
            .init()
            .unwrap();
        let lrs = steps(&mut scheduler, 24);
        for (epoch, chunk) in lrs.chunks(4).enumerate() {
            let expected = scheduler.lr_at(epoch + 1);
            for lr in chunk {
                assert_eq!(*lr, expected);
            }
        }
        assert_abs_diff_eq!(lrs[20], 0.05, epsilon = 1e-12);
        assert_eq!(scheduler.time(), 6);
    }

    #[test]
    fn record_resumes_the_curve() {
        let config = CosineDecayConfig::new(1e-3, 7).with_start(2);
        let mut scheduler = config.init().unwrap();
        steps(&mut scheduler, 9);
        let record = scheduler.to_record::<TestBackend>();
        assert_eq!(record, 9);

        let expected = steps(&mut scheduler.clone(), 10);
        let mut resumed = config
            .init()
            .unwrap()
            .load_record::<TestBackend>(record);
        assert_eq!(resumed.iteration(), 9);
        assert_eq!(steps(&mut resumed, 10), expected);
    }

    #[test]
    fn cycle_begins_at_each_restart() {
        let mut scheduler = CosineDecayConfig::new(0.1, 4)
            .with_start(3)
            .init()
            .unwrap();
        let mut begins = Vec::new();
        for _ in 0..12 {
            scheduler.step();
            if scheduler.begins_cycle() {
                begins.push(scheduler.time());
            }
        }
        assert_eq!(begins, vec![3, 7, 11]);
    }

    #[test]
    fn epoch_cycle_begins_on_first_iteration_only() {
        let mut scheduler = CosineDecayConfig::new(0.1, 4)
            .with_granularity(Granularity::Epoch { steps_per_epoch: 3 })
            .init()
            .unwrap();
        let mut begins = Vec::new();
        for _ in 0..18 {
            scheduler.step();
            if scheduler.begins_cycle() {
                begins.push(scheduler.iteration());
            }
        }
        assert_eq!(begins, vec![1, 13]);
    }

    #[test]
    fn record_file_resumes_the_curve() {
        use burn::record::{CompactRecorder, Recorder};

        let dir = temp_dir::TempDir::new().unwrap();
        let path = dir.path().join("scheduler");
        let config = CosineDecayConfig::new(0.1, 10).with_min_lr(0.0);
        let mut scheduler = config.init().unwrap();
        steps(&mut scheduler, 13);
        <CompactRecorder as Recorder<TestBackend>>::record(
            &CompactRecorder::new(),
            scheduler.to_record::<TestBackend>(),
            path.clone(),
        )
        .unwrap();

        let device = Default::default();
        let record: usize =
            <CompactRecorder as Recorder<TestBackend>>::load(&CompactRecorder::new(), path, &device)
                .unwrap();
        let mut resumed = config.init().unwrap().load_record::<TestBackend>(record);
        assert_eq!(resumed.iteration(), 13);
        assert_eq!(steps(&mut resumed, 5), steps(&mut scheduler, 5));
    }

    #[test]
    fn invalid_configs_are_rejected() {
        assert_eq!(
            CosineDecayConfig::new(0.1, 0).init().unwrap_err(),
            ScheduleError::ZeroCycleLength
        );
        assert!(matches!(
            CosineDecayConfig::new(f64::NAN, 5).init(),
            Err(ScheduleError::NonFiniteLr { name: "init_lr", .. })
        ));
        assert!(matches!(
            CosineDecayConfig::new(0.1, 5)
                .with_min_lr(f64::INFINITY)
                .init(),
            Err(ScheduleError::NonFiniteLr { name: "min_lr", .. })
        ));
        assert_eq!(
            CosineDecayConfig::new(0.1, 5)
                .with_granularity(Granularity::Epoch { steps_per_epoch: 0 })
                .init()
                .unwrap_err(),
            ScheduleError::ZeroStepsPerEpoch
        );
    }

    #[test]
    fn inverted_rates_are_accepted() {
        let mut scheduler = CosineDecayConfig::new(0.0, 10)
            .with_min_lr(0.1)
            .init()
            .unwrap();
        let lrs = steps(&mut scheduler, 6);
        assert_abs_diff_eq!(lrs[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(lrs[5], 0.05, epsilon = 1e-12);
    }

    #[test]
    fn config_roundtrips_through_json() {
        let dir = temp_dir::TempDir::new().unwrap();
        let path = dir.path().join("cosine_decay.json");
        let config = CosineDecayConfig::new(3e-4, 100)
            .with_start(11)
            .with_granularity(Granularity::Epoch { steps_per_epoch: 50 });
        config.save(&path).unwrap();

        let loaded = CosineDecayConfig::load(&path).unwrap();
        assert_eq!(loaded.init_lr, 3e-4);
        assert_eq!(loaded.cycle_length, 100);
        assert_eq!(loaded.start, 11);
        assert_eq!(loaded.granularity, config.granularity);
    }
}
