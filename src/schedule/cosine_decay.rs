use num_traits::{AsPrimitive, Float, FloatConst};

/// Rate approached at the end of every cycle when no floor is configured.
pub const DEFAULT_MIN_LR: f64 = 1e-6;

/// First time index of the decay when no delay is configured.
pub const DEFAULT_START: usize = 1;

/// Learning rate cosine decay, using half of the cosine curve.
///
/// Before `start` the rate is held at `init_lr`. From `start` onwards the rate
/// follows `(init_lr - min_lr) / 2 * cos(pi * fraction) + (init_lr + min_lr) / 2`
/// where `fraction = ((time - start) % cycle_length) / cycle_length`, so every
/// `cycle_length` steps the rate restarts from `init_lr`.
///
/// Example: cycle_length = 10, init_lr = 0.1, min_lr = 0, start = 1:
/// (0→0.1), (1→0.1, ..., 6→0.05, ..., 10→0.0024), (11→0.1, ...)
///
/// # Panics
///
/// If `cycle_length` is zero.
pub fn cosine_decay<F>(time: usize, cycle_length: usize, init_lr: F, min_lr: F, start: usize) -> F
where
    F: Float + FloatConst + 'static,
    usize: AsPrimitive<F>,
{
    assert!(cycle_length > 0, "cycle_length must be positive");

    if time < start {
        return init_lr;
    }

    let two = F::one() + F::one();
    let step_in_cycle: F = ((time - start) % cycle_length).as_();
    let cycle_length: F = cycle_length.as_();
    let fraction = step_in_cycle / cycle_length;
    (init_lr - min_lr) / two * (fraction * F::PI()).cos() + (init_lr + min_lr) / two
}
