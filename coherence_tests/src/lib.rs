//! Helpers shared by the integration scenarios.

use coherence_client::BindingInterpolator;
use coherence_shared::{config::InterpolationSettings, value::BindingValue};

/// Installs a test-writer subscriber; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer()
        .try_init();
}

/// Interpolator fed with `(value, stopped, time)` samples whose arrival
/// equals their sample time.
pub fn fed_interpolator<T: BindingValue>(
    settings: InterpolationSettings,
    sample_rate: f64,
    samples: &[(T, bool, f64)],
) -> anyhow::Result<BindingInterpolator<T>> {
    let mut interp = BindingInterpolator::new(settings, sample_rate)?;
    for &(value, stopped, time) in samples {
        interp.append_sample(value, stopped, true, time, time);
    }
    Ok(interp)
}

/// Times of the buffered samples, oldest first.
pub fn buffered_times<T: BindingValue>(interp: &BindingInterpolator<T>) -> Vec<f64> {
    interp.buffer().iter().map(|s| s.time).collect()
}
