//! Simulated network latency.

use std::time::Duration;

use rand::Rng;

/// Lower bound of the base delay, in microseconds.
const MIN_DELAY_MICROS: u64 = 25_000;
/// Upper bound of the base delay, in microseconds.
const MAX_DELAY_MICROS: u64 = 300_000;

/// Picks a random delay of 25-300 ms scaled by `factor`.
///
/// Returns `None` when the factor is not a positive finite number or the
/// scaled delay does not fit in a `Duration`.
pub fn random_delay(factor: f64) -> Option<Duration> {
    if !factor.is_finite() || factor <= 0.0 {
        return None;
    }
    let micros = rand::thread_rng().gen_range(MIN_DELAY_MICROS..=MAX_DELAY_MICROS);
    Duration::try_from_secs_f64(micros as f64 * factor / 1_000_000.0).ok()
}

/// Sleeps for a random delay scaled by `factor`.
pub async fn simulate_latency(factor: f64) {
    if let Some(delay) = random_delay(factor) {
        tokio::time::sleep(delay).await;
    }
}
