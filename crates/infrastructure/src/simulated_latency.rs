use std::time::Duration;

/// Artificial round-trip delay applied before each mock operation.
///
/// Delays are timer based and never block the runtime thread. `scale`
/// multiplies every nominal delay; zero disables them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedLatency {
    scale: f64,
}

impl SimulatedLatency {
    /// Nominal delay used when an operation does not specify one.
    pub const DEFAULT_DELAY_MS: u64 = 500;

    const MAX_SCALE: f64 = 100.0;

    /// Creates a latency profile. Negative or non-finite scales disable
    /// delays; large scales are capped.
    #[must_use]
    pub fn new(scale: f64) -> Self {
        let scale = if scale.is_finite() {
            scale.clamp(0.0, Self::MAX_SCALE)
        } else {
            0.0
        };
        Self { scale }
    }

    /// Nominal delays, as a remote backend would feel.
    #[must_use]
    pub fn realistic() -> Self {
        Self::new(1.0)
    }

    /// No delays at all.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(0.0)
    }

    /// Returns the configured scale.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Returns the effective duration for a nominal delay.
    #[must_use]
    pub fn effective(&self, ms: u64) -> Duration {
        Duration::try_from_secs_f64(ms as f64 / 1000.0 * self.scale).unwrap_or(Duration::ZERO)
    }

    /// Completes after the scaled `ms`.
    pub async fn delay(&self, ms: u64) {
        let duration = self.effective(ms);
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }

    /// Completes after the scaled [`Self::DEFAULT_DELAY_MS`].
    pub async fn delay_default(&self) {
        self.delay(Self::DEFAULT_DELAY_MS).await;
    }
}

impl Default for SimulatedLatency {
    fn default() -> Self {
        Self::realistic()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::SimulatedLatency;

    #[test]
    fn invalid_scales_disable_latency() {
        assert_eq!(SimulatedLatency::new(-1.0).scale(), 0.0);
        assert_eq!(SimulatedLatency::new(f64::NAN).scale(), 0.0);
        assert_eq!(SimulatedLatency::new(1e9).scale(), 100.0);
    }

    #[test]
    fn effective_duration_is_scaled() {
        let latency = SimulatedLatency::new(0.5);
        assert_eq!(latency.effective(800), Duration::from_millis(400));
        assert_eq!(SimulatedLatency::disabled().effective(800), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_waits_on_the_timer() {
        let started = Instant::now();
        SimulatedLatency::realistic().delay(300).await;
        assert_eq!(started.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn default_delay_is_half_a_second() {
        let started = Instant::now();
        SimulatedLatency::realistic().delay_default().await;
        assert_eq!(started.elapsed(), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn shorter_delay_completes_first() {
        let latency = SimulatedLatency::realistic();
        let (order_tx, mut order_rx) = tokio::sync::mpsc::unbounded_channel();

        let slow_tx = order_tx.clone();
        let slow = tokio::spawn(async move {
            latency.delay(800).await;
            let _ = slow_tx.send("slow");
        });
        let fast = tokio::spawn(async move {
            latency.delay(200).await;
            let _ = order_tx.send("fast");
        });

        assert!(slow.await.is_ok());
        assert!(fast.await.is_ok());
        assert_eq!(order_rx.recv().await, Some("fast"));
        assert_eq!(order_rx.recv().await, Some("slow"));
    }
}
