use crate::registry::FormRegistry;
use chrono::Utc;
use std::sync::Arc;
use tokio::time;

/// Configuration for the idle sweep
pub struct SweepConfig {
    /// Instances untouched for this long are torn down
    pub idle_timeout_secs: u64,
    /// How often to run the sweep (in seconds)
    pub check_interval_secs: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 1800, // 30 minutes
            check_interval_secs: 300,
        }
    }
}

/// Background service that tears down abandoned form instances
pub struct SweepService {
    registry: Arc<FormRegistry>,
    config: SweepConfig,
}

impl SweepService {
    pub fn new(registry: Arc<FormRegistry>, config: SweepConfig) -> Self {
        Self { registry, config }
    }

    /// Start the sweep loop
    pub async fn start(self: Arc<Self>) {
        let check_interval_secs = if self.config.check_interval_secs == 0 {
            tracing::warn!("Sweep interval of 0s is not allowed, checking every second instead");
            1
        } else {
            self.config.check_interval_secs
        };
        let mut interval = time::interval(time::Duration::from_secs(check_interval_secs));

        loop {
            interval.tick().await;
            self.sweep().await;
        }
    }

    /// Tear down every instance idle longer than the configured timeout
    pub async fn sweep(&self) -> usize {
        let cutoff = i64::try_from(self.config.idle_timeout_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .and_then(|idle_timeout| Utc::now().checked_sub_signed(idle_timeout));
        let Some(cutoff) = cutoff else {
            tracing::error!(
                "Idle timeout of {}s is out of range, skipping sweep",
                self.config.idle_timeout_secs
            );
            return 0;
        };

        let removed = self.registry.sweep_idle(cutoff).await;
        if removed > 0 {
            let remaining = self.registry.len().await;
            tracing::info!(
                "Swept {} idle form instance(s), {} remaining",
                removed,
                remaining
            );
        } else {
            tracing::debug!("No idle form instances to sweep");
        }

        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::TraceIdentityService;
    use std::time::Duration;

    fn registry() -> Arc<FormRegistry> {
        FormRegistry::new(Arc::new(TraceIdentityService), Duration::from_secs(6))
    }

    #[tokio::test]
    async fn test_fresh_instances_survive_sweep() {
        let registry = registry();
        registry.open().await;

        let service = SweepService::new(registry.clone(), SweepConfig::default());
        assert_eq!(service.sweep().await, 0);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_zero_timeout_sweeps_everything() {
        let registry = registry();
        registry.open().await;
        tokio::time::sleep(Duration::from_millis(5)).await;

        let service = SweepService::new(
            registry.clone(),
            SweepConfig {
                idle_timeout_secs: 0,
                check_interval_secs: 1,
            },
        );
        assert_eq!(service.sweep().await, 1);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_out_of_range_timeout_removes_nothing() {
        let registry = registry();
        registry.open().await;

        for idle_timeout_secs in [u64::MAX, 10_000_000_000_000_000, i64::MAX as u64] {
            let service = SweepService::new(
                registry.clone(),
                SweepConfig {
                    idle_timeout_secs,
                    check_interval_secs: 1,
                },
            );
            assert_eq!(service.sweep().await, 0);
            assert_eq!(registry.len().await, 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_keeps_sweeping() {
        let registry = registry();
        registry.open().await;

        let service = Arc::new(SweepService::new(
            registry.clone(),
            SweepConfig {
                idle_timeout_secs: 0,
                check_interval_secs: 0,
            },
        ));
        let handle = tokio::spawn(service.start());

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(!handle.is_finished());
        handle.abort();
    }
}
