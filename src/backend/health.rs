//! Background health probing of model backends

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::backend::model_set::ModelSet;

/// Periodically probes every model backend
pub struct HealthMonitor {
    models: Arc<ModelSet>,
}

impl HealthMonitor {
    pub fn new(models: Arc<ModelSet>) -> Self {
        Self { models }
    }

    /// Spawn the probe loop; `None` when the interval is 0
    pub fn start(self, interval_secs: u64) -> Option<JoinHandle<()>> {
        if interval_secs == 0 {
            debug!("Health monitor disabled");
            return None;
        }

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
            loop {
                ticker.tick().await;
                let (total, healthy, unhealthy) = self.models.health_check_all().await;
                if unhealthy > 0 {
                    warn!(total, healthy, unhealthy, "Some model backends are unhealthy");
                } else {
                    debug!(total, healthy, "Model backends healthy");
                }
            }
        });

        Some(handle)
    }
}
