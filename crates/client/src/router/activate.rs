//! Activation-time cleanup of stale cache generations.

use futures_util::future::join_all;

use super::{CacheRouter, Phase};
use crate::fetch::Fetcher;

/// Outcome of an activation sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationReport {
    /// Generations removed.
    pub deleted: Vec<String>,
    /// Generations whose deletion failed; retried on the next activation.
    pub failed: Vec<String>,
}

impl<F: Fetcher> CacheRouter<F> {
    /// Delete every generation except the current one.
    ///
    /// Deletions run concurrently and all settle before this returns.
    /// Failures are logged and reported, never raised.
    pub async fn activate(&self) -> ActivationReport {
        tracing::info!(cache = %self.config.cache_name, "Activating");

        if self.phase().await == Phase::Pending {
            tracing::warn!(cache = %self.config.cache_name, "activating before a successful install");
        }

        let mut report = ActivationReport::default();

        let names = match self.cache.generation_names().await {
            Ok(names) => names,
            Err(err) => {
                tracing::warn!(error = %err, "could not enumerate cache generations; skipping cleanup");
                self.set_phase(Phase::Activated).await;
                return report;
            }
        };

        let stale = names.into_iter().filter(|name| *name != self.config.cache_name);
        let outcomes = join_all(stale.map(|name| async move {
            tracing::info!(cache = %name, "Deleting old cache");
            let result = self.cache.delete_generation(&name).await;
            (name, result)
        }))
        .await;

        for (name, result) in outcomes {
            match result {
                Ok(_) => report.deleted.push(name),
                Err(err) => {
                    tracing::warn!(cache = %name, error = %err, "failed to delete old cache");
                    report.failed.push(name);
                }
            }
        }

        self.set_phase(Phase::Activated).await;
        report
    }
}
