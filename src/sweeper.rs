use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info};

use crate::store::{Store, StoreResult};

/// Periodically deactivates campaigns whose end date has passed.
pub struct CampaignSweeper {
    store: Arc<dyn Store>,
    period: Option<Duration>,
}

impl CampaignSweeper {
    /// A zero interval disables the loop.
    pub fn new(store: Arc<dyn Store>, interval_secs: u64) -> Self {
        let period = (interval_secs > 0).then(|| Duration::from_secs(interval_secs));
        Self { store, period }
    }

    pub async fn run(self) {
        let Some(period) = self.period else {
            info!("campaign sweeper disabled");
            return;
        };

        info!(interval_secs = period.as_secs(), "starting campaign sweeper");
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(err) = self.sweep_once() {
                error!(error = %err, "campaign sweep failed");
            }
        }
    }

    pub fn sweep_once(&self) -> StoreResult<usize> {
        let today = Utc::now().date_naive();
        let closed = self.store.close_expired_campaigns(today)?;
        if closed > 0 {
            info!(closed, %today, "closed expired campaigns");
        }
        Ok(closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewJobCampaign;
    use crate::store::{JobCampaignStore, MemoryStore};

    #[tokio::test]
    async fn disabled_sweeper_returns_immediately() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        CampaignSweeper::new(store, 0).run().await;
    }

    #[test]
    fn sweep_once_closes_past_campaigns() {
        let memory = Arc::new(MemoryStore::new());
        let yesterday = Utc::now().date_naive().pred_opt().unwrap();
        memory
            .insert_job_campaign(NewJobCampaign {
                title: "Harvest hiring".to_string(),
                description: None,
                location: None,
                start_date: None,
                end_date: Some(yesterday),
                active: true,
            })
            .unwrap();

        let sweeper = CampaignSweeper::new(memory.clone(), 60);
        assert_eq!(sweeper.sweep_once().unwrap(), 1);
        assert!(memory.list_job_campaigns(true).unwrap().is_empty());
    }
}
