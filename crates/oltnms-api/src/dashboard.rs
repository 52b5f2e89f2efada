// Dashboard aggregates

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{Alarm, DashboardStats, OltPerformance};

impl ApiClient {
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, Error> {
        self.get("dashboard/stats").await
    }

    pub async fn olt_performance(&self) -> Result<Vec<OltPerformance>, Error> {
        self.get("dashboard/olt-performance").await
    }

    /// Most recent active alarms, newest first.
    pub async fn recent_alarms(&self, limit: u32) -> Result<Vec<Alarm>, Error> {
        self.get_with_params("dashboard/recent-alarms", &[("limit", limit.to_string())])
            .await
    }
}
