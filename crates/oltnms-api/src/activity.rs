// Activity log (audit trail) endpoints. Read-only.

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{ActivityLogFilter, ActivityLogPage, ActivityStats};

impl ApiClient {
    /// One server-side page of the audit trail, newest first.
    ///
    /// `GET /activity-logs`
    pub async fn list_activity_logs(&self, filter: &ActivityLogFilter) -> Result<ActivityLogPage, Error> {
        self.get_with_params("activity-logs", &filter.to_query()).await
    }

    /// Counts per activity type and per user over the last `days` days.
    ///
    /// `GET /activity-logs/stats?days=`
    pub async fn activity_stats(&self, days: u32) -> Result<ActivityStats, Error> {
        self.get_with_params("activity-logs/stats", &[("days", days.to_string())])
            .await
    }
}
