// Monitoring endpoints: on-demand SNMP polls and inventory sync.

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{Id, Onu, OnuStatus, PollResult, SyncResult};

impl ApiClient {
    /// Poll the OLT for status and performance gauges. The OLT record is
    /// updated server-side; refetch it to see the new values.
    ///
    /// `POST /monitoring/olt/{id}/poll`
    pub async fn poll_olt(&self, id: Id) -> Result<PollResult, Error> {
        self.post_empty(&format!("monitoring/olt/{id}/poll")).await
    }

    /// Discover ONUs on the OLT and reconcile them with the inventory.
    ///
    /// `POST /monitoring/olt/{id}/sync-onus`
    pub async fn sync_onus(&self, id: Id) -> Result<SyncResult, Error> {
        self.post_empty(&format!("monitoring/olt/{id}/sync-onus")).await
    }

    /// `GET /monitoring/olt/{id}/onus?status=`
    pub async fn olt_onus(&self, id: Id, status: Option<OnuStatus>) -> Result<Vec<Onu>, Error> {
        let params: Vec<(&str, String)> = status
            .map(|s| ("status", s.to_string()))
            .into_iter()
            .collect();
        self.get_with_params(&format!("monitoring/olt/{id}/onus"), &params)
            .await
    }

    /// ONU record refreshed from the device when reachable.
    ///
    /// `GET /monitoring/onu/{id}/status`
    pub async fn onu_status(&self, id: Id) -> Result<Onu, Error> {
        self.get(&format!("monitoring/onu/{id}/status")).await
    }
}
