// OLT endpoints

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{Id, MessageResponse, Olt, OltCreate, OltFilter, OltStatusReport, OltUpdate};

impl ApiClient {
    /// `GET /olts`, optionally filtered by status.
    pub async fn list_olts(&self, filter: &OltFilter) -> Result<Vec<Olt>, Error> {
        self.get_with_params("olts", &filter.to_query()).await
    }

    pub async fn get_olt(&self, id: Id) -> Result<Olt, Error> {
        self.get(&format!("olts/{id}")).await
    }

    pub async fn create_olt(&self, body: &OltCreate) -> Result<Olt, Error> {
        self.post("olts", body).await
    }

    pub async fn update_olt(&self, id: Id, body: &OltUpdate) -> Result<Olt, Error> {
        self.put(&format!("olts/{id}"), body).await
    }

    pub async fn delete_olt(&self, id: Id) -> Result<MessageResponse, Error> {
        self.delete(&format!("olts/{id}")).await
    }

    /// Live status read from the device over SNMP.
    ///
    /// `GET /olts/{id}/status`
    pub async fn olt_status(&self, id: Id) -> Result<OltStatusReport, Error> {
        self.get(&format!("olts/{id}/status")).await
    }
}
