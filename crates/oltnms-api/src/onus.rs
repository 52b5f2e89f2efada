// ONU endpoints

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{Id, MessageResponse, Onu, OnuCreate, OnuFilter, OnuUpdate};

impl ApiClient {
    /// `GET /onus?olt_id=&status=`
    pub async fn list_onus(&self, filter: &OnuFilter) -> Result<Vec<Onu>, Error> {
        self.get_with_params("onus", &filter.to_query()).await
    }

    pub async fn get_onu(&self, id: Id) -> Result<Onu, Error> {
        self.get(&format!("onus/{id}")).await
    }

    /// Register an ONU record without touching the device. Use
    /// [`ApiClient::provision_onu`] to configure the OLT as well.
    pub async fn create_onu(&self, body: &OnuCreate) -> Result<Onu, Error> {
        self.post("onus", body).await
    }

    pub async fn update_onu(&self, id: Id, body: &OnuUpdate) -> Result<Onu, Error> {
        self.put(&format!("onus/{id}"), body).await
    }

    pub async fn delete_onu(&self, id: Id) -> Result<MessageResponse, Error> {
        self.delete(&format!("onus/{id}")).await
    }
}
