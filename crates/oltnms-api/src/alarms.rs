// Alarm endpoints

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{Alarm, AlarmFilter, Id, MessageResponse};

impl ApiClient {
    /// `GET /alarms` with optional status, severity and device filters.
    pub async fn list_alarms(&self, filter: &AlarmFilter) -> Result<Vec<Alarm>, Error> {
        self.get_with_params("alarms", &filter.to_query()).await
    }

    pub async fn get_alarm(&self, id: Id) -> Result<Alarm, Error> {
        self.get(&format!("alarms/{id}")).await
    }

    /// `POST /alarms/{id}/acknowledge`
    pub async fn acknowledge_alarm(&self, id: Id) -> Result<Alarm, Error> {
        self.post_empty(&format!("alarms/{id}/acknowledge")).await
    }

    /// `POST /alarms/{id}/clear`
    pub async fn clear_alarm(&self, id: Id) -> Result<Alarm, Error> {
        self.post_empty(&format!("alarms/{id}/clear")).await
    }

    pub async fn delete_alarm(&self, id: Id) -> Result<MessageResponse, Error> {
        self.delete(&format!("alarms/{id}")).await
    }
}
