// Provisioning endpoints
//
// Unlike the plain ONU CRUD calls, each of these makes the backend push
// configuration to the OLT before touching its database. A device-side
// failure comes back as a 500 with the reason in `detail`.

use serde::Serialize;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{Id, MessageResponse, Onu, PppoeAccount, PppoeAccountCreate, ProvisionOnuRequest};

#[derive(Serialize)]
struct SerialUpdate<'a> {
    serial_number: &'a str,
}

#[derive(Serialize)]
struct NameUpdate<'a> {
    name: &'a str,
}

impl ApiClient {
    /// Register an ONU on its OLT port and in the inventory.
    ///
    /// `POST /provisioning/onu`
    pub async fn provision_onu(&self, req: &ProvisionOnuRequest) -> Result<Onu, Error> {
        self.post("provisioning/onu", req).await
    }

    /// Remove the ONU from the OLT, then from the inventory.
    ///
    /// `DELETE /provisioning/onu/{id}`
    pub async fn deprovision_onu(&self, id: Id) -> Result<MessageResponse, Error> {
        self.delete(&format!("provisioning/onu/{id}")).await
    }

    /// `PUT /provisioning/onu/{id}/serial`. A duplicate serial is a 400.
    pub async fn update_onu_serial(&self, id: Id, serial_number: &str) -> Result<Onu, Error> {
        self.put(&format!("provisioning/onu/{id}/serial"), &SerialUpdate { serial_number })
            .await
    }

    /// `PUT /provisioning/onu/{id}/name`
    pub async fn update_onu_name(&self, id: Id, name: &str) -> Result<Onu, Error> {
        self.put(&format!("provisioning/onu/{id}/name"), &NameUpdate { name })
            .await
    }

    pub async fn reboot_onu(&self, id: Id) -> Result<MessageResponse, Error> {
        self.post_empty(&format!("provisioning/onu/{id}/reboot")).await
    }

    /// Factory reset. Destroys the ONU's local configuration.
    pub async fn reset_onu(&self, id: Id) -> Result<MessageResponse, Error> {
        self.post_empty(&format!("provisioning/onu/{id}/reset")).await
    }

    /// `POST /provisioning/onu/{id}/pppoe`
    pub async fn create_pppoe_account(
        &self,
        id: Id,
        req: &PppoeAccountCreate,
    ) -> Result<PppoeAccount, Error> {
        self.post(&format!("provisioning/onu/{id}/pppoe"), req).await
    }
}
