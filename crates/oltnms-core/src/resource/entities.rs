// ── Per-entity wiring ──
//
// Endpoint bindings and form checks for each listable entity, plus the
// entity-specific actions (polling, provisioning, alarm transitions) that
// patch the same list state as the generic mutators.

use std::future::Future;
use std::sync::Arc;

use oltnms_api::ApiClient;
use oltnms_api::types::{
    Alarm, AlarmFilter, AlarmStatus, Id, MessageResponse, Olt, OltCreate, OltFilter, OltUpdate, Onu, OnuCreate,
    OnuFilter, OnuUpdate, PollResult, PppoeAccount, PppoeAccountCreate, ProvisionOnuRequest, SyncResult,
};
use tracing::info;

use super::list::not_found;
use super::{Editable, Resource, ResourceList};
use crate::error::CoreError;
use crate::notice::Notice;
use crate::validate;

// ── OLT ──────────────────────────────────────────────────────────────

impl Resource for Olt {
    type Id = Id;
    type Filter = OltFilter;

    const KIND: &'static str = "OLT";

    fn id(&self) -> Id {
        self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn list(api: &ApiClient, filter: &OltFilter) -> impl Future<Output = Result<Vec<Self>, oltnms_api::Error>> + Send {
        api.list_olts(filter)
    }

    fn delete(api: &ApiClient, id: Id) -> impl Future<Output = Result<(), oltnms_api::Error>> + Send {
        async move { api.delete_olt(id).await.map(drop) }
    }
}

impl Editable for Olt {
    type Create = OltCreate;
    type Update = OltUpdate;

    fn validate_create(body: &OltCreate) -> Result<(), CoreError> {
        validate::olt_create(body)
    }

    fn validate_update(body: &OltUpdate) -> Result<(), CoreError> {
        validate::olt_update(body)
    }

    fn create(api: &ApiClient, body: &OltCreate) -> impl Future<Output = Result<Self, oltnms_api::Error>> + Send {
        api.create_olt(body)
    }

    fn update(
        api: &ApiClient,
        id: Id,
        body: &OltUpdate,
    ) -> impl Future<Output = Result<Self, oltnms_api::Error>> + Send {
        api.update_olt(id, body)
    }
}

impl ResourceList<Olt> {
    /// Poll the device, then refetch its record so the gauges in the list
    /// reflect the poll.
    pub async fn poll(&self, id: Id) -> Result<PollResult, CoreError> {
        let result = self.api().poll_olt(id).await.map_err(|e| not_found::<Olt>(e, id))?;
        let olt = self.api().get_olt(id).await.map_err(|e| not_found::<Olt>(e, id))?;
        let label = olt.name.clone();
        self.replace_local(Arc::new(olt));

        match &result.error {
            Some(reason) => self.notify(Notice::warning(format!("OLT '{label}' poll failed: {reason}"))),
            None => self.notify(Notice::success(format!("OLT '{label}' polled: {}", result.status))),
        }
        Ok(result)
    }

    /// Reconcile the OLT's ONUs with the inventory. The ONU list is not
    /// touched here; refetch it to see the outcome.
    pub async fn sync_onus(&self, id: Id) -> Result<SyncResult, CoreError> {
        let result = self.api().sync_onus(id).await.map_err(|e| not_found::<Olt>(e, id))?;
        let label = self.get(id).map_or_else(|| id.to_string(), |o| o.name.clone());
        match &result.error {
            Some(reason) => self.notify(Notice::warning(format!("ONU sync on '{label}' failed: {reason}"))),
            None => {
                info!(olt = id, synced = result.synced, "ONU sync finished");
                self.notify(Notice::success(format!(
                    "ONU sync on '{label}': {} synced, {} created, {} updated",
                    result.synced, result.created, result.updated
                )));
            }
        }
        Ok(result)
    }
}

// ── ONU ──────────────────────────────────────────────────────────────

impl Resource for Onu {
    type Id = Id;
    type Filter = OnuFilter;

    const KIND: &'static str = "ONU";

    fn id(&self) -> Id {
        self.id
    }

    fn label(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.serial_number.clone())
    }

    fn list(api: &ApiClient, filter: &OnuFilter) -> impl Future<Output = Result<Vec<Self>, oltnms_api::Error>> + Send {
        api.list_onus(filter)
    }

    fn delete(api: &ApiClient, id: Id) -> impl Future<Output = Result<(), oltnms_api::Error>> + Send {
        async move { api.delete_onu(id).await.map(drop) }
    }
}

impl Editable for Onu {
    type Create = OnuCreate;
    type Update = OnuUpdate;

    fn validate_create(body: &OnuCreate) -> Result<(), CoreError> {
        validate::onu_create(body)
    }

    fn validate_update(body: &OnuUpdate) -> Result<(), CoreError> {
        validate::onu_update(body)
    }

    fn create(api: &ApiClient, body: &OnuCreate) -> impl Future<Output = Result<Self, oltnms_api::Error>> + Send {
        api.create_onu(body)
    }

    fn update(
        api: &ApiClient,
        id: Id,
        body: &OnuUpdate,
    ) -> impl Future<Output = Result<Self, oltnms_api::Error>> + Send {
        api.update_onu(id, body)
    }
}

impl ResourceList<Onu> {
    /// Provision an ONU on its OLT and append it to the list.
    pub async fn provision(&self, req: &ProvisionOnuRequest) -> Result<Arc<Onu>, CoreError> {
        validate::provision(req)?;
        let onu = Arc::new(self.api().provision_onu(req).await?);
        self.put_local(Arc::clone(&onu));
        self.notify(Notice::success(format!(
            "ONU {} provisioned on PON {}/{}",
            onu.serial_number, onu.pon_port, onu.onu_id
        )));
        Ok(onu)
    }

    /// Remove the ONU from its OLT and from the list.
    pub async fn deprovision(&self, id: Id) -> Result<(), CoreError> {
        self.api()
            .deprovision_onu(id)
            .await
            .map_err(|e| not_found::<Onu>(e, id))?;
        let label = self.remove_local(id).map_or_else(|| id.to_string(), |o| o.label());
        self.notify(Notice::success(format!("ONU '{label}' deprovisioned")));
        Ok(())
    }

    pub async fn change_serial(&self, id: Id, serial: &str) -> Result<Arc<Onu>, CoreError> {
        validate::serial_number(serial)?;
        let onu = self
            .api()
            .update_onu_serial(id, serial.trim())
            .await
            .map_err(|e| not_found::<Onu>(e, id))?;
        let onu = Arc::new(onu);
        self.replace_local(Arc::clone(&onu));
        self.notify(Notice::success(format!("ONU serial changed to {}", onu.serial_number)));
        Ok(onu)
    }

    pub async fn rename(&self, id: Id, name: &str) -> Result<Arc<Onu>, CoreError> {
        validate::required("name", name)?;
        let onu = self
            .api()
            .update_onu_name(id, name.trim())
            .await
            .map_err(|e| not_found::<Onu>(e, id))?;
        let onu = Arc::new(onu);
        self.replace_local(Arc::clone(&onu));
        self.notify(Notice::success(format!("ONU renamed to '{}'", onu.label())));
        Ok(onu)
    }

    pub async fn reboot(&self, id: Id) -> Result<MessageResponse, CoreError> {
        let resp = self.api().reboot_onu(id).await.map_err(|e| not_found::<Onu>(e, id))?;
        self.notify(Notice::success(resp.message.clone()));
        Ok(resp)
    }

    pub async fn factory_reset(&self, id: Id) -> Result<MessageResponse, CoreError> {
        let resp = self.api().reset_onu(id).await.map_err(|e| not_found::<Onu>(e, id))?;
        self.notify(Notice::success(resp.message.clone()));
        Ok(resp)
    }

    pub async fn add_pppoe(&self, id: Id, req: &PppoeAccountCreate) -> Result<PppoeAccount, CoreError> {
        validate::pppoe_account(req)?;
        let account = self
            .api()
            .create_pppoe_account(id, req)
            .await
            .map_err(|e| not_found::<Onu>(e, id))?;
        self.notify(Notice::success(format!("PPPoE account '{}' created", account.username)));
        Ok(account)
    }

    /// Refresh one ONU from the device and swap it into the list.
    pub async fn refresh_status(&self, id: Id) -> Result<Arc<Onu>, CoreError> {
        let onu = self.api().onu_status(id).await.map_err(|e| not_found::<Onu>(e, id))?;
        let onu = Arc::new(onu);
        self.replace_local(Arc::clone(&onu));
        Ok(onu)
    }
}

// ── Alarm ────────────────────────────────────────────────────────────

/// Alarms are raised by the backend; operators only move them along
/// their state machine or delete them.
impl Resource for Alarm {
    type Id = Id;
    type Filter = AlarmFilter;

    const KIND: &'static str = "Alarm";

    fn id(&self) -> Id {
        self.id
    }

    fn label(&self) -> String {
        format!("#{} {}", self.id, self.alarm_type)
    }

    fn list(api: &ApiClient, filter: &AlarmFilter) -> impl Future<Output = Result<Vec<Self>, oltnms_api::Error>> + Send {
        api.list_alarms(filter)
    }

    fn delete(api: &ApiClient, id: Id) -> impl Future<Output = Result<(), oltnms_api::Error>> + Send {
        async move { api.delete_alarm(id).await.map(drop) }
    }
}

impl ResourceList<Alarm> {
    pub async fn acknowledge(&self, id: Id) -> Result<Arc<Alarm>, CoreError> {
        self.transition(id, AlarmStatus::Acknowledged).await
    }

    pub async fn clear(&self, id: Id) -> Result<Arc<Alarm>, CoreError> {
        self.transition(id, AlarmStatus::Cleared).await
    }

    /// Check the move against the listed alarm's status, then ask the
    /// backend and swap in the alarm it returns.
    async fn transition(&self, id: Id, target: AlarmStatus) -> Result<Arc<Alarm>, CoreError> {
        if let Some(current) = self.get(id) {
            if !current.status.can_transition_to(target) {
                return Err(CoreError::InvalidTransition {
                    from: current.status.to_string(),
                    to: target.to_string(),
                });
            }
        }
        let result = match target {
            AlarmStatus::Acknowledged => self.api().acknowledge_alarm(id).await,
            AlarmStatus::Cleared => self.api().clear_alarm(id).await,
            AlarmStatus::Active => {
                return Err(CoreError::InvalidTransition {
                    from: "any".into(),
                    to: target.to_string(),
                });
            }
        };
        let alarm = Arc::new(result.map_err(|e| not_found::<Alarm>(e, id))?);
        self.replace_local(Arc::clone(&alarm));
        self.notify(Notice::success(format!("Alarm #{id} {}", alarm.status)));
        Ok(alarm)
    }
}
