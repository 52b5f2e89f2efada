// ── NMS facade ──
//
// Wires one API client, one session and one notifier together. Frontends
// construct an `Nms` at startup and ask it for resource lists; every list
// shares the client, so a 401 from any of them ends the same session.

use std::sync::Arc;

use oltnms_api::types::{
    ActivityLog, ActivityLogFilter, ActivityStats, Alarm, AlarmFilter, DashboardStats, Olt, OltFilter,
    OltPerformance, Onu, OnuFilter, RegisterRequest, User,
};
use oltnms_api::{ApiClient, CredentialStorage, UnauthorizedHandler};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::config::NmsConfig;
use crate::error::CoreError;
use crate::map::{self, MapPoint};
use crate::notice::{Notice, SharedNotifier};
use crate::resource::{RefreshHandle, Resource, ResourceList};
use crate::session::{Redirect, Route, Session};
use crate::validate;
use crate::view::{PageInfo, PageRequest};

/// Cheaply cloneable entry point for frontends.
#[derive(Clone)]
pub struct Nms {
    inner: Arc<NmsInner>,
}

struct NmsInner {
    config: NmsConfig,
    api: Arc<ApiClient>,
    session: Arc<Session>,
    notifier: SharedNotifier,
}

impl Nms {
    /// Build the client and restore the session from `storage`. No request
    /// is sent.
    pub fn new(
        config: NmsConfig,
        storage: Arc<dyn CredentialStorage>,
        notifier: SharedNotifier,
    ) -> Result<Self, CoreError> {
        let api = Arc::new(ApiClient::new(&config.base_url, Arc::clone(&storage), &config.transport())?);
        let session = Arc::new(Session::init(storage));
        let handler: Arc<dyn UnauthorizedHandler> = session.clone();
        api.set_unauthorized_handler(handler);
        debug!(base_url = %api.base_url(), authenticated = session.is_authenticated(), "nms ready");

        Ok(Self {
            inner: Arc::new(NmsInner {
                config,
                api,
                session,
                notifier,
            }),
        })
    }

    pub fn config(&self) -> &NmsConfig {
        &self.inner.config
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.inner.api
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.inner.session
    }

    pub fn notifier(&self) -> &SharedNotifier {
        &self.inner.notifier
    }

    fn notify(&self, notice: Notice) {
        self.inner.notifier.notify(notice);
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Exchange credentials for a token and enter the authenticated state.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Arc<User>, CoreError> {
        validate::login(email, password.expose_secret())?;
        let resp = self.inner.api.login(email.trim(), password.expose_secret()).await?;
        let user = self.inner.session.establish(resp)?;
        self.notify(Notice::success(format!("Logged in as {}", user.name)));
        Ok(user)
    }

    /// Tell the backend (best effort), then drop the local credentials.
    pub async fn logout(&self) -> Result<(), CoreError> {
        if self.inner.session.is_authenticated() {
            if let Err(e) = self.inner.api.logout().await {
                warn!(error = %e, "server-side logout failed");
            }
        }
        self.inner.session.teardown()?;
        self.notify(Notice::info("Logged out"));
        Ok(())
    }

    /// Verify the stored token against the backend.
    pub async fn me(&self) -> Result<User, CoreError> {
        Ok(self.inner.api.me().await?)
    }

    /// Create an operator account (admin only).
    pub async fn register(&self, req: &RegisterRequest) -> Result<User, CoreError> {
        validate::register(req)?;
        let user = self.inner.api.register(req).await?;
        self.notify(Notice::success(format!("User '{}' registered", user.email)));
        Ok(user)
    }

    pub fn guard(&self, route: Route) -> Result<(), Redirect> {
        self.inner.session.guard(route)
    }

    // ── Resource lists ───────────────────────────────────────────────

    fn list<R: Resource>(&self) -> ResourceList<R> {
        ResourceList::new(Arc::clone(&self.inner.api), Arc::clone(&self.inner.notifier))
    }

    /// Mount a list: create it and run the initial fetch.
    pub async fn mount<R: Resource>(&self, filter: R::Filter) -> ResourceList<R> {
        ResourceList::mount(Arc::clone(&self.inner.api), Arc::clone(&self.inner.notifier), filter).await
    }

    pub fn olts(&self) -> ResourceList<Olt> {
        self.list()
    }

    pub fn onus(&self) -> ResourceList<Onu> {
        self.list()
    }

    pub fn alarms(&self) -> ResourceList<Alarm> {
        self.list()
    }

    pub async fn mount_olts(&self, filter: OltFilter) -> ResourceList<Olt> {
        self.mount(filter).await
    }

    pub async fn mount_onus(&self, filter: OnuFilter) -> ResourceList<Onu> {
        self.mount(filter).await
    }

    pub async fn mount_alarms(&self, filter: AlarmFilter) -> ResourceList<Alarm> {
        self.mount(filter).await
    }

    /// Start refreshing `list` at the configured interval.
    pub fn auto_refresh<R: Resource>(&self, list: &ResourceList<R>) -> RefreshHandle {
        list.auto_refresh(self.inner.config.refresh_interval)
    }

    // ── Dashboard ────────────────────────────────────────────────────

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, CoreError> {
        Ok(self.inner.api.dashboard_stats().await?)
    }

    pub async fn olt_performance(&self) -> Result<Vec<OltPerformance>, CoreError> {
        Ok(self.inner.api.olt_performance().await?)
    }

    pub async fn recent_alarms(&self, limit: u32) -> Result<Vec<Alarm>, CoreError> {
        Ok(self.inner.api.recent_alarms(limit).await?)
    }

    // ── Activity ─────────────────────────────────────────────────────

    /// One server-side page of the audit trail.
    pub async fn activity_logs(
        &self,
        filter: ActivityLogFilter,
        page: PageRequest,
    ) -> Result<(Vec<ActivityLog>, PageInfo), CoreError> {
        let resp = self.inner.api.list_activity_logs(&page.apply_to(filter)).await?;
        let info = PageInfo::from(&resp);
        Ok((resp.logs, info))
    }

    pub async fn activity_stats(&self, days: u32) -> Result<ActivityStats, CoreError> {
        Ok(self.inner.api.activity_stats(days).await?)
    }

    // ── Map ──────────────────────────────────────────────────────────

    /// Located OLTs, plus located ONUs when asked for.
    pub async fn map_points(&self, include_onus: bool) -> Result<Vec<MapPoint>, CoreError> {
        let olts = self.inner.api.map_olts().await?;
        let onus = if include_onus {
            Some(self.inner.api.map_onus().await?)
        } else {
            None
        };
        Ok(map::collect(&olts, onus.as_deref()))
    }
}
