// ── Generic resource lists ──
//
// One state container serves every entity screen. Per-entity behaviour
// (which endpoints to call, how to validate a form) lives in the
// `Resource` impls; the list itself only knows ids and snapshots.

mod entities;
mod list;
mod refresh;

use std::fmt::{Debug, Display};
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use oltnms_api::ApiClient;

use crate::error::CoreError;

pub use list::ResourceList;
pub use refresh::RefreshHandle;

/// An entity type that can be listed and deleted through the API.
pub trait Resource: Clone + PartialEq + Debug + Send + Sync + 'static {
    type Id: Copy + Eq + Hash + Display + Debug + Send + Sync + 'static;
    type Filter: Clone + Default + Debug + Send + Sync + 'static;

    /// Human-readable entity name used in notices and errors ("OLT").
    const KIND: &'static str;

    fn id(&self) -> Self::Id;

    /// Short label for notices, e.g. the device name.
    fn label(&self) -> String;

    fn list(
        api: &ApiClient,
        filter: &Self::Filter,
    ) -> impl Future<Output = Result<Vec<Self>, oltnms_api::Error>> + Send;

    fn delete(api: &ApiClient, id: Self::Id) -> impl Future<Output = Result<(), oltnms_api::Error>> + Send;
}

/// A resource operators create and edit through forms.
pub trait Editable: Resource {
    type Create: Debug + Send + Sync;
    type Update: Debug + Send + Sync;

    fn validate_create(_body: &Self::Create) -> Result<(), CoreError> {
        Ok(())
    }

    fn validate_update(_body: &Self::Update) -> Result<(), CoreError> {
        Ok(())
    }

    fn create(
        api: &ApiClient,
        body: &Self::Create,
    ) -> impl Future<Output = Result<Self, oltnms_api::Error>> + Send;

    fn update(
        api: &ApiClient,
        id: Self::Id,
        body: &Self::Update,
    ) -> impl Future<Output = Result<Self, oltnms_api::Error>> + Send;
}

/// Snapshot of one list: the items in server order plus fetch status.
#[derive(Debug, Clone)]
pub struct ListState<R: Resource> {
    pub items: IndexMap<R::Id, Arc<R>>,
    pub loading: bool,
    /// Message of the last failed fetch, cleared when a fetch starts.
    pub error: Option<String>,
    pub last_fetched: Option<DateTime<Utc>>,
}

impl<R: Resource> Default for ListState<R> {
    fn default() -> Self {
        Self {
            items: IndexMap::new(),
            loading: false,
            error: None,
            last_fetched: None,
        }
    }
}

impl<R: Resource> ListState<R> {
    pub fn items(&self) -> Vec<Arc<R>> {
        self.items.values().cloned().collect()
    }

    pub fn get(&self, id: R::Id) -> Option<&Arc<R>> {
        self.items.get(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
