// ── Resource list state container ──
//
// Fetch → state → mutate → patch. Reads store their failure in the list
// state and keep the previous items; mutators return their errors to the
// caller and patch local state only on success.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use indexmap::IndexMap;
use oltnms_api::ApiClient;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::{Editable, ListState, Resource};
use crate::error::CoreError;
use crate::notice::{Notice, SharedNotifier};

/// Live list of one entity type.
///
/// Cloning is cheap and every clone shares the same state.
pub struct ResourceList<R: Resource> {
    inner: Arc<Inner<R>>,
}

struct Inner<R: Resource> {
    api: Arc<ApiClient>,
    notifier: SharedNotifier,
    filter: Mutex<R::Filter>,
    state: watch::Sender<ListState<R>>,
}

impl<R: Resource> Clone for ResourceList<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Resource> ResourceList<R> {
    /// Create an empty list. Nothing is fetched until [`mount`](Self::mount)
    /// or [`fetch`](Self::fetch).
    pub fn new(api: Arc<ApiClient>, notifier: SharedNotifier) -> Self {
        let (state, _) = watch::channel(ListState::default());
        Self {
            inner: Arc::new(Inner {
                api,
                notifier,
                filter: Mutex::new(R::Filter::default()),
                state,
            }),
        }
    }

    /// Create the list and run the initial fetch with `filter`.
    ///
    /// A failed initial fetch is recorded in the state, not returned.
    pub async fn mount(api: Arc<ApiClient>, notifier: SharedNotifier, filter: R::Filter) -> Self {
        let list = Self::new(api, notifier);
        if let Err(e) = list.fetch(filter).await {
            debug!(kind = R::KIND, error = %e, "initial fetch failed");
        }
        list
    }

    pub(crate) fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    pub(crate) fn notify(&self, notice: Notice) {
        self.inner.notifier.notify(notice);
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn state(&self) -> ListState<R> {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListState<R>> {
        self.inner.state.subscribe()
    }

    pub fn items(&self) -> Vec<Arc<R>> {
        self.inner.state.borrow().items()
    }

    pub fn get(&self, id: R::Id) -> Option<Arc<R>> {
        self.inner.state.borrow().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.state.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.state.borrow().is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.inner.state.borrow().error.clone()
    }

    pub fn filter(&self) -> R::Filter {
        match self.inner.filter.lock() {
            Ok(f) => f.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    // ── Fetching ─────────────────────────────────────────────────────

    /// Replace the server-side filter and refetch.
    pub async fn fetch(&self, filter: R::Filter) -> Result<(), CoreError> {
        match self.inner.filter.lock() {
            Ok(mut f) => *f = filter,
            Err(poisoned) => *poisoned.into_inner() = filter,
        }
        self.refresh().await
    }

    /// Refetch with the current filter.
    ///
    /// On failure the error message is stored and the previous items stay
    /// in place. Concurrent refreshes are not coordinated: the last one to
    /// complete wins.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let filter = self.filter();
        self.inner.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        debug!(kind = R::KIND, ?filter, "fetching list");
        match R::list(&self.inner.api, &filter).await {
            Ok(fresh) => {
                self.inner.state.send_modify(|s| {
                    s.items = reuse_unchanged(&s.items, fresh);
                    s.loading = false;
                    s.last_fetched = Some(Utc::now());
                });
                Ok(())
            }
            Err(e) => {
                let err = CoreError::from(e);
                warn!(kind = R::KIND, error = %err, "list fetch failed");
                self.inner.state.send_modify(|s| {
                    s.loading = false;
                    s.error = Some(err.to_string());
                });
                Err(err)
            }
        }
    }

    // ── Mutators ─────────────────────────────────────────────────────

    /// Delete an entity and drop it from the list. Deleting an id the
    /// server no longer knows is a `NotFound` error.
    pub async fn delete(&self, id: R::Id) -> Result<(), CoreError> {
        R::delete(&self.inner.api, id)
            .await
            .map_err(|e| not_found::<R>(e, id))?;
        let removed = self.remove_local(id);
        let label = removed.map_or_else(|| id.to_string(), |r| r.label());
        self.notify(Notice::success(format!("{} '{label}' deleted", R::KIND)));
        Ok(())
    }

    /// Add an entity loaded on its own (a detail view) so later mutators
    /// see its current state.
    pub fn track(&self, item: R) -> Arc<R> {
        let item = Arc::new(item);
        self.put_local(Arc::clone(&item));
        item
    }

    // ── Local patching ───────────────────────────────────────────────

    /// Insert or replace in place.
    pub(crate) fn put_local(&self, item: Arc<R>) {
        self.inner.state.send_modify(|s| {
            s.items.insert(item.id(), item);
        });
    }

    /// Replace an element that is already listed. Entities outside the
    /// current view are not pulled in.
    pub(crate) fn replace_local(&self, item: Arc<R>) {
        self.inner.state.send_if_modified(|s| match s.items.get_mut(&item.id()) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        });
    }

    pub(crate) fn remove_local(&self, id: R::Id) -> Option<Arc<R>> {
        let mut removed = None;
        self.inner.state.send_if_modified(|s| {
            removed = s.items.shift_remove(&id);
            removed.is_some()
        });
        removed
    }
}

impl<R: Editable> ResourceList<R> {
    /// Create an entity and append the server's copy.
    ///
    /// If the returned id is already listed, that element is replaced in
    /// place instead, so an entity never appears twice.
    pub async fn create(&self, body: &R::Create) -> Result<Arc<R>, CoreError> {
        R::validate_create(body)?;
        let created = Arc::new(R::create(&self.inner.api, body).await?);
        self.put_local(Arc::clone(&created));
        self.notify(Notice::success(format!("{} '{}' created", R::KIND, created.label())));
        Ok(created)
    }

    /// Update an entity and swap in the server's copy. Other elements are
    /// left untouched, down to their `Arc`s.
    pub async fn update(&self, id: R::Id, body: &R::Update) -> Result<Arc<R>, CoreError> {
        R::validate_update(body)?;
        let updated = R::update(&self.inner.api, id, body)
            .await
            .map_err(|e| not_found::<R>(e, id))?;
        let updated = Arc::new(updated);
        self.replace_local(Arc::clone(&updated));
        self.notify(Notice::success(format!("{} '{}' updated", R::KIND, updated.label())));
        Ok(updated)
    }
}

/// Map a 404 onto this resource's `NotFound`.
pub(crate) fn not_found<R: Resource>(err: oltnms_api::Error, id: R::Id) -> CoreError {
    if err.is_not_found() {
        CoreError::NotFound {
            entity_type: R::KIND,
            identifier: id.to_string(),
        }
    } else {
        err.into()
    }
}

/// Build the new item map, keeping the old `Arc` for any entity whose
/// contents did not change.
fn reuse_unchanged<R: Resource>(old: &IndexMap<R::Id, Arc<R>>, fresh: Vec<R>) -> IndexMap<R::Id, Arc<R>> {
    fresh
        .into_iter()
        .map(|item| {
            let id = item.id();
            let arc = match old.get(&id) {
                Some(prev) if **prev == item => Arc::clone(prev),
                _ => Arc::new(item),
            };
            (id, arc)
        })
        .collect()
}
