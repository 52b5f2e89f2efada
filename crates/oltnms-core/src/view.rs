// ── Client-side search and pagination ──
//
// Applied on top of whatever the server returned for the current filter.
// Search never re-checks server-side filter fields such as status; it only
// matches free text against each entity's descriptive fields.

use std::sync::Arc;

use oltnms_api::types::{ActivityLog, ActivityLogFilter, ActivityLogPage, Alarm, MapOlt, MapOnu, Olt, Onu};
use serde::Serialize;

// ── Search ───────────────────────────────────────────────────────────

/// Fields a free-text search looks at.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;

    /// Case-insensitive substring match. `needle` must already be
    /// lowercased.
    fn matches(&self, needle: &str) -> bool {
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

impl<T: Searchable + ?Sized> Searchable for Arc<T> {
    fn search_fields(&self) -> Vec<&str> {
        (**self).search_fields()
    }
}

/// Keep the items matching `query`. A blank query keeps everything.
pub fn search<T: Searchable + Clone>(items: &[T], query: &str) -> Vec<T> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items.to_vec();
    }
    items.iter().filter(|item| item.matches(&needle)).cloned().collect()
}

impl Searchable for Olt {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.ip_address.as_str()];
        fields.extend(self.hostname.as_deref());
        fields.extend(self.model.as_deref());
        fields.extend(self.location.as_deref());
        fields
    }
}

impl Searchable for Onu {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.serial_number.as_str()];
        fields.extend(self.name.as_deref());
        fields.extend(self.mac_address.as_deref());
        fields.extend(self.ip_address.as_deref());
        fields.extend(self.description.as_deref());
        fields
    }
}

impl Searchable for Alarm {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.alarm_type.as_str(), self.message.as_str()];
        fields.extend(self.details.as_deref());
        fields
    }
}

impl Searchable for ActivityLog {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.description.as_str(), self.entity_type.as_str()];
        if let Some(user) = &self.user {
            fields.push(user.name.as_str());
            fields.push(user.email.as_str());
        }
        fields
    }
}

impl Searchable for MapOlt {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.ip_address.as_str()]
    }
}

impl Searchable for MapOnu {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.serial_number.as_str()];
        fields.extend(self.olt_name.as_deref());
        fields.extend(self.location_name.as_deref());
        fields
    }
}

// ── Pagination ───────────────────────────────────────────────────────

/// A window into a list. `limit == 0` means no limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: usize,
    pub limit: usize,
}

impl PageRequest {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// Carry this window to the server as `skip`/`limit` for activity logs.
    pub fn apply_to(self, filter: ActivityLogFilter) -> ActivityLogFilter {
        ActivityLogFilter {
            skip: Some(self.offset as u64),
            limit: (self.limit > 0).then_some(self.limit as u64),
            ..filter
        }
    }
}

/// Where a page sits in the full result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}

impl PageInfo {
    /// Index one past the last item on this page.
    pub fn end(&self) -> usize {
        if self.limit == 0 {
            self.total
        } else {
            self.offset.saturating_add(self.limit).min(self.total)
        }
    }

    pub fn has_next(&self) -> bool {
        self.end() < self.total
    }

    pub fn has_previous(&self) -> bool {
        self.offset > 0
    }

    pub fn next(&self) -> Option<PageRequest> {
        self.has_next().then(|| PageRequest::new(self.end(), self.limit))
    }
}

impl From<&ActivityLogPage> for PageInfo {
    #[allow(clippy::cast_possible_truncation)]
    fn from(page: &ActivityLogPage) -> Self {
        Self {
            total: page.total as usize,
            offset: page.skip as usize,
            limit: page.limit as usize,
        }
    }
}

/// Slice one page out of `items`. An offset past the end yields an empty
/// page with the true total.
pub fn paginate<T: Clone>(items: &[T], page: PageRequest) -> (Vec<T>, PageInfo) {
    let info = PageInfo {
        total: items.len(),
        offset: page.offset,
        limit: page.limit,
    };
    let start = page.offset.min(items.len());
    let slice = items[start..info.end().max(start)].to_vec();
    (slice, info)
}
