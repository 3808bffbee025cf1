//! The CRUD surface every backend exposes to views.

use serde::{Deserialize, Serialize};

use auix_core::prelude::*;
use auix_core::{ChangeSet, FieldKey, Params, Preload, Record, RecordId};

/// Result of `create`/`update`: the persisted record, or the change set
/// carrying validation errors.
pub type SaveResult = std::result::Result<Record, ChangeSet>;

/// Query options for `list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListOptions {
    /// 1-based page number.
    pub page: usize,
    /// Rows per page; 0 returns every row.
    pub page_size: usize,
    pub order_by: Option<FieldKey>,
    /// Equality filters on scalar fields.
    pub filters: Params,
    pub preload: Preload,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 0,
            order_by: None,
            filters: Params::new(),
            preload: Preload::none(),
        }
    }
}

impl ListOptions {
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn order_by(mut self, key: impl Into<FieldKey>) -> Self {
        self.order_by = Some(key.into());
        self
    }

    pub fn preload(mut self, preload: Preload) -> Self {
        self.preload = preload;
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.filters.insert(key, value);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageInfo {
    pub page_number: usize,
    pub page_size: usize,
    pub total_entries: usize,
    pub total_pages: usize,
}

impl PageInfo {
    pub fn for_total(page_number: usize, page_size: usize, total_entries: usize) -> Self {
        let total_pages = if page_size == 0 {
            usize::from(total_entries > 0)
        } else {
            total_entries.div_ceil(page_size)
        };
        Self {
            page_number,
            page_size,
            total_entries,
            total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub entries: Vec<Record>,
    pub info: PageInfo,
}

/// Per-resource CRUD operations.
///
/// Validation failures are values (`Err(ChangeSet)` from `create`/`update`);
/// `Error` is reserved for backend failures.
pub trait CrudGateway: Send + Sync {
    fn list(&self, opts: &ListOptions) -> Result<Page>;

    /// Re-page with the options of an earlier listing.
    fn to_page(&self, opts: &ListOptions, page_number: usize) -> Result<Page> {
        let opts = ListOptions {
            page: page_number.max(1),
            ..opts.clone()
        };
        self.list(&opts)
    }

    fn get(&self, id: &RecordId, preload: &Preload) -> Result<Option<Record>>;

    /// Validate `params` against `record` without persisting.
    fn change(&self, record: &Record, params: &Params) -> ChangeSet;

    /// In-memory record for a "new" form, pre-filled from `attrs`.
    fn new_record(&self, attrs: &Params, preload: &Preload) -> Record;

    fn create(&self, params: &Params) -> Result<SaveResult>;

    fn update(&self, record: &Record, params: &Params) -> Result<SaveResult>;

    fn delete(&self, record: &Record) -> Result<Record>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_info_totals() {
        let info = PageInfo::for_total(1, 10, 25);
        assert_eq!(info.total_pages, 3);
        assert!(info.has_next());
        assert!(!info.has_previous());

        let unpaged = PageInfo::for_total(1, 0, 4);
        assert_eq!(unpaged.total_pages, 1);
        assert!(!unpaged.has_next());

        assert_eq!(PageInfo::for_total(1, 0, 0).total_pages, 0);
    }
}
