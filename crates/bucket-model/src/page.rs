//! Paged listings and point-lookup results.

use serde::{Deserialize, Serialize};

use crate::{ArrayRecord, ModelError, Result};

/// Number of records the remote store returns per listing page.
pub const PAGE_SIZE: usize = 50;

/// One page of stored arrays.
///
/// A point lookup by id produces a page with at most one item and no total
/// count, since paging does not apply to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<ArrayRecord>,
    /// Total number of stored arrays; `None` for point lookups.
    pub total_count: Option<u64>,
    /// 1-based page number.
    pub page_number: u32,
}

impl Page {
    /// A listing page returned by the store.
    pub fn listing(items: Vec<ArrayRecord>, total_count: u64, page_number: u32) -> Result<Self> {
        if page_number == 0 {
            return Err(ModelError::InvalidPage(page_number));
        }
        Ok(Self {
            items,
            total_count: Some(total_count),
            page_number,
        })
    }

    /// The result of a point lookup; `None` means the id does not exist.
    pub fn lookup(record: Option<ArrayRecord>) -> Self {
        Self {
            items: record.into_iter().collect(),
            total_count: None,
            page_number: 1,
        }
    }

    pub const fn page_size(&self) -> usize {
        PAGE_SIZE
    }

    pub fn is_lookup(&self) -> bool {
        self.total_count.is_none()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether this page was filled completely.
    pub fn is_full(&self) -> bool {
        self.items.len() >= PAGE_SIZE
    }

    /// Number of listing pages implied by the total count.
    pub fn page_count(&self) -> u32 {
        match self.total_count {
            Some(total) => {
                let pages = total.div_ceil(PAGE_SIZE as u64).max(1);
                u32::try_from(pages).unwrap_or(u32::MAX)
            }
            None => 1,
        }
    }
}
