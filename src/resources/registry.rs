//! Resource Registry
//!
//! Per-category ordered handle lists. The registry itself does no locking;
//! the cleanup coordinator owns it behind a mutex.

use std::collections::BTreeMap;

use crate::resources::handle::ResourceHandle;
use crate::resources::types::{ResourceCategory, ResourceStats};

/// Why a registration was not recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NullHandle,
    CategoryMismatch { handle: ResourceCategory },
}

/// Ordered handle lists keyed by category
pub struct ResourceRegistry {
    resources: BTreeMap<ResourceCategory, Vec<ResourceHandle>>,
}

impl std::fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.resources.iter().map(|(c, v)| (c, v.len())))
            .finish()
    }
}

impl ResourceRegistry {
    /// Create a registry with every category present and empty
    pub fn new() -> Self {
        Self {
            resources: ResourceCategory::all().map(|c| (c, Vec::new())).collect(),
        }
    }

    /// Append a handle; returns the category's new count.
    ///
    /// Duplicates are kept: deduplication is the caller's responsibility.
    pub fn register(
        &mut self,
        category: ResourceCategory,
        handle: ResourceHandle,
    ) -> Result<usize, Rejection> {
        if handle.is_null() {
            return Err(Rejection::NullHandle);
        }
        if handle.category() != category {
            return Err(Rejection::CategoryMismatch {
                handle: handle.category(),
            });
        }
        let list = self.resources.entry(category).or_default();
        list.push(handle);
        Ok(list.len())
    }

    /// Remove the first identity-equal occurrence; returns the remaining
    /// count, or `None` if the handle was not registered.
    pub fn unregister(
        &mut self,
        category: ResourceCategory,
        handle: &ResourceHandle,
    ) -> Option<usize> {
        let list = self.resources.get_mut(&category)?;
        let index = list.iter().position(|h| h.same_handle(handle))?;
        list.remove(index);
        Some(list.len())
    }

    /// Take every handle of a category out, in registration order
    pub fn take(&mut self, category: ResourceCategory) -> Vec<ResourceHandle> {
        self.resources
            .get_mut(&category)
            .map(std::mem::take)
            .unwrap_or_default()
    }

    pub fn count(&self, category: ResourceCategory) -> usize {
        self.resources.get(&category).map_or(0, Vec::len)
    }

    pub fn is_empty(&self, category: ResourceCategory) -> bool {
        self.count(category) == 0
    }

    pub fn handles(&self, category: ResourceCategory) -> &[ResourceHandle] {
        self.resources
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn stats(&self) -> ResourceStats {
        ResourceStats::from_counts(
            ResourceCategory::all()
                .map(|c| (c, self.count(c)))
                .collect(),
        )
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
