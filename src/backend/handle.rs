//! Explicit dataset/connection handle
//!
//! A handle is attached at construction and released at shutdown. Queries
//! acquire an `Arc` snapshot for the duration of one request, so a release
//! never pulls data out from under a running query.

use std::sync::{Arc, RwLock};

use tracing::info;

use crate::query::{QueryError, QueryResult};

/// Owns the loaded dataset (or open collection) for one backend
#[derive(Debug)]
pub struct StoreHandle<T> {
    label: &'static str,
    slot: RwLock<Option<Arc<T>>>,
}

impl<T> StoreHandle<T> {
    /// Creates a handle with nothing attached
    pub fn detached(label: &'static str) -> Self {
        Self {
            label,
            slot: RwLock::new(None),
        }
    }

    /// Creates a handle with `value` already attached
    pub fn attached(label: &'static str, value: T) -> Self {
        Self {
            label,
            slot: RwLock::new(Some(Arc::new(value))),
        }
    }

    /// Detaches the current value. Later acquires fail until re-attached.
    pub fn release(&self) -> QueryResult<Option<Arc<T>>> {
        let mut slot = self
            .slot
            .write()
            .map_err(|_| QueryError::query_failed("Lock poisoned"))?;
        let previous = slot.take();
        if previous.is_some() {
            info!(backend = self.label, "store released");
        }
        Ok(previous)
    }

    /// Snapshot for one request
    pub fn acquire(&self) -> QueryResult<Arc<T>> {
        let slot = self
            .slot
            .read()
            .map_err(|_| QueryError::query_failed("Lock poisoned"))?;
        slot.clone()
            .ok_or_else(|| QueryError::backend_unavailable(self.label))
    }
}
