//! In-process document store.
//!
//! One `Collection<T>` per resource kind, each a `RwLock`-guarded map keyed
//! by record id. Writes take the write guard, so they apply in arrival order
//! and each update replaces the whole document (last write wins; there is no
//! field-level merge across concurrent writers). Mutation happens only
//! through the resource controllers.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

pub mod notifications;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
}

pub struct Collection<T> {
    name: &'static str,
    rows: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self { name: self.name, rows: Arc::clone(&self.rows) }
    }
}

impl<T: Clone> Collection<T> {
    pub fn new(name: &'static str) -> Self {
        Self { name, rows: Arc::new(RwLock::new(HashMap::new())) }
    }

    pub async fn insert(&self, id: Uuid, row: T) {
        self.rows.write().await.insert(id, row);
    }

    /// Insert only if no existing row trips the conflict predicate. The check
    /// and the insert share one write guard, so duplicate-producing races
    /// serialize instead of both landing.
    pub async fn insert_unique<F>(&self, id: Uuid, row: T, conflict: F) -> Result<(), StoreError>
    where
        F: Fn(&T) -> Option<String>,
    {
        let mut rows = self.rows.write().await;
        if let Some(message) = rows.values().find_map(&conflict) {
            return Err(StoreError::Conflict(message));
        }
        rows.insert(id, row);
        Ok(())
    }

    pub async fn get(&self, id: Uuid) -> Option<T> {
        self.rows.read().await.get(&id).cloned()
    }

    /// Like `get`, but absent rows become a typed not-found error.
    pub async fn try_get(&self, id: Uuid) -> Result<T, StoreError> {
        self.get(id).await.ok_or(StoreError::NotFound(self.name))
    }

    /// Replace the stored document wholesale. Fails on absent ids.
    pub async fn replace(&self, id: Uuid, row: T) -> Result<T, StoreError> {
        let mut rows = self.rows.write().await;
        if !rows.contains_key(&id) {
            return Err(StoreError::NotFound(self.name));
        }
        rows.insert(id, row.clone());
        Ok(row)
    }

    /// Replace with a uniqueness check against every *other* row.
    pub async fn replace_unique<F>(&self, id: Uuid, row: T, conflict: F) -> Result<T, StoreError>
    where
        F: Fn(&T) -> Option<String>,
    {
        let mut rows = self.rows.write().await;
        if !rows.contains_key(&id) {
            return Err(StoreError::NotFound(self.name));
        }
        if let Some(message) =
            rows.iter().filter(|(key, _)| **key != id).find_map(|(_, other)| conflict(other))
        {
            return Err(StoreError::Conflict(message));
        }
        rows.insert(id, row.clone());
        Ok(row)
    }

    /// Hard delete. Absent ids are not found, so a repeated delete reports
    /// the record as already gone rather than succeeding twice.
    pub async fn remove(&self, id: Uuid) -> Result<T, StoreError> {
        self.rows.write().await.remove(&id).ok_or(StoreError::NotFound(self.name))
    }

    pub async fn all(&self) -> Vec<T> {
        self.rows.read().await.values().cloned().collect()
    }

    pub async fn find<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.rows.read().await.values().filter(|row| predicate(row)).cloned().collect()
    }

    pub async fn find_one<F>(&self, predicate: F) -> Option<T>
    where
        F: Fn(&T) -> bool,
    {
        self.rows.read().await.values().find(|row| predicate(row)).cloned()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}
