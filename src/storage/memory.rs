//! In-memory mesh store.
//!
//! This is the reference implementation of `MeshStore`. It keeps the named
//! objects a mesh database holds (id lists, dimensions, variable names and
//! stored truth tables) in HashMaps protected by RwLock.
//!
//! ## Limitations
//!
//! - **Names only**: variables are recorded by name; their values are not
//!   stored. That is all the truth-table resolver needs.
//! - **No file format**: persistence is a JSON snapshot of the same data,
//!   not a netCDF file.
//!
//! Use this store for:
//! - Testing the resolver against hand-built databases
//! - Embedding where mesh metadata arrives from another reader

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use hashbrown::{HashMap, HashSet};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::model::*;
use crate::{Error, Result};
use super::{MeshStore, StoreCapabilities};

// ============================================================================
// Stored objects
// ============================================================================

/// An id list with optional per-entry status.
///
/// A status of 0 marks the entry as a null placeholder. Entries without a
/// status are live.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdTable {
    pub ids: Vec<i64>,
    #[serde(default)]
    pub status: Vec<i32>,
}

impl IdTable {
    pub fn new(ids: impl IntoIterator<Item = i64>) -> Self {
        Self { ids: ids.into_iter().collect(), status: Vec::new() }
    }

    /// Signed 1-based position of `id`; negative for a null placeholder.
    fn lookup(&self, id: i64) -> Option<i64> {
        let pos = self.ids.iter().position(|&x| x == id)?;
        let index = pos as i64 + 1;
        match self.status.get(pos) {
            Some(0) => Some(-index),
            _ => Some(index),
        }
    }

    fn mark_null(&mut self, id: i64) -> bool {
        let Some(pos) = self.ids.iter().position(|&x| x == id) else {
            return false;
        };
        if self.status.len() < self.ids.len() {
            self.status.resize(self.ids.len(), 1);
        }
        self.status[pos] = 0;
        true
    }
}

/// A stored truth table: row-major integer flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTable {
    pub rows: usize,
    pub cols: usize,
    pub flags: Vec<i32>,
}

impl StoredTable {
    fn check_shape(&self) -> Result<()> {
        let expected = self.rows * self.cols;
        if self.flags.len() != expected {
            return Err(Error::TableShape { expected, got: self.flags.len() });
        }
        Ok(())
    }
}

/// Serializable image of a `MemoryStore`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    #[serde(default)]
    pub id_tables: HashMap<String, IdTable>,
    #[serde(default)]
    pub dimensions: HashMap<String, usize>,
    #[serde(default)]
    pub variables: Vec<String>,
    #[serde(default)]
    pub tables: HashMap<String, StoredTable>,
}

// ============================================================================
// MemoryStore
// ============================================================================

/// In-memory mesh database.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    id_tables: RwLock<HashMap<String, IdTable>>,
    dimensions: RwLock<HashMap<String, usize>>,
    variables: RwLock<HashSet<String>>,
    tables: RwLock<HashMap<String, StoredTable>>,
    /// Number of trait calls served, for callers measuring access cost.
    accesses: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Population
    // ========================================================================

    /// Define (or replace) an id list.
    pub fn add_id_table(&self, name: impl Into<String>, ids: impl IntoIterator<Item = i64>) {
        self.inner.id_tables.write().insert(name.into(), IdTable::new(ids));
    }

    /// Mark an existing id as a null placeholder. Returns false if the id
    /// list or the id does not exist.
    pub fn mark_null(&self, id_table: &str, id: i64) -> bool {
        self.inner
            .id_tables
            .write()
            .get_mut(id_table)
            .is_some_and(|t| t.mark_null(id))
    }

    pub fn set_dimension(&self, name: impl Into<String>, len: usize) {
        self.inner.dimensions.write().insert(name.into(), len);
    }

    pub fn add_variable(&self, name: impl Into<String>) {
        self.inner.variables.write().insert(name.into());
    }

    /// Store a truth table from row-major integer flags.
    pub fn put_table(
        &self,
        name: impl Into<String>,
        rows: usize,
        cols: usize,
        flags: Vec<i32>,
    ) -> Result<()> {
        let table = StoredTable { rows, cols, flags };
        table.check_shape()?;
        self.inner.tables.write().insert(name.into(), table);
        Ok(())
    }

    pub fn remove_table(&self, name: &str) -> bool {
        self.inner.tables.write().remove(name).is_some()
    }

    /// Define the entities of a category: its id list and entity count.
    pub fn define_entities(&self, category: EntityCategory, ids: impl IntoIterator<Item = i64>) {
        let layout = category.layout();
        let table = IdTable::new(ids);
        self.set_dimension(layout.entity_count_dim, table.ids.len());
        self.inner.id_tables.write().insert(layout.id_table.to_string(), table);
    }

    /// Declare `count` variables for a category.
    pub fn define_variables(&self, category: EntityCategory, count: usize) {
        self.set_dimension(category.layout().var_count_dim, count);
    }

    /// Record the value array for variable `ordinal` on entity `index`
    /// (both 1-based), as a writer that omits the truth table would.
    pub fn add_entity_variable(&self, category: EntityCategory, ordinal: usize, index: usize) {
        self.add_variable(category.layout().variable_name(ordinal, index));
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    /// Build a store from a snapshot. Every stored table must hold
    /// `rows * cols` flags.
    pub fn from_snapshot(snapshot: MemorySnapshot) -> Result<Self> {
        for table in snapshot.tables.values() {
            table.check_shape()?;
        }
        let store = Self::new();
        *store.inner.id_tables.write() = snapshot.id_tables;
        *store.inner.dimensions.write() = snapshot.dimensions;
        *store.inner.variables.write() = snapshot.variables.into_iter().collect();
        *store.inner.tables.write() = snapshot.tables;
        Ok(store)
    }

    pub fn snapshot(&self) -> MemorySnapshot {
        let mut variables: Vec<String> = self.inner.variables.read().iter().cloned().collect();
        variables.sort();
        MemorySnapshot {
            id_tables: self.inner.id_tables.read().clone(),
            dimensions: self.inner.dimensions.read().clone(),
            variables,
            tables: self.inner.tables.read().clone(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: MemorySnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    /// Load a JSON snapshot from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let store = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), "loaded mesh snapshot");
        Ok(store)
    }

    /// Write a JSON snapshot to disk.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Number of `MeshStore` calls served so far.
    pub fn access_count(&self) -> u64 {
        self.inner.accesses.load(Ordering::Relaxed)
    }

    fn touch(&self) {
        self.inner.accesses.fetch_add(1, Ordering::Relaxed);
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("id_tables", &self.inner.id_tables.read().len())
            .field("dimensions", &self.inner.dimensions.read().len())
            .field("variables", &self.inner.variables.read().len())
            .field("tables", &self.inner.tables.read().len())
            .finish()
    }
}

// ============================================================================
// MeshStore impl
// ============================================================================

impl MeshStore for MemoryStore {
    fn lookup_entity_index(
        &self,
        id_table: &str,
        entity_id: EntityId,
    ) -> Result<Option<EntityIndex>> {
        self.touch();
        Ok(self
            .inner
            .id_tables
            .read()
            .get(id_table)
            .and_then(|t| t.lookup(entity_id.0))
            .and_then(EntityIndex::from_signed))
    }

    fn entity_ids(&self, id_table: &str) -> Result<Vec<EntityId>> {
        self.touch();
        Ok(self
            .inner
            .id_tables
            .read()
            .get(id_table)
            .map(|t| t.ids.iter().copied().map(EntityId).collect())
            .unwrap_or_default())
    }

    fn read_dimension(&self, name: &str) -> Result<Option<usize>> {
        self.touch();
        Ok(self.inner.dimensions.read().get(name).copied())
    }

    fn has_variable(&self, name: &str) -> Result<bool> {
        self.touch();
        Ok(self.inner.variables.read().contains(name))
    }

    fn has_table(&self, name: &str) -> Result<bool> {
        self.touch();
        Ok(self.inner.tables.read().contains_key(name))
    }

    fn read_table_row(&self, table: &str, row: usize, len: usize) -> Result<TruthVector> {
        self.touch();
        let tables = self.inner.tables.read();
        let stored = tables
            .get(table)
            .ok_or_else(|| Error::ReadFailure(format!("variable {table} not found")))?;
        if row >= stored.rows || len > stored.cols {
            return Err(Error::ReadFailure(format!(
                "index exceeds dimension bound reading {table}: row {row} of {}, {len} of {} columns",
                stored.rows, stored.cols
            )));
        }
        let start = row * stored.cols;
        let flags = stored.flags.get(start..start + len).ok_or_else(|| {
            Error::ReadFailure(format!(
                "{table} holds {} flags, row {row} needs {}",
                stored.flags.len(),
                start + len
            ))
        })?;
        Ok(TruthVector::from_flags(flags))
    }

    fn read_table(&self, table: &str, rows: usize, cols: usize) -> Result<TruthTable> {
        self.touch();
        let tables = self.inner.tables.read();
        let stored = tables
            .get(table)
            .ok_or_else(|| Error::ReadFailure(format!("variable {table} not found")))?;
        if stored.rows != rows || stored.cols != cols {
            return Err(Error::ReadFailure(format!(
                "{table} is {}x{}, requested {rows}x{cols}",
                stored.rows, stored.cols
            )));
        }
        TruthTable::from_flags(rows, cols, &stored.flags)
    }

    fn write_table(&self, table: &str, values: &TruthTable) -> Result<()> {
        self.touch();
        self.put_table(table, values.num_entities(), values.num_vars(), values.to_flags())
    }

    fn capabilities(&self) -> StoreCapabilities {
        StoreCapabilities { writable: true }
    }
}

// ============================================================================
// Tests
// ============================================================================
