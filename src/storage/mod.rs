//! # Mesh Store Trait
//!
//! The contract between the truth-table resolver and whatever holds the mesh
//! database. A store only answers questions about named objects: id lists,
//! dimensions, variables and stored tables. It knows nothing about entity
//! categories; the resolver maps categories to names.
//!
//! ## Implementations
//!
//! | Store | Module | Description |
//! |-------|--------|-------------|
//! | `MemoryStore` | `memory` | In-memory, JSON snapshots, for testing/embedding |

pub mod memory;

use std::path::PathBuf;

use crate::model::*;
use crate::{Error, Result};

pub use memory::{IdTable, MemorySnapshot, MemoryStore};

// ============================================================================
// Store configuration
// ============================================================================

/// How `Mesh::open` should build its store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Empty in-memory store.
    Memory,

    /// In-memory store seeded from a JSON snapshot on disk.
    Snapshot { path: PathBuf },
}

// ============================================================================
// Store capabilities
// ============================================================================

/// What a store can do beyond the read primitives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCapabilities {
    /// `write_table` is implemented.
    pub writable: bool,
}

// ============================================================================
// MeshStore Trait
// ============================================================================

/// Read access to an open mesh database.
///
/// All methods are synchronous and must not mutate the database, except
/// `write_table`. Implementations report storage-layer failures as
/// `Error::ReadFailure`.
pub trait MeshStore: Send + Sync {
    /// Resolve `entity_id` to its position in the id list `id_table`.
    ///
    /// Returns `None` when the id is not in the list.
    fn lookup_entity_index(
        &self,
        id_table: &str,
        entity_id: EntityId,
    ) -> Result<Option<EntityIndex>>;

    /// All ids of an id list in stored order. Empty if the list is absent.
    fn entity_ids(&self, id_table: &str) -> Result<Vec<EntityId>>;

    /// Length of the dimension `name`, or `None` if it is not defined.
    fn read_dimension(&self, name: &str) -> Result<Option<usize>>;

    /// Whether a variable called `name` exists.
    fn has_variable(&self, name: &str) -> Result<bool>;

    /// Whether a stored truth table called `name` exists.
    fn has_table(&self, name: &str) -> Result<bool>;

    /// Read `len` flags from the 0-based `row` of the stored table `table`.
    fn read_table_row(&self, table: &str, row: usize, len: usize) -> Result<TruthVector>;

    /// Read a whole stored table.
    ///
    /// Default reads row by row.
    fn read_table(&self, table: &str, rows: usize, cols: usize) -> Result<TruthTable> {
        let mut out = Vec::with_capacity(rows);
        for row in 0..rows {
            out.push(self.read_table_row(table, row, cols)?);
        }
        TruthTable::from_rows(cols, out)
    }

    /// Store a truth table under `table`, replacing any previous one.
    ///
    /// Default returns `Error::Unsupported`.
    fn write_table(&self, _table: &str, _values: &TruthTable) -> Result<()> {
        Err(Error::Unsupported("truth table writes".into()))
    }

    /// Report what this store can do.
    fn capabilities(&self) -> StoreCapabilities {
        StoreCapabilities::default()
    }
}
