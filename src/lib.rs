//! # exodus-rs: Variable Truth Tables for EXODUS II Mesh Databases
//!
//! Resolves which result variables are stored on which mesh blocks and sets.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `MeshStore` is the contract between the resolver and storage
//! 2. **Static layout**: each `EntityCategory` maps to fixed on-disk names
//! 3. **Typed failures**: a null placeholder entity is a warning, not a missing id
//! 4. **Read-only resolution**: resolving never mutates the database
//!
//! ## Quick Start
//!
//! ```rust
//! use exodus_rs::{EntityCategory, Mesh};
//!
//! # fn example() -> exodus_rs::Result<()> {
//! let mesh = Mesh::open_memory();
//! let store = mesh.store();
//! store.define_entities(EntityCategory::ElemBlock, [10, 20]);
//! store.define_variables(EntityCategory::ElemBlock, 2);
//! store.add_entity_variable(EntityCategory::ElemBlock, 1, 2);
//!
//! let tv = mesh.truth_vector(EntityCategory::ElemBlock, 20, 2)?;
//! assert_eq!(tv.as_slice(), &[true, false]);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Stores
//!
//! | Store | Config | Description |
//! |-------|--------|-------------|
//! | Memory | `StoreConfig::Memory` | Empty in-memory database |
//! | Snapshot | `StoreConfig::Snapshot` | In-memory database loaded from JSON |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod storage;
pub mod truth;
pub mod export;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    CategoryLayout, EntityCategory, EntityId, EntityIndex,
    TruthTable, TruthVector,
};

// ============================================================================
// Re-exports: Storage
// ============================================================================

pub use storage::{MemoryStore, MeshStore, StoreCapabilities, StoreConfig};

// ============================================================================
// Re-exports: Resolution
// ============================================================================

pub use truth::{
    read_truth_table, resolve_truth_vector, resolve_truth_vector_by_code,
    write_truth_table,
};

// ============================================================================
// Top-level Mesh handle
// ============================================================================

/// The primary entry point. A `Mesh` wraps an open mesh store and answers
/// truth-table questions about it.
pub struct Mesh<S: MeshStore> {
    store: S,
}

impl<S: MeshStore> Mesh<S> {
    /// Create a Mesh over the given store.
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    /// Which of the category's `num_vars` variables are stored on entity `id`.
    pub fn truth_vector(
        &self,
        category: EntityCategory,
        id: impl Into<EntityId>,
        num_vars: usize,
    ) -> Result<TruthVector> {
        truth::resolve_truth_vector(&self.store, category, id.into(), num_vars)
    }

    /// The whole truth table of a category.
    pub fn truth_table(
        &self,
        category: EntityCategory,
        num_entities: usize,
        num_vars: usize,
    ) -> Result<TruthTable> {
        truth::read_truth_table(&self.store, category, num_entities, num_vars)
    }

    /// Store the truth table of a category.
    pub fn put_truth_table(&self, category: EntityCategory, table: &TruthTable) -> Result<()> {
        truth::write_truth_table(&self.store, category, table)
    }

    /// Entity ids of a category, in stored order.
    pub fn entity_ids(&self, category: EntityCategory) -> Result<Vec<EntityId>> {
        self.store.entity_ids(category.layout().id_table)
    }

    /// Number of entities of a category.
    pub fn entity_count(&self, category: EntityCategory) -> Result<usize> {
        truth::entity_count(&self.store, category)
    }

    /// Number of variables declared for a category.
    pub fn variable_count(&self, category: EntityCategory) -> Result<usize> {
        truth::variable_count(&self.store, category)
    }

    /// Access the underlying store (for population and advanced use).
    pub fn store(&self) -> &S {
        &self.store
    }
}

/// In-memory mesh for testing and embedding.
impl Mesh<MemoryStore> {
    pub fn open_memory() -> Self {
        Self::with_store(MemoryStore::new())
    }

    /// Build the store described by `config`.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let store = match config {
            StoreConfig::Memory => MemoryStore::new(),
            StoreConfig::Snapshot { path } => MemoryStore::load(path)?,
        };
        Ok(Self::with_store(store))
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid entity category {0}")]
    InvalidCategory(i32),

    #[error("Failed to locate {category} id {id}")]
    EntityNotFound { category: EntityCategory, id: EntityId },

    #[error("No {category} variables for NULL entity {id}")]
    NullEntity { category: EntityCategory, id: EntityId },

    #[error("Number of {category} variables ({expected}) doesn't match the {found} defined in the file")]
    VariableCountMismatch { category: EntityCategory, expected: usize, found: usize },

    #[error("Number of {category} entities ({expected}) doesn't match the {found} defined in the file")]
    EntityCountMismatch { category: EntityCategory, expected: usize, found: usize },

    #[error("Read failure: {0}")]
    ReadFailure(String),

    #[error("Table shape error: expected {expected} values, got {got}")]
    TableShape { expected: usize, got: usize },

    #[error("Not supported: {0}")]
    Unsupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// True for expected conditions a caller may skip past, such as asking
    /// for the variables of a null placeholder entity.
    pub fn is_warning(&self) -> bool {
        matches!(self, Error::NullEntity { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
