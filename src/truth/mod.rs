//! Variable truth-table resolution.
//!
//! Answers "which of a category's variables are stored on this entity?".
//! Files that carry a stored truth table are answered with a single row
//! read. Older files omit the table; for those the answer is derived by
//! checking, per variable, for the value array the naming convention says
//! the entity would have. That costs one name lookup per variable.

use crate::model::*;
use crate::storage::MeshStore;
use crate::{Error, Result};

// ============================================================================
// Single entity
// ============================================================================

/// Resolve the truth vector of one entity.
///
/// `num_vars` must equal the number of variables the store declares for
/// `category`. Fails with `EntityNotFound` for an unknown id and with the
/// softer `NullEntity` for a null placeholder entity; neither returns a
/// vector.
pub fn resolve_truth_vector<S: MeshStore + ?Sized>(
    store: &S,
    category: EntityCategory,
    entity_id: EntityId,
    num_vars: usize,
) -> Result<TruthVector> {
    let layout = category.layout();

    let index = match store.lookup_entity_index(layout.id_table, entity_id)? {
        Some(index @ EntityIndex::Live(_)) => index,
        Some(EntityIndex::Null(_)) => {
            tracing::warn!(%category, id = %entity_id, "no variables for NULL entity");
            return Err(Error::NullEntity { category, id: entity_id });
        }
        None => return Err(Error::EntityNotFound { category, id: entity_id }),
    };

    let row = index.row().ok_or_else(|| {
        Error::ReadFailure(format!("{category} id {entity_id} resolved to index 0"))
    })?;

    check_variable_count(store, category, num_vars)?;

    if store.has_table(layout.truth_table)? {
        tracing::trace!(%category, id = %entity_id, row, "reading stored truth vector");
        return store.read_table_row(layout.truth_table, row, num_vars).map_err(|e| {
            read_failure(format!("failed to get truth vector for {category} {entity_id}"), e)
        });
    }

    tracing::debug!(
        %category,
        id = %entity_id,
        row,
        num_vars,
        "no stored truth table, looking up variable names"
    );
    scan_truth_vector(store, layout, index.position(), num_vars)
}

/// Like `resolve_truth_vector`, taking the `ex_entity_type` code of the
/// category. An unknown code fails with `InvalidCategory` before the store
/// is touched.
pub fn resolve_truth_vector_by_code<S: MeshStore + ?Sized>(
    store: &S,
    category_code: i32,
    entity_id: i64,
    num_vars: usize,
) -> Result<TruthVector> {
    let category = EntityCategory::try_from(category_code)?;
    resolve_truth_vector(store, category, EntityId(entity_id), num_vars)
}

/// Derive a truth vector from which value arrays exist. Names are 1-based
/// in both the variable ordinal and the entity index.
fn scan_truth_vector<S: MeshStore + ?Sized>(
    store: &S,
    layout: &CategoryLayout,
    index: usize,
    num_vars: usize,
) -> Result<TruthVector> {
    let mut vector = TruthVector::with_capacity(num_vars);
    for ordinal in 1..=num_vars {
        vector.push(store.has_variable(&layout.variable_name(ordinal, index))?);
    }
    Ok(vector)
}

// ============================================================================
// Whole table
// ============================================================================

/// Read the truth table of a whole category.
///
/// Empty shapes are answered without touching the store. Otherwise both
/// counts must match what the store declares.
pub fn read_truth_table<S: MeshStore + ?Sized>(
    store: &S,
    category: EntityCategory,
    num_entities: usize,
    num_vars: usize,
) -> Result<TruthTable> {
    if num_entities == 0 || num_vars == 0 {
        return Ok(TruthTable::new(num_entities, num_vars));
    }

    check_entity_count(store, category, num_entities)?;
    check_variable_count(store, category, num_vars)?;

    let layout = category.layout();
    if store.has_table(layout.truth_table)? {
        return store
            .read_table(layout.truth_table, num_entities, num_vars)
            .map_err(|e| read_failure(format!("failed to get {category} truth table"), e));
    }

    tracing::debug!(%category, num_entities, num_vars, "deriving truth table from variable names");
    let mut rows = Vec::with_capacity(num_entities);
    for index in 1..=num_entities {
        rows.push(scan_truth_vector(store, layout, index, num_vars)?);
    }
    TruthTable::from_rows(num_vars, rows)
}

/// Store the truth table of a whole category.
///
/// Empty tables are accepted and not written.
pub fn write_truth_table<S: MeshStore + ?Sized>(
    store: &S,
    category: EntityCategory,
    table: &TruthTable,
) -> Result<()> {
    if table.is_empty() {
        return Ok(());
    }

    check_entity_count(store, category, table.num_entities())?;
    check_variable_count(store, category, table.num_vars())?;

    tracing::debug!(
        %category,
        num_entities = table.num_entities(),
        num_vars = table.num_vars(),
        "writing truth table"
    );
    store.write_table(category.layout().truth_table, table)
}

// ============================================================================
// Declared counts
// ============================================================================

/// Number of variables declared for `category`, counting an absent dimension
/// as none. Reporting uses this; resolution requires the dimension.
pub fn variable_count<S: MeshStore + ?Sized>(store: &S, category: EntityCategory) -> Result<usize> {
    Ok(store.read_dimension(category.layout().var_count_dim)?.unwrap_or(0))
}

/// Number of entities of `category` in the store.
pub fn entity_count<S: MeshStore + ?Sized>(store: &S, category: EntityCategory) -> Result<usize> {
    Ok(store.read_dimension(category.layout().entity_count_dim)?.unwrap_or(0))
}

fn check_variable_count<S: MeshStore + ?Sized>(
    store: &S,
    category: EntityCategory,
    expected: usize,
) -> Result<()> {
    let dim = category.layout().var_count_dim;
    let found = store
        .read_dimension(dim)?
        .ok_or_else(|| Error::ReadFailure(format!("dimension {dim} not defined")))?;
    if found != expected {
        return Err(Error::VariableCountMismatch { category, expected, found });
    }
    Ok(())
}

fn check_entity_count<S: MeshStore + ?Sized>(
    store: &S,
    category: EntityCategory,
    expected: usize,
) -> Result<()> {
    let found = entity_count(store, category)?;
    if found != expected {
        return Err(Error::EntityCountMismatch { category, expected, found });
    }
    Ok(())
}

fn read_failure(context: String, err: Error) -> Error {
    match err {
        Error::ReadFailure(msg) => Error::ReadFailure(format!("{context}: {msg}")),
        other => Error::ReadFailure(format!("{context}: {other}")),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;

    fn elem_blocks_with_table() -> MemoryStore {
        let store = MemoryStore::new();
        store.define_entities(EntityCategory::ElemBlock, [3, 5, 7, 9]);
        store.define_variables(EntityCategory::ElemBlock, 4);
        let flags = vec![1, 1, 1, 1, 0, 0, 0, 0, 1, 0, 1, 1, 0, 1, 0, 0];
        store.put_table("elem_var_tab", 4, 4, flags).unwrap();
        store
    }

    #[test]
    fn test_stored_row() {
        let store = elem_blocks_with_table();
        let v = resolve_truth_vector(&store, EntityCategory::ElemBlock, EntityId(7), 4).unwrap();
        assert_eq!(v.as_slice(), &[true, false, true, true]);
    }

    #[test]
    fn test_name_lookup_path() {
        let store = MemoryStore::new();
        store.define_entities(EntityCategory::NodeSet, [11, 12, 13, 14, 15]);
        store.define_variables(EntityCategory::NodeSet, 2);
        store.add_variable("vals_nset_var1ns5");
        store.add_variable("vals_nset_var2ns4");

        let v = resolve_truth_vector(&store, EntityCategory::NodeSet, EntityId(15), 2).unwrap();
        assert_eq!(v.as_slice(), &[true, false]);
    }

    #[test]
    fn test_zero_declared_variables() {
        let store = MemoryStore::new();
        store.define_entities(EntityCategory::FaceSet, [1]);
        store.define_variables(EntityCategory::FaceSet, 0);
        let v = resolve_truth_vector(&store, EntityCategory::FaceSet, EntityId(1), 0).unwrap();
        assert!(v.is_empty());
    }

    #[test]
    fn test_entity_not_found() {
        let store = elem_blocks_with_table();
        let err =
            resolve_truth_vector(&store, EntityCategory::ElemBlock, EntityId(4), 4).unwrap_err();
        assert!(matches!(
            err,
            Error::EntityNotFound { category: EntityCategory::ElemBlock, id: EntityId(4) }
        ));
        assert!(!err.is_warning());
    }

    #[test]
    fn test_null_entity_is_warning() {
        let store = elem_blocks_with_table();
        store.mark_null("eb_prop1", 5);
        let err =
            resolve_truth_vector(&store, EntityCategory::ElemBlock, EntityId(5), 4).unwrap_err();
        assert!(matches!(err, Error::NullEntity { id: EntityId(5), .. }));
        assert!(err.is_warning());
    }

    #[test]
    fn test_entity_errors_precede_count_check() {
        let store = elem_blocks_with_table();
        let err =
            resolve_truth_vector(&store, EntityCategory::ElemBlock, EntityId(100), 2).unwrap_err();
        assert!(matches!(err, Error::EntityNotFound { .. }));
    }

    #[test]
    fn test_count_mismatch() {
        let store = elem_blocks_with_table();
        let err =
            resolve_truth_vector(&store, EntityCategory::ElemBlock, EntityId(7), 3).unwrap_err();
        assert!(matches!(
            err,
            Error::VariableCountMismatch { expected: 3, found: 4, .. }
        ));
    }

    #[test]
    fn test_missing_variable_dimension_is_read_failure() {
        let store = MemoryStore::new();
        store.define_entities(EntityCategory::EdgeBlock, [1]);
        for num_vars in [0, 1] {
            let err = resolve_truth_vector(&store, EntityCategory::EdgeBlock, EntityId(1), num_vars)
                .unwrap_err();
            match err {
                Error::ReadFailure(msg) => assert_eq!(msg, "dimension num_edge_var not defined"),
                other => panic!("expected ReadFailure, got {other:?}"),
            }
        }
        // Reporting still counts an absent dimension as no variables.
        assert_eq!(variable_count(&store, EntityCategory::EdgeBlock).unwrap(), 0);
    }

    /// Store whose id lookup answers with position 0.
    struct ZeroIndex;

    impl MeshStore for ZeroIndex {
        fn lookup_entity_index(&self, _: &str, _: EntityId) -> Result<Option<EntityIndex>> {
            Ok(Some(EntityIndex::Live(0)))
        }

        fn entity_ids(&self, _: &str) -> Result<Vec<EntityId>> {
            Ok(Vec::new())
        }

        fn read_dimension(&self, _: &str) -> Result<Option<usize>> {
            Ok(Some(1))
        }

        fn has_variable(&self, _: &str) -> Result<bool> {
            Ok(false)
        }

        fn has_table(&self, _: &str) -> Result<bool> {
            Ok(true)
        }

        fn read_table_row(&self, _: &str, _: usize, len: usize) -> Result<TruthVector> {
            Ok(TruthVector::from_flags(&vec![1; len]))
        }
    }

    #[test]
    fn test_index_zero_is_read_failure() {
        let err =
            resolve_truth_vector(&ZeroIndex, EntityCategory::NodeSet, EntityId(1), 1).unwrap_err();
        assert!(matches!(err, Error::ReadFailure(_)));
    }

    #[test]
    fn test_short_stored_table_is_read_failure() {
        let store = MemoryStore::new();
        store.define_entities(EntityCategory::SideSet, [1, 2]);
        store.define_variables(EntityCategory::SideSet, 2);
        // One row only, while two side sets are declared.
        store.put_table("sset_var_tab", 1, 2, vec![1, 1]).unwrap();

        let err =
            resolve_truth_vector(&store, EntityCategory::SideSet, EntityId(2), 2).unwrap_err();
        match err {
            Error::ReadFailure(msg) => {
                assert!(msg.starts_with("failed to get truth vector for side set 2"))
            }
            other => panic!("expected ReadFailure, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_code_touches_nothing() {
        let store = elem_blocks_with_table();
        let before = store.access_count();
        let err = resolve_truth_vector_by_code(&store, 999, 7, 4).unwrap_err();
        assert!(matches!(err, Error::InvalidCategory(999)));
        assert_eq!(store.access_count(), before);
    }

    #[test]
    fn test_by_code() {
        let store = elem_blocks_with_table();
        let v = resolve_truth_vector_by_code(&store, 1, 3, 4).unwrap();
        assert_eq!(v.to_flags(), vec![1, 1, 1, 1]);
    }

    #[test]
    fn test_read_table_stored() {
        let store = elem_blocks_with_table();
        let t = read_truth_table(&store, EntityCategory::ElemBlock, 4, 4).unwrap();
        assert_eq!(t.row(3).unwrap(), &[false, true, false, false]);
    }

    #[test]
    fn test_read_table_derived() {
        let store = MemoryStore::new();
        store.define_entities(EntityCategory::ElemSet, [8, 9]);
        store.define_variables(EntityCategory::ElemSet, 2);
        store.add_entity_variable(EntityCategory::ElemSet, 2, 1);
        store.add_entity_variable(EntityCategory::ElemSet, 1, 2);

        let t = read_truth_table(&store, EntityCategory::ElemSet, 2, 2).unwrap();
        assert_eq!(t.to_flags(), vec![0, 1, 1, 0]);
    }

    #[test]
    fn test_read_table_empty_shape_skips_store() {
        let store = MemoryStore::new();
        let t = read_truth_table(&store, EntityCategory::FaceBlock, 0, 3).unwrap();
        assert_eq!(t.num_vars(), 3);
        assert_eq!(store.access_count(), 0);
    }

    #[test]
    fn test_read_table_entity_count_mismatch() {
        let store = elem_blocks_with_table();
        let err = read_truth_table(&store, EntityCategory::ElemBlock, 3, 4).unwrap_err();
        assert!(matches!(err, Error::EntityCountMismatch { expected: 3, found: 4, .. }));
    }

    #[test]
    fn test_write_then_resolve() {
        let store = MemoryStore::new();
        store.define_entities(EntityCategory::EdgeSet, [21, 22]);
        store.define_variables(EntityCategory::EdgeSet, 3);

        let table = TruthTable::from_flags(2, 3, &[0, 1, 0, 1, 1, 0]).unwrap();
        write_truth_table(&store, EntityCategory::EdgeSet, &table).unwrap();

        let v = resolve_truth_vector(&store, EntityCategory::EdgeSet, EntityId(22), 3).unwrap();
        assert_eq!(v.as_slice(), &[true, true, false]);
    }

    #[test]
    fn test_write_shape_checked() {
        let store = MemoryStore::new();
        store.define_entities(EntityCategory::EdgeSet, [21, 22]);
        store.define_variables(EntityCategory::EdgeSet, 3);

        let table = TruthTable::new(2, 2);
        let err = write_truth_table(&store, EntityCategory::EdgeSet, &table).unwrap_err();
        assert!(matches!(err, Error::VariableCountMismatch { expected: 2, found: 3, .. }));
        assert!(!store.has_table("eset_var_tab").unwrap());
    }
}
