//! End-to-end tests for whole-category truth tables, writes and reports.

use exodus_rs::export::export_truth_tables;
use exodus_rs::{EntityCategory, EntityId, Error, Mesh, MemoryStore, MeshStore, TruthTable};
use pretty_assertions::assert_eq;

fn node_sets(ids: &[i64], num_vars: usize) -> Mesh<MemoryStore> {
    let mesh = Mesh::open_memory();
    mesh.store().define_entities(EntityCategory::NodeSet, ids.iter().copied());
    mesh.store().define_variables(EntityCategory::NodeSet, num_vars);
    mesh
}

#[test]
fn test_write_read_and_resolve_agree() {
    let mesh = node_sets(&[10, 20, 30], 2);
    let columns = vec![vec![true, false, true], vec![false, false, true]];
    let table = TruthTable::from_by_variable(3, &columns).unwrap();

    mesh.put_truth_table(EntityCategory::NodeSet, &table).unwrap();

    let read = mesh.truth_table(EntityCategory::NodeSet, 3, 2).unwrap();
    assert_eq!(read, table);
    assert_eq!(read.by_variable(), columns);

    for (row, id) in mesh.entity_ids(EntityCategory::NodeSet).unwrap().into_iter().enumerate() {
        let tv = mesh.truth_vector(EntityCategory::NodeSet, id, 2).unwrap();
        assert_eq!(tv.as_slice(), read.row(row).unwrap());
    }
}

#[test]
fn test_derived_table_matches_scanned_vectors() {
    let mesh = node_sets(&[1, 2, 3], 3);
    mesh.store().add_entity_variable(EntityCategory::NodeSet, 1, 1);
    mesh.store().add_entity_variable(EntityCategory::NodeSet, 3, 1);
    mesh.store().add_entity_variable(EntityCategory::NodeSet, 2, 3);

    let table = mesh.truth_table(EntityCategory::NodeSet, 3, 3).unwrap();
    assert_eq!(table.to_flags(), vec![1, 0, 1, 0, 0, 0, 0, 1, 0]);

    let tv = mesh.truth_vector(EntityCategory::NodeSet, EntityId(3), 3).unwrap();
    assert_eq!(tv.as_slice(), table.row(2).unwrap());
}

#[test]
fn test_table_count_checks() {
    let mesh = node_sets(&[1, 2], 2);
    assert!(matches!(
        mesh.truth_table(EntityCategory::NodeSet, 3, 2),
        Err(Error::EntityCountMismatch { expected: 3, found: 2, .. })
    ));
    assert!(matches!(
        mesh.truth_table(EntityCategory::NodeSet, 2, 1),
        Err(Error::VariableCountMismatch { expected: 1, found: 2, .. })
    ));
}

#[test]
fn test_empty_table_is_not_written() {
    let mesh = node_sets(&[], 0);
    mesh.put_truth_table(EntityCategory::NodeSet, &TruthTable::new(0, 0)).unwrap();
    assert!(!mesh.store().has_table("nset_var_tab").unwrap());
}

// ============================================================================
// Read-only store: writes are refused through the trait default
// ============================================================================

struct ReadOnly(MemoryStore);

impl MeshStore for ReadOnly {
    fn lookup_entity_index(
        &self,
        id_table: &str,
        entity_id: EntityId,
    ) -> exodus_rs::Result<Option<exodus_rs::EntityIndex>> {
        self.0.lookup_entity_index(id_table, entity_id)
    }

    fn entity_ids(&self, id_table: &str) -> exodus_rs::Result<Vec<EntityId>> {
        self.0.entity_ids(id_table)
    }

    fn read_dimension(&self, name: &str) -> exodus_rs::Result<Option<usize>> {
        self.0.read_dimension(name)
    }

    fn has_variable(&self, name: &str) -> exodus_rs::Result<bool> {
        self.0.has_variable(name)
    }

    fn has_table(&self, name: &str) -> exodus_rs::Result<bool> {
        self.0.has_table(name)
    }

    fn read_table_row(
        &self,
        table: &str,
        row: usize,
        len: usize,
    ) -> exodus_rs::Result<exodus_rs::TruthVector> {
        self.0.read_table_row(table, row, len)
    }
}

#[test]
fn test_read_only_store() {
    let inner = MemoryStore::new();
    inner.define_entities(EntityCategory::FaceBlock, [1, 2]);
    inner.define_variables(EntityCategory::FaceBlock, 2);
    inner.put_table("face_var_tab", 2, 2, vec![0, 1, 1, 1]).unwrap();

    let mesh = Mesh::with_store(ReadOnly(inner));
    assert!(!mesh.store().capabilities().writable);

    // The default read_table goes row by row.
    let table = mesh.truth_table(EntityCategory::FaceBlock, 2, 2).unwrap();
    assert_eq!(table.to_flags(), vec![0, 1, 1, 1]);

    let err = mesh.put_truth_table(EntityCategory::FaceBlock, &table).unwrap_err();
    assert!(matches!(err, Error::Unsupported(_)));
}

#[test]
fn test_report() {
    let mesh = node_sets(&[7, 8], 2);
    mesh.store().add_entity_variable(EntityCategory::NodeSet, 2, 1);
    mesh.store().define_entities(EntityCategory::SideSet, [1]);
    mesh.store().define_variables(EntityCategory::SideSet, 1);
    mesh.store().put_table("sset_var_tab", 1, 1, vec![1]).unwrap();

    let mut out = Vec::new();
    export_truth_tables(&mesh, &mut out).unwrap();

    let expected = "\
node set truth table: 2 entities, 2 variables
  id 7: 0 1
  id 8: 0 0
side set truth table: 1 entities, 1 variables
  id 1: 1
";
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}
