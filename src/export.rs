//! Truth table report: write every category's truth table as text.
//!
//! One section per category that has both entities and declared variables,
//! one line per entity id with its 0/1 flags in variable order:
//!
//! ```text
//! element block truth table: 2 entities, 3 variables
//!   id 10: 1 0 1
//!   id 20: 0 0 1
//! ```

use std::io::Write;

use crate::model::*;
use crate::storage::MeshStore;
use crate::{Error, Mesh, Result};

/// Write the truth tables of all categories in catalogue order.
pub fn export_truth_tables<S: MeshStore>(mesh: &Mesh<S>, writer: &mut dyn Write) -> Result<()> {
    for category in EntityCategory::ALL {
        let num_entities = mesh.entity_count(category)?;
        let num_vars = mesh.variable_count(category)?;
        if num_entities == 0 || num_vars == 0 {
            continue;
        }

        let ids = mesh.entity_ids(category)?;
        if ids.len() != num_entities {
            return Err(Error::EntityCountMismatch {
                category,
                expected: num_entities,
                found: ids.len(),
            });
        }
        let table = mesh.truth_table(category, num_entities, num_vars)?;

        writeln!(
            writer,
            "{category} truth table: {num_entities} entities, {num_vars} variables"
        )?;
        for (id, row) in ids.iter().zip(table.rows()) {
            writeln!(writer, "  id {}: {}", id, format_row(row))?;
        }
    }
    Ok(())
}

fn format_row(row: &[bool]) -> String {
    row.iter()
        .map(|&b| if b { "1" } else { "0" })
        .collect::<Vec<_>>()
        .join(" ")
}
