//! Truth vectors and truth tables.
//!
//! A truth table records which variables are stored on which entities of a
//! category: rows are entities in id-list order, columns are variables. A
//! truth vector is one row of it.

use std::ops::Deref;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{Error, Result};

/// Which variables are defined on a single entity, indexed by 0-based
/// variable position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TruthVector(SmallVec<[bool; 16]>);

impl TruthVector {
    pub fn new() -> Self {
        Self(SmallVec::new())
    }

    pub fn with_capacity(n: usize) -> Self {
        Self(SmallVec::with_capacity(n))
    }

    /// Build from stored integer flags; any non-zero value is true.
    pub fn from_flags(flags: &[i32]) -> Self {
        flags.iter().map(|&f| f != 0).collect()
    }

    /// Integer flags (0/1) in the stored representation.
    pub fn to_flags(&self) -> Vec<i32> {
        self.0.iter().map(|&b| i32::from(b)).collect()
    }

    pub fn push(&mut self, defined: bool) {
        self.0.push(defined);
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

impl Deref for TruthVector {
    type Target = [bool];

    fn deref(&self) -> &[bool] {
        &self.0
    }
}

impl FromIterator<bool> for TruthVector {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<bool>> for TruthVector {
    fn from(v: Vec<bool>) -> Self {
        Self(SmallVec::from_vec(v))
    }
}

impl<const N: usize> From<[bool; N]> for TruthVector {
    fn from(v: [bool; N]) -> Self {
        v.into_iter().collect()
    }
}

/// Row-major boolean matrix: `num_entities` rows by `num_vars` columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruthTable {
    num_entities: usize,
    num_vars: usize,
    cells: Vec<bool>,
}

impl TruthTable {
    /// All-false table of the given shape.
    pub fn new(num_entities: usize, num_vars: usize) -> Self {
        Self {
            num_entities,
            num_vars,
            cells: vec![false; num_entities * num_vars],
        }
    }

    /// Build from a row-major integer buffer as stored on disk.
    pub fn from_flags(num_entities: usize, num_vars: usize, flags: &[i32]) -> Result<Self> {
        let expected = num_entities * num_vars;
        if flags.len() != expected {
            return Err(Error::TableShape { expected, got: flags.len() });
        }
        Ok(Self {
            num_entities,
            num_vars,
            cells: flags.iter().map(|&f| f != 0).collect(),
        })
    }

    /// Stack truth vectors as rows. Every row must have `num_vars` entries.
    pub fn from_rows(num_vars: usize, rows: Vec<TruthVector>) -> Result<Self> {
        let num_entities = rows.len();
        let mut cells = Vec::with_capacity(num_entities * num_vars);
        for row in &rows {
            if row.len() != num_vars {
                return Err(Error::TableShape { expected: num_vars, got: row.len() });
            }
            cells.extend_from_slice(row);
        }
        Ok(Self { num_entities, num_vars, cells })
    }

    /// Build from the per-variable layout `by_variable()` produces: one list
    /// of `num_entities` flags per variable.
    pub fn from_by_variable(num_entities: usize, columns: &[Vec<bool>]) -> Result<Self> {
        let mut table = Self::new(num_entities, columns.len());
        for (var, column) in columns.iter().enumerate() {
            if column.len() != num_entities {
                return Err(Error::TableShape { expected: num_entities, got: column.len() });
            }
            for (row, &defined) in column.iter().enumerate() {
                table.cells[row * table.num_vars + var] = defined;
            }
        }
        Ok(table)
    }

    pub fn num_entities(&self) -> usize {
        self.num_entities
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flags for the entity at 0-based `row`.
    pub fn row(&self, row: usize) -> Option<&[bool]> {
        if row >= self.num_entities {
            return None;
        }
        let start = row * self.num_vars;
        Some(&self.cells[start..start + self.num_vars])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        // chunks() panics on a zero size
        self.cells.chunks(self.num_vars.max(1)).take(self.num_entities)
    }

    pub fn get(&self, row: usize, var: usize) -> Option<bool> {
        if var >= self.num_vars {
            return None;
        }
        self.row(row).map(|r| r[var])
    }

    /// Transposed view: for each variable, its flags across all entities.
    pub fn by_variable(&self) -> Vec<Vec<bool>> {
        (0..self.num_vars)
            .map(|v| {
                (0..self.num_entities)
                    .map(|e| self.cells[e * self.num_vars + v])
                    .collect()
            })
            .collect()
    }

    /// Row-major integer flags in the stored representation.
    pub fn to_flags(&self) -> Vec<i32> {
        self.cells.iter().map(|&b| i32::from(b)).collect()
    }
}
