//! Entity categories and their on-disk layout.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Error;

/// The kinds of mesh entity that can carry result variables.
///
/// Discriminants are the EXODUS II `ex_entity_type` codes, so a category
/// can travel through integer-typed interfaces unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(i32)]
pub enum EntityCategory {
    ElemBlock = 1,
    NodeSet = 2,
    SideSet = 3,
    EdgeBlock = 6,
    EdgeSet = 7,
    FaceBlock = 8,
    FaceSet = 9,
    ElemSet = 10,
}

/// Names a category's data is stored under in a mesh database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryLayout {
    /// Id list used to resolve an entity id to its 1-based index.
    pub id_table: &'static str,
    /// Dimension holding the number of entities of this category.
    pub entity_count_dim: &'static str,
    /// Dimension holding the number of declared variables.
    pub var_count_dim: &'static str,
    /// Stored truth table variable. Older files may not have it.
    pub truth_table: &'static str,
    /// Prefix of the per-variable-per-entity value arrays.
    pub var_prefix: &'static str,
    /// Entity tag placed between the variable ordinal and the entity index.
    pub entity_tag: &'static str,
    /// Human-readable name, used in messages.
    pub display_name: &'static str,
}

impl CategoryLayout {
    /// Name of the value array for variable `ordinal` on entity `index`.
    ///
    /// Both numbers are 1-based: `vals_elem_var2eb3` is the second element
    /// variable on the third element block.
    pub fn variable_name(&self, ordinal: usize, index: usize) -> String {
        format!("{}{}{}{}", self.var_prefix, ordinal, self.entity_tag, index)
    }
}

static EDGE_BLOCK: CategoryLayout = CategoryLayout {
    id_table: "ed_prop1",
    entity_count_dim: "num_ed_blk",
    var_count_dim: "num_edge_var",
    truth_table: "edge_var_tab",
    var_prefix: "vals_edge_var",
    entity_tag: "eb",
    display_name: "edge block",
};

static FACE_BLOCK: CategoryLayout = CategoryLayout {
    id_table: "fa_prop1",
    entity_count_dim: "num_fa_blk",
    var_count_dim: "num_face_var",
    truth_table: "face_var_tab",
    var_prefix: "vals_face_var",
    entity_tag: "eb",
    display_name: "face block",
};

static ELEM_BLOCK: CategoryLayout = CategoryLayout {
    id_table: "eb_prop1",
    entity_count_dim: "num_el_blk",
    var_count_dim: "num_elem_var",
    truth_table: "elem_var_tab",
    var_prefix: "vals_elem_var",
    entity_tag: "eb",
    display_name: "element block",
};

static NODE_SET: CategoryLayout = CategoryLayout {
    id_table: "ns_prop1",
    entity_count_dim: "num_node_sets",
    var_count_dim: "num_nset_var",
    truth_table: "nset_var_tab",
    var_prefix: "vals_nset_var",
    entity_tag: "ns",
    display_name: "node set",
};

// Edge and face sets share the node set tag.
static EDGE_SET: CategoryLayout = CategoryLayout {
    id_table: "es_prop1",
    entity_count_dim: "num_edge_sets",
    var_count_dim: "num_eset_var",
    truth_table: "eset_var_tab",
    var_prefix: "vals_eset_var",
    entity_tag: "ns",
    display_name: "edge set",
};

static FACE_SET: CategoryLayout = CategoryLayout {
    id_table: "fs_prop1",
    entity_count_dim: "num_face_sets",
    var_count_dim: "num_fset_var",
    truth_table: "fset_var_tab",
    var_prefix: "vals_fset_var",
    entity_tag: "ns",
    display_name: "face set",
};

static SIDE_SET: CategoryLayout = CategoryLayout {
    id_table: "ss_prop1",
    entity_count_dim: "num_side_sets",
    var_count_dim: "num_sset_var",
    truth_table: "sset_var_tab",
    var_prefix: "vals_sset_var",
    entity_tag: "ss",
    display_name: "side set",
};

static ELEM_SET: CategoryLayout = CategoryLayout {
    id_table: "els_prop1",
    entity_count_dim: "num_elem_sets",
    var_count_dim: "num_elset_var",
    truth_table: "elset_var_tab",
    var_prefix: "vals_elset_var",
    entity_tag: "els",
    display_name: "element set",
};

impl EntityCategory {
    /// Every category, in the order the variable catalogue lists them.
    pub const ALL: [EntityCategory; 8] = [
        EntityCategory::EdgeBlock,
        EntityCategory::FaceBlock,
        EntityCategory::ElemBlock,
        EntityCategory::NodeSet,
        EntityCategory::EdgeSet,
        EntityCategory::FaceSet,
        EntityCategory::ElemSet,
        EntityCategory::SideSet,
    ];

    pub fn layout(self) -> &'static CategoryLayout {
        match self {
            EntityCategory::EdgeBlock => &EDGE_BLOCK,
            EntityCategory::FaceBlock => &FACE_BLOCK,
            EntityCategory::ElemBlock => &ELEM_BLOCK,
            EntityCategory::NodeSet => &NODE_SET,
            EntityCategory::EdgeSet => &EDGE_SET,
            EntityCategory::FaceSet => &FACE_SET,
            EntityCategory::SideSet => &SIDE_SET,
            EntityCategory::ElemSet => &ELEM_SET,
        }
    }

    /// The `ex_entity_type` code of this category.
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for EntityCategory {
    type Error = Error;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(EntityCategory::ElemBlock),
            2 => Ok(EntityCategory::NodeSet),
            3 => Ok(EntityCategory::SideSet),
            6 => Ok(EntityCategory::EdgeBlock),
            7 => Ok(EntityCategory::EdgeSet),
            8 => Ok(EntityCategory::FaceBlock),
            9 => Ok(EntityCategory::FaceSet),
            10 => Ok(EntityCategory::ElemSet),
            other => Err(Error::InvalidCategory(other)),
        }
    }
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.layout().display_name)
    }
}
