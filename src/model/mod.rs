//! # Mesh Entity Model
//!
//! Plain data shared by the store, the resolver and callers: categories and
//! their static layout, entity ids and indices, truth vectors and tables.
//!
//! This module is pure data: no I/O, no state.

pub mod category;
pub mod entity;
pub mod truth;

pub use category::{CategoryLayout, EntityCategory};
pub use entity::{EntityId, EntityIndex};
pub use truth::{TruthTable, TruthVector};
