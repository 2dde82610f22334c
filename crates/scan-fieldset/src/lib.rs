//! Conversion between scan formulas and field sets.
//!
//! [`FieldSet::load`] (or [`try_load_from_formula_node`]) turns a
//! [`BooleanNode`](scan_core::formula::BooleanNode) tree into fields, failing
//! with a [`LoadError`] when the tree has no field form.
//! [`create_formula_node`] goes back. Fields and conditions are allocated
//! through a [`ScanFactory`].

mod assign;
pub mod equality;
pub mod factory;
pub mod field_set;
pub mod load;
pub mod options;
pub mod save;

pub use equality::is_equal;
pub use factory::{ConditionFactory, DefaultFactory, FactoryError, FieldFactory, ScanFactory};
pub use field_set::{FieldSet, FieldSetError};
pub use load::try_load_from_formula_node;
pub use options::LoadOptions;
pub use save::create_formula_node;

pub use scan_core::error::{LoadError, LoadErrorTypeId};
