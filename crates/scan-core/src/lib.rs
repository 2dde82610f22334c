//! Core types for scan field sets.
//!
//! A scan is a screening predicate over financial instruments. It exists in
//! two shapes: a formula (a nested boolean tree, see [`formula`]) and a flat
//! set of fields, each holding conditions combined by one boolean operation
//! (see [`field`] and [`condition`]). This crate holds both shapes and the
//! identifiers they share; the conversion between them lives in
//! `scan-fieldset`.

#[macro_use]
mod macros;

pub mod condition;
pub mod error;
pub mod field;
pub mod formula;
pub mod ids;
pub mod list;
