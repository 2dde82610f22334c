//! Field set comparison.

use scan_core::field::Field;
use scan_core::list::OrderedList;

use crate::field_set::FieldSet;

/// `true` when both sets hold equal fields in the same order.
///
/// Order matters: the same fields loaded from differently ordered formulas
/// compare unequal.
pub fn is_equal<F1, L1, F2, L2>(a: &FieldSet<F1, L1>, b: &FieldSet<F2, L2>) -> bool
where
    L1: OrderedList<Field>,
    L2: OrderedList<Field>,
{
    a.field_count() == b.field_count() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
}

impl<F1, L1, F2, L2> PartialEq<FieldSet<F2, L2>> for FieldSet<F1, L1>
where
    L1: OrderedList<Field>,
    L2: OrderedList<Field>,
{
    fn eq(&self, other: &FieldSet<F2, L2>) -> bool {
        is_equal(self, other)
    }
}
