//! Field set → formula.

use scan_core::field::Field;
use scan_core::formula::BooleanNode;
use scan_core::list::OrderedList;

use crate::field_set::FieldSet;

/// Rebuilds the smallest formula equivalent to `field_set`.
///
/// With only And conditions the result is `None` (no conditions), the single
/// leaf, or one And node. As soon as any Or or Xor grouping exists the
/// result is always one And node over the And leaves, then the Or nodes,
/// then the Xor nodes.
pub fn create_formula_node<F, L: OrderedList<Field>>(field_set: &FieldSet<F, L>) -> BooleanNode {
    let mut anded = Vec::new();
    let mut ored = Vec::new();
    let mut xored = Vec::new();
    for field in field_set.iter() {
        field.add_anded_ored_xor_nodes(&mut anded, &mut ored, &mut xored);
    }

    if ored.is_empty() && xored.is_empty() {
        return match anded.len() {
            0 => BooleanNode::None,
            1 => anded.remove(0),
            _ => BooleanNode::And(anded),
        };
    }
    anded.append(&mut ored);
    anded.append(&mut xored);
    BooleanNode::And(anded)
}

impl<F, L: OrderedList<Field>> FieldSet<F, L> {
    /// Same as the free [`create_formula_node`].
    pub fn create_formula_node(&self) -> BooleanNode {
        create_formula_node(self)
    }
}
