//! Fields -- one named slot of a field set holding homogeneous conditions.

use std::fmt;

use serde::Serialize;

use crate::condition::{Condition, Operand, OverlapValues};
use crate::formula::{BooleanNode, NumericComparisonNode, NumericNode};
use crate::ids::{
    BooleanOperationId, ConditionTypeId, FieldId, FieldKey, FieldTypeId, HasValueFieldId,
    NumericComparisonOperatorId, OperatorId, SubFieldId,
};
use crate::list::OrderedList;

/// Why a field rejected a change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("field {field} already combines its conditions with {current}, not {requested}")]
    OperationIdAlreadySet {
        field: FieldKey,
        current: BooleanOperationId,
        requested: BooleanOperationId,
    },

    #[error("field {field} holds {expected} conditions, not {actual}")]
    ConditionTypeMismatch {
        field: FieldKey,
        expected: ConditionTypeId,
        actual: ConditionTypeId,
    },

    #[error("xor field {field} already has two conditions")]
    XorConditionLimit { field: FieldKey },
}

/// Operation a field's conditions combine with while none has been set.
pub const DEFAULT_CONDITIONS_OPERATION_ID: BooleanOperationId = BooleanOperationId::And;

/// A field of a field set.
///
/// The key fixes the condition kind; `conditions_operation_id` is set once
/// and says how the conditions combine. An unset operation reads as
/// [`DEFAULT_CONDITIONS_OPERATION_ID`] when saving. Conditions live in any
/// [`OrderedList`], a `Vec` unless the host brings its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field<C = Vec<Condition>> {
    key: FieldKey,
    conditions_operation_id: Option<BooleanOperationId>,
    conditions: C,
}

impl Field {
    pub const DEFAULT_CONDITIONS_OPERATION_ID: BooleanOperationId =
        DEFAULT_CONDITIONS_OPERATION_ID;

    pub fn new(key: FieldKey) -> Self {
        Self::with_list(key, Vec::new())
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }
}

impl<C: OrderedList<Condition>> Field<C> {
    /// An empty field keeping its conditions in `conditions`, which is
    /// cleared first.
    pub fn with_list(key: FieldKey, mut conditions: C) -> Self {
        conditions.clear();
        Self {
            key,
            conditions_operation_id: None,
            conditions,
        }
    }

    pub fn key(&self) -> FieldKey {
        self.key
    }

    pub fn type_id(&self) -> FieldTypeId {
        self.key.type_id()
    }

    pub fn field_id(&self) -> FieldId {
        self.key.field_id()
    }

    pub fn sub_field_id(&self) -> Option<SubFieldId> {
        self.key.sub_field_id()
    }

    pub fn condition_type_id(&self) -> ConditionTypeId {
        self.key.condition_type_id()
    }

    pub fn conditions_operation_id(&self) -> Option<BooleanOperationId> {
        self.conditions_operation_id
    }

    /// The operation, falling back to the default when unset.
    pub fn effective_conditions_operation_id(&self) -> BooleanOperationId {
        self.conditions_operation_id
            .unwrap_or(DEFAULT_CONDITIONS_OPERATION_ID)
    }

    /// Sets the operation. Setting the same value again is a no-op.
    pub fn set_conditions_operation_id(
        &mut self,
        operation_id: BooleanOperationId,
    ) -> Result<(), FieldError> {
        match self.conditions_operation_id {
            Some(current) if current != operation_id => Err(FieldError::OperationIdAlreadySet {
                field: self.key,
                current,
                requested: operation_id,
            }),
            _ => {
                self.conditions_operation_id = Some(operation_id);
                Ok(())
            }
        }
    }

    /// The list holding this field's conditions.
    pub fn condition_list(&self) -> &C {
        &self.conditions
    }

    pub fn condition_count(&self) -> usize {
        self.conditions.count()
    }

    pub fn has_condition(&self, condition: &Condition) -> bool {
        self.conditions.iter().any(|c| c == condition)
    }

    /// Appends `condition`. Returns `Ok(false)` and leaves the field alone
    /// when an equal condition is already present.
    pub fn add_condition(&mut self, condition: Condition) -> Result<bool, FieldError> {
        let expected = self.condition_type_id();
        if condition.type_id() != expected {
            return Err(FieldError::ConditionTypeMismatch {
                field: self.key,
                expected,
                actual: condition.type_id(),
            });
        }
        if self.has_condition(&condition) {
            return Ok(false);
        }
        if self.conditions_operation_id == Some(BooleanOperationId::Xor)
            && self.conditions.count() >= 2
        {
            return Err(FieldError::XorConditionLimit { field: self.key });
        }
        self.conditions.add(condition);
        Ok(true)
    }

    pub fn remove_condition(&mut self, index: usize) -> Option<Condition> {
        self.conditions.remove(index)
    }

    pub fn clear_conditions(&mut self) {
        self.conditions.clear();
    }

    // -----------------------------------------------------------------------
    // Formula output
    // -----------------------------------------------------------------------

    /// Formula node for one of this field's conditions. Negative operators
    /// come out as `NOT(<positive node>)`.
    pub fn condition_node(&self, condition: &Condition) -> BooleanNode {
        let operator_id = condition.operator_id();
        if operator_id.is_negative() {
            BooleanNode::not(positive_node(
                self.key,
                operator_id.inverse(),
                condition.operand(),
            ))
        } else {
            positive_node(self.key, operator_id, condition.operand())
        }
    }

    /// Appends this field's nodes to the save buckets.
    ///
    /// And fields add one node per condition to `anded`; Or fields add one
    /// Or node to `ored`; a Xor field with two conditions adds one Xor node to
    /// `xored`, while a half-built Xor field with one condition counts as
    /// anded. Empty fields add nothing.
    pub fn add_anded_ored_xor_nodes(
        &self,
        anded: &mut Vec<BooleanNode>,
        ored: &mut Vec<BooleanNode>,
        xored: &mut Vec<BooleanNode>,
    ) {
        if self.conditions.is_empty() {
            return;
        }
        let mut nodes = self.conditions.iter().map(|c| self.condition_node(c));
        match self.effective_conditions_operation_id() {
            BooleanOperationId::And => anded.extend(nodes),
            BooleanOperationId::Or => ored.push(BooleanNode::Or(nodes.collect())),
            BooleanOperationId::Xor => match (nodes.next(), nodes.next()) {
                (Some(left), Some(right)) => xored.push(BooleanNode::xor(left, right)),
                (Some(only), None) => anded.push(only),
                _ => {}
            },
        }
    }
}

impl<C: OrderedList<Condition>> fmt::Display for Field<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.key, self.effective_conditions_operation_id())?;
        for (i, condition) in self.conditions.iter().enumerate() {
            f.write_str(if i == 0 { " " } else { ", " })?;
            write!(f, "{condition}")?;
        }
        Ok(())
    }
}

fn numeric_value_node(
    operator_id: OperatorId,
    value: f64,
    value_get: NumericNode,
    equals: impl FnOnce(f64) -> BooleanNode,
) -> BooleanNode {
    match NumericComparisonOperatorId::from_ordering_operator(operator_id) {
        Some(comparison) => BooleanNode::NumericComparison(NumericComparisonNode {
            operator_id: comparison,
            left: value_get,
            right: NumericNode::Number(value),
        }),
        None => equals(value),
    }
}

/// Node for a non-negative operator. The key/operand pairing is guaranteed
/// by `Field::add_condition` and `Condition::new`.
fn positive_node(key: FieldKey, operator_id: OperatorId, operand: &Operand) -> BooleanNode {
    match (key, operand) {
        (FieldKey::NumericInRange(field_id), Operand::HasValue) => {
            BooleanNode::FieldHasValue(HasValueFieldId::Numeric(field_id))
        }
        (FieldKey::NumericInRange(field_id), Operand::NumericValue(value)) => numeric_value_node(
            operator_id,
            *value,
            NumericNode::FieldValueGet(field_id),
            |value| BooleanNode::NumericFieldEquals { field_id, value },
        ),
        (FieldKey::NumericInRange(field_id), Operand::NumericRange { min, max }) => {
            BooleanNode::NumericFieldInRange {
                field_id,
                min: *min,
                max: *max,
            }
        }
        (FieldKey::PriceSubbedNumericInRange(sub_field_id), Operand::HasValue) => {
            BooleanNode::PriceSubFieldHasValue(sub_field_id)
        }
        (FieldKey::PriceSubbedNumericInRange(sub_field_id), Operand::NumericValue(value)) => {
            numeric_value_node(
                operator_id,
                *value,
                NumericNode::PriceSubFieldValueGet(sub_field_id),
                |value| BooleanNode::PriceSubFieldEquals {
                    sub_field_id,
                    value,
                },
            )
        }
        (FieldKey::PriceSubbedNumericInRange(sub_field_id), Operand::NumericRange { min, max }) => {
            BooleanNode::PriceSubFieldInRange {
                sub_field_id,
                min: *min,
                max: *max,
            }
        }
        (FieldKey::DateInRange(field_id), Operand::HasValue) => {
            BooleanNode::FieldHasValue(HasValueFieldId::Date(field_id))
        }
        (FieldKey::DateInRange(field_id), Operand::DateValue(value)) => {
            BooleanNode::DateFieldEquals {
                field_id,
                value: *value,
            }
        }
        (FieldKey::DateInRange(field_id), Operand::DateRange { min, max }) => {
            BooleanNode::DateFieldInRange {
                field_id,
                min: *min,
                max: *max,
            }
        }
        (FieldKey::DateSubbedInRange(sub_field_id), Operand::HasValue) => {
            BooleanNode::DateSubFieldHasValue(sub_field_id)
        }
        (FieldKey::DateSubbedInRange(sub_field_id), Operand::DateValue(value)) => {
            BooleanNode::DateSubFieldEquals {
                sub_field_id,
                value: *value,
            }
        }
        (FieldKey::DateSubbedInRange(sub_field_id), Operand::DateRange { min, max }) => {
            BooleanNode::DateSubFieldInRange {
                sub_field_id,
                min: *min,
                max: *max,
            }
        }
        (FieldKey::TextContains(field_id), Operand::Contains(contains)) => {
            BooleanNode::TextFieldContains {
                field_id,
                contains: contains.clone(),
            }
        }
        (FieldKey::AltCodeSubbedTextHasValueContains(sub_field_id), Operand::HasValue) => {
            BooleanNode::AltCodeSubFieldHasValue(sub_field_id)
        }
        (
            FieldKey::AltCodeSubbedTextHasValueContains(sub_field_id),
            Operand::Contains(contains),
        ) => BooleanNode::AltCodeSubFieldContains {
            sub_field_id,
            contains: contains.clone(),
        },
        (FieldKey::AttributeSubbedTextHasValueContains(sub_field_id), Operand::HasValue) => {
            BooleanNode::AttributeSubFieldHasValue(sub_field_id)
        }
        (
            FieldKey::AttributeSubbedTextHasValueContains(sub_field_id),
            Operand::Contains(contains),
        ) => BooleanNode::AttributeSubFieldContains {
            sub_field_id,
            contains: contains.clone(),
        },
        (FieldKey::TextHasValueEquals(field_id), Operand::HasValue) => {
            BooleanNode::FieldHasValue(HasValueFieldId::Text(field_id))
        }
        (FieldKey::TextHasValueEquals(field_id), Operand::TextValue(value)) => {
            BooleanNode::TextFieldEquals {
                field_id,
                value: value.clone(),
            }
        }
        (FieldKey::StringOverlaps(field_id), Operand::Overlaps(OverlapValues::Strings(values))) => {
            BooleanNode::StringFieldOverlaps {
                field_id,
                values: values.clone(),
            }
        }
        (FieldKey::CurrencyOverlaps, Operand::Overlaps(OverlapValues::Currencies(values))) => {
            BooleanNode::CurrencyFieldOverlaps(values.clone())
        }
        (FieldKey::ExchangeOverlaps, Operand::Overlaps(OverlapValues::Exchanges(values))) => {
            BooleanNode::ExchangeFieldOverlaps(values.clone())
        }
        (FieldKey::MarketOverlaps, Operand::Overlaps(OverlapValues::Markets(values))) => {
            BooleanNode::MarketFieldOverlaps(values.clone())
        }
        (FieldKey::MarketBoardOverlaps, Operand::Overlaps(OverlapValues::MarketBoards(values))) => {
            BooleanNode::MarketBoardFieldOverlaps(values.clone())
        }
        (FieldKey::Is, Operand::Category(category_id)) => BooleanNode::Is(*category_id),
        (key, operand) => unreachable!(
            "field {key} cannot hold a {} condition ({operator_id})",
            operand.shape()
        ),
    }
}
