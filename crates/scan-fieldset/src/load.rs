//! Formula → field set.
//!
//! The tree is walked one level at a time. Level 0 is the root And (a lone
//! non-And root is treated as a one-operand And). Each level holds And, Or
//! and Xor nodes waiting to be classified:
//!
//! - an And node flattens nested Ands into the next level and opens one
//!   grouping per Or/Xor operand; its other operands are And leaves
//! - an Or node flattens nested Ors into the same grouping; its other
//!   operands are Or leaves
//! - a Xor node turns both operands into Xor leaves
//!
//! Once a level opened a grouping, every later level is "in field" and may
//! not open another. Leaves become one condition on the field their key
//! names; fields are created on first use. The first violation aborts.

use std::collections::HashMap;
use std::slice;

use tracing::debug;

use scan_core::condition::Operand;
use scan_core::error::{LoadError, LoadErrorTypeId, Result};
use scan_core::field::Field;
use scan_core::formula::{BooleanNode, NumericComparisonNode, NumericNode};
use scan_core::ids::{BooleanOperationId, FieldId, FieldKey, HasValueFieldId, OperatorId};
use scan_core::list::OrderedList;

use crate::factory::{ScanFactory, create_condition, create_field};
use crate::field_set::FieldSet;
use crate::options::LoadOptions;

/// Loads `root` into `field_set`, replacing its contents.
///
/// Returns `true` on success. On failure returns `false` and the reason is
/// available from [`FieldSet::load_error`].
pub fn try_load_from_formula_node<F, L>(field_set: &mut FieldSet<F, L>, root: &BooleanNode) -> bool
where
    F: ScanFactory,
    L: OrderedList<Field>,
{
    field_set.load(root).is_ok()
}

impl<F: ScanFactory, L: OrderedList<Field>> FieldSet<F, L> {
    /// Loads `root`, replacing the current fields.
    ///
    /// The error is also kept in [`FieldSet::load_error`]. Fields populated
    /// before a failure are left in place.
    pub fn load(&mut self, root: &BooleanNode) -> Result<()> {
        self.begin_load();
        debug!(%root, "loading formula");

        let mut loader = Loader {
            fields: &mut self.fields,
            factory: &self.factory,
            options: &self.options,
            grouping_fields: Vec::new(),
            field_groupings: HashMap::new(),
        };
        let result = loader.run(root);

        match &result {
            Ok(()) => {
                if self.options.canonical_field_order {
                    canonicalize_field_order(&mut self.fields);
                }
                debug!(fields = self.fields.count(), "formula loaded");
            }
            Err(err) => debug!(error = %err, "formula rejected"),
        }
        self.end_load(result.clone().err());
        result
    }

    /// Same as the free [`try_load_from_formula_node`].
    pub fn try_load_from_formula_node(&mut self, root: &BooleanNode) -> bool {
        self.load(root).is_ok()
    }
}

// ---------------------------------------------------------------------------
// Level walk
// ---------------------------------------------------------------------------

/// A node waiting on a level.
enum Pending<'n> {
    And(&'n [BooleanNode]),
    Or {
        operands: &'n [BooleanNode],
        grouping: usize,
    },
    Xor {
        left: &'n BooleanNode,
        right: &'n BooleanNode,
        grouping: usize,
    },
}

/// Boolean context a leaf is loaded in.
#[derive(Debug, Clone, Copy)]
struct Context {
    operation_id: BooleanOperationId,
    /// Or/Xor grouping the leaf belongs to; `None` under And.
    grouping: Option<usize>,
}

impl Context {
    const AND: Self = Self {
        operation_id: BooleanOperationId::And,
        grouping: None,
    };
}

struct Loader<'s, F, L> {
    fields: &'s mut L,
    factory: &'s F,
    options: &'s LoadOptions,
    /// Field each grouping is bound to, indexed by grouping.
    grouping_fields: Vec<Option<FieldId>>,
    /// Grouping each Or/Xor field was loaded from.
    field_groupings: HashMap<FieldId, usize>,
}

impl<F: ScanFactory, L: OrderedList<Field>> Loader<'_, F, L> {
    fn run(&mut self, root: &BooleanNode) -> Result<()> {
        let mut level = match root {
            BooleanNode::None => return Ok(()),
            BooleanNode::And(operands) => vec![Pending::And(operands)],
            other => vec![Pending::And(slice::from_ref(other))],
        };
        let mut in_field = false;

        while !level.is_empty() {
            let mut next = Vec::new();
            let mut next_in_field = in_field;
            for pending in level {
                match pending {
                    Pending::And(operands) => {
                        self.and_node(operands, in_field, &mut next, &mut next_in_field)?;
                    }
                    Pending::Or { operands, grouping } => {
                        self.or_node(operands, grouping, &mut next)?;
                    }
                    Pending::Xor {
                        left,
                        right,
                        grouping,
                    } => self.xor_node(left, right, grouping)?,
                }
            }
            level = next;
            in_field = next_in_field;
        }

        // An OR with no leaves matches nothing and has no field form.
        if self.grouping_fields.iter().any(Option::is_none) {
            return Err(LoadError::new(LoadErrorTypeId::OrFieldHasNoConditions));
        }
        Ok(())
    }

    fn and_node<'n>(
        &mut self,
        operands: &'n [BooleanNode],
        in_field: bool,
        next: &mut Vec<Pending<'n>>,
        next_in_field: &mut bool,
    ) -> Result<()> {
        for operand in operands {
            match operand {
                BooleanNode::And(children) => next.push(Pending::And(children)),
                BooleanNode::Or(children) => {
                    if in_field {
                        return Err(node_error(LoadErrorTypeId::AndFieldHasOrChild, operand));
                    }
                    let grouping = self.open_grouping();
                    next.push(Pending::Or {
                        operands: children,
                        grouping,
                    });
                    *next_in_field = true;
                }
                BooleanNode::Xor(left, right) => {
                    if in_field {
                        return Err(node_error(LoadErrorTypeId::AndFieldHasXorChild, operand));
                    }
                    let grouping = self.open_grouping();
                    next.push(Pending::Xor {
                        left,
                        right,
                        grouping,
                    });
                    *next_in_field = true;
                }
                leaf => {
                    self.add_leaf(leaf, Context::AND)?;
                }
            }
        }
        Ok(())
    }

    fn or_node<'n>(
        &mut self,
        operands: &'n [BooleanNode],
        grouping: usize,
        next: &mut Vec<Pending<'n>>,
    ) -> Result<()> {
        let context = Context {
            operation_id: BooleanOperationId::Or,
            grouping: Some(grouping),
        };
        for operand in operands {
            match operand {
                BooleanNode::Or(children) => next.push(Pending::Or {
                    operands: children,
                    grouping,
                }),
                BooleanNode::And(_) => {
                    return Err(node_error(LoadErrorTypeId::OrFieldHasAndChild, operand));
                }
                BooleanNode::Xor(..) => {
                    return Err(node_error(LoadErrorTypeId::OrFieldHasXorChild, operand));
                }
                leaf => {
                    self.add_leaf(leaf, context)?;
                }
            }
        }
        Ok(())
    }

    fn xor_node(&mut self, left: &BooleanNode, right: &BooleanNode, grouping: usize) -> Result<()> {
        for operand in [left, right] {
            let type_id = match operand {
                BooleanNode::And(_) => LoadErrorTypeId::XorFieldHasAndChild,
                BooleanNode::Or(_) => LoadErrorTypeId::XorFieldHasOrChild,
                BooleanNode::Xor(..) => LoadErrorTypeId::XorFieldHasXorChild,
                _ => continue,
            };
            return Err(node_error(type_id, operand));
        }

        let context = Context {
            operation_id: BooleanOperationId::Xor,
            grouping: Some(grouping),
        };
        self.add_leaf(left, context)?;
        if !self.add_leaf(right, context)? {
            return Err(LoadError::with_extra(
                LoadErrorTypeId::XorFieldHasDuplicateConditions,
                BooleanNode::xor(left.clone(), right.clone()).to_string(),
            ));
        }
        Ok(())
    }

    fn open_grouping(&mut self) -> usize {
        self.grouping_fields.push(None);
        self.grouping_fields.len() - 1
    }

    // -----------------------------------------------------------------------
    // Leaves
    // -----------------------------------------------------------------------

    /// Adds the condition for `node` to its field. Returns `false` when the
    /// field already held an equal condition.
    fn add_leaf(&mut self, node: &BooleanNode, context: Context) -> Result<bool> {
        let leaf = leaf_condition(node)?;
        let field_id = leaf.key.field_id();

        if let Some(grouping) = context.grouping {
            if let Some(Some(bound)) = self.grouping_fields.get(grouping) {
                if *bound != field_id {
                    let type_id = match context.operation_id {
                        BooleanOperationId::Xor => {
                            LoadErrorTypeId::XorFieldReferencesMultipleFields
                        }
                        _ => LoadErrorTypeId::OrFieldReferencesMultipleFields,
                    };
                    return Err(LoadError::with_extra(
                        type_id,
                        format!("{bound} and {field_id}"),
                    ));
                }
            }
        }

        let index = self.fields.position(|field| field.field_id() == field_id);
        let added = match index.and_then(|index| self.fields.get_mut(index)) {
            Some(field) => {
                check_existing(
                    field,
                    &leaf,
                    context,
                    self.field_groupings.get(&field_id).copied(),
                    self.options,
                )?;
                let condition = create_condition(self.factory, field, leaf.operator_id, leaf.operand)
                    .map_err(|err| {
                        LoadError::with_extra(
                            LoadErrorTypeId::FactoryCreateFieldConditionError,
                            err.message,
                        )
                    })?;
                field.add_condition(condition).map_err(|err| {
                    LoadError::with_extra(
                        LoadErrorTypeId::FactoryCreateFieldConditionError,
                        err.to_string(),
                    )
                })?
            }
            None => {
                let field = self.new_field(leaf, context)?;
                debug!(field = %field.key(), operation = %context.operation_id, "created field");
                self.fields.add(field);
                if let Some(grouping) = context.grouping {
                    self.field_groupings.insert(field_id, grouping);
                }
                true
            }
        };

        if let Some(slot) = context.grouping.and_then(|g| self.grouping_fields.get_mut(g)) {
            *slot = Some(field_id);
        }
        Ok(added)
    }

    /// A fresh field for `leaf`, holding its condition.
    fn new_field(&self, leaf: LeafCondition, context: Context) -> Result<Field> {
        let field_error = |message: String| {
            LoadError::with_extra(LoadErrorTypeId::FactoryCreateFieldError, message)
        };
        let mut field = create_field(self.factory, leaf.key).map_err(|err| field_error(err.message))?;
        field
            .set_conditions_operation_id(context.operation_id)
            .map_err(|err| field_error(err.to_string()))?;

        let condition = create_condition(self.factory, &field, leaf.operator_id, leaf.operand)
            .map_err(|err| {
                LoadError::with_extra(LoadErrorTypeId::FactoryCreateFieldConditionError, err.message)
            })?;
        field.add_condition(condition).map_err(|err| {
            LoadError::with_extra(
                LoadErrorTypeId::FactoryCreateFieldConditionError,
                err.to_string(),
            )
        })?;
        Ok(field)
    }
}

/// Consistency checks for a leaf landing on a field that already exists.
fn check_existing(
    field: &Field,
    leaf: &LeafCondition,
    context: Context,
    field_grouping: Option<usize>,
    options: &LoadOptions,
) -> Result<()> {
    let existing = field.effective_conditions_operation_id();
    if existing != context.operation_id {
        let type_id = match (existing, context.operation_id) {
            (BooleanOperationId::And, BooleanOperationId::Or) => LoadErrorTypeId::AndFieldHasOrChild,
            (BooleanOperationId::And, BooleanOperationId::Xor) => {
                LoadErrorTypeId::AndFieldHasXorChild
            }
            _ => LoadErrorTypeId::FieldConditionsOperationIdMismatch,
        };
        return Err(LoadError::with_extra(
            type_id,
            format!("{} is {existing}, found under {}", field.key(), context.operation_id),
        ));
    }

    if context.grouping.is_some() && field_grouping != context.grouping {
        return Err(LoadError::with_extra(
            LoadErrorTypeId::FieldAppearsInMultipleGroupings,
            field.key().to_string(),
        ));
    }

    if leaf.key != field.key() {
        if options.strict_sub_fields {
            return Err(LoadError::with_extra(
                LoadErrorTypeId::FieldSubFieldIdMismatch,
                format!("{} and {}", field.key(), leaf.key),
            ));
        }
        debug!(
            field = %field.key(),
            sub_field = %leaf.key,
            "condition joins field with a different sub-field"
        );
    }
    Ok(())
}

fn node_error(type_id: LoadErrorTypeId, node: &BooleanNode) -> LoadError {
    LoadError::with_extra(type_id, node.to_string())
}

// ---------------------------------------------------------------------------
// Leaf synthesis
// ---------------------------------------------------------------------------

/// What a leaf node asks for: the field it names and one condition.
#[derive(Debug, Clone, PartialEq)]
struct LeafCondition {
    key: FieldKey,
    operator_id: OperatorId,
    operand: Operand,
}

impl LeafCondition {
    fn new(key: FieldKey, operator_id: OperatorId, operand: Operand) -> Self {
        Self {
            key,
            operator_id,
            operand,
        }
    }

    fn negated(self) -> Self {
        Self {
            operator_id: self.operator_id.inverse(),
            ..self
        }
    }
}

/// Translates a leaf (possibly under any number of Nots) into a condition.
fn leaf_condition(node: &BooleanNode) -> Result<LeafCondition> {
    use OperatorId::{Contains, Equals, HasValue, InRange, Is, Overlaps};
    use scan_core::condition::OverlapValues as Values;

    let leaf = match node {
        BooleanNode::Not(operand) => return leaf_condition(operand).map(LeafCondition::negated),
        BooleanNode::And(_) => {
            return Err(node_error(LoadErrorTypeId::AndFieldOperatorCannotBeNegated, node));
        }
        BooleanNode::Or(_) => {
            return Err(node_error(LoadErrorTypeId::OrFieldOperatorCannotBeNegated, node));
        }
        BooleanNode::Xor(..) => {
            return Err(node_error(LoadErrorTypeId::XorFieldOperatorCannotBeNegated, node));
        }
        BooleanNode::All => return Err(LoadError::new(LoadErrorTypeId::AllConditionNotSupported)),
        BooleanNode::None => {
            return Err(LoadError::new(LoadErrorTypeId::NoneConditionNotSupported));
        }
        BooleanNode::NumericComparison(comparison) => return numeric_comparison(comparison),

        BooleanNode::Is(category_id) => {
            LeafCondition::new(FieldKey::Is, Is, Operand::Category(*category_id))
        }
        BooleanNode::FieldHasValue(field_id) => {
            let key = match *field_id {
                HasValueFieldId::Numeric(id) => FieldKey::NumericInRange(id),
                HasValueFieldId::Date(id) => FieldKey::DateInRange(id),
                HasValueFieldId::Text(id) => FieldKey::TextHasValueEquals(id),
            };
            LeafCondition::new(key, HasValue, Operand::HasValue)
        }
        BooleanNode::NumericFieldEquals { field_id, value } => LeafCondition::new(
            FieldKey::NumericInRange(*field_id),
            Equals,
            Operand::NumericValue(*value),
        ),
        BooleanNode::NumericFieldInRange { field_id, min, max } => LeafCondition::new(
            FieldKey::NumericInRange(*field_id),
            InRange,
            Operand::NumericRange {
                min: *min,
                max: *max,
            },
        ),
        BooleanNode::PriceSubFieldHasValue(sub_field_id) => LeafCondition::new(
            FieldKey::PriceSubbedNumericInRange(*sub_field_id),
            HasValue,
            Operand::HasValue,
        ),
        BooleanNode::PriceSubFieldEquals {
            sub_field_id,
            value,
        } => LeafCondition::new(
            FieldKey::PriceSubbedNumericInRange(*sub_field_id),
            Equals,
            Operand::NumericValue(*value),
        ),
        BooleanNode::PriceSubFieldInRange {
            sub_field_id,
            min,
            max,
        } => LeafCondition::new(
            FieldKey::PriceSubbedNumericInRange(*sub_field_id),
            InRange,
            Operand::NumericRange {
                min: *min,
                max: *max,
            },
        ),
        BooleanNode::DateFieldEquals { field_id, value } => LeafCondition::new(
            FieldKey::DateInRange(*field_id),
            Equals,
            Operand::DateValue(*value),
        ),
        BooleanNode::DateFieldInRange { field_id, min, max } => LeafCondition::new(
            FieldKey::DateInRange(*field_id),
            InRange,
            Operand::DateRange {
                min: *min,
                max: *max,
            },
        ),
        BooleanNode::DateSubFieldHasValue(sub_field_id) => LeafCondition::new(
            FieldKey::DateSubbedInRange(*sub_field_id),
            HasValue,
            Operand::HasValue,
        ),
        BooleanNode::DateSubFieldEquals {
            sub_field_id,
            value,
        } => LeafCondition::new(
            FieldKey::DateSubbedInRange(*sub_field_id),
            Equals,
            Operand::DateValue(*value),
        ),
        BooleanNode::DateSubFieldInRange {
            sub_field_id,
            min,
            max,
        } => LeafCondition::new(
            FieldKey::DateSubbedInRange(*sub_field_id),
            InRange,
            Operand::DateRange {
                min: *min,
                max: *max,
            },
        ),
        BooleanNode::TextFieldContains { field_id, contains } => LeafCondition::new(
            FieldKey::TextContains(*field_id),
            Contains,
            Operand::Contains(contains.clone()),
        ),
        BooleanNode::AltCodeSubFieldHasValue(sub_field_id) => LeafCondition::new(
            FieldKey::AltCodeSubbedTextHasValueContains(*sub_field_id),
            HasValue,
            Operand::HasValue,
        ),
        BooleanNode::AltCodeSubFieldContains {
            sub_field_id,
            contains,
        } => LeafCondition::new(
            FieldKey::AltCodeSubbedTextHasValueContains(*sub_field_id),
            Contains,
            Operand::Contains(contains.clone()),
        ),
        BooleanNode::AttributeSubFieldHasValue(sub_field_id) => LeafCondition::new(
            FieldKey::AttributeSubbedTextHasValueContains(*sub_field_id),
            HasValue,
            Operand::HasValue,
        ),
        BooleanNode::AttributeSubFieldContains {
            sub_field_id,
            contains,
        } => LeafCondition::new(
            FieldKey::AttributeSubbedTextHasValueContains(*sub_field_id),
            Contains,
            Operand::Contains(contains.clone()),
        ),
        BooleanNode::TextFieldEquals { field_id, value } => LeafCondition::new(
            FieldKey::TextHasValueEquals(*field_id),
            Equals,
            Operand::TextValue(value.clone()),
        ),
        BooleanNode::StringFieldOverlaps { field_id, values } => LeafCondition::new(
            FieldKey::StringOverlaps(*field_id),
            Overlaps,
            Operand::Overlaps(Values::Strings(values.clone())),
        ),
        BooleanNode::CurrencyFieldOverlaps(values) => LeafCondition::new(
            FieldKey::CurrencyOverlaps,
            Overlaps,
            Operand::Overlaps(Values::Currencies(values.clone())),
        ),
        BooleanNode::ExchangeFieldOverlaps(values) => LeafCondition::new(
            FieldKey::ExchangeOverlaps,
            Overlaps,
            Operand::Overlaps(Values::Exchanges(values.clone())),
        ),
        BooleanNode::MarketFieldOverlaps(values) => LeafCondition::new(
            FieldKey::MarketOverlaps,
            Overlaps,
            Operand::Overlaps(Values::Markets(values.clone())),
        ),
        BooleanNode::MarketBoardFieldOverlaps(values) => LeafCondition::new(
            FieldKey::MarketBoardOverlaps,
            Overlaps,
            Operand::Overlaps(Values::MarketBoards(values.clone())),
        ),
    };
    Ok(leaf)
}

/// `field OP number`, or `number OP field` with the operator mirrored.
fn numeric_comparison(node: &NumericComparisonNode) -> Result<LeafCondition> {
    let (field_side, comparison, value) = match (&node.left, &node.right) {
        (left, NumericNode::Number(value)) => (left, node.operator_id, *value),
        (NumericNode::Number(value), right) => (right, node.operator_id.mirrored(), *value),
        _ => {
            return Err(LoadError::with_extra(
                LoadErrorTypeId::NumericComparisonBooleanNodeDoesNotHaveANumberOperand,
                node.to_string(),
            ));
        }
    };
    let key = match field_side {
        NumericNode::FieldValueGet(field_id) => FieldKey::NumericInRange(*field_id),
        NumericNode::PriceSubFieldValueGet(sub_field_id) => {
            FieldKey::PriceSubbedNumericInRange(*sub_field_id)
        }
        _ => {
            return Err(LoadError::with_extra(
                LoadErrorTypeId::NumericComparisonBooleanNodeDoesNotHaveANumericFieldValueGetOperand,
                node.to_string(),
            ));
        }
    };
    Ok(LeafCondition::new(
        key,
        comparison.operator_id(),
        Operand::NumericValue(value),
    ))
}

/// Stable reorder: And fields, then Or, then Xor.
fn canonicalize_field_order<L: OrderedList<Field>>(fields: &mut L) {
    fn rank(field: &Field) -> u8 {
        match field.effective_conditions_operation_id() {
            BooleanOperationId::And => 0,
            BooleanOperationId::Or => 1,
            BooleanOperationId::Xor => 2,
        }
    }

    let ranks: Vec<u8> = fields.iter().map(rank).collect();
    if ranks.is_sorted() {
        return;
    }
    let mut drained = Vec::with_capacity(fields.count());
    while let Some(field) = fields.remove(0) {
        drained.push(field);
    }
    drained.sort_by_key(rank);
    for field in drained {
        fields.add(field);
    }
}
