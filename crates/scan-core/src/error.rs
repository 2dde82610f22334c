//! Load errors -- why a formula could not be expressed as fields.

define_id! {
    /// Every way a formula can fail to load into a field set.
    LoadErrorTypeId {
        AndFieldHasOrChild => "and_field_has_or_child",
        AndFieldHasXorChild => "and_field_has_xor_child",
        OrFieldHasAndChild => "or_field_has_and_child",
        OrFieldHasXorChild => "or_field_has_xor_child",
        XorFieldHasAndChild => "xor_field_has_and_child",
        XorFieldHasOrChild => "xor_field_has_or_child",
        XorFieldHasXorChild => "xor_field_has_xor_child",
        AndFieldOperatorCannotBeNegated => "and_field_operator_cannot_be_negated",
        OrFieldOperatorCannotBeNegated => "or_field_operator_cannot_be_negated",
        XorFieldOperatorCannotBeNegated => "xor_field_operator_cannot_be_negated",
        AllConditionNotSupported => "all_condition_not_supported",
        NoneConditionNotSupported => "none_condition_not_supported",
        NumericComparisonBooleanNodeDoesNotHaveANumberOperand =>
            "numeric_comparison_boolean_node_does_not_have_a_number_operand",
        NumericComparisonBooleanNodeDoesNotHaveANumericFieldValueGetOperand =>
            "numeric_comparison_boolean_node_does_not_have_a_numeric_field_value_get_operand",
        FieldConditionsOperationIdMismatch => "field_conditions_operation_id_mismatch",
        OrFieldReferencesMultipleFields => "or_field_references_multiple_fields",
        OrFieldHasNoConditions => "or_field_has_no_conditions",
        XorFieldReferencesMultipleFields => "xor_field_references_multiple_fields",
        FieldAppearsInMultipleGroupings => "field_appears_in_multiple_groupings",
        XorFieldHasDuplicateConditions => "xor_field_has_duplicate_conditions",
        FieldSubFieldIdMismatch => "field_sub_field_id_mismatch",
        FactoryCreateFieldError => "factory_create_field_error",
        FactoryCreateFieldConditionError => "factory_create_field_condition_error",
    }
}

impl LoadErrorTypeId {
    /// Human readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::AndFieldHasOrChild => "a field combined with AND also appears inside an OR",
            Self::AndFieldHasXorChild => "a field combined with AND also appears inside a XOR",
            Self::OrFieldHasAndChild => "an OR grouping contains an AND",
            Self::OrFieldHasXorChild => "an OR grouping contains a XOR",
            Self::XorFieldHasAndChild => "a XOR operand is an AND",
            Self::XorFieldHasOrChild => "a XOR operand is an OR",
            Self::XorFieldHasXorChild => "a XOR operand is a XOR",
            Self::AndFieldOperatorCannotBeNegated => "an AND cannot be negated",
            Self::OrFieldOperatorCannotBeNegated => "an OR cannot be negated",
            Self::XorFieldOperatorCannotBeNegated => "a XOR cannot be negated",
            Self::AllConditionNotSupported => "ALL is not supported as a condition",
            Self::NoneConditionNotSupported => "NONE is not supported as a condition",
            Self::NumericComparisonBooleanNodeDoesNotHaveANumberOperand => {
                "numeric comparison has no number operand"
            }
            Self::NumericComparisonBooleanNodeDoesNotHaveANumericFieldValueGetOperand => {
                "numeric comparison has no field value operand"
            }
            Self::FieldConditionsOperationIdMismatch => {
                "a field is used with more than one boolean operation"
            }
            Self::OrFieldReferencesMultipleFields => "an OR grouping references more than one field",
            Self::OrFieldHasNoConditions => "an OR grouping has no conditions",
            Self::XorFieldReferencesMultipleFields => "a XOR references more than one field",
            Self::FieldAppearsInMultipleGroupings => {
                "a field appears in more than one OR or XOR grouping"
            }
            Self::XorFieldHasDuplicateConditions => "both XOR operands are the same condition",
            Self::FieldSubFieldIdMismatch => "a field is used with more than one sub-field",
            Self::FactoryCreateFieldError => "the factory could not create a field",
            Self::FactoryCreateFieldConditionError => "the factory could not create a condition",
        }
    }
}

/// A failed load: the kind plus optional detail (offending node, factory
/// message).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}{}", .type_id.description(), extra_suffix(.extra))]
pub struct LoadError {
    pub type_id: LoadErrorTypeId,
    pub extra: Option<String>,
}

impl LoadError {
    pub fn new(type_id: LoadErrorTypeId) -> Self {
        Self {
            type_id,
            extra: None,
        }
    }

    pub fn with_extra(type_id: LoadErrorTypeId, extra: impl Into<String>) -> Self {
        Self {
            type_id,
            extra: Some(extra.into()),
        }
    }
}

fn extra_suffix(extra: &Option<String>) -> String {
    match extra {
        Some(extra) => format!(": {extra}"),
        None => String::new(),
    }
}

/// Result type for field set loading.
pub type Result<T> = std::result::Result<T, LoadError>;
