//! Pluggable allocation of fields and conditions.
//!
//! The load engine and [`FieldSet::assign`](crate::FieldSet::assign) never
//! build a [`Field`] or [`Condition`] directly; they go through a
//! [`FieldFactory`] and a [`ConditionFactory`] so a host can hand out its own
//! instances (pre-registered with an editor, say) or refuse some kinds. Every
//! method has a default that builds the plain value.

use chrono::{DateTime, Utc};

use scan_core::condition::{Condition, ConditionError, Operand, OverlapValues};
use scan_core::field::{Field, FieldError};
use scan_core::formula::TextContains;
use scan_core::ids::{
    AltCodeSubFieldId, AttributeSubFieldId, ConditionTypeId, CurrencyId, DateRangeFieldId,
    DateSubFieldId, FieldKey, IsCategoryId, NumericRangeFieldId, OperatorId, PriceSubFieldId,
    StringOverlapsFieldId, TextContainsFieldId, TextEqualsFieldId,
};

/// A factory refused or failed to build a field or condition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FactoryError {
    pub message: String,
}

impl FactoryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<FieldError> for FactoryError {
    fn from(err: FieldError) -> Self {
        Self::new(err.to_string())
    }
}

impl From<ConditionError> for FactoryError {
    fn from(err: ConditionError) -> Self {
        Self::new(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Field factory
// ---------------------------------------------------------------------------

/// Allocates empty fields, one method per field kind.
pub trait FieldFactory {
    fn create_numeric_in_range_field(
        &self,
        field_id: NumericRangeFieldId,
    ) -> Result<Field, FactoryError> {
        Ok(Field::new(FieldKey::NumericInRange(field_id)))
    }

    fn create_price_subbed_numeric_in_range_field(
        &self,
        sub_field_id: PriceSubFieldId,
    ) -> Result<Field, FactoryError> {
        Ok(Field::new(FieldKey::PriceSubbedNumericInRange(sub_field_id)))
    }

    fn create_date_in_range_field(&self, field_id: DateRangeFieldId) -> Result<Field, FactoryError> {
        Ok(Field::new(FieldKey::DateInRange(field_id)))
    }

    fn create_date_subbed_in_range_field(
        &self,
        sub_field_id: DateSubFieldId,
    ) -> Result<Field, FactoryError> {
        Ok(Field::new(FieldKey::DateSubbedInRange(sub_field_id)))
    }

    fn create_text_contains_field(
        &self,
        field_id: TextContainsFieldId,
    ) -> Result<Field, FactoryError> {
        Ok(Field::new(FieldKey::TextContains(field_id)))
    }

    fn create_alt_code_subbed_text_has_value_contains_field(
        &self,
        sub_field_id: AltCodeSubFieldId,
    ) -> Result<Field, FactoryError> {
        Ok(Field::new(FieldKey::AltCodeSubbedTextHasValueContains(
            sub_field_id,
        )))
    }

    fn create_attribute_subbed_text_has_value_contains_field(
        &self,
        sub_field_id: AttributeSubFieldId,
    ) -> Result<Field, FactoryError> {
        Ok(Field::new(FieldKey::AttributeSubbedTextHasValueContains(
            sub_field_id,
        )))
    }

    fn create_text_has_value_equals_field(
        &self,
        field_id: TextEqualsFieldId,
    ) -> Result<Field, FactoryError> {
        Ok(Field::new(FieldKey::TextHasValueEquals(field_id)))
    }

    fn create_string_overlaps_field(
        &self,
        field_id: StringOverlapsFieldId,
    ) -> Result<Field, FactoryError> {
        Ok(Field::new(FieldKey::StringOverlaps(field_id)))
    }

    fn create_currency_overlaps_field(&self) -> Result<Field, FactoryError> {
        Ok(Field::new(FieldKey::CurrencyOverlaps))
    }

    fn create_exchange_overlaps_field(&self) -> Result<Field, FactoryError> {
        Ok(Field::new(FieldKey::ExchangeOverlaps))
    }

    fn create_market_overlaps_field(&self) -> Result<Field, FactoryError> {
        Ok(Field::new(FieldKey::MarketOverlaps))
    }

    fn create_market_board_overlaps_field(&self) -> Result<Field, FactoryError> {
        Ok(Field::new(FieldKey::MarketBoardOverlaps))
    }

    fn create_is_field(&self) -> Result<Field, FactoryError> {
        Ok(Field::new(FieldKey::Is))
    }
}

// ---------------------------------------------------------------------------
// Condition factory
// ---------------------------------------------------------------------------

/// Allocates conditions for a field, one method per condition kind and
/// operand shape. `field` is the field the condition is destined for.
pub trait ConditionFactory {
    fn create_numeric_comparison_has_value_condition(
        &self,
        _field: &Field,
        operator_id: OperatorId,
    ) -> Result<Condition, FactoryError> {
        build(ConditionTypeId::NumericComparison, operator_id, Operand::HasValue)
    }

    fn create_numeric_comparison_value_condition(
        &self,
        _field: &Field,
        operator_id: OperatorId,
        value: f64,
    ) -> Result<Condition, FactoryError> {
        build(
            ConditionTypeId::NumericComparison,
            operator_id,
            Operand::NumericValue(value),
        )
    }

    fn create_numeric_comparison_in_range_condition(
        &self,
        _field: &Field,
        operator_id: OperatorId,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Result<Condition, FactoryError> {
        build(
            ConditionTypeId::NumericComparison,
            operator_id,
            Operand::NumericRange { min, max },
        )
    }

    fn create_date_has_value_condition(
        &self,
        _field: &Field,
        operator_id: OperatorId,
    ) -> Result<Condition, FactoryError> {
        build(ConditionTypeId::Date, operator_id, Operand::HasValue)
    }

    fn create_date_equals_condition(
        &self,
        _field: &Field,
        operator_id: OperatorId,
        value: DateTime<Utc>,
    ) -> Result<Condition, FactoryError> {
        build(ConditionTypeId::Date, operator_id, Operand::DateValue(value))
    }

    fn create_date_in_range_condition(
        &self,
        _field: &Field,
        operator_id: OperatorId,
        min: Option<DateTime<Utc>>,
        max: Option<DateTime<Utc>>,
    ) -> Result<Condition, FactoryError> {
        build(
            ConditionTypeId::Date,
            operator_id,
            Operand::DateRange { min, max },
        )
    }

    fn create_text_contains_condition(
        &self,
        _field: &Field,
        operator_id: OperatorId,
        contains: TextContains,
    ) -> Result<Condition, FactoryError> {
        build(
            ConditionTypeId::TextContains,
            operator_id,
            Operand::Contains(contains),
        )
    }

    fn create_text_has_value_contains_has_value_condition(
        &self,
        _field: &Field,
        operator_id: OperatorId,
    ) -> Result<Condition, FactoryError> {
        build(
            ConditionTypeId::TextHasValueContains,
            operator_id,
            Operand::HasValue,
        )
    }

    fn create_text_has_value_contains_contains_condition(
        &self,
        _field: &Field,
        operator_id: OperatorId,
        contains: TextContains,
    ) -> Result<Condition, FactoryError> {
        build(
            ConditionTypeId::TextHasValueContains,
            operator_id,
            Operand::Contains(contains),
        )
    }

    fn create_text_has_value_equals_has_value_condition(
        &self,
        _field: &Field,
        operator_id: OperatorId,
    ) -> Result<Condition, FactoryError> {
        build(
            ConditionTypeId::TextHasValueEquals,
            operator_id,
            Operand::HasValue,
        )
    }

    fn create_text_has_value_equals_value_condition(
        &self,
        _field: &Field,
        operator_id: OperatorId,
        value: String,
    ) -> Result<Condition, FactoryError> {
        build(
            ConditionTypeId::TextHasValueEquals,
            operator_id,
            Operand::TextValue(value),
        )
    }

    fn create_string_overlaps_condition(
        &self,
        _field: &Field,
        operator_id: OperatorId,
        values: Vec<String>,
    ) -> Result<Condition, FactoryError> {
        build(
            ConditionTypeId::StringOverlaps,
            operator_id,
            Operand::Overlaps(OverlapValues::Strings(values)),
        )
    }

    fn create_currency_overlaps_condition(
        &self,
        _field: &Field,
        operator_id: OperatorId,
        values: Vec<CurrencyId>,
    ) -> Result<Condition, FactoryError> {
        build(
            ConditionTypeId::CurrencyOverlaps,
            operator_id,
            Operand::Overlaps(OverlapValues::Currencies(values)),
        )
    }

    fn create_exchange_overlaps_condition(
        &self,
        _field: &Field,
        operator_id: OperatorId,
        values: Vec<String>,
    ) -> Result<Condition, FactoryError> {
        build(
            ConditionTypeId::ExchangeOverlaps,
            operator_id,
            Operand::Overlaps(OverlapValues::Exchanges(values)),
        )
    }

    fn create_market_overlaps_condition(
        &self,
        _field: &Field,
        operator_id: OperatorId,
        values: Vec<String>,
    ) -> Result<Condition, FactoryError> {
        build(
            ConditionTypeId::MarketOverlaps,
            operator_id,
            Operand::Overlaps(OverlapValues::Markets(values)),
        )
    }

    fn create_market_board_overlaps_condition(
        &self,
        _field: &Field,
        operator_id: OperatorId,
        values: Vec<String>,
    ) -> Result<Condition, FactoryError> {
        build(
            ConditionTypeId::MarketBoardOverlaps,
            operator_id,
            Operand::Overlaps(OverlapValues::MarketBoards(values)),
        )
    }

    fn create_is_condition(
        &self,
        _field: &Field,
        operator_id: OperatorId,
        category_id: IsCategoryId,
    ) -> Result<Condition, FactoryError> {
        build(
            ConditionTypeId::Is,
            operator_id,
            Operand::Category(category_id),
        )
    }
}

fn build(
    type_id: ConditionTypeId,
    operator_id: OperatorId,
    operand: Operand,
) -> Result<Condition, FactoryError> {
    Ok(Condition::new(type_id, operator_id, operand)?)
}

/// Both factories together; what a field set needs.
pub trait ScanFactory: FieldFactory + ConditionFactory {}

impl<T: FieldFactory + ConditionFactory + ?Sized> ScanFactory for T {}

/// Builds plain fields and conditions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultFactory;

impl FieldFactory for DefaultFactory {}

impl ConditionFactory for DefaultFactory {}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Creates the field for `key` through the matching allocator. A factory
/// that hands back a field with another key is an error.
pub fn create_field<F: FieldFactory + ?Sized>(
    factory: &F,
    key: FieldKey,
) -> Result<Field, FactoryError> {
    let field = match key {
        FieldKey::NumericInRange(id) => factory.create_numeric_in_range_field(id),
        FieldKey::PriceSubbedNumericInRange(id) => {
            factory.create_price_subbed_numeric_in_range_field(id)
        }
        FieldKey::DateInRange(id) => factory.create_date_in_range_field(id),
        FieldKey::DateSubbedInRange(id) => factory.create_date_subbed_in_range_field(id),
        FieldKey::TextContains(id) => factory.create_text_contains_field(id),
        FieldKey::AltCodeSubbedTextHasValueContains(id) => {
            factory.create_alt_code_subbed_text_has_value_contains_field(id)
        }
        FieldKey::AttributeSubbedTextHasValueContains(id) => {
            factory.create_attribute_subbed_text_has_value_contains_field(id)
        }
        FieldKey::TextHasValueEquals(id) => factory.create_text_has_value_equals_field(id),
        FieldKey::StringOverlaps(id) => factory.create_string_overlaps_field(id),
        FieldKey::CurrencyOverlaps => factory.create_currency_overlaps_field(),
        FieldKey::ExchangeOverlaps => factory.create_exchange_overlaps_field(),
        FieldKey::MarketOverlaps => factory.create_market_overlaps_field(),
        FieldKey::MarketBoardOverlaps => factory.create_market_board_overlaps_field(),
        FieldKey::Is => factory.create_is_field(),
    }?;
    if field.key() != key {
        return Err(FactoryError::new(format!(
            "factory returned a {} field when asked for {key}",
            field.key()
        )));
    }
    Ok(field)
}

/// Creates a condition for `field` through the allocator matching the
/// field's condition kind and the operand shape.
pub fn create_condition<F: ConditionFactory + ?Sized>(
    factory: &F,
    field: &Field,
    operator_id: OperatorId,
    operand: Operand,
) -> Result<Condition, FactoryError> {
    use ConditionTypeId as Kind;
    match (field.condition_type_id(), operand) {
        (Kind::NumericComparison, Operand::HasValue) => {
            factory.create_numeric_comparison_has_value_condition(field, operator_id)
        }
        (Kind::NumericComparison, Operand::NumericValue(value)) => {
            factory.create_numeric_comparison_value_condition(field, operator_id, value)
        }
        (Kind::NumericComparison, Operand::NumericRange { min, max }) => {
            factory.create_numeric_comparison_in_range_condition(field, operator_id, min, max)
        }
        (Kind::Date, Operand::HasValue) => {
            factory.create_date_has_value_condition(field, operator_id)
        }
        (Kind::Date, Operand::DateValue(value)) => {
            factory.create_date_equals_condition(field, operator_id, value)
        }
        (Kind::Date, Operand::DateRange { min, max }) => {
            factory.create_date_in_range_condition(field, operator_id, min, max)
        }
        (Kind::TextContains, Operand::Contains(contains)) => {
            factory.create_text_contains_condition(field, operator_id, contains)
        }
        (Kind::TextHasValueContains, Operand::HasValue) => {
            factory.create_text_has_value_contains_has_value_condition(field, operator_id)
        }
        (Kind::TextHasValueContains, Operand::Contains(contains)) => {
            factory.create_text_has_value_contains_contains_condition(field, operator_id, contains)
        }
        (Kind::TextHasValueEquals, Operand::HasValue) => {
            factory.create_text_has_value_equals_has_value_condition(field, operator_id)
        }
        (Kind::TextHasValueEquals, Operand::TextValue(value)) => {
            factory.create_text_has_value_equals_value_condition(field, operator_id, value)
        }
        (Kind::StringOverlaps, Operand::Overlaps(OverlapValues::Strings(values))) => {
            factory.create_string_overlaps_condition(field, operator_id, values)
        }
        (Kind::CurrencyOverlaps, Operand::Overlaps(OverlapValues::Currencies(values))) => {
            factory.create_currency_overlaps_condition(field, operator_id, values)
        }
        (Kind::ExchangeOverlaps, Operand::Overlaps(OverlapValues::Exchanges(values))) => {
            factory.create_exchange_overlaps_condition(field, operator_id, values)
        }
        (Kind::MarketOverlaps, Operand::Overlaps(OverlapValues::Markets(values))) => {
            factory.create_market_overlaps_condition(field, operator_id, values)
        }
        (Kind::MarketBoardOverlaps, Operand::Overlaps(OverlapValues::MarketBoards(values))) => {
            factory.create_market_board_overlaps_condition(field, operator_id, values)
        }
        (Kind::Is, Operand::Category(category_id)) => {
            factory.create_is_condition(field, operator_id, category_id)
        }
        (kind, operand) => Err(FactoryError::new(format!(
            "{kind} field {} cannot hold a {} operand",
            field.key(),
            operand.shape()
        ))),
    }
}
