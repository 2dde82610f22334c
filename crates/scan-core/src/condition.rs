//! Conditions -- one atomic test inside a field.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::formula::{DateDisplay, TextContains, write_range, write_values};
use crate::ids::{ConditionTypeId, CurrencyId, IsCategoryId, OperatorId};

/// Value set of an overlaps condition. The variant fixes the overlaps kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapValues {
    Strings(Vec<String>),
    Currencies(Vec<CurrencyId>),
    Exchanges(Vec<String>),
    Markets(Vec<String>),
    MarketBoards(Vec<String>),
}

impl OverlapValues {
    pub fn condition_type_id(&self) -> ConditionTypeId {
        match self {
            Self::Strings(_) => ConditionTypeId::StringOverlaps,
            Self::Currencies(_) => ConditionTypeId::CurrencyOverlaps,
            Self::Exchanges(_) => ConditionTypeId::ExchangeOverlaps,
            Self::Markets(_) => ConditionTypeId::MarketOverlaps,
            Self::MarketBoards(_) => ConditionTypeId::MarketBoardOverlaps,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Strings(v) | Self::Exchanges(v) | Self::Markets(v) | Self::MarketBoards(v) => {
                v.len()
            }
            Self::Currencies(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for OverlapValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strings(v) | Self::Exchanges(v) | Self::Markets(v) | Self::MarketBoards(v) => {
                write_values(f, v)
            }
            Self::Currencies(v) => write_values(f, v),
        }
    }
}

/// Payload of a condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operand {
    HasValue,
    NumericValue(f64),
    NumericRange {
        min: Option<f64>,
        max: Option<f64>,
    },
    DateValue(DateTime<Utc>),
    DateRange {
        min: Option<DateTime<Utc>>,
        max: Option<DateTime<Utc>>,
    },
    TextValue(String),
    Contains(TextContains),
    Overlaps(OverlapValues),
    Category(IsCategoryId),
}

impl Operand {
    /// Short name of the operand shape, for error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::HasValue => "has_value",
            Self::NumericValue(_) => "numeric_value",
            Self::NumericRange { .. } => "numeric_range",
            Self::DateValue(_) => "date_value",
            Self::DateRange { .. } => "date_range",
            Self::TextValue(_) => "text_value",
            Self::Contains(_) => "contains",
            Self::Overlaps(_) => "overlaps",
            Self::Category(_) => "category",
        }
    }

    /// `false` when a numeric value or bound is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        match self {
            Self::NumericValue(value) => value.is_finite(),
            Self::NumericRange { min, max } => {
                min.is_none_or(|v| v.is_finite()) && max.is_none_or(|v| v.is_finite())
            }
            _ => true,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HasValue => Ok(()),
            Self::NumericValue(value) => write!(f, "{value}"),
            Self::NumericRange { min, max } => write_range(f, min.as_ref(), max.as_ref()),
            Self::DateValue(value) => write!(f, "{}", DateDisplay(value)),
            Self::DateRange { min, max } => write_range(
                f,
                min.as_ref().map(DateDisplay).as_ref(),
                max.as_ref().map(DateDisplay).as_ref(),
            ),
            Self::TextValue(value) => write!(f, "{value:?}"),
            Self::Contains(contains) => write!(f, "{contains}"),
            Self::Overlaps(values) => write!(f, "{values}"),
            Self::Category(category_id) => write!(f, "{category_id}"),
        }
    }
}

/// Why a condition could not be built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConditionError {
    #[error("{type_id} conditions do not support operator {operator_id}")]
    UnsupportedOperator {
        type_id: ConditionTypeId,
        operator_id: OperatorId,
    },

    #[error("{type_id} condition with operator {operator_id} cannot take a {shape} operand")]
    OperandMismatch {
        type_id: ConditionTypeId,
        operator_id: OperatorId,
        shape: &'static str,
    },

    #[error("{type_id} condition with operator {operator_id} needs finite numbers, got {operand}")]
    NonFiniteNumber {
        type_id: ConditionTypeId,
        operator_id: OperatorId,
        operand: String,
    },
}

/// A validated condition: the operator belongs to the kind and the operand
/// has the shape the operator needs.
///
/// Fields are private so a stored condition cannot drift out of its kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    type_id: ConditionTypeId,
    operator_id: OperatorId,
    operand: Operand,
}

impl Condition {
    pub fn new(
        type_id: ConditionTypeId,
        operator_id: OperatorId,
        operand: Operand,
    ) -> Result<Self, ConditionError> {
        if !type_id.supports(operator_id) {
            return Err(ConditionError::UnsupportedOperator {
                type_id,
                operator_id,
            });
        }
        if !operand_fits(type_id, operator_id, &operand) {
            return Err(ConditionError::OperandMismatch {
                type_id,
                operator_id,
                shape: operand.shape(),
            });
        }
        if !operand.is_finite() {
            return Err(ConditionError::NonFiniteNumber {
                type_id,
                operator_id,
                operand: operand.to_string(),
            });
        }
        Ok(Self {
            type_id,
            operator_id,
            operand,
        })
    }

    pub fn type_id(&self) -> ConditionTypeId {
        self.type_id
    }

    pub fn operator_id(&self) -> OperatorId {
        self.operator_id
    }

    pub fn operand(&self) -> &Operand {
        &self.operand
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.operand {
            Operand::HasValue => write!(f, "{}", self.operator_id),
            // The contains payload renders its own verb.
            Operand::Contains(contains) if self.operator_id == OperatorId::Contains => {
                write!(f, "{contains}")
            }
            operand => write!(f, "{} {operand}", self.operator_id),
        }
    }
}

fn operand_fits(type_id: ConditionTypeId, operator_id: OperatorId, operand: &Operand) -> bool {
    use OperatorId::*;
    match (operand, operator_id) {
        (Operand::HasValue, HasValue | NotHasValue) => true,
        (
            Operand::NumericValue(_),
            Equals | NotEquals | GreaterThan | GreaterThanOrEqual | LessThan | LessThanOrEqual,
        ) => type_id == ConditionTypeId::NumericComparison,
        (Operand::NumericRange { .. }, InRange | NotInRange) => {
            type_id == ConditionTypeId::NumericComparison
        }
        (Operand::DateValue(_), Equals | NotEquals) => type_id == ConditionTypeId::Date,
        (Operand::DateRange { .. }, InRange | NotInRange) => type_id == ConditionTypeId::Date,
        (Operand::TextValue(_), Equals | NotEquals) => {
            type_id == ConditionTypeId::TextHasValueEquals
        }
        (Operand::Contains(_), Contains | NotContains) => true,
        (Operand::Overlaps(values), Overlaps | NotOverlaps) => {
            values.condition_type_id() == type_id
        }
        (Operand::Category(_), Is | NotIs) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builds_supported_condition() {
        let c = Condition::new(
            ConditionTypeId::NumericComparison,
            OperatorId::GreaterThan,
            Operand::NumericValue(10.0),
        )
        .unwrap();
        assert_eq!(c.operator_id(), OperatorId::GreaterThan);
        assert_eq!(c.operand(), &Operand::NumericValue(10.0));
        assert_eq!(c.to_string(), "greater_than 10");
    }

    #[test]
    fn rejects_operator_outside_kind() {
        let err = Condition::new(
            ConditionTypeId::Date,
            OperatorId::GreaterThan,
            Operand::NumericValue(1.0),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConditionError::UnsupportedOperator {
                type_id: ConditionTypeId::Date,
                operator_id: OperatorId::GreaterThan,
            }
        );
    }

    #[test]
    fn rejects_operand_of_wrong_shape() {
        let err = Condition::new(
            ConditionTypeId::NumericComparison,
            OperatorId::InRange,
            Operand::NumericValue(1.0),
        )
        .unwrap_err();
        assert!(matches!(err, ConditionError::OperandMismatch { shape: "numeric_value", .. }));

        let err = Condition::new(
            ConditionTypeId::CurrencyOverlaps,
            OperatorId::Overlaps,
            Operand::Overlaps(OverlapValues::Markets(vec!["ASX".into()])),
        )
        .unwrap_err();
        assert!(matches!(err, ConditionError::OperandMismatch { .. }));
    }

    #[test]
    fn rejects_non_finite_numbers() {
        let err = Condition::new(
            ConditionTypeId::NumericComparison,
            OperatorId::Equals,
            Operand::NumericValue(f64::NAN),
        )
        .unwrap_err();
        assert!(matches!(err, ConditionError::NonFiniteNumber { .. }));
        assert_eq!(
            err.to_string(),
            "numeric_comparison condition with operator equals needs finite numbers, got NaN"
        );

        let range = Operand::NumericRange {
            min: Some(1.0),
            max: Some(f64::INFINITY),
        };
        assert!(!range.is_finite());
        assert!(Operand::NumericRange { min: None, max: Some(2.0) }.is_finite());
    }

    #[test]
    fn display_contains() {
        let contains = |operator_id| {
            Condition::new(
                ConditionTypeId::TextContains,
                operator_id,
                Operand::Contains(TextContains::new("BHP")),
            )
            .unwrap()
        };
        assert_eq!(contains(OperatorId::Contains).to_string(), r#"contains "BHP""#);
        assert_eq!(
            contains(OperatorId::NotContains).to_string(),
            r#"not_contains contains "BHP""#
        );
    }

    #[test]
    fn display_ranges() {
        let c = Condition::new(
            ConditionTypeId::NumericComparison,
            OperatorId::NotInRange,
            Operand::NumericRange {
                min: None,
                max: Some(5.0),
            },
        )
        .unwrap();
        assert_eq!(c.to_string(), "not_in_range [*..5]");
    }
}
