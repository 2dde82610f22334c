//! Formula data model -- the boolean-tree form of a scan.
//!
//! A formula is rooted at a [`BooleanNode`]. Combinators (`And`, `Or`, `Xor`,
//! `Not`) nest arbitrarily; leaves test one field. `All` and `None` are the
//! match-everything / no-criteria sentinels. Raw numeric comparisons carry
//! a small arithmetic sub-tree ([`NumericNode`]) on each side.
//!
//! Nodes serialize externally tagged in snake_case, e.g.
//! `{"numeric_field_equals": {"field_id": "bid", "value": 100.0}}`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{
    AltCodeSubFieldId, AttributeSubFieldId, CurrencyId, DateRangeFieldId, DateSubFieldId,
    HasValueFieldId, IsCategoryId, NumericComparisonOperatorId, NumericRangeFieldId,
    PriceSubFieldId, StringOverlapsFieldId, TextContainsAsId, TextContainsFieldId,
    TextEqualsFieldId,
};

/// Text search parameters shared by contains nodes and contains conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContains {
    pub value: String,
    #[serde(default)]
    pub as_id: TextContainsAsId,
    #[serde(default)]
    pub ignore_case: bool,
}

impl TextContains {
    /// A case-sensitive substring search.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            as_id: TextContainsAsId::None,
            ignore_case: false,
        }
    }
}

impl fmt::Display for TextContains {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.as_id {
            TextContainsAsId::None => "contains",
            TextContainsAsId::FromStart => "starts with",
            TextContainsAsId::FromEnd => "ends with",
            TextContainsAsId::Exact => "is exactly",
        };
        write!(f, "{verb} {:?}", self.value)?;
        if self.ignore_case {
            f.write_str(" ignoring case")?;
        }
        Ok(())
    }
}

/// Node of a boolean formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BooleanNode {
    // ----- combinators -----
    And(Vec<BooleanNode>),
    Or(Vec<BooleanNode>),
    Xor(Box<BooleanNode>, Box<BooleanNode>),
    Not(Box<BooleanNode>),
    All,
    None,

    // ----- leaves -----
    Is(IsCategoryId),
    FieldHasValue(HasValueFieldId),
    NumericFieldEquals {
        field_id: NumericRangeFieldId,
        value: f64,
    },
    NumericFieldInRange {
        field_id: NumericRangeFieldId,
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    PriceSubFieldHasValue(PriceSubFieldId),
    PriceSubFieldEquals {
        sub_field_id: PriceSubFieldId,
        value: f64,
    },
    PriceSubFieldInRange {
        sub_field_id: PriceSubFieldId,
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    DateFieldEquals {
        field_id: DateRangeFieldId,
        value: DateTime<Utc>,
    },
    DateFieldInRange {
        field_id: DateRangeFieldId,
        #[serde(default)]
        min: Option<DateTime<Utc>>,
        #[serde(default)]
        max: Option<DateTime<Utc>>,
    },
    DateSubFieldHasValue(DateSubFieldId),
    DateSubFieldEquals {
        sub_field_id: DateSubFieldId,
        value: DateTime<Utc>,
    },
    DateSubFieldInRange {
        sub_field_id: DateSubFieldId,
        #[serde(default)]
        min: Option<DateTime<Utc>>,
        #[serde(default)]
        max: Option<DateTime<Utc>>,
    },
    TextFieldContains {
        field_id: TextContainsFieldId,
        contains: TextContains,
    },
    AltCodeSubFieldHasValue(AltCodeSubFieldId),
    AltCodeSubFieldContains {
        sub_field_id: AltCodeSubFieldId,
        contains: TextContains,
    },
    AttributeSubFieldHasValue(AttributeSubFieldId),
    AttributeSubFieldContains {
        sub_field_id: AttributeSubFieldId,
        contains: TextContains,
    },
    TextFieldEquals {
        field_id: TextEqualsFieldId,
        value: String,
    },
    StringFieldOverlaps {
        field_id: StringOverlapsFieldId,
        values: Vec<String>,
    },
    CurrencyFieldOverlaps(Vec<CurrencyId>),
    ExchangeFieldOverlaps(Vec<String>),
    MarketFieldOverlaps(Vec<String>),
    MarketBoardFieldOverlaps(Vec<String>),
    NumericComparison(NumericComparisonNode),
}

impl BooleanNode {
    pub fn and(operands: impl IntoIterator<Item = BooleanNode>) -> Self {
        Self::And(operands.into_iter().collect())
    }

    pub fn or(operands: impl IntoIterator<Item = BooleanNode>) -> Self {
        Self::Or(operands.into_iter().collect())
    }

    pub fn xor(left: BooleanNode, right: BooleanNode) -> Self {
        Self::Xor(Box::new(left), Box::new(right))
    }

    pub fn not(operand: BooleanNode) -> Self {
        Self::Not(Box::new(operand))
    }
}

/// `left <op> right` over two numeric expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericComparisonNode {
    pub operator_id: NumericComparisonOperatorId,
    pub left: NumericNode,
    pub right: NumericNode,
}

/// Numeric expression used on either side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericNode {
    Number(f64),
    FieldValueGet(NumericRangeFieldId),
    PriceSubFieldValueGet(PriceSubFieldId),
    Neg(Box<NumericNode>),
    Abs(Box<NumericNode>),
    Add(Box<NumericNode>, Box<NumericNode>),
    Sub(Box<NumericNode>, Box<NumericNode>),
    Mul(Box<NumericNode>, Box<NumericNode>),
    Div(Box<NumericNode>, Box<NumericNode>),
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

impl fmt::Display for BooleanNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And(operands) => write_operands(f, "AND", operands),
            Self::Or(operands) => write_operands(f, "OR", operands),
            Self::Xor(left, right) => write!(f, "XOR({left}, {right})"),
            Self::Not(operand) => write!(f, "NOT({operand})"),
            Self::All => f.write_str("ALL"),
            Self::None => f.write_str("NONE"),
            Self::Is(category_id) => write!(f, "is {category_id}"),
            Self::FieldHasValue(field_id) => write!(f, "{field_id} has value"),
            Self::NumericFieldEquals { field_id, value } => write!(f, "{field_id} = {value}"),
            Self::NumericFieldInRange { field_id, min, max } => {
                write!(f, "{field_id} in ")?;
                write_range(f, min.as_ref(), max.as_ref())
            }
            Self::PriceSubFieldHasValue(sub_field_id) => {
                write!(f, "price.{sub_field_id} has value")
            }
            Self::PriceSubFieldEquals { sub_field_id, value } => {
                write!(f, "price.{sub_field_id} = {value}")
            }
            Self::PriceSubFieldInRange { sub_field_id, min, max } => {
                write!(f, "price.{sub_field_id} in ")?;
                write_range(f, min.as_ref(), max.as_ref())
            }
            Self::DateFieldEquals { field_id, value } => {
                write!(f, "{field_id} = {}", DateDisplay(value))
            }
            Self::DateFieldInRange { field_id, min, max } => {
                write!(f, "{field_id} in ")?;
                write_range(
                    f,
                    min.as_ref().map(DateDisplay).as_ref(),
                    max.as_ref().map(DateDisplay).as_ref(),
                )
            }
            Self::DateSubFieldHasValue(sub_field_id) => {
                write!(f, "date.{sub_field_id} has value")
            }
            Self::DateSubFieldEquals { sub_field_id, value } => {
                write!(f, "date.{sub_field_id} = {}", DateDisplay(value))
            }
            Self::DateSubFieldInRange { sub_field_id, min, max } => {
                write!(f, "date.{sub_field_id} in ")?;
                write_range(
                    f,
                    min.as_ref().map(DateDisplay).as_ref(),
                    max.as_ref().map(DateDisplay).as_ref(),
                )
            }
            Self::TextFieldContains { field_id, contains } => write!(f, "{field_id} {contains}"),
            Self::AltCodeSubFieldHasValue(sub_field_id) => {
                write!(f, "alt_code.{sub_field_id} has value")
            }
            Self::AltCodeSubFieldContains {
                sub_field_id,
                contains,
            } => write!(f, "alt_code.{sub_field_id} {contains}"),
            Self::AttributeSubFieldHasValue(sub_field_id) => {
                write!(f, "attribute.{sub_field_id} has value")
            }
            Self::AttributeSubFieldContains {
                sub_field_id,
                contains,
            } => write!(f, "attribute.{sub_field_id} {contains}"),
            Self::TextFieldEquals { field_id, value } => write!(f, "{field_id} = {value:?}"),
            Self::StringFieldOverlaps { field_id, values } => {
                write!(f, "{field_id} overlaps ")?;
                write_values(f, values)
            }
            Self::CurrencyFieldOverlaps(values) => {
                f.write_str("currency overlaps ")?;
                write_values(f, values)
            }
            Self::ExchangeFieldOverlaps(values) => {
                f.write_str("exchange overlaps ")?;
                write_values(f, values)
            }
            Self::MarketFieldOverlaps(values) => {
                f.write_str("market overlaps ")?;
                write_values(f, values)
            }
            Self::MarketBoardFieldOverlaps(values) => {
                f.write_str("market_board overlaps ")?;
                write_values(f, values)
            }
            Self::NumericComparison(node) => write!(f, "{node}"),
        }
    }
}

impl fmt::Display for NumericComparisonNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.operator_id.symbol(), self.right)
    }
}

impl fmt::Display for NumericNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::FieldValueGet(field_id) => write!(f, "{field_id}"),
            Self::PriceSubFieldValueGet(sub_field_id) => write!(f, "price.{sub_field_id}"),
            Self::Neg(operand) => write!(f, "-({operand})"),
            Self::Abs(operand) => write!(f, "abs({operand})"),
            Self::Add(left, right) => write!(f, "({left} + {right})"),
            Self::Sub(left, right) => write!(f, "({left} - {right})"),
            Self::Mul(left, right) => write!(f, "({left} * {right})"),
            Self::Div(left, right) => write!(f, "({left} / {right})"),
        }
    }
}

/// Renders a timestamp as a calendar date.
pub(crate) struct DateDisplay<'a>(pub(crate) &'a DateTime<Utc>);

impl fmt::Display for DateDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

fn write_operands(f: &mut fmt::Formatter<'_>, name: &str, operands: &[BooleanNode]) -> fmt::Result {
    write!(f, "{name}(")?;
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{operand}")?;
    }
    f.write_str(")")
}

/// `[min..max]`, with `*` for an open bound.
pub(crate) fn write_range<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    min: Option<&T>,
    max: Option<&T>,
) -> fmt::Result {
    f.write_str("[")?;
    match min {
        Some(min) => write!(f, "{min}")?,
        None => f.write_str("*")?,
    }
    f.write_str("..")?;
    match max {
        Some(max) => write!(f, "{max}")?,
        None => f.write_str("*")?,
    }
    f.write_str("]")
}

pub(crate) fn write_values<T: fmt::Display>(f: &mut fmt::Formatter<'_>, values: &[T]) -> fmt::Result {
    f.write_str("[")?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{value}")?;
    }
    f.write_str("]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn bid_equals(value: f64) -> BooleanNode {
        BooleanNode::NumericFieldEquals {
            field_id: NumericRangeFieldId::Bid,
            value,
        }
    }

    fn name_contains(value: &str) -> BooleanNode {
        BooleanNode::TextFieldContains {
            field_id: TextContainsFieldId::Name,
            contains: TextContains::new(value),
        }
    }

    #[test]
    fn render_nested_formula() {
        let node = BooleanNode::and([
            bid_equals(100.0),
            BooleanNode::or([name_contains("BHP"), name_contains("RIO")]),
        ]);
        insta::assert_snapshot!(
            node.to_string(),
            @r#"AND(bid = 100, OR(name contains "BHP", name contains "RIO"))"#
        );
    }

    #[test]
    fn render_negation_and_xor() {
        let node = BooleanNode::xor(
            BooleanNode::not(BooleanNode::Is(IsCategoryId::Etf)),
            BooleanNode::CurrencyFieldOverlaps(vec![CurrencyId::Aud, CurrencyId::Usd]),
        );
        assert_eq!(node.to_string(), "XOR(NOT(is etf), currency overlaps [aud, usd])");
    }

    #[test]
    fn render_ranges_and_comparisons() {
        let range = BooleanNode::NumericFieldInRange {
            field_id: NumericRangeFieldId::Volume,
            min: Some(1000.0),
            max: None,
        };
        assert_eq!(range.to_string(), "volume in [1000..*]");

        let expiry = Utc.with_ymd_and_hms(2025, 6, 30, 0, 0, 0).unwrap();
        let dates = BooleanNode::DateFieldInRange {
            field_id: DateRangeFieldId::ExpiryDate,
            min: None,
            max: Some(expiry),
        };
        assert_eq!(dates.to_string(), "expiry_date in [*..2025-06-30]");

        let comparison = BooleanNode::NumericComparison(NumericComparisonNode {
            operator_id: NumericComparisonOperatorId::GreaterThanOrEqual,
            left: NumericNode::Number(5.0),
            right: NumericNode::Add(
                Box::new(NumericNode::FieldValueGet(NumericRangeFieldId::Trades)),
                Box::new(NumericNode::Number(1.5)),
            ),
        });
        assert_eq!(comparison.to_string(), "5 >= (trades + 1.5)");
    }

    #[test]
    fn render_contains_modifiers() {
        let contains = TextContains {
            value: "BH".into(),
            as_id: TextContainsAsId::FromStart,
            ignore_case: true,
        };
        assert_eq!(contains.to_string(), r#"starts with "BH" ignoring case"#);
    }

    #[test]
    fn json_shape_is_externally_tagged() {
        let node = BooleanNode::and([bid_equals(100.0), BooleanNode::None]);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "and": [
                    {"numeric_field_equals": {"field_id": "bid", "value": 100.0}},
                    "none"
                ]
            })
        );
        let back: BooleanNode = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn contains_defaults_when_omitted() {
        let node: BooleanNode = serde_json::from_str(
            r#"{"text_field_contains": {"field_id": "name", "contains": {"value": "BHP"}}}"#,
        )
        .unwrap();
        assert_eq!(node, name_contains("BHP"));
    }
}
