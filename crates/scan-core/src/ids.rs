//! Identifier types shared by formulas and field sets.
//!
//! Each enum has:
//! - a fixed snake_case string form (`as_str()`, `Display`, serde)
//! - `FromStr` returning [`UnknownIdError`] for anything else
//!
//! All of them are closed: dispatch on these ids is an exhaustive `match`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A string did not name a known identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownIdError {
    /// Name of the identifier type that was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

// ===========================================================================
// Field kinds
// ===========================================================================

define_id! {
    /// Kind of a field in a field set. Fixes the condition kind it holds.
    FieldTypeId {
        NumericInRange => "numeric_in_range",
        PriceSubbedNumericInRange => "price_subbed_numeric_in_range",
        DateInRange => "date_in_range",
        DateSubbedInRange => "date_subbed_in_range",
        TextContains => "text_contains",
        AltCodeSubbedTextHasValueContains => "alt_code_subbed_text_has_value_contains",
        AttributeSubbedTextHasValueContains => "attribute_subbed_text_has_value_contains",
        TextHasValueEquals => "text_has_value_equals",
        StringOverlaps => "string_overlaps",
        CurrencyOverlaps => "currency_overlaps",
        ExchangeOverlaps => "exchange_overlaps",
        MarketOverlaps => "market_overlaps",
        MarketBoardOverlaps => "market_board_overlaps",
        Is => "is",
    }
}

impl FieldTypeId {
    /// The condition kind every field of this kind holds.
    pub fn condition_type_id(&self) -> ConditionTypeId {
        match self {
            Self::NumericInRange | Self::PriceSubbedNumericInRange => {
                ConditionTypeId::NumericComparison
            }
            Self::DateInRange | Self::DateSubbedInRange => ConditionTypeId::Date,
            Self::TextContains => ConditionTypeId::TextContains,
            Self::AltCodeSubbedTextHasValueContains | Self::AttributeSubbedTextHasValueContains => {
                ConditionTypeId::TextHasValueContains
            }
            Self::TextHasValueEquals => ConditionTypeId::TextHasValueEquals,
            Self::StringOverlaps => ConditionTypeId::StringOverlaps,
            Self::CurrencyOverlaps => ConditionTypeId::CurrencyOverlaps,
            Self::ExchangeOverlaps => ConditionTypeId::ExchangeOverlaps,
            Self::MarketOverlaps => ConditionTypeId::MarketOverlaps,
            Self::MarketBoardOverlaps => ConditionTypeId::MarketBoardOverlaps,
            Self::Is => ConditionTypeId::Is,
        }
    }
}

// ===========================================================================
// Condition kinds and operators
// ===========================================================================

define_id! {
    /// Kind of a condition. Each kind accepts a fixed subset of [`OperatorId`].
    ConditionTypeId {
        NumericComparison => "numeric_comparison",
        Date => "date",
        TextContains => "text_contains",
        TextHasValueContains => "text_has_value_contains",
        TextHasValueEquals => "text_has_value_equals",
        StringOverlaps => "string_overlaps",
        CurrencyOverlaps => "currency_overlaps",
        ExchangeOverlaps => "exchange_overlaps",
        MarketOverlaps => "market_overlaps",
        MarketBoardOverlaps => "market_board_overlaps",
        Is => "is",
    }
}

impl ConditionTypeId {
    /// Operators a condition of this kind may carry.
    pub fn operator_ids(&self) -> &'static [OperatorId] {
        use OperatorId::*;
        match self {
            Self::NumericComparison => &[
                HasValue,
                NotHasValue,
                Equals,
                NotEquals,
                GreaterThan,
                GreaterThanOrEqual,
                LessThan,
                LessThanOrEqual,
                InRange,
                NotInRange,
            ],
            Self::Date => &[HasValue, NotHasValue, Equals, NotEquals, InRange, NotInRange],
            Self::TextContains => &[Contains, NotContains],
            Self::TextHasValueContains => &[HasValue, NotHasValue, Contains, NotContains],
            Self::TextHasValueEquals => &[HasValue, NotHasValue, Equals, NotEquals],
            Self::StringOverlaps
            | Self::CurrencyOverlaps
            | Self::ExchangeOverlaps
            | Self::MarketOverlaps
            | Self::MarketBoardOverlaps => &[Overlaps, NotOverlaps],
            Self::Is => &[Is, NotIs],
        }
    }

    /// Returns `true` if `operator_id` is valid for this kind.
    pub fn supports(&self, operator_id: OperatorId) -> bool {
        self.operator_ids().contains(&operator_id)
    }
}

define_id! {
    /// Operator of a single condition.
    OperatorId {
        HasValue => "has_value",
        NotHasValue => "not_has_value",
        Equals => "equals",
        NotEquals => "not_equals",
        GreaterThan => "greater_than",
        GreaterThanOrEqual => "greater_than_or_equal",
        LessThan => "less_than",
        LessThanOrEqual => "less_than_or_equal",
        InRange => "in_range",
        NotInRange => "not_in_range",
        Contains => "contains",
        NotContains => "not_contains",
        Overlaps => "overlaps",
        NotOverlaps => "not_overlaps",
        Is => "is",
        NotIs => "not_is",
    }
}

impl OperatorId {
    /// The operator matching exactly the instruments this one rejects.
    pub fn inverse(self) -> Self {
        match self {
            Self::HasValue => Self::NotHasValue,
            Self::NotHasValue => Self::HasValue,
            Self::Equals => Self::NotEquals,
            Self::NotEquals => Self::Equals,
            Self::GreaterThan => Self::LessThanOrEqual,
            Self::LessThanOrEqual => Self::GreaterThan,
            Self::GreaterThanOrEqual => Self::LessThan,
            Self::LessThan => Self::GreaterThanOrEqual,
            Self::InRange => Self::NotInRange,
            Self::NotInRange => Self::InRange,
            Self::Contains => Self::NotContains,
            Self::NotContains => Self::Contains,
            Self::Overlaps => Self::NotOverlaps,
            Self::NotOverlaps => Self::Overlaps,
            Self::Is => Self::NotIs,
            Self::NotIs => Self::Is,
        }
    }

    /// Returns `true` for the half of an inverse pair that a formula spells
    /// as `NOT(<positive>)`. Ordering comparisons are never negative.
    pub fn is_negative(self) -> bool {
        matches!(
            self,
            Self::NotHasValue
                | Self::NotEquals
                | Self::NotInRange
                | Self::NotContains
                | Self::NotOverlaps
                | Self::NotIs
        )
    }
}

define_id! {
    /// How the conditions of one field combine.
    BooleanOperationId {
        And => "and",
        Or => "or",
        Xor => "xor",
    }
}

define_id! {
    /// Relational operator of a raw numeric comparison node.
    NumericComparisonOperatorId {
        Equals => "equals",
        GreaterThan => "greater_than",
        GreaterThanOrEqual => "greater_than_or_equal",
        LessThan => "less_than",
        LessThanOrEqual => "less_than_or_equal",
    }
}

impl NumericComparisonOperatorId {
    /// The operator with its operands swapped (`a > b` is `b < a`).
    pub fn mirrored(self) -> Self {
        match self {
            Self::Equals => Self::Equals,
            Self::GreaterThan => Self::LessThan,
            Self::GreaterThanOrEqual => Self::LessThanOrEqual,
            Self::LessThan => Self::GreaterThan,
            Self::LessThanOrEqual => Self::GreaterThanOrEqual,
        }
    }

    /// The condition operator with the same meaning.
    pub fn operator_id(self) -> OperatorId {
        match self {
            Self::Equals => OperatorId::Equals,
            Self::GreaterThan => OperatorId::GreaterThan,
            Self::GreaterThanOrEqual => OperatorId::GreaterThanOrEqual,
            Self::LessThan => OperatorId::LessThan,
            Self::LessThanOrEqual => OperatorId::LessThanOrEqual,
        }
    }

    /// The ordering comparison for a condition operator, if it is one.
    pub fn from_ordering_operator(operator_id: OperatorId) -> Option<Self> {
        match operator_id {
            OperatorId::GreaterThan => Some(Self::GreaterThan),
            OperatorId::GreaterThanOrEqual => Some(Self::GreaterThanOrEqual),
            OperatorId::LessThan => Some(Self::LessThan),
            OperatorId::LessThanOrEqual => Some(Self::LessThanOrEqual),
            _ => None,
        }
    }

    /// Infix symbol used when rendering formulas.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Equals => "=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
        }
    }
}

// ===========================================================================
// Field ids
// ===========================================================================

define_id! {
    /// Top-level identity of a field. Sub-fielded kinds share one id
    /// (`Price`, `Date`, `AltCode`, `Attribute`).
    FieldId {
        AuctionPrice => "auction_price",
        AuctionQuantity => "auction_quantity",
        Bid => "bid",
        BidQuantity => "bid_quantity",
        Ask => "ask",
        AskQuantity => "ask_quantity",
        LastPrice => "last_price",
        OpenPrice => "open_price",
        HighPrice => "high_price",
        LowPrice => "low_price",
        ClosePrice => "close_price",
        PreviousClose => "previous_close",
        Trades => "trades",
        ValueTraded => "value_traded",
        Volume => "volume",
        StrikePrice => "strike_price",
        ShareIssue => "share_issue",
        ExpiryDate => "expiry_date",
        Name => "name",
        Code => "code",
        Cfi => "cfi",
        CallOrPut => "call_or_put",
        TradingStateName => "trading_state_name",
        QuotationBasis => "quotation_basis",
        Category => "category",
        ExerciseType => "exercise_type",
        Price => "price",
        Date => "date",
        AltCode => "alt_code",
        Attribute => "attribute",
        Currency => "currency",
        Exchange => "exchange",
        Market => "market",
        MarketBoard => "market_board",
        Is => "is",
    }
}

define_field_id_subset! {
    /// Fields holding a number.
    NumericRangeFieldId {
        AuctionPrice => "auction_price",
        AuctionQuantity => "auction_quantity",
        Bid => "bid",
        BidQuantity => "bid_quantity",
        Ask => "ask",
        AskQuantity => "ask_quantity",
        LastPrice => "last_price",
        OpenPrice => "open_price",
        HighPrice => "high_price",
        LowPrice => "low_price",
        ClosePrice => "close_price",
        PreviousClose => "previous_close",
        Trades => "trades",
        ValueTraded => "value_traded",
        Volume => "volume",
        StrikePrice => "strike_price",
        ShareIssue => "share_issue",
    }
}

define_field_id_subset! {
    /// Fields holding a date.
    DateRangeFieldId {
        ExpiryDate => "expiry_date",
    }
}

define_field_id_subset! {
    /// Free-text fields searched with `contains`.
    TextContainsFieldId {
        Name => "name",
        Code => "code",
    }
}

define_field_id_subset! {
    /// Text fields matched whole, which may also be absent.
    TextEqualsFieldId {
        Cfi => "cfi",
        CallOrPut => "call_or_put",
        TradingStateName => "trading_state_name",
        QuotationBasis => "quotation_basis",
    }
}

define_field_id_subset! {
    /// Multi-valued string fields matched by set overlap.
    StringOverlapsFieldId {
        Category => "category",
        ExerciseType => "exercise_type",
    }
}

// ===========================================================================
// Sub-field ids
// ===========================================================================

define_id! {
    /// Which price a `Price` field reads.
    PriceSubFieldId {
        Last => "last",
        Open => "open",
        High => "high",
        Low => "low",
        Close => "close",
        Settlement => "settlement",
        Vwap => "vwap",
    }
}

define_id! {
    /// Which date a `Date` field reads.
    DateSubFieldId {
        Dividend => "dividend",
    }
}

define_id! {
    /// Which alternate code an `AltCode` field reads.
    AltCodeSubFieldId {
        Isin => "isin",
        Ric => "ric",
        Ticker => "ticker",
        Gics => "gics",
        Base => "base",
        Short => "short",
        Long => "long",
        Uid => "uid",
    }
}

define_id! {
    /// Which attribute an `Attribute` field reads.
    AttributeSubFieldId {
        Category => "category",
        Class => "class",
        Delivery => "delivery",
        MaxRss => "max_rss",
        Sector => "sector",
        Short => "short",
        ShortSuspended => "short_suspended",
        SubSector => "sub_sector",
    }
}

/// The sub-key of a sub-fielded field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubFieldId {
    Price(PriceSubFieldId),
    Date(DateSubFieldId),
    AltCode(AltCodeSubFieldId),
    Attribute(AttributeSubFieldId),
}

impl fmt::Display for SubFieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Price(id) => write!(f, "price.{id}"),
            Self::Date(id) => write!(f, "date.{id}"),
            Self::AltCode(id) => write!(f, "alt_code.{id}"),
            Self::Attribute(id) => write!(f, "attribute.{id}"),
        }
    }
}

// ===========================================================================
// Field key
// ===========================================================================

/// Typed identity of a field: its kind together with the id (or sub-field
/// id) that kind is keyed by.
///
/// [`FieldTypeId`], [`FieldId`] and the optional [`SubFieldId`] are all
/// derived from the key, so they can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    NumericInRange(NumericRangeFieldId),
    PriceSubbedNumericInRange(PriceSubFieldId),
    DateInRange(DateRangeFieldId),
    DateSubbedInRange(DateSubFieldId),
    TextContains(TextContainsFieldId),
    AltCodeSubbedTextHasValueContains(AltCodeSubFieldId),
    AttributeSubbedTextHasValueContains(AttributeSubFieldId),
    TextHasValueEquals(TextEqualsFieldId),
    StringOverlaps(StringOverlapsFieldId),
    CurrencyOverlaps,
    ExchangeOverlaps,
    MarketOverlaps,
    MarketBoardOverlaps,
    Is,
}

impl FieldKey {
    pub fn type_id(&self) -> FieldTypeId {
        match self {
            Self::NumericInRange(_) => FieldTypeId::NumericInRange,
            Self::PriceSubbedNumericInRange(_) => FieldTypeId::PriceSubbedNumericInRange,
            Self::DateInRange(_) => FieldTypeId::DateInRange,
            Self::DateSubbedInRange(_) => FieldTypeId::DateSubbedInRange,
            Self::TextContains(_) => FieldTypeId::TextContains,
            Self::AltCodeSubbedTextHasValueContains(_) => {
                FieldTypeId::AltCodeSubbedTextHasValueContains
            }
            Self::AttributeSubbedTextHasValueContains(_) => {
                FieldTypeId::AttributeSubbedTextHasValueContains
            }
            Self::TextHasValueEquals(_) => FieldTypeId::TextHasValueEquals,
            Self::StringOverlaps(_) => FieldTypeId::StringOverlaps,
            Self::CurrencyOverlaps => FieldTypeId::CurrencyOverlaps,
            Self::ExchangeOverlaps => FieldTypeId::ExchangeOverlaps,
            Self::MarketOverlaps => FieldTypeId::MarketOverlaps,
            Self::MarketBoardOverlaps => FieldTypeId::MarketBoardOverlaps,
            Self::Is => FieldTypeId::Is,
        }
    }

    /// The top-level id. Field sets hold at most one field per value.
    pub fn field_id(&self) -> FieldId {
        match self {
            Self::NumericInRange(id) => (*id).into(),
            Self::PriceSubbedNumericInRange(_) => FieldId::Price,
            Self::DateInRange(id) => (*id).into(),
            Self::DateSubbedInRange(_) => FieldId::Date,
            Self::TextContains(id) => (*id).into(),
            Self::AltCodeSubbedTextHasValueContains(_) => FieldId::AltCode,
            Self::AttributeSubbedTextHasValueContains(_) => FieldId::Attribute,
            Self::TextHasValueEquals(id) => (*id).into(),
            Self::StringOverlaps(id) => (*id).into(),
            Self::CurrencyOverlaps => FieldId::Currency,
            Self::ExchangeOverlaps => FieldId::Exchange,
            Self::MarketOverlaps => FieldId::Market,
            Self::MarketBoardOverlaps => FieldId::MarketBoard,
            Self::Is => FieldId::Is,
        }
    }

    pub fn sub_field_id(&self) -> Option<SubFieldId> {
        match self {
            Self::PriceSubbedNumericInRange(id) => Some(SubFieldId::Price(*id)),
            Self::DateSubbedInRange(id) => Some(SubFieldId::Date(*id)),
            Self::AltCodeSubbedTextHasValueContains(id) => Some(SubFieldId::AltCode(*id)),
            Self::AttributeSubbedTextHasValueContains(id) => Some(SubFieldId::Attribute(*id)),
            _ => None,
        }
    }

    pub fn condition_type_id(&self) -> ConditionTypeId {
        self.type_id().condition_type_id()
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sub_field_id() {
            Some(sub_field_id) => write!(f, "{sub_field_id}"),
            None => write!(f, "{}", self.field_id()),
        }
    }
}

/// A field that a `has value` node can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HasValueFieldId {
    Numeric(NumericRangeFieldId),
    Date(DateRangeFieldId),
    Text(TextEqualsFieldId),
}

impl fmt::Display for HasValueFieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Date(id) => write!(f, "{id}"),
            Self::Text(id) => write!(f, "{id}"),
        }
    }
}

// ===========================================================================
// Value ids
// ===========================================================================

define_id! {
    /// Trading currency.
    CurrencyId {
        Aud => "aud",
        Cad => "cad",
        Eur => "eur",
        Gbp => "gbp",
        Jpy => "jpy",
        Myr => "myr",
        Nzd => "nzd",
        Usd => "usd",
    }
}

define_id! {
    /// Instrument category tested by `is` conditions.
    IsCategoryId {
        Index => "index",
        Etf => "etf",
        Future => "future",
        Warrant => "warrant",
    }
}

define_id! {
    /// Where the searched text has to sit inside the field value.
    TextContainsAsId {
        None => "none",
        FromStart => "from_start",
        FromEnd => "from_end",
        Exact => "exact",
    }
}

impl Default for TextContainsAsId {
    fn default() -> Self {
        Self::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn inverse_is_an_involution() {
        for op in OperatorId::ALL {
            assert_eq!(op.inverse().inverse(), *op);
            assert_ne!(op.inverse(), *op);
        }
    }

    #[test]
    fn inverse_pairs_stay_inside_their_condition_kind() {
        for kind in ConditionTypeId::ALL {
            for op in kind.operator_ids() {
                assert!(kind.supports(op.inverse()), "{kind}: {op}");
            }
        }
    }

    #[test]
    fn ordering_comparisons_are_not_negative() {
        assert!(!OperatorId::GreaterThan.is_negative());
        assert!(!OperatorId::LessThanOrEqual.is_negative());
        assert!(OperatorId::NotEquals.is_negative());
        assert!(!OperatorId::Equals.is_negative());
    }

    #[test]
    fn mirrored_comparison() {
        assert_eq!(
            NumericComparisonOperatorId::GreaterThan.mirrored(),
            NumericComparisonOperatorId::LessThan
        );
        assert_eq!(
            NumericComparisonOperatorId::LessThanOrEqual.mirrored(),
            NumericComparisonOperatorId::GreaterThanOrEqual
        );
        assert_eq!(
            NumericComparisonOperatorId::Equals.mirrored(),
            NumericComparisonOperatorId::Equals
        );
    }

    #[test]
    fn sub_fielded_keys_share_one_field_id() {
        let isin = FieldKey::AltCodeSubbedTextHasValueContains(AltCodeSubFieldId::Isin);
        let ric = FieldKey::AltCodeSubbedTextHasValueContains(AltCodeSubFieldId::Ric);
        assert_eq!(isin.field_id(), FieldId::AltCode);
        assert_eq!(isin.field_id(), ric.field_id());
        assert_ne!(isin.sub_field_id(), ric.sub_field_id());
    }

    #[test]
    fn subset_ids_convert_to_matching_field_id() {
        for id in NumericRangeFieldId::ALL {
            assert_eq!(FieldId::from(*id).as_str(), id.as_str());
        }
        for id in TextEqualsFieldId::ALL {
            assert_eq!(FieldId::from(*id).as_str(), id.as_str());
        }
    }

    #[test]
    fn key_kind_matches_condition_kind() {
        let key = FieldKey::PriceSubbedNumericInRange(PriceSubFieldId::Last);
        assert_eq!(key.type_id(), FieldTypeId::PriceSubbedNumericInRange);
        assert_eq!(key.condition_type_id(), ConditionTypeId::NumericComparison);
        assert_eq!(key.to_string(), "price.last");
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("bid".parse::<FieldId>().unwrap(), FieldId::Bid);
        assert_eq!(OperatorId::NotInRange.to_string(), "not_in_range");
        let err = "bogus".parse::<CurrencyId>().unwrap_err();
        assert_eq!(err.to_string(), "unknown CurrencyId: bogus");
    }

    #[test]
    fn serde_uses_string_form() {
        let json = serde_json::to_string(&FieldKey::NumericInRange(NumericRangeFieldId::Bid)).unwrap();
        assert_eq!(json, r#"{"numeric_in_range":"bid"}"#);
        let key: FieldKey = serde_json::from_str(r#""currency_overlaps""#).unwrap();
        assert_eq!(key, FieldKey::CurrencyOverlaps);
    }
}
