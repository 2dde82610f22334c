//! Integration tests for the field/condition model and formula nodes.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use scan_core::condition::{Condition, Operand, OverlapValues};
use scan_core::field::Field;
use scan_core::formula::{BooleanNode, TextContains};
use scan_core::ids::{
    AltCodeSubFieldId, BooleanOperationId, ConditionTypeId, DateRangeFieldId, FieldKey,
    IsCategoryId, OperatorId, TextEqualsFieldId,
};
use scan_core::list::OrderedList;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn condition(type_id: ConditionTypeId, operator_id: OperatorId, operand: Operand) -> Condition {
    Condition::new(type_id, operator_id, operand).unwrap()
}

fn save(fields: &[Field]) -> (Vec<BooleanNode>, Vec<BooleanNode>, Vec<BooleanNode>) {
    let (mut anded, mut ored, mut xored) = (Vec::new(), Vec::new(), Vec::new());
    for field in fields {
        field.add_anded_ored_xor_nodes(&mut anded, &mut ored, &mut xored);
    }
    (anded, ored, xored)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn every_kind_saves_to_its_own_node() {
    let expiry = Utc.with_ymd_and_hms(2025, 6, 30, 0, 0, 0).unwrap();

    let mut date = Field::new(FieldKey::DateInRange(DateRangeFieldId::ExpiryDate));
    date.add_condition(condition(
        ConditionTypeId::Date,
        OperatorId::NotInRange,
        Operand::DateRange {
            min: Some(expiry),
            max: None,
        },
    ))
    .unwrap();

    let mut isin = Field::new(FieldKey::AltCodeSubbedTextHasValueContains(
        AltCodeSubFieldId::Isin,
    ));
    isin.add_condition(condition(
        ConditionTypeId::TextHasValueContains,
        OperatorId::HasValue,
        Operand::HasValue,
    ))
    .unwrap();

    let mut cfi = Field::new(FieldKey::TextHasValueEquals(TextEqualsFieldId::Cfi));
    cfi.add_condition(condition(
        ConditionTypeId::TextHasValueEquals,
        OperatorId::Equals,
        Operand::TextValue("ESXXXX".into()),
    ))
    .unwrap();

    let mut markets = Field::new(FieldKey::MarketOverlaps);
    markets
        .add_condition(condition(
            ConditionTypeId::MarketOverlaps,
            OperatorId::NotOverlaps,
            Operand::Overlaps(OverlapValues::Markets(vec!["ASX".into(), "CXA".into()])),
        ))
        .unwrap();

    let mut is = Field::new(FieldKey::Is);
    is.add_condition(condition(
        ConditionTypeId::Is,
        OperatorId::Is,
        Operand::Category(IsCategoryId::Future),
    ))
    .unwrap();

    let (anded, ored, xored) = save(&[date, isin, cfi, markets, is]);
    assert!(ored.is_empty() && xored.is_empty());
    let rendered: Vec<String> = anded.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        [
            "NOT(expiry_date in [2025-06-30..*])",
            "alt_code.isin has value",
            r#"cfi = "ESXXXX""#,
            "NOT(market overlaps [ASX, CXA])",
            "is future",
        ]
    );
}

#[test]
fn xor_field_saves_one_xor_node() {
    let mut field = Field::new(FieldKey::Is);
    field.set_conditions_operation_id(BooleanOperationId::Xor).unwrap();
    for (operator_id, category) in [
        (OperatorId::Is, IsCategoryId::Etf),
        (OperatorId::NotIs, IsCategoryId::Index),
    ] {
        field
            .add_condition(condition(
                ConditionTypeId::Is,
                operator_id,
                Operand::Category(category),
            ))
            .unwrap();
    }

    let (anded, ored, xored) = save(&[field]);
    assert!(anded.is_empty() && ored.is_empty());
    assert_eq!(
        xored,
        vec![BooleanNode::xor(
            BooleanNode::Is(IsCategoryId::Etf),
            BooleanNode::not(BooleanNode::Is(IsCategoryId::Index)),
        )]
    );
}

#[test]
fn contains_modifiers_survive_save() {
    let contains = TextContains {
        value: "bhp".into(),
        as_id: scan_core::ids::TextContainsAsId::FromStart,
        ignore_case: true,
    };
    let mut field = Field::new(FieldKey::TextContains(
        scan_core::ids::TextContainsFieldId::Code,
    ));
    field
        .add_condition(condition(
            ConditionTypeId::TextContains,
            OperatorId::Contains,
            Operand::Contains(contains.clone()),
        ))
        .unwrap();

    let (anded, _, _) = save(&[field]);
    assert_eq!(
        anded,
        vec![BooleanNode::TextFieldContains {
            field_id: scan_core::ids::TextContainsFieldId::Code,
            contains,
        }]
    );
}

#[test]
fn field_serializes_with_key_and_operation() {
    let mut field = Field::new(FieldKey::Is);
    field.set_conditions_operation_id(BooleanOperationId::And).unwrap();
    field
        .add_condition(condition(
            ConditionTypeId::Is,
            OperatorId::Is,
            Operand::Category(IsCategoryId::Warrant),
        ))
        .unwrap();

    let json = serde_json::to_value(&field).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "key": "is",
            "conditions_operation_id": "and",
            "conditions": [
                {"type_id": "is", "operator_id": "is", "operand": {"category": "warrant"}}
            ]
        })
    );
}

#[test]
fn fields_live_in_any_ordered_list() {
    let mut fields: Vec<Field> = Vec::new();
    OrderedList::add(&mut fields, Field::new(FieldKey::Is));
    OrderedList::add(&mut fields, Field::new(FieldKey::CurrencyOverlaps));
    let found = OrderedList::position(&fields, |f| f.key() == FieldKey::CurrencyOverlaps);
    assert_eq!(found, Some(1));
}

/// Condition list that counts how often it was appended to.
#[derive(Debug, Default)]
struct Journal {
    items: Vec<Condition>,
    adds: usize,
}

impl OrderedList<Condition> for Journal {
    fn count(&self) -> usize {
        self.items.len()
    }

    fn get(&self, index: usize) -> Option<&Condition> {
        self.items.as_slice().get(index)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut Condition> {
        self.items.as_mut_slice().get_mut(index)
    }

    fn add(&mut self, item: Condition) {
        self.adds += 1;
        self.items.push(item);
    }

    fn remove(&mut self, index: usize) -> Option<Condition> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    fn clear(&mut self) {
        self.items.clear();
    }

    fn reserve(&mut self, additional: usize) {
        self.items.reserve(additional);
    }
}

#[test]
fn conditions_live_in_any_ordered_list() {
    let category = |id| condition(ConditionTypeId::Is, OperatorId::Is, Operand::Category(id));

    let mut field = Field::with_list(FieldKey::Is, Journal::default());
    field.set_conditions_operation_id(BooleanOperationId::Or).unwrap();
    assert_eq!(field.add_condition(category(IsCategoryId::Warrant)), Ok(true));
    assert_eq!(field.add_condition(category(IsCategoryId::Warrant)), Ok(false));
    assert_eq!(field.add_condition(category(IsCategoryId::Etf)), Ok(true));
    assert_eq!(field.condition_count(), 2);
    assert_eq!(field.condition_list().adds, 2);

    let mut plain = Field::new(FieldKey::Is);
    plain.set_conditions_operation_id(BooleanOperationId::Or).unwrap();
    plain.add_condition(category(IsCategoryId::Warrant)).unwrap();
    plain.add_condition(category(IsCategoryId::Etf)).unwrap();
    assert_eq!(field.to_string(), plain.to_string());

    let (mut anded, mut ored, mut xored) = (Vec::new(), Vec::new(), Vec::new());
    field.add_anded_ored_xor_nodes(&mut anded, &mut ored, &mut xored);
    assert_eq!((anded, ored, xored), save(&[plain]));

    assert_eq!(
        field.remove_condition(0).map(|c| c.operand().clone()),
        Some(Operand::Category(IsCategoryId::Warrant))
    );
    assert_eq!(field.condition_count(), 1);
}
