//! Deep copies through the factory.

use scan_core::field::Field;
use scan_core::list::OrderedList;

use crate::factory::{FactoryError, ScanFactory, create_condition, create_field};
use crate::field_set::FieldSet;

impl<F: ScanFactory, L: OrderedList<Field>> FieldSet<F, L> {
    /// Replaces this set's fields with copies of `source`'s.
    ///
    /// Every field and condition is reallocated through this set's factory,
    /// so nothing is shared with `source`. The load error is copied too.
    pub fn assign<F2, L2: OrderedList<Field>>(
        &mut self,
        source: &FieldSet<F2, L2>,
    ) -> Result<(), FactoryError> {
        self.clear_fields();
        self.fields.reserve(source.field_count());
        for field in source.iter() {
            let copy = copy_field(&self.factory, field)?;
            self.fields.add(copy);
        }
        self.load_error = source.load_error.clone();
        Ok(())
    }

    /// A new set with a clone of the factory, assigned from `self`.
    pub fn try_clone(&self) -> Result<Self, FactoryError>
    where
        F: Clone,
        L: Default,
    {
        let mut copy = Self::with_factory(self.factory.clone()).with_options(self.options.clone());
        copy.assign(self)?;
        Ok(copy)
    }
}

fn copy_field<F: ScanFactory + ?Sized>(factory: &F, source: &Field) -> Result<Field, FactoryError> {
    let mut field = create_field(factory, source.key())?;
    if let Some(operation_id) = source.conditions_operation_id() {
        field.set_conditions_operation_id(operation_id)?;
    }
    for condition in source.conditions() {
        let copy = create_condition(
            factory,
            &field,
            condition.operator_id(),
            condition.operand().clone(),
        )?;
        field.add_condition(copy)?;
    }
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scan_core::condition::{Condition, Operand};
    use scan_core::error::{LoadError, LoadErrorTypeId};
    use scan_core::ids::{BooleanOperationId, ConditionTypeId, FieldKey, IsCategoryId, OperatorId};

    use crate::factory::{ConditionFactory, FieldFactory};

    fn is_field() -> Field {
        let mut field = Field::new(FieldKey::Is);
        field.set_conditions_operation_id(BooleanOperationId::Or).unwrap();
        for category in [IsCategoryId::Etf, IsCategoryId::Index] {
            field
                .add_condition(
                    Condition::new(ConditionTypeId::Is, OperatorId::Is, Operand::Category(category))
                        .unwrap(),
                )
                .unwrap();
        }
        field
    }

    #[test]
    fn assign_copies_fields_and_error() {
        let mut source = FieldSet::new();
        source.add_field(is_field()).unwrap();
        source.end_load(Some(LoadError::new(LoadErrorTypeId::AllConditionNotSupported)));

        let mut target = FieldSet::new();
        target.add_field(Field::new(FieldKey::CurrencyOverlaps)).unwrap();
        target.assign(&source).unwrap();

        assert_eq!(target, source);
        assert_eq!(target.load_error(), source.load_error());
    }

    #[test]
    fn clone_is_independent() {
        let mut source = FieldSet::new();
        source.add_field(is_field()).unwrap();
        let mut copy = source.try_clone().unwrap();

        copy.field_mut(0).unwrap().clear_conditions();
        assert_eq!(source.field(0).unwrap().condition_count(), 2);
        assert!(source != copy);
    }

    struct NoIs;

    impl FieldFactory for NoIs {
        fn create_is_field(&self) -> Result<Field, FactoryError> {
            Err(FactoryError::new("is fields are disabled"))
        }
    }

    impl ConditionFactory for NoIs {}

    #[test]
    fn factory_failure_aborts_assign() {
        let mut source = FieldSet::new();
        source.add_field(is_field()).unwrap();

        let mut target: FieldSet<NoIs> = FieldSet::with_factory(NoIs);
        let err = target.assign(&source).unwrap_err();
        assert_eq!(err.message, "is fields are disabled");
    }
}
