//! The field set aggregate.

use scan_core::error::LoadError;
use scan_core::field::Field;
use scan_core::ids::FieldId;
use scan_core::list::{Iter, OrderedList};

use crate::factory::DefaultFactory;
use crate::options::LoadOptions;

/// Direct edits a field set refuses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldSetError {
    #[error("field set already has a {field_id} field")]
    DuplicateFieldId { field_id: FieldId },
}

/// An ordered collection of fields with at most one field per [`FieldId`],
/// plus the outcome of the last load.
///
/// `F` allocates fields and conditions during load and assign; `L` stores the
/// fields and may be any [`OrderedList`].
#[derive(Debug)]
pub struct FieldSet<F = DefaultFactory, L = Vec<Field>> {
    pub(crate) fields: L,
    pub(crate) factory: F,
    pub(crate) options: LoadOptions,
    pub(crate) load_error: Option<LoadError>,
}

impl FieldSet {
    /// An empty set using [`DefaultFactory`] and a `Vec`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: Default, L: Default> Default for FieldSet<F, L> {
    fn default() -> Self {
        Self {
            fields: L::default(),
            factory: F::default(),
            options: LoadOptions::default(),
            load_error: None,
        }
    }
}

impl<F, L: OrderedList<Field> + Default> FieldSet<F, L> {
    pub fn with_factory(factory: F) -> Self {
        Self {
            fields: L::default(),
            factory,
            options: LoadOptions::default(),
            load_error: None,
        }
    }
}

impl<F, L: OrderedList<Field>> FieldSet<F, L> {
    pub fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: LoadOptions) {
        self.options = options;
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn fields(&self) -> &L {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.count()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn field_mut(&mut self, index: usize) -> Option<&mut Field> {
        self.fields.get_mut(index)
    }

    /// The field with `field_id`, whatever its sub-field.
    pub fn find_field(&self, field_id: FieldId) -> Option<&Field> {
        self.fields
            .position(|field| field.field_id() == field_id)
            .and_then(|index| self.fields.get(index))
    }

    pub fn iter(&self) -> Iter<'_, Field, L> {
        self.fields.iter()
    }

    /// Appends `field`, returning its index.
    pub fn add_field(&mut self, field: Field) -> Result<usize, FieldSetError> {
        let field_id = field.field_id();
        if self.find_field(field_id).is_some() {
            return Err(FieldSetError::DuplicateFieldId { field_id });
        }
        self.fields.add(field);
        Ok(self.fields.count() - 1)
    }

    pub fn remove_field(&mut self, index: usize) -> Option<Field> {
        self.fields.remove(index)
    }

    pub fn clear_fields(&mut self) {
        self.fields.clear();
    }

    /// `true` unless the last load failed.
    pub fn is_valid(&self) -> bool {
        self.load_error.is_none()
    }

    /// Why the last load failed. Cleared by the next load.
    pub fn load_error(&self) -> Option<&LoadError> {
        self.load_error.as_ref()
    }

    /// Starts a load: drops all fields and any previous error.
    pub fn begin_load(&mut self) {
        self.fields.clear();
        self.load_error = None;
    }

    /// Finishes a load, recording its error if it failed.
    pub fn end_load(&mut self, error: Option<LoadError>) {
        self.load_error = error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use scan_core::error::LoadErrorTypeId;
    use scan_core::ids::{AltCodeSubFieldId, FieldKey, NumericRangeFieldId};

    #[test]
    fn new_set_is_empty_and_valid() {
        let set = FieldSet::new();
        assert!(set.is_empty());
        assert!(set.is_valid());
        assert_eq!(set.load_error(), None);
        assert_eq!(set.options(), &LoadOptions::default());
    }

    #[test]
    fn add_field_rejects_second_field_with_same_id() {
        let mut set = FieldSet::new();
        let isin = Field::new(FieldKey::AltCodeSubbedTextHasValueContains(AltCodeSubFieldId::Isin));
        let ric = Field::new(FieldKey::AltCodeSubbedTextHasValueContains(AltCodeSubFieldId::Ric));
        assert_eq!(set.add_field(isin).unwrap(), 0);
        assert_eq!(
            set.add_field(ric).unwrap_err(),
            FieldSetError::DuplicateFieldId {
                field_id: FieldId::AltCode
            }
        );
        assert_eq!(set.field_count(), 1);
    }

    #[test]
    fn find_remove_and_clear() {
        let mut set = FieldSet::new();
        set.add_field(Field::new(FieldKey::Is)).unwrap();
        set.add_field(Field::new(FieldKey::NumericInRange(NumericRangeFieldId::Ask)))
            .unwrap();
        assert_eq!(
            set.find_field(FieldId::Ask).map(Field::key),
            Some(FieldKey::NumericInRange(NumericRangeFieldId::Ask))
        );
        assert!(set.find_field(FieldId::Bid).is_none());

        let removed = set.remove_field(0).unwrap();
        assert_eq!(removed.key(), FieldKey::Is);
        assert_eq!(set.iter().count(), 1);
        set.clear_fields();
        assert!(set.is_empty());
    }

    #[test]
    fn load_bracket_resets_and_records_error() {
        let mut set = FieldSet::new();
        set.add_field(Field::new(FieldKey::Is)).unwrap();
        set.end_load(Some(LoadError::new(LoadErrorTypeId::AllConditionNotSupported)));
        assert!(!set.is_valid());

        set.begin_load();
        assert!(set.is_empty());
        assert!(set.is_valid());
    }
}
