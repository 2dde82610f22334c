//! Ordered list contract for field collections.
//!
//! Field sets store their fields behind [`OrderedList`] so a host can swap in
//! its own collection (an observable list, say) without touching the engine.

use std::marker::PhantomData;

/// An index-addressed, order-preserving container.
pub trait OrderedList<T> {
    fn count(&self) -> usize;

    fn get(&self, index: usize) -> Option<&T>;

    fn get_mut(&mut self, index: usize) -> Option<&mut T>;

    /// Appends `item` at the end.
    fn add(&mut self, item: T);

    /// Removes and returns the item at `index`, shifting later items down.
    fn remove(&mut self, index: usize) -> Option<T>;

    fn clear(&mut self);

    /// Capacity hint; implementations may ignore it.
    fn reserve(&mut self, additional: usize);

    fn is_empty(&self) -> bool {
        self.count() == 0
    }

    fn iter(&self) -> Iter<'_, T, Self> {
        Iter {
            list: self,
            index: 0,
            _item: PhantomData,
        }
    }

    /// Index of the first item matching `predicate`.
    fn position<P>(&self, mut predicate: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        (0..self.count()).find(|&index| self.get(index).is_some_and(&mut predicate))
    }
}

/// Front-to-back iterator over an [`OrderedList`].
pub struct Iter<'a, T, L: ?Sized> {
    list: &'a L,
    index: usize,
    _item: PhantomData<fn() -> T>,
}

impl<'a, T: 'a, L: OrderedList<T> + ?Sized> Iterator for Iter<'a, T, L> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.list.get(self.index)?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.list.count().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<T> OrderedList<T> for Vec<T> {
    fn count(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    fn add(&mut self, item: T) {
        Vec::push(self, item);
    }

    fn remove(&mut self, index: usize) -> Option<T> {
        if index < Vec::len(self) {
            Some(Vec::remove(self, index))
        } else {
            None
        }
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn reserve(&mut self, additional: usize) {
        Vec::reserve(self, additional);
    }
}
