use std::{cell::RefCell, collections::HashSet, hash::Hash, rc::Rc};

use super::SetOps;

/// A finite set of unique elements behind a shared handle.
///
/// Cloning a `Set` aliases it: both handles see the same storage, so an `append` through
/// one is visible through the other. Use [`Set::detach`] for an independent copy.
pub struct Set<T>(Rc<RefCell<HashSet<T>>>);

impl<T> Set<T> {
    /// Whether two handles refer to the same storage.
    pub fn ptr_eq(a: &Set<T>, b: &Set<T>) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl<T: Eq + Hash + Clone> Set<T> {
    /// An empty set.
    pub fn new() -> Set<T> {
        Set(Rc::new(RefCell::new(HashSet::new())))
    }

    pub fn with_capacity(capacity: usize) -> Set<T> {
        Set(Rc::new(RefCell::new(HashSet::with_capacity(capacity))))
    }

    /// A copy of this set with its own storage.
    pub fn detach(&self) -> Set<T> {
        Set(Rc::new(RefCell::new(self.0.borrow().clone())))
    }

    /// Snapshot of the current elements, in unspecified order.
    pub fn elements(&self) -> Vec<T> {
        self.0.borrow().iter().cloned().collect()
    }

    /// Empties the set in place.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Union over an arbitrary collection of sets; no sets gives the empty set.
    pub fn union_many<'a>(sets: impl IntoIterator<Item = &'a Set<T>>) -> Set<T>
    where
        T: 'a,
    {
        let s = Set::new();
        sets.into_iter().for_each(|other| {
            s.union_inplace(other);
        });
        s
    }
}

impl<T> Clone for Set<T> {
    fn clone(&self) -> Self {
        Set(Rc::clone(&self.0))
    }
}

impl<T: Eq + Hash + Clone> Default for Set<T> {
    fn default() -> Self {
        Set::new()
    }
}

impl<T: Eq + Hash + Clone> SetOps<T> for Set<T> {
    fn contains(&self, value: &T) -> bool {
        self.0.borrow().contains(value)
    }

    fn len(&self) -> usize {
        self.0.borrow().len()
    }

    fn iter(&self) -> impl Iterator<Item = T> {
        SetIterator::new(self)
    }

    fn append(&self, value: T) -> &Self {
        self.0.borrow_mut().insert(value);
        self
    }

    fn remove(&self, value: &T) -> &Self {
        self.0.borrow_mut().remove(value);
        self
    }

    fn equals(&self, other: &Self) -> bool {
        // differing cardinalities settle it; equal ones make a one-way subset check enough
        if self.len() != other.len() {
            return false;
        }
        self.is_subset(other)
    }

    fn is_subset(&self, other: &Self) -> bool {
        let other = other.0.borrow();
        self.0.borrow().iter().all(|value| other.contains(value))
    }

    fn intersection(&self, other: &Self) -> Self {
        let s = self.detach();
        s.intersect_inplace(other);
        s
    }

    fn intersect_inplace(&self, other: &Self) -> &Self {
        if Set::ptr_eq(self, other) {
            return self;
        }
        let other = other.0.borrow();
        self.0.borrow_mut().retain(|value| other.contains(value));
        self
    }

    fn union(&self, other: &Self) -> Self {
        let s = self.detach();
        s.union_inplace(other);
        s
    }

    fn union_inplace(&self, other: &Self) -> &Self {
        if Set::ptr_eq(self, other) {
            return self;
        }
        let other = other.0.borrow();
        self.0.borrow_mut().extend(other.iter().cloned());
        self
    }

    fn relative_complement(&self, universe: &Self) -> Self {
        let s = self.detach();
        s.difference_inplace(universe);
        s
    }

    fn difference_inplace(&self, universe: &Self) -> &Self {
        if Set::ptr_eq(self, universe) {
            self.clear();
            return self;
        }
        let universe = universe.0.borrow();
        self.0.borrow_mut().retain(|value| !universe.contains(value));
        self
    }
}

impl<T: Eq + Hash + Clone> PartialEq for Set<T> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl<T: Eq + Hash + Clone> Eq for Set<T> {}

impl<T: Eq + Hash + Clone> FromIterator<T> for Set<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Set(Rc::new(RefCell::new(iter.into_iter().collect())))
    }
}

impl<'a, T: Eq + Hash + Clone + 'a> FromIterator<&'a T> for Set<T> {
    fn from_iter<I: IntoIterator<Item = &'a T>>(iter: I) -> Self {
        iter.into_iter().cloned().collect()
    }
}

impl<T: Eq + Hash + Clone> Extend<T> for Set<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.0.borrow_mut().extend(iter);
    }
}

/// Iterates over a snapshot of a set's elements taken when the iterator was created, so the
/// set may be mutated while iterating.
pub struct SetIterator<T> {
    data: std::vec::IntoIter<T>,
}

impl<T: Eq + Hash + Clone> SetIterator<T> {
    pub fn new(set: &Set<T>) -> SetIterator<T> {
        SetIterator { data: set.elements().into_iter() }
    }
}

impl<T> Iterator for SetIterator<T> {
    type Item = T;
    fn next(&mut self) -> Option<Self::Item> {
        self.data.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.data.size_hint()
    }
}

impl<T> ExactSizeIterator for SetIterator<T> {}

impl<T: Eq + Hash + Clone> IntoIterator for Set<T> {
    type IntoIter = SetIterator<T>;
    type Item = T;
    fn into_iter(self) -> Self::IntoIter {
        SetIterator::new(&self)
    }
}

impl<'a, T: Eq + Hash + Clone> IntoIterator for &'a Set<T> {
    type IntoIter = SetIterator<T>;
    type Item = T;
    fn into_iter(self) -> Self::IntoIter {
        SetIterator::new(self)
    }
}
