use std::hash::Hash;

use crate::utils::prelude::*;

use super::{Set, SetOps};

type Mask = u64;

/// Largest set whose power set can be enumerated. Every subset is indexed by a `Mask`, and
/// `2^n` itself must fit both in a `Mask` and in a `usize`, so the iterator's length is exact.
pub const MAX_POWER_SET_ELEMENTS: usize = if usize::BITS < Mask::BITS {
    usize::BITS as usize - 1
} else {
    Mask::BITS as usize - 1
};

/// Lazily enumerates every subset of a set.
///
/// The elements are frozen into a fixed order when the enumeration starts; subset `i`
/// contains element `k` iff bit `k` of `i` is set. Subset `0` is the empty set and subset
/// `2^n - 1` is the whole set. Each yielded set has its own storage.
pub struct PowerSet<T> {
    elements: Vec<T>,
    next: Mask,
    end: Mask,
}

impl<T: Eq + Hash + Clone> PowerSet<T> {
    pub fn new(set: &Set<T>) -> Result<PowerSet<T>> {
        let elements = set.elements();
        if elements.len() > MAX_POWER_SET_ELEMENTS {
            return Err(anyhow!(
                "cannot enumerate the power set of {} elements; the limit is {}",
                elements.len(),
                MAX_POWER_SET_ELEMENTS
            ));
        }
        let end = (1 as Mask) << elements.len();
        log::trace!("enumerating {end} subsets of a {}-element set", elements.len());
        Ok(PowerSet { elements, next: 0, end })
    }

    /// Builds the subset selected by `mask`.
    fn subset(&self, mask: Mask) -> Set<T> {
        let s = Set::with_capacity(mask.count_ones() as usize);
        self.elements
            .iter()
            .enumerate()
            .filter(|(k, _)| (mask >> k) & 1 == 1)
            .for_each(|(_, value)| {
                s.append(value.clone());
            });
        s
    }
}

impl<T: Eq + Hash + Clone> Iterator for PowerSet<T> {
    type Item = Set<T>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let s = self.subset(self.next);
        self.next += 1;
        Some(s)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // end <= 2^MAX_POWER_SET_ELEMENTS, which fits in a usize
        let remaining = (self.end - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl<T: Eq + Hash + Clone> DoubleEndedIterator for PowerSet<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        self.end -= 1;
        Some(self.subset(self.end))
    }
}

impl<T: Eq + Hash + Clone> ExactSizeIterator for PowerSet<T> {}

impl<T: Eq + Hash + Clone> Set<T> {
    /// All `2^n` subsets of this set, produced on demand.
    ///
    /// Fails for sets larger than [`MAX_POWER_SET_ELEMENTS`].
    pub fn power_set(&self) -> Result<PowerSet<T>> {
        PowerSet::new(self)
    }
}
