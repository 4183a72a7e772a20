mod shared;
mod power;
mod pretty;

pub use shared::{Set, SetIterator};
pub use power::{PowerSet, MAX_POWER_SET_ELEMENTS};

/// The operations every set in this crate supports.
///
/// Mutating operations take `&self`: a set is a shared handle, and appending through one
/// handle is visible through every alias of the same storage.
pub trait SetOps<T: Clone> {
    fn contains(&self, value: &T) -> bool;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn iter(&self) -> impl Iterator<Item = T>;

    fn append(&self, value: T) -> &Self;
    fn remove(&self, value: &T) -> &Self;

    fn equals(&self, other: &Self) -> bool;
    fn is_subset(&self, other: &Self) -> bool;

    fn intersection(&self, other: &Self) -> Self;
    fn intersect_inplace(&self, other: &Self) -> &Self;

    fn union(&self, other: &Self) -> Self;
    fn union_inplace(&self, other: &Self) -> &Self;

    /// Elements of `self` that are not members of `universe`, i.e. `self - universe`.
    fn relative_complement(&self, universe: &Self) -> Self;
    fn difference_inplace(&self, universe: &Self) -> &Self;
}

/// Builds a [`Set`] from a list of values, converting each with `Into`.
///
/// ```
/// use lib_sets::prelude::*;
///
/// let s: Set<Element> = set![1, 2, "a"];
/// assert_eq!(s.len(), 3);
/// ```
#[macro_export]
macro_rules! set {
    () => {
        $crate::set::Set::new()
    };
    ($($value:expr),+ $(,)?) => {{
        let s = $crate::set::Set::new();
        $(
            $crate::set::SetOps::append(&s, ::std::convert::Into::into($value));
        )+
        s
    }};
}
