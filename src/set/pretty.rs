use std::{
    fmt::{self, Debug, Display, Formatter},
    hash::Hash,
};

use itertools::Itertools;

use super::Set;

impl<T: Eq + Hash + Clone + Display> Set<T> {
    /// Renders the set as `[e1, e2, ...]`. Element order is unspecified.
    pub fn set_string(&self) -> String {
        self.to_string()
    }
}

impl<T: Eq + Hash + Clone + Display> Display for Set<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "[{}]", self.elements().iter().join(", "))
    }
}

impl<T: Eq + Hash + Clone + Debug> Debug for Set<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_set().entries(self.elements()).finish()
    }
}
