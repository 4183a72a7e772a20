pub mod element;
pub mod set;
pub mod shell;

pub mod utils {
    pub mod prelude {
        pub use anyhow::{anyhow, Context, Error};
        pub type Result<T> = anyhow::Result<T, Error>;

        pub use std::collections::{BTreeSet, HashMap, HashSet};
    }
}

pub mod prelude {
    pub use super::element::Element;
    pub use super::set::{PowerSet, Set, SetOps, MAX_POWER_SET_ELEMENTS};
    pub use super::shell::*;
    pub use super::utils::prelude::*;

    pub use crate::set;
}
