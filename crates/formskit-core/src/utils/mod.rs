//! Utility types shared by the formskit crates.
//!
//! - [`MultiValueDict`]: an insertion-ordered dictionary holding a list of
//!   values per key, the shape of submitted form data.

mod multi_value_dict;

pub use multi_value_dict::MultiValueDict;
