mod category;
pub mod nested_set;

pub use category::{Category, CategoryPatch, NewCategory};
