pub mod directive;
pub mod document;
pub mod operation;
pub mod selection_set;
pub mod value;
