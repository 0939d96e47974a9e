pub mod catalog;
pub mod sequence;
